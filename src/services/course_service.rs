use crate::{
    db::DbPool,
    dto::courses::CourseList,
    error::{AppError, AppResult},
    models::Course,
    response::{ApiResponse, Meta},
    routes::params::{CourseQuery, CourseSortBy, SortOrder},
};

/// Public catalog listing. Search and sort are presentation conveniences;
/// the ordering columns come from a fixed allowlist in `params`.
pub async fn list_courses(pool: &DbPool, query: CourseQuery) -> AppResult<ApiResponse<CourseList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let search = query.q.unwrap_or_default();
    let pattern = format!("%{}%", search);

    let sort_by = query.sort_by.unwrap_or(CourseSortBy::Id);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);

    let sql = format!(
        r#"
        SELECT * FROM courses
        WHERE ($1 = '' OR name ILIKE $2 OR description ILIKE $2 OR instructor ILIKE $2)
        ORDER BY {} {}
        LIMIT $3 OFFSET $4
        "#,
        sort_by.as_sql(),
        sort_order.as_sql()
    );

    let items = sqlx::query_as::<_, Course>(&sql)
        .bind(&search)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT count(*) FROM courses
        WHERE ($1 = '' OR name ILIKE $2 OR description ILIKE $2 OR instructor ILIKE $2)
        "#,
    )
    .bind(&search)
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Courses",
        CourseList { items },
        Some(meta),
    ))
}

pub async fn get_course(pool: &DbPool, id: i32) -> AppResult<ApiResponse<Course>> {
    let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let course = match course {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Course", course, None))
}
