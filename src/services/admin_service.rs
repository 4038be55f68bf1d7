use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::courses::{BulkCreateCoursesRequest, CourseList, CreateCourseRequest, UpdatePriceRequest},
    dto::orders::TransactionList,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Course, Transaction},
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

// -- orders ---------------------------------------------------------------

pub async fn list_all_transactions(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<TransactionList>> {
    ensure_admin(user)?;
    let items = order_service::list_transactions(state).await?;
    Ok(ApiResponse::success(
        "Transactions",
        TransactionList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_transaction_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Transaction>> {
    ensure_admin(user)?;
    let transaction = order_service::get_transaction(state, id).await?;
    Ok(ApiResponse::success(
        "Transaction",
        transaction,
        Some(Meta::empty()),
    ))
}

pub async fn confirm_transaction(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Transaction>> {
    ensure_admin(user)?;
    let transaction = order_service::confirm_transaction(state, id).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "transaction_confirm",
        Some("transactions"),
        Some(serde_json::json!({ "transaction_id": transaction.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Transaction confirmed",
        transaction,
        Some(Meta::empty()),
    ))
}

// -- catalog --------------------------------------------------------------

fn validate_course(payload: &CreateCourseRequest) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Course name is required".into()));
    }
    if payload.price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }
    Ok(())
}

async fn insert_course(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: i32,
    payload: &CreateCourseRequest,
) -> AppResult<Course> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (id, name, description, price, image_url, trailer_url, instructor)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(&payload.image_url)
    .bind(&payload.trailer_url)
    .bind(&payload.instructor)
    .fetch_one(&mut **tx)
    .await?;
    Ok(course)
}

async fn next_course_id(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>) -> AppResult<i32> {
    let (max_id,): (Option<i32>,) = sqlx::query_as("SELECT MAX(id) FROM courses")
        .fetch_one(&mut **tx)
        .await?;
    Ok(max_id.unwrap_or(0) + 1)
}

/// Ids are handed out as current max + 1; after deletions new ids may
/// land in old gaps, which the storefront tolerates.
pub async fn create_course(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCourseRequest,
) -> AppResult<ApiResponse<Course>> {
    ensure_admin(user)?;
    validate_course(&payload)?;

    let mut tx = state.pool.begin().await?;
    let id = next_course_id(&mut tx).await?;
    let course = insert_course(&mut tx, id, &payload).await?;
    tx.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "course_create",
        Some("courses"),
        Some(serde_json::json!({ "course_id": course.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Course created",
        course,
        Some(Meta::empty()),
    ))
}

/// Assigns consecutive ids starting at max + 1, all in one database
/// transaction so a failing row leaves no partial batch behind.
pub async fn bulk_create_courses(
    state: &AppState,
    user: &AuthUser,
    payload: BulkCreateCoursesRequest,
) -> AppResult<ApiResponse<CourseList>> {
    ensure_admin(user)?;
    if payload.courses.is_empty() {
        return Err(AppError::BadRequest("No courses to create".into()));
    }
    for course in &payload.courses {
        validate_course(course)?;
    }

    let mut tx = state.pool.begin().await?;
    let start_id = next_course_id(&mut tx).await?;

    let mut items = Vec::with_capacity(payload.courses.len());
    for (offset, course) in payload.courses.iter().enumerate() {
        let id = start_id + offset as i32;
        items.push(insert_course(&mut tx, id, course).await?);
    }
    tx.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "course_bulk_create",
        Some("courses"),
        Some(serde_json::json!({ "count": items.len(), "start_id": start_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Courses created",
        CourseList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_course_price(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdatePriceRequest,
) -> AppResult<ApiResponse<Course>> {
    ensure_admin(user)?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }

    let course = sqlx::query_as::<_, Course>(
        "UPDATE courses SET price = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(payload.price)
    .fetch_optional(&state.pool)
    .await?;
    let course = match course {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "course_price_update",
        Some("courses"),
        Some(serde_json::json!({ "course_id": id, "price": payload.price })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Updated", course, Some(Meta::empty())))
}

/// Hard delete. Historical transactions keep referring to the course by
/// name; nothing cascades into them.
pub async fn delete_course(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "course_delete",
        Some("courses"),
        Some(serde_json::json!({ "course_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Overwrites the whole catalog with the fixed seed set. Running it twice
/// lands on the same state.
pub async fn reset_catalog(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CourseList>> {
    ensure_admin(user)?;

    let mut tx = state.pool.begin().await?;
    sqlx::query("DELETE FROM courses").execute(&mut *tx).await?;

    let mut items = Vec::new();
    for (offset, course) in seed_catalog().iter().enumerate() {
        items.push(insert_course(&mut tx, offset as i32 + 1, course).await?);
    }
    tx.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "catalog_reset",
        Some("courses"),
        Some(serde_json::json!({ "count": items.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Catalog reset",
        CourseList { items },
        Some(Meta::empty()),
    ))
}

/// The known-good course set used by `reset_catalog` and the seed binary.
pub fn seed_catalog() -> Vec<CreateCourseRequest> {
    let course = |name: &str, description: &str, price: i64, trailer: Option<&str>, instructor: &str| {
        CreateCourseRequest {
            name: name.to_string(),
            description: description.to_string(),
            price,
            image_url: format!(
                "/images/{}.jpg",
                name.to_lowercase().replace(' ', "-")
            ),
            trailer_url: trailer.map(|t| t.to_string()),
            instructor: instructor.to_string(),
        }
    };

    vec![
        course(
            "Intro to Go",
            "Syntax, tooling and the standard library from zero.",
            999,
            Some("https://videos.example.com/intro-to-go.mp4"),
            "Priya Raman",
        ),
        course(
            "Rust Fundamentals",
            "Ownership, borrowing and the type system, hands on.",
            1299,
            Some("https://videos.example.com/rust-fundamentals.mp4"),
            "Marta Kowalska",
        ),
        course(
            "Async Rust in Practice",
            "Futures, executors and writing real services with Tokio.",
            1999,
            None,
            "Marta Kowalska",
        ),
        course(
            "PostgreSQL for Developers",
            "Schema design, indexing and query tuning for app developers.",
            1499,
            None,
            "Jonas Weber",
        ),
        course(
            "Web APIs with Axum",
            "Routing, extractors, middleware and testing HTTP services.",
            1799,
            Some("https://videos.example.com/web-apis-with-axum.mp4"),
            "Priya Raman",
        ),
        course(
            "Docker Essentials",
            "Images, containers and compose files for everyday work.",
            899,
            None,
            "Jonas Weber",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::seed_catalog;
    use std::collections::HashSet;

    #[test]
    fn seed_catalog_is_well_formed() {
        let seed = seed_catalog();
        assert!(!seed.is_empty());

        let names: HashSet<&str> = seed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), seed.len(), "seed names must be unique");
        assert!(seed.iter().all(|c| c.price >= 0));
        assert!(seed.iter().all(|c| !c.instructor.trim().is_empty()));
    }
}
