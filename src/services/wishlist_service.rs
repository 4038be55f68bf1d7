use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::wishlist::{ToggleWishlistRequest, WishlistCourseList, WishlistState},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Course,
    response::{ApiResponse, Meta},
};

pub async fn list_wishlist(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistCourseList>> {
    let items = sqlx::query_as::<_, Course>(
        r#"
        SELECT c.*
        FROM wishlist_items w
        JOIN courses c ON c.id = w.course_id
        WHERE w.user_id = $1
        ORDER BY w.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "Wishlist",
        WishlistCourseList { items },
        Some(Meta::empty()),
    ))
}

/// Adds the course when absent, removes it when present. The stored set
/// is authoritative; the response returns the full membership so the UI
/// can reconcile instead of guessing.
pub async fn toggle_wishlist(
    pool: &DbPool,
    user: &AuthUser,
    payload: ToggleWishlistRequest,
) -> AppResult<ApiResponse<WishlistState>> {
    let course_exists: Option<(i32,)> = sqlx::query_as("SELECT id FROM courses WHERE id = $1")
        .bind(payload.course_id)
        .fetch_optional(pool)
        .await?;

    if course_exists.is_none() {
        return Err(AppError::BadRequest("Course not found".into()));
    }

    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM wishlist_items WHERE user_id = $1 AND course_id = $2",
    )
    .bind(user.user_id)
    .bind(payload.course_id)
    .fetch_optional(pool)
    .await?;

    let added = match existing {
        Some((id,)) => {
            sqlx::query("DELETE FROM wishlist_items WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
            false
        }
        None => {
            sqlx::query(
                "INSERT INTO wishlist_items (id, user_id, course_id) VALUES ($1, $2, $3)",
            )
            .bind(Uuid::new_v4())
            .bind(user.user_id)
            .bind(payload.course_id)
            .execute(pool)
            .await?;
            true
        }
    };

    let course_ids: Vec<(i32,)> = sqlx::query_as(
        "SELECT course_id FROM wishlist_items WHERE user_id = $1 ORDER BY course_id",
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        if added { "wishlist_add" } else { "wishlist_remove" },
        Some("wishlist_items"),
        Some(serde_json::json!({ "course_id": payload.course_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        if added {
            "Added to wishlist"
        } else {
            "Removed from wishlist"
        },
        WishlistState {
            added,
            course_ids: course_ids.into_iter().map(|(id,)| id).collect(),
        },
        Some(Meta::empty()),
    ))
}
