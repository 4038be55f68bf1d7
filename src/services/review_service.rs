use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::reviews::{AddReviewRequest, ReviewList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Review,
    response::{ApiResponse, Meta},
};

/// Appends a review unconditionally; whether the submitter actually
/// purchased the course is only gated in the storefront UI, not here.
pub async fn add_review(
    pool: &DbPool,
    user: &AuthUser,
    course_id: i32,
    payload: AddReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".into(),
        ));
    }

    let reviewer_name = reviewer_display_name(pool, user.user_id).await;

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (id, course_id, user_id, reviewer_name, rating, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(course_id)
    .bind(user.user_id)
    .bind(reviewer_name)
    .bind(payload.rating)
    .bind(payload.comment)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "review_add",
        Some("reviews"),
        Some(serde_json::json!({ "course_id": course_id, "rating": review.rating })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review added",
        review,
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(pool: &DbPool, course_id: i32) -> AppResult<ApiResponse<ReviewList>> {
    let items = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE course_id = $1 ORDER BY created_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    let ratings: Vec<i32> = items.iter().map(|r| r.rating).collect();
    let data = ReviewList {
        average_rating: average_rating(&ratings),
        items,
    };

    Ok(ApiResponse::success("Reviews", data, Some(Meta::empty())))
}

/// Sum over count; never persisted.
pub fn average_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    Some(sum as f64 / ratings.len() as f64)
}

// Display name for the review card. The profile read is nice to have, so
// a missing row or a store error degrades to a placeholder.
async fn reviewer_display_name(pool: &DbPool, user_id: Uuid) -> String {
    match sqlx::query_as::<_, (String,)>("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some((username,))) => username,
        Ok(None) => "Anonymous".to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "profile lookup failed, using placeholder name");
            "Anonymous".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::average_rating;

    #[test]
    fn average_is_sum_over_count() {
        assert_eq!(average_rating(&[4, 2]), Some(3.0));
        assert_eq!(average_rating(&[5]), Some(5.0));
        assert_eq!(average_rating(&[1, 2, 2]), Some(5.0 / 3.0));
    }

    #[test]
    fn no_reviews_means_no_average() {
        assert_eq!(average_rating(&[]), None);
    }
}
