mod common;

use axum_course_store_api::{
    dto::reviews::AddReviewRequest,
    dto::wishlist::ToggleWishlistRequest,
    error::AppError,
    services::{admin_service, review_service, wishlist_service},
};
use std::time::Duration;

// Wishlist toggling and review submission against a real database.
#[tokio::test]
async fn wishlist_and_review_flow() -> anyhow::Result<()> {
    let database_url = match common::test_database_url() {
        Some(url) => url,
        None => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = common::setup_state(&database_url).await?;
    let auth_admin = common::create_user(&state, "admin", "admin@example.com", Some("admin")).await?;
    let auth_student = common::create_user(&state, "student", "student@example.com", None).await?;

    admin_service::reset_catalog(&state, &auth_admin).await?;

    // Toggling flips membership: absent -> present -> absent.
    let toggled = wishlist_service::toggle_wishlist(
        &state.pool,
        &auth_student,
        ToggleWishlistRequest { course_id: 5 },
    )
    .await?
    .data
    .unwrap();
    assert!(toggled.added);
    assert_eq!(toggled.course_ids, vec![5]);

    let toggled = wishlist_service::toggle_wishlist(
        &state.pool,
        &auth_student,
        ToggleWishlistRequest { course_id: 5 },
    )
    .await?
    .data
    .unwrap();
    assert!(!toggled.added);
    assert!(toggled.course_ids.is_empty());

    // Unknown courses cannot be wished for.
    let missing = wishlist_service::toggle_wishlist(
        &state.pool,
        &auth_student,
        ToggleWishlistRequest { course_id: 999 },
    )
    .await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));

    // The joined listing returns the catalog rows.
    for course_id in [2, 5] {
        wishlist_service::toggle_wishlist(
            &state.pool,
            &auth_student,
            ToggleWishlistRequest { course_id },
        )
        .await?;
    }
    let listed = wishlist_service::list_wishlist(&state.pool, &auth_student)
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(listed.len(), 2);

    // Reviews append unconditionally (no purchase required, repeats
    // allowed) and the average is computed on read.
    let first = review_service::add_review(
        &state.pool,
        &auth_student,
        5,
        AddReviewRequest {
            rating: 4,
            comment: "Solid introduction.".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(first.rating, 4);
    assert_eq!(first.reviewer_name, "student");

    let reviews = review_service::list_reviews(&state.pool, 5)
        .await?
        .data
        .unwrap();
    assert_eq!(reviews.items.len(), 1);
    assert_eq!(reviews.average_rating, Some(4.0));

    // Spread the timestamps so the newest-first assertion is deterministic.
    std::thread::sleep(Duration::from_millis(20));
    review_service::add_review(
        &state.pool,
        &auth_student,
        5,
        AddReviewRequest {
            rating: 2,
            comment: "Second thoughts.".into(),
        },
    )
    .await?;

    let reviews = review_service::list_reviews(&state.pool, 5)
        .await?
        .data
        .unwrap();
    assert_eq!(reviews.items.len(), 2);
    assert_eq!(reviews.average_rating, Some(3.0));
    // Newest first.
    assert_eq!(reviews.items[0].rating, 2);

    // Other courses are unaffected.
    let other = review_service::list_reviews(&state.pool, 4)
        .await?
        .data
        .unwrap();
    assert!(other.items.is_empty());
    assert_eq!(other.average_rating, None);

    // Ratings outside 1..=5 are rejected.
    for rating in [0, 6] {
        let err = review_service::add_review(
            &state.pool,
            &auth_student,
            5,
            AddReviewRequest {
                rating,
                comment: "out of range".into(),
            },
        )
        .await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    Ok(())
}
