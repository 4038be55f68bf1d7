mod common;

use axum_course_store_api::{
    dto::courses::{BulkCreateCoursesRequest, CreateCourseRequest, UpdatePriceRequest},
    dto::orders::CheckoutRequest,
    entity::{
        transaction_courses::ActiveModel as TransactionCourseActive,
        transactions::ActiveModel as TransactionActive,
    },
    error::AppError,
    models::{STATUS_CONFIRMED, STATUS_PENDING},
    services::{admin_service, order_service},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

fn checkout_draft(reference: &str, course: &str, total: i64) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Test Student".into(),
        payer_email: "student@example.com".into(),
        course_names: vec![course.to_string()],
        total_amount: total,
        reference: reference.to_string(),
    }
}

fn course_draft(name: &str, price: i64) -> CreateCourseRequest {
    CreateCourseRequest {
        name: name.to_string(),
        description: format!("{name}, hands on."),
        price,
        image_url: "/images/placeholder.jpg".into(),
        trailer_url: None,
        instructor: "Test Instructor".into(),
    }
}

// Catalog admin ops, checkout with reference uniqueness, purchase facts
// and admin confirmation, end to end against a real database.
#[tokio::test]
async fn catalog_checkout_and_confirmation_flow() -> anyhow::Result<()> {
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

    // Seed catalog: reset is an idempotent overwrite with ids 1..=N.
    let seeded = admin_service::reset_catalog(&state, &auth_admin)
        .await?
        .data
        .unwrap()
        .items;
    assert!(!seeded.is_empty());
    let ids: Vec<i32> = seeded.iter().map(|c| c.id).collect();
    assert_eq!(ids, (1..=seeded.len() as i32).collect::<Vec<_>>());

    let again = admin_service::reset_catalog(&state, &auth_admin)
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(again.len(), seeded.len());

    // Bulk create assigns consecutive ids starting at max + 1.
    let max_id = seeded.len() as i32;
    let bulk = admin_service::bulk_create_courses(
        &state,
        &auth_admin,
        BulkCreateCoursesRequest {
            courses: vec![
                course_draft("Kubernetes Basics", 1599),
                course_draft("CI/CD Pipelines", 1399),
            ],
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert_eq!(
        bulk.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![max_id + 1, max_id + 2]
    );

    let single = admin_service::create_course(&state, &auth_admin, course_draft("Terraform 101", 1299))
        .await?
        .data
        .unwrap();
    assert_eq!(single.id, max_id + 3);

    let repriced = admin_service::update_course_price(
        &state,
        &auth_admin,
        single.id,
        UpdatePriceRequest { price: 2499 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(repriced.price, 2499);

    // Back-office requires the admin role.
    let err = admin_service::create_course(&state, &auth_student, course_draft("Nope", 1)).await;
    assert!(matches!(err, Err(AppError::Forbidden)));

    // Checkout auto-confirms and stamps a server-side timestamp.
    let before = Utc::now();
    let checkout = order_service::checkout(
        &state,
        Some(&auth_student),
        checkout_draft("TXN-001", "Intro to Go", 999),
    )
    .await?
    .data
    .unwrap();
    let tx = checkout.transaction;
    assert_eq!(tx.status, STATUS_CONFIRMED);
    assert_eq!(tx.total_amount, 999);
    assert_eq!(tx.courses, vec!["Intro to Go".to_string()]);
    assert!(tx.created_at >= before);

    // The relay is unconfigured, so the receipt falls back to a local file.
    assert!(!checkout.receipt_emailed);
    assert!(state.notifier.receipt_path("TXN-001").exists());

    // Reusing the payment reference is rejected and leaves no extra rows.
    let dup = order_service::create_transaction(
        &state,
        Some(auth_student.user_id),
        &checkout_draft("TXN-001", "Docker Essentials", 899),
    )
    .await;
    assert!(matches!(dup, Err(AppError::DuplicateReference)));
    let (count,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM transactions WHERE reference = 'TXN-001'")
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(count, 1);

    // A blank reference never reaches the store.
    let blank = order_service::create_transaction(
        &state,
        None,
        &checkout_draft("   ", "Docker Essentials", 899),
    )
    .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    // Guest checkout carries no user id and never counts toward anyone's
    // purchases.
    let guest = order_service::checkout(&state, None, checkout_draft("TXN-002", "Docker Essentials", 899))
        .await?
        .data
        .unwrap()
        .transaction;
    assert_eq!(guest.user_id, None);

    assert!(order_service::has_purchased(&state, auth_student.user_id, "Intro to Go").await?);
    assert!(!order_service::has_purchased(&state, auth_student.user_id, "intro to go").await?);
    assert!(!order_service::has_purchased(&state, auth_student.user_id, "Docker Essentials").await?);

    // A pending transaction is invisible to purchase facts until an admin
    // confirms it.
    let pending_id = Uuid::new_v4();
    TransactionActive {
        id: Set(pending_id),
        user_id: Set(Some(auth_student.user_id)),
        customer_name: Set("Test Student".into()),
        payer_email: Set("student@example.com".into()),
        reference: Set("TXN-003".into()),
        total_amount: Set(1299),
        status: Set(STATUS_PENDING.into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    TransactionCourseActive {
        id: Set(Uuid::new_v4()),
        transaction_id: Set(pending_id),
        course_name: Set("Rust Fundamentals".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    assert!(!order_service::has_purchased(&state, auth_student.user_id, "Rust Fundamentals").await?);

    let confirmed = admin_service::confirm_transaction(&state, &auth_admin, pending_id)
        .await?
        .data
        .unwrap();
    assert_eq!(confirmed.status, STATUS_CONFIRMED);
    assert!(order_service::has_purchased(&state, auth_student.user_id, "Rust Fundamentals").await?);

    // Confirming twice lands on the same state.
    let confirmed_again = admin_service::confirm_transaction(&state, &auth_admin, pending_id)
        .await?
        .data
        .unwrap();
    assert_eq!(confirmed_again.status, STATUS_CONFIRMED);
    assert_eq!(confirmed_again.id, confirmed.id);
    assert_eq!(confirmed_again.created_at, confirmed.created_at);

    // Purchased courses resolve against the catalog by name.
    let purchased = order_service::purchased_courses(&state, auth_student.user_id).await?;
    let names: Vec<&str> = purchased.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"Intro to Go"));
    assert!(names.contains(&"Rust Fundamentals"));

    // Hard-deleting a course does not rewrite history, but the name-keyed
    // join stops resolving it.
    let intro_id = purchased.iter().find(|c| c.name == "Intro to Go").unwrap().id;
    admin_service::delete_course(&state, &auth_admin, intro_id).await?;

    let after_delete = order_service::purchased_courses(&state, auth_student.user_id).await?;
    assert!(!after_delete.iter().any(|c| c.name == "Intro to Go"));

    let kept = admin_service::get_transaction_admin(&state, &auth_admin, tx.id)
        .await?
        .data
        .unwrap();
    assert_eq!(kept.courses, vec!["Intro to Go".to_string()]);

    // Admin listing is newest first and closed to regular users.
    let all = admin_service::list_all_transactions(&state, &auth_admin)
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let forbidden = admin_service::list_all_transactions(&state, &auth_student).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    Ok(())
}
