use axum_course_store_api::{
    config::RelaySettings,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::users::ActiveModel as UserActive,
    middleware::auth::AuthUser,
    notify::ReceiptNotifier,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

/// Returns `None` (and the test should bail out quietly) when no database
/// is configured in the environment.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

/// Fresh state against a clean database. The notifier is deliberately
/// unconfigured so receipts always take the local-file fallback.
pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE transaction_courses, transactions, wishlist_items, reviews, audit_logs, courses, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let notifier = ReceiptNotifier::with_settings(
        &RelaySettings {
            url: "https://relay.example.com/send".into(),
            service_id: None,
            template_id: None,
            public_key: None,
        },
        std::env::temp_dir().join(format!("receipts-{}", Uuid::new_v4())),
    );

    Ok(AppState {
        pool,
        orm,
        notifier,
        admin_email: "admin@example.com".into(),
    })
}

pub async fn create_user(
    state: &AppState,
    username: &str,
    email: &str,
    role: Option<&str>,
) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.map(|r| r.to_string())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: role.unwrap_or("user").to_string(),
    })
}
