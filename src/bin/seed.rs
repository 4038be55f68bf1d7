use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_course_store_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    services::admin_service::seed_catalog,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(
        &pool,
        "admin",
        &config.admin_email,
        "admin123",
        Some("admin"),
    )
    .await?;
    let user_id = ensure_user(&pool, "student", "student@example.com", "student123", None).await?;
    seed_courses(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={})", role.unwrap_or("user"));
    Ok(user_id)
}

async fn seed_courses(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for (offset, course) in seed_catalog().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO courses (id, name, description, price, image_url, trailer_url, instructor)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(offset as i32 + 1)
        .bind(&course.name)
        .bind(&course.description)
        .bind(course.price)
        .bind(&course.image_url)
        .bind(&course.trailer_url)
        .bind(&course.instructor)
        .execute(pool)
        .await?;
    }

    println!("Seeded courses");
    Ok(())
}
