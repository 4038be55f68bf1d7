use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    models::{ROLE_ADMIN, ROLE_USER, User},
    response::{ApiResponse, Meta},
};

/// Layered role resolution: persisted profile role, then the
/// distinguished-email check, then the hard default. Total: it still
/// answers when no profile row could be read (pass `None`).
pub fn resolve_role(persisted: Option<&str>, email: &str, admin_email: &str) -> String {
    if let Some(role) = persisted.filter(|r| !r.trim().is_empty()) {
        return role.to_string();
    }
    if email.eq_ignore_ascii_case(admin_email) {
        return ROLE_ADMIN.to_string();
    }
    ROLE_USER.to_string()
}

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    password_hash: String,
    role: Option<String>,
}

pub async fn register_user(
    pool: &DbPool,
    admin_email: &str,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    // The distinguished email gets its role persisted up front; everyone
    // else stays unset and resolves to the default at login.
    let role = email
        .eq_ignore_ascii_case(admin_email)
        .then(|| ROLE_ADMIN.to_string());

    let id = Uuid::new_v4();
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, email, role, created_at
        "#,
    )
    .bind(id)
    .bind(username.as_str())
    .bind(email.as_str())
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
    Ok(ApiResponse::success("User created", user, None))
}

pub async fn login_user(
    pool: &DbPool,
    admin_email: &str,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<UserRecord> = sqlx::query_as::<_, UserRecord>(
        "SELECT id, email, password_hash, role FROM users WHERE email = $1",
    )
    .bind(email.as_str())
    .fetch_optional(pool)
    .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let role = resolve_role(user.role.as_deref(), &user.email, admin_email);

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        role,
    };

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::resolve_role;

    const ADMIN: &str = "admin@example.com";

    #[test]
    fn persisted_role_wins() {
        assert_eq!(resolve_role(Some("admin"), "someone@example.com", ADMIN), "admin");
        assert_eq!(resolve_role(Some("user"), ADMIN, ADMIN), "user");
    }

    #[test]
    fn distinguished_email_is_admin_without_profile() {
        assert_eq!(resolve_role(None, ADMIN, ADMIN), "admin");
        assert_eq!(resolve_role(None, "Admin@Example.com", ADMIN), "admin");
    }

    #[test]
    fn everyone_else_defaults_to_user() {
        assert_eq!(resolve_role(None, "someone@example.com", ADMIN), "user");
        assert_eq!(resolve_role(Some("  "), "someone@example.com", ADMIN), "user");
    }
}
