use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Checkout attempts start and stay in one of these two states. The
/// creation path always lands on `confirmed`; `pending` rows can only be
/// promoted by an explicit admin confirmation.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Persisted role override; `None` means the role is derived at login.
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub trailer_url: Option<String>,
    pub instructor: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted checkout attempt. Purchased courses are denormalized by
/// name, not id; renaming a course in the catalog does not rewrite them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub payer_email: String,
    pub reference: String,
    pub courses: Vec<String>,
    pub total_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub course_id: i32,
    pub user_id: Uuid,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
