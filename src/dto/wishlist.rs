use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Course;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleWishlistRequest {
    pub course_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistState {
    /// Whether the toggle added (`true`) or removed (`false`) the course.
    pub added: bool,
    pub course_ids: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistCourseList {
    pub items: Vec<Course>,
}
