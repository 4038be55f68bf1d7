use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Course;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub trailer_url: Option<String>,
    pub instructor: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkCreateCoursesRequest {
    pub courses: Vec<CreateCourseRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePriceRequest {
    pub price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseList {
    pub items: Vec<Course>,
}
