pub mod admin_service;
pub mod auth_service;
pub mod course_service;
pub mod order_service;
pub mod review_service;
pub mod wishlist_service;
