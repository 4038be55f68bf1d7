pub mod auth;
pub mod courses;
pub mod orders;
pub mod reviews;
pub mod wishlist;
