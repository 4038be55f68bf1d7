pub mod audit_logs;
pub mod courses;
pub mod reviews;
pub mod transaction_courses;
pub mod transactions;
pub mod users;
pub mod wishlist_items;

pub use audit_logs::Entity as AuditLogs;
pub use courses::Entity as Courses;
pub use reviews::Entity as Reviews;
pub use transaction_courses::Entity as TransactionCourses;
pub use transactions::Entity as Transactions;
pub use users::Entity as Users;
pub use wishlist_items::Entity as WishlistItems;
