//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod progress_repo;
pub mod purchase_repo;
pub mod rating_repo;
pub mod user_repo;

pub use course_repo::CourseRepo;
pub use progress_repo::ProgressRepo;
pub use purchase_repo::PurchaseRepo;
pub use rating_repo::RatingRepo;
pub use user_repo::UserRepo;
