pub mod course;
pub mod progress;
pub mod purchase;
pub mod rating;
pub mod user;
