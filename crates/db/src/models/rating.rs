//! Course rating model.

use serde::Serialize;
use skillmarket_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One user's rating of one course, `1..=5`.
///
/// The primary key `(course_id, user_id)` guarantees at most one rating per
/// user per course; re-rating replaces the value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseRating {
    pub course_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
