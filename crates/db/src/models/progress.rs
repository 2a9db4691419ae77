//! Per-user per-course lecture completion model.

use serde::Serialize;
use skillmarket_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Completion record keyed by `(user_id, course_id)`.
///
/// `lectures_completed` has set semantics: the repository append is
/// conditional, so completing the same lecture twice is a no-op.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseProgress {
    pub user_id: DbId,
    pub course_id: DbId,
    pub lectures_completed: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
