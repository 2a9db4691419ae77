//! Repository for the `course_progress` table.

use skillmarket_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::CourseProgress;

/// Provides completion-tracking operations.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Record a lecture completion, creating the progress record on first
    /// use. Set semantics: completing an already-completed lecture is a
    /// no-op, not an error.
    ///
    /// Returns `true` when the lecture was already present (nothing changed).
    pub async fn mark_complete(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        lecture_id: &str,
    ) -> Result<bool, sqlx::Error> {
        // Single atomic upsert: insert a fresh record, or append to the
        // existing set only when the lecture id is not already in it.
        let result = sqlx::query(
            "INSERT INTO course_progress (user_id, course_id, lectures_completed)
             VALUES ($1, $2, ARRAY[$3])
             ON CONFLICT (user_id, course_id) DO UPDATE
             SET lectures_completed = array_append(course_progress.lectures_completed, $3),
                 updated_at = NOW()
             WHERE NOT ($3 = ANY(course_progress.lectures_completed))",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(lecture_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 0)
    }

    /// Fetch the completion record, `None` if the user has not completed
    /// anything in this course yet (not an error).
    pub async fn get(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<CourseProgress>, sqlx::Error> {
        sqlx::query_as::<_, CourseProgress>(
            "SELECT user_id, course_id, lectures_completed, created_at, updated_at
             FROM course_progress
             WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await
    }
}
