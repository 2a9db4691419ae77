//! Repository for the `course_ratings` table.

use skillmarket_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::CourseRating;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "course_id, user_id, rating, created_at, updated_at";

/// Provides rating operations.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert or replace the user's rating for a course.
    ///
    /// Idempotent: rating the same course again overwrites the previous
    /// value, leaving exactly one row per `(course, user)`.
    pub async fn upsert(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
        rating: i32,
    ) -> Result<CourseRating, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_ratings (course_id, user_id, rating)
             VALUES ($1, $2, $3)
             ON CONFLICT (course_id, user_id) DO UPDATE
             SET rating = EXCLUDED.rating, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CourseRating>(&query)
            .bind(course_id)
            .bind(user_id)
            .bind(rating)
            .fetch_one(pool)
            .await
    }

    /// All ratings for a course. Consumers compute the average at read time.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<CourseRating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM course_ratings WHERE course_id = $1 ORDER BY user_id");
        sqlx::query_as::<_, CourseRating>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }
}
