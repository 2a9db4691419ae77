//! Repository for the `courses` table.

use skillmarket_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CourseSummary, CreateCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, educator_id, title, description, thumbnail_url, price, discount, \
                       is_published, content, enrolled_students, created_at, updated_at";

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses
                (educator_id, title, description, thumbnail_url, price, discount,
                 is_published, content)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(input.educator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(input.price)
            .bind(input.discount)
            .bind(input.is_published)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a course by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Catalog listing: published courses without content or enrollment
    /// lists, with the rating aggregate and educator name joined in.
    pub async fn list_published(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CourseSummary>, sqlx::Error> {
        sqlx::query_as::<_, CourseSummary>(
            "SELECT c.id, c.educator_id, u.name AS educator_name, c.title, c.description,
                    c.thumbnail_url, c.price, c.discount,
                    COUNT(r.rating) AS rating_count,
                    CAST(AVG(r.rating) AS DOUBLE PRECISION) AS average_rating
             FROM courses c
             JOIN users u ON u.id = c.educator_id
             LEFT JOIN course_ratings r ON r.course_id = c.id
             WHERE c.is_published
             GROUP BY c.id, u.name
             ORDER BY c.created_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// All courses owned by an educator, newest first.
    pub async fn list_by_educator(
        pool: &PgPool,
        educator_id: DbId,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM courses WHERE educator_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Course>(&query)
            .bind(educator_id)
            .fetch_all(pool)
            .await
    }

    /// Idempotently add a user to the course's enrolled-students list.
    ///
    /// Mirror of [`crate::repositories::UserRepo::enroll_course`]; the two
    /// appends together form the bidirectional enrollment. Returns `true`
    /// if the list changed.
    pub async fn enroll_student(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses
             SET enrolled_students = array_append(enrolled_students, $2),
                 updated_at = NOW()
             WHERE id = $1 AND NOT ($2 = ANY(enrolled_students))",
        )
        .bind(course_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
