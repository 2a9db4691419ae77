//! Repository for the `users` table.

use skillmarket_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::Course;
use crate::models::user::{CreateUser, StudentInfo, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, image_url, \
                       enrolled_courses, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with the `student` role, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Change a user's role. Returns `true` if the row was updated.
    pub async fn set_role(pool: &PgPool, id: DbId, role: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Idempotently add a course to the user's enrollment list.
    ///
    /// The append only fires when the course id is not already present, so
    /// a redelivered settlement callback or a retried partial failure never
    /// produces a duplicate entry. Returns `true` if the list changed.
    pub async fn enroll_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET enrolled_courses = array_append(enrolled_courses, $2),
                 updated_at = NOW()
             WHERE id = $1 AND NOT ($2 = ANY(enrolled_courses))",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Full course records for everything the user is enrolled in.
    pub async fn enrolled_courses(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "SELECT c.id, c.educator_id, c.title, c.description, c.thumbnail_url,
                    c.price, c.discount, c.is_published, c.content,
                    c.enrolled_students, c.created_at, c.updated_at
             FROM users u
             JOIN courses c ON c.id = ANY(u.enrolled_courses)
             WHERE u.id = $1
             ORDER BY c.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Public name/image info for a set of users, e.g. a course's enrolled
    /// students. Unknown ids are silently skipped.
    pub async fn find_students(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<StudentInfo>, sqlx::Error> {
        sqlx::query_as::<_, StudentInfo>(
            "SELECT id, name, image_url FROM users WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
