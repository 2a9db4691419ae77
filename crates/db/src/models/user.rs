//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use skillmarket_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Role name, `"student"` or `"educator"`.
    pub role: String,
    pub image_url: Option<String>,
    /// Course ids this user is enrolled in (set semantics).
    pub enrolled_courses: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub image_url: Option<String>,
    pub enrolled_courses: Vec<DbId>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            image_url: user.image_url,
            enrolled_courses: user.enrolled_courses,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image_url: Option<String>,
}

/// Minimal public view of a student, embedded in educator responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentInfo {
    pub id: DbId,
    pub name: String,
    pub image_url: Option<String>,
}
