//! Course entity model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skillmarket_core::content::Chapter;
use skillmarket_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// Full course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub educator_id: DbId,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub price: Decimal,
    /// Discount percentage, `0..=100`.
    pub discount: i32,
    pub is_published: bool,
    /// Typed chapter/lecture tree stored as JSONB.
    pub content: Json<Vec<Chapter>>,
    /// User ids enrolled in this course (set semantics).
    pub enrolled_students: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Catalog view: no content, no enrollment list, rating aggregate joined in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseSummary {
    pub id: DbId,
    pub educator_id: DbId,
    pub educator_name: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub price: Decimal,
    pub discount: i32,
    pub rating_count: i64,
    pub average_rating: Option<f64>,
}

/// DTO for inserting a new course.
#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub educator_id: DbId,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub price: Decimal,
    pub discount: i32,
    pub is_published: bool,
    pub content: Json<Vec<Chapter>>,
}
