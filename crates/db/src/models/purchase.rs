//! Purchase ledger model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skillmarket_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Purchase settlement status.
///
/// Transitions only along `pending -> completed` or `pending -> failed`;
/// terminal states are never left. The repository enforces this with
/// conditional UPDATEs ([`crate::repositories::PurchaseRepo::settle`] and
/// [`crate::repositories::PurchaseRepo::fail`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "purchase_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
}

/// Full purchase row from the `purchases` table.
///
/// `amount` is computed from the course price and discount when the
/// checkout is initiated and never recomputed afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub amount: Decimal,
    pub status: PurchaseStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a pending purchase.
#[derive(Debug)]
pub struct CreatePurchase {
    pub course_id: DbId,
    pub user_id: DbId,
    pub amount: Decimal,
}

/// Row for the educator "enrolled students" report: one completed purchase
/// joined with the student and course it belongs to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompletedPurchaseRow {
    pub student_id: DbId,
    pub student_name: String,
    pub student_image_url: Option<String>,
    pub course_title: String,
    pub purchase_date: Timestamp,
}
