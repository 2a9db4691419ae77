//! Repository for the `purchases` ledger.
//!
//! Status transitions are conditional UPDATEs against the stored status, so
//! the database row is the serialization point for concurrent settlement
//! callbacks: at most one caller wins a `pending -> terminal` transition.

use rust_decimal::Decimal;
use skillmarket_core::types::DbId;
use sqlx::PgPool;

use crate::models::purchase::{CompletedPurchaseRow, CreatePurchase, Purchase};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, user_id, amount, status, created_at, updated_at";

/// Provides ledger operations for purchases.
pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Insert a new `pending` purchase, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePurchase) -> Result<Purchase, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchases (course_id, user_id, amount)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(input.course_id)
            .bind(input.user_id)
            .bind(input.amount)
            .fetch_one(pool)
            .await
    }

    /// Find a purchase by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE id = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Compare-and-set `pending -> completed`.
    ///
    /// Returns the updated row when this call won the transition, or `None`
    /// when the purchase is missing or not `pending` (the caller inspects
    /// the current status to distinguish redelivery from misuse).
    pub async fn settle(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!(
            "UPDATE purchases
             SET status = 'completed', updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Compare-and-set `pending -> failed`. Same contract as [`Self::settle`].
    pub async fn fail(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!(
            "UPDATE purchases
             SET status = 'failed', updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Sum of `completed` purchase amounts across an educator's courses.
    pub async fn total_earnings(pool: &PgPool, educator_id: DbId) -> Result<Decimal, sqlx::Error> {
        let (total,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(p.amount), 0)
             FROM purchases p
             JOIN courses c ON c.id = p.course_id
             WHERE c.educator_id = $1 AND p.status = 'completed'",
        )
        .bind(educator_id)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Completed purchases of an educator's courses, joined with the
    /// purchasing student and the course title, newest first.
    pub async fn completed_for_educator(
        pool: &PgPool,
        educator_id: DbId,
    ) -> Result<Vec<CompletedPurchaseRow>, sqlx::Error> {
        sqlx::query_as::<_, CompletedPurchaseRow>(
            "SELECT u.id AS student_id, u.name AS student_name,
                    u.image_url AS student_image_url,
                    c.title AS course_title, p.created_at AS purchase_date
             FROM purchases p
             JOIN courses c ON c.id = p.course_id
             JOIN users u ON u.id = p.user_id
             WHERE c.educator_id = $1 AND p.status = 'completed'
             ORDER BY p.created_at DESC",
        )
        .bind(educator_id)
        .fetch_all(pool)
        .await
    }
}
