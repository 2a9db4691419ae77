//! Purchase/enrollment reconciler.
//!
//! The lifecycle of a paid enrollment:
//!
//! 1. [`initiate`] records a `pending` purchase and opens a checkout
//!    session with the gateway, tagging it with the purchase id.
//! 2. The gateway later calls back; [`settle`] or [`cancel`] drive the
//!    purchase to its terminal status.
//! 3. On settlement the two enrollment lists (user side and course side)
//!    are appended idempotently.
//!
//! The `pending -> terminal` transition is a conditional UPDATE in
//! [`PurchaseRepo`], so concurrent callback deliveries serialize on the
//! database row. A redelivered settlement for an already-completed
//! purchase re-applies the enrollment appends (they are no-ops once both
//! sides are present) and reports success, so partial failures between
//! the status flip and the appends converge on retry.

use skillmarket_core::error::CoreError;
use skillmarket_core::pricing::discounted_amount;
use skillmarket_core::types::DbId;
use skillmarket_db::models::purchase::{CreatePurchase, Purchase, PurchaseStatus};
use skillmarket_db::repositories::{CourseRepo, PurchaseRepo, UserRepo};
use skillmarket_db::DbPool;
use skillmarket_payments::{CreateSession, PaymentGateway};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Result of initiating a purchase: the pending ledger row plus the
/// checkout URL the client is redirected to.
#[derive(Debug)]
pub struct CheckoutStarted {
    pub purchase: Purchase,
    pub session_url: String,
}

/// Record a `pending` purchase for the course and open a checkout session.
///
/// The charged amount is the course price after discount, rounded to two
/// decimal places. A gateway failure here leaves the pending purchase in
/// place; it never settles and is harmless.
pub async fn initiate(
    pool: &DbPool,
    gateway: &dyn PaymentGateway,
    currency: &str,
    user: &AuthUser,
    course_id: DbId,
    origin: &str,
) -> AppResult<CheckoutStarted> {
    // The token may outlive the account; check before writing the ledger.
    UserRepo::find_by_id(pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        })?;

    let course = CourseRepo::find_by_id(pool, course_id)
        .await?
        .filter(|c| c.is_published)
        .ok_or(CoreError::NotFound {
            entity: "course",
            id: course_id,
        })?;

    let amount = discounted_amount(course.price, course.discount)?;
    let purchase = PurchaseRepo::create(
        pool,
        &CreatePurchase {
            course_id,
            user_id: user.user_id,
            amount,
        },
    )
    .await?;

    tracing::info!(
        purchase_id = purchase.id,
        course_id,
        user_id = user.user_id,
        %amount,
        "purchase initiated"
    );

    let session = gateway
        .create_session(&CreateSession {
            amount,
            currency: currency.to_string(),
            description: course.title.clone(),
            correlation_id: purchase.id,
            success_url: format!("{origin}/loading/my-enrollments"),
            cancel_url: format!("{origin}/"),
        })
        .await
        .map_err(AppError::Payment)?;

    tracing::info!(
        purchase_id = purchase.id,
        session_id = %session.session_id,
        "checkout session opened"
    );

    Ok(CheckoutStarted {
        purchase,
        session_url: session.url,
    })
}

/// Settle a purchase: flip `pending -> completed` and apply the
/// bidirectional enrollment appends.
///
/// Safe to call any number of times for the same purchase; only the first
/// call flips the status, and the appends are idempotent.
pub async fn settle(pool: &DbPool, purchase_id: DbId) -> AppResult<()> {
    if let Some(purchase) = PurchaseRepo::settle(pool, purchase_id).await? {
        apply_enrollment(pool, &purchase).await?;
        tracing::info!(purchase_id, "purchase settled and enrollment applied");
        return Ok(());
    }

    // Lost the conditional update: the purchase is missing or already
    // terminal. Re-fetch and decide from the stored status.
    let purchase = PurchaseRepo::find_by_id(pool, purchase_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(purchase_id, "settlement callback for unknown purchase");
            CoreError::NotFound {
                entity: "purchase",
                id: purchase_id,
            }
        })?;

    match purchase.status {
        PurchaseStatus::Completed => {
            // Redelivery. Re-apply the appends so a crash between the
            // status flip and the enrollment writes converges here.
            apply_enrollment(pool, &purchase).await?;
            tracing::debug!(purchase_id, "settlement redelivery, enrollment re-applied");
            Ok(())
        }
        PurchaseStatus::Failed => Err(AppError::Core(CoreError::Conflict(
            "Purchase already failed; cannot settle".into(),
        ))),
        PurchaseStatus::Pending => Err(AppError::Core(CoreError::Conflict(
            "Purchase settlement raced; retry".into(),
        ))),
    }
}

/// Mark a purchase as failed. Redeliveries of the cancellation are
/// accepted silently; cancelling a completed purchase is a conflict.
pub async fn cancel(pool: &DbPool, purchase_id: DbId) -> AppResult<()> {
    if PurchaseRepo::fail(pool, purchase_id).await?.is_some() {
        tracing::info!(purchase_id, "purchase cancelled");
        return Ok(());
    }

    let purchase = PurchaseRepo::find_by_id(pool, purchase_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(purchase_id, "cancellation callback for unknown purchase");
            CoreError::NotFound {
                entity: "purchase",
                id: purchase_id,
            }
        })?;

    match purchase.status {
        PurchaseStatus::Failed => Ok(()),
        PurchaseStatus::Completed => Err(AppError::Core(CoreError::Conflict(
            "Purchase already completed; cannot cancel".into(),
        ))),
        PurchaseStatus::Pending => Err(AppError::Core(CoreError::Conflict(
            "Purchase cancellation raced; retry".into(),
        ))),
    }
}

/// Append the enrollment on both sides. Each append is a no-op when the
/// id is already present, so this can run repeatedly.
async fn apply_enrollment(pool: &DbPool, purchase: &Purchase) -> Result<(), sqlx::Error> {
    UserRepo::enroll_course(pool, purchase.user_id, purchase.course_id).await?;
    CourseRepo::enroll_student(pool, purchase.course_id, purchase.user_id).await?;
    Ok(())
}
