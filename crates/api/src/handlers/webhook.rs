//! Payment gateway settlement callback handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use skillmarket_core::error::CoreError;
use skillmarket_payments::CallbackOutcome;

use crate::enrollment;
use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 signature over the raw body.
const SIGNATURE_HEADER: &str = "x-gateway-signature";

/// `POST /api/v1/webhooks/payments`
///
/// Unauthenticated endpoint; trust comes entirely from the signature over
/// the raw body. Verification happens before the payload is even parsed.
pub async fn payment_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<MessageResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::AuthenticationFailed(
                "Missing callback signature header".into(),
            ))
        })?;

    let event = state
        .gateway
        .verify_callback(&body, signature)
        .map_err(AppError::Payment)?;

    tracing::info!(
        purchase_id = event.correlation_id,
        outcome = ?event.outcome,
        "payment callback received"
    );

    match event.outcome {
        CallbackOutcome::Settled => enrollment::settle(&state.pool, event.correlation_id).await?,
        CallbackOutcome::Cancelled => enrollment::cancel(&state.pool, event.correlation_id).await?,
    }

    Ok(Json(MessageResponse {
        message: "Callback processed".to_string(),
    }))
}
