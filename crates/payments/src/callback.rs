//! Settlement callback verification and decoding.

use serde::{Deserialize, Serialize};
use skillmarket_core::signing;
use skillmarket_core::types::DbId;

use crate::PaymentError;

/// What the gateway reports about a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackOutcome {
    /// Funds were captured.
    Settled,
    /// The checkout was cancelled or the payment definitively failed.
    Cancelled,
}

/// A verified, decoded settlement callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackEvent {
    /// The purchase id the session was tagged with at creation time.
    pub correlation_id: DbId,
    pub outcome: CallbackOutcome,
}

/// Verify the HMAC-SHA256 signature over the raw body, then decode it.
///
/// Shared by [`crate::HttpPaymentGateway`] and test fakes so integration
/// tests exercise the same verification path production uses. The raw bytes
/// are signed, not a re-serialization, so the check is byte-exact.
pub fn verify_signed_callback(
    secret: &str,
    raw_payload: &[u8],
    signature: &str,
) -> Result<CallbackEvent, PaymentError> {
    if !signing::verify_signature(secret, raw_payload, signature) {
        return Err(PaymentError::InvalidSignature);
    }
    let event: CallbackEvent = serde_json::from_slice(raw_payload)?;
    Ok(event)
}
