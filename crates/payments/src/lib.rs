//! Payment gateway adapter.
//!
//! Two responsibilities, both behind the [`PaymentGateway`] trait so tests
//! can substitute a fake:
//!
//! - open an external checkout session for a purchase, tagged with the
//!   purchase id as correlation metadata;
//! - verify and decode settlement callbacks. This crate is the only place
//!   callback signatures are checked.

mod callback;
mod http;

pub use callback::{verify_signed_callback, CallbackEvent, CallbackOutcome};
pub use http::{GatewayConfig, HttpPaymentGateway};

use async_trait::async_trait;
use rust_decimal::Decimal;
use skillmarket_core::types::DbId;

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway returned HTTP {0}")]
    HttpStatus(u16),

    /// The gateway response could not be decoded.
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// The callback signature did not verify against the shared secret.
    #[error("Callback signature verification failed")]
    InvalidSignature,

    /// The callback signature verified but the payload did not decode.
    #[error("Malformed callback payload: {0}")]
    MalformedCallback(#[from] serde_json::Error),
}

/// Request to open a checkout session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// Exact amount to charge, already discounted and rounded to 2 dp.
    pub amount: Decimal,
    /// ISO currency code, lowercase (e.g. `"usd"`).
    pub currency: String,
    /// Human-readable description shown on the checkout page.
    pub description: String,
    /// The local purchase id; echoed back in the settlement callback.
    pub correlation_id: DbId,
    /// Where the gateway redirects after a successful payment.
    pub success_url: String,
    /// Where the gateway redirects after cancellation.
    pub cancel_url: String,
}

/// An opened checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// The gateway's session reference.
    pub session_id: String,
    /// URL the purchasing client is redirected to.
    pub url: String,
}

/// Seam between the reconciler and the external payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session. A timeout or transport failure here is
    /// retryable for the client; the pending purchase is left untouched.
    async fn create_session(&self, req: &CreateSession) -> Result<CheckoutSession, PaymentError>;

    /// Verify a raw callback body against its signature header and decode
    /// it. Rejects with [`PaymentError::InvalidSignature`] before looking
    /// at the payload at all.
    fn verify_callback(
        &self,
        raw_payload: &[u8],
        signature: &str,
    ) -> Result<CallbackEvent, PaymentError>;
}
