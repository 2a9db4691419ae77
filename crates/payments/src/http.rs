//! HTTP implementation of [`PaymentGateway`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::callback::{verify_signed_callback, CallbackEvent};
use crate::{CheckoutSession, CreateSession, PaymentError, PaymentGateway};

/// HTTP request timeout for a session-creation call. A timeout is surfaced
/// to the purchasing client as a retryable failure; the pending purchase is
/// not touched.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the external payment processor.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API, no trailing slash.
    pub base_url: String,
    /// Bearer token for API calls.
    pub api_key: String,
    /// Shared secret for callback signature verification.
    pub webhook_secret: String,
}

impl GatewayConfig {
    /// Load gateway configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `PAYMENT_GATEWAY_URL`    | **yes**  | --      |
    /// | `PAYMENT_API_KEY`        | **yes**  | --      |
    /// | `PAYMENT_WEBHOOK_SECRET` | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if any required variable is missing; misconfiguration should
    /// fail at startup, not on the first purchase.
    pub fn from_env() -> Self {
        let base_url = std::env::var("PAYMENT_GATEWAY_URL")
            .expect("PAYMENT_GATEWAY_URL must be set in the environment");
        let api_key = std::env::var("PAYMENT_API_KEY")
            .expect("PAYMENT_API_KEY must be set in the environment");
        let webhook_secret = std::env::var("PAYMENT_WEBHOOK_SECRET")
            .expect("PAYMENT_WEBHOOK_SECRET must be set in the environment");

        Self {
            base_url,
            api_key,
            webhook_secret,
        }
    }
}

/// Wire shape of the gateway's session-creation response.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

/// Talks to the real payment processor over HTTPS.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpPaymentGateway {
    /// Create a gateway client with a pre-configured request timeout.
    pub fn new(config: GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_session(&self, req: &CreateSession) -> Result<CheckoutSession, PaymentError> {
        let body = serde_json::json!({
            "amount": req.amount.to_string(),
            "currency": req.currency,
            "description": req.description,
            "correlation_id": req.correlation_id,
            "success_url": req.success_url,
            "cancel_url": req.cancel_url,
        });

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                correlation_id = req.correlation_id,
                status = status.as_u16(),
                "Gateway rejected session creation"
            );
            return Err(PaymentError::HttpStatus(status.as_u16()));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url,
        })
    }

    fn verify_callback(
        &self,
        raw_payload: &[u8],
        signature: &str,
    ) -> Result<CallbackEvent, PaymentError> {
        verify_signed_callback(&self.config.webhook_secret, raw_payload, signature)
    }
}
