use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Mount the payment gateway callback route (signature-authenticated).
pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/payments", post(webhook::payment_callback))
}
