use std::sync::Arc;

use skillmarket_media::MediaHost;
use skillmarket_payments::PaymentGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Constructed once at process start and injected everywhere; tests swap
/// the adapters for in-memory fakes. Cheaply cloneable (inner data is
/// behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: skillmarket_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Payment gateway adapter (checkout sessions, callback verification).
    pub gateway: Arc<dyn PaymentGateway>,
    /// Media host adapter (thumbnail uploads).
    pub media: Arc<dyn MediaHost>,
}
