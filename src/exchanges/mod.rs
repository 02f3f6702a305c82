//! Exchange integration abstraction and implementations.

pub mod binance;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::NewOrder;

/// Exchange errors.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The exchange refused the order.
    #[error("order rejected by exchange ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// Transport-level failure reaching the exchange.
    #[error("network error: {0}")]
    Network(String),

    /// The exchange answered with a body we could not parse.
    #[error("invalid exchange response: {0}")]
    Parse(String),
}

/// Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// ExchangeApi is the order-placement capability this system depends on.
///
/// Implementations own signing, transport and rate limiting; callers hand
/// over a fully normalized order and receive the exchange's raw response
/// untouched. The trait is the seam used to stub the exchange in tests.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Submits a new order and returns the raw structured response.
    /// The response fields are defined entirely by the exchange and are
    /// passed through opaquely.
    async fn place_order(&self, order: &NewOrder) -> Result<serde_json::Value>;

    /// Unique identifier of this exchange backend.
    fn name(&self) -> &str;
}
