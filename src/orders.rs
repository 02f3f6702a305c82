//! Order orchestration: validate the raw parameters, submit through the
//! exchange, and summarize the response for display.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::domain::NewOrder;
use crate::exchanges::{ExchangeApi, ExchangeError};
use crate::validate::{
    validate_order_type, validate_price, validate_quantity, validate_side, validate_symbol,
    validate_time_in_force, ValidationError,
};

/// Failure of the place-order flow. Validation and exchange failures are
/// propagated as-is so callers can map them to their own surfaces.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// Validates the raw order parameters and, on full success, places the
/// order through the exchange exactly once, returning the raw response.
///
/// Fields are checked in a fixed order (symbol, side, type, quantity,
/// price, time-in-force) and the first failing rule short-circuits the
/// flow: no network call is made for invalid input. Exchange failures
/// propagate unmodified; nothing is retried.
pub async fn build_and_place_order(
    exchange: &dyn ExchangeApi,
    symbol: &str,
    side: &str,
    order_type: &str,
    quantity: &str,
    price: Option<&str>,
    time_in_force: Option<&str>,
) -> Result<Value, OrderError> {
    let order = match normalize(symbol, side, order_type, quantity, price, time_in_force) {
        Ok(order) => order,
        Err(e) => {
            warn!(error = %e, "order validation failed");
            return Err(e.into());
        }
    };

    let response = exchange.place_order(&order).await?;
    Ok(response)
}

/// Runs all field validators in order, building the normalized order.
fn normalize(
    symbol: &str,
    side: &str,
    order_type: &str,
    quantity: &str,
    price: Option<&str>,
    time_in_force: Option<&str>,
) -> Result<NewOrder, ValidationError> {
    let symbol = validate_symbol(symbol)?;
    let side = validate_side(side)?;
    let order_type = validate_order_type(order_type)?;
    let quantity = validate_quantity(quantity)?;
    let price = validate_price(price, order_type)?;
    let time_in_force = validate_time_in_force(time_in_force, order_type)?;

    Ok(NewOrder {
        symbol,
        side,
        order_type,
        quantity,
        price,
        time_in_force,
    })
}

/// Concise summary extracted from the exchange order response.
///
/// Every field is passed through opaquely: missing keys surface as null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub symbol: Value,
    pub order_id: Value,
    pub client_order_id: Value,
    pub status: Value,
    #[serde(rename = "type")]
    pub order_type: Value,
    pub side: Value,
    pub orig_qty: Value,
    pub executed_qty: Value,
    pub avg_price: Value,
    pub update_time: Value,
}

impl OrderSummary {
    /// Extracts the summary fields from the raw response. `updateTime`
    /// falls back to `transactTime`, which MARKET fills report instead.
    pub fn from_response(response: &Value) -> Self {
        let field = |key: &str| response.get(key).cloned().unwrap_or(Value::Null);

        Self {
            symbol: field("symbol"),
            order_id: field("orderId"),
            client_order_id: field("clientOrderId"),
            status: field("status"),
            order_type: field("type"),
            side: field("side"),
            orig_qty: field("origQty"),
            executed_qty: field("executedQty"),
            avg_price: field("avgPrice"),
            update_time: response
                .get("updateTime")
                .or_else(|| response.get("transactTime"))
                .cloned()
                .unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::Result as ExchangeResult;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub exchange that records how many orders reached it.
    struct StubExchange {
        calls: AtomicUsize,
        response: Value,
        fail: bool,
    }

    impl StubExchange {
        fn returning(response: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Value::Null,
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeApi for StubExchange {
        async fn place_order(&self, _order: &NewOrder) -> ExchangeResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExchangeError::Rejected {
                    code: -2019,
                    message: "Margin is insufficient.".to_string(),
                });
            }
            Ok(self.response.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn test_validation_failure_skips_exchange_call() {
        let exchange = StubExchange::returning(json!({"status": "NEW"}));

        let result = build_and_place_order(
            &exchange, "BTCUSDT", "BUY", "MARKET", "0", None, None,
        )
        .await;

        assert!(matches!(
            result,
            Err(OrderError::Validation(ValidationError::InvalidQuantity))
        ));
        assert_eq!(exchange.calls(), 0);
    }

    #[tokio::test]
    async fn test_first_failing_field_wins() {
        let exchange = StubExchange::returning(json!({}));

        // Both the symbol and the quantity are invalid; the symbol is
        // checked first.
        let result = build_and_place_order(
            &exchange, "BTC-USDT", "BUY", "MARKET", "-1", None, None,
        )
        .await;

        assert!(matches!(
            result,
            Err(OrderError::Validation(ValidationError::InvalidSymbol))
        ));
        assert_eq!(exchange.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_calls_exchange_once_and_passes_response_through() {
        let raw = json!({
            "symbol": "BTCUSDT",
            "orderId": 4055001,
            "status": "NEW",
            "origQty": "0.002",
        });
        let exchange = StubExchange::returning(raw.clone());

        let response = build_and_place_order(
            &exchange, "btcusdt", "buy", "market", "0.002", None, None,
        )
        .await
        .unwrap();

        assert_eq!(response, raw);
        assert_eq!(exchange.calls(), 1);
    }

    #[tokio::test]
    async fn test_exchange_failure_propagates_unmodified() {
        let exchange = StubExchange::failing();

        let result = build_and_place_order(
            &exchange, "BTCUSDT", "SELL", "LIMIT", "0.002", Some("42000"), Some("IOC"),
        )
        .await;

        match result {
            Err(OrderError::Exchange(ExchangeError::Rejected { code, .. })) => {
                assert_eq!(code, -2019);
            }
            other => panic!("expected exchange rejection, got {:?}", other),
        }
        assert_eq!(exchange.calls(), 1);
    }

    #[test]
    fn test_summary_extracts_known_fields() {
        let response = json!({
            "symbol": "BTCUSDT",
            "orderId": 4055001,
            "clientOrderId": "x-abc123",
            "status": "NEW",
            "type": "MARKET",
            "side": "BUY",
            "origQty": "0.002",
            "executedQty": "0.000",
            "avgPrice": "0.00",
            "updateTime": 1754400000000i64,
        });

        let summary = OrderSummary::from_response(&response);
        assert_eq!(summary.symbol, json!("BTCUSDT"));
        assert_eq!(summary.order_id, json!(4055001));
        assert_eq!(summary.status, json!("NEW"));
        assert_eq!(summary.update_time, json!(1754400000000i64));
    }

    #[test]
    fn test_summary_falls_back_to_transact_time() {
        let response = json!({
            "symbol": "BTCUSDT",
            "status": "FILLED",
            "transactTime": 1754400000123i64,
        });

        let summary = OrderSummary::from_response(&response);
        assert_eq!(summary.update_time, json!(1754400000123i64));
        // Fields the exchange did not report surface as null.
        assert_eq!(summary.avg_price, Value::Null);
        assert_eq!(summary.client_order_id, Value::Null);
    }
}
