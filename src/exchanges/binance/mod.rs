//! Binance USDT-M Futures testnet implementation of [`ExchangeApi`].

mod client;

pub use client::{ApiError, Client, ClientConfig, ClientError, TESTNET_BASE_URL};

use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use crate::config::Settings;
use crate::domain::{NewOrder, OrderType};
use crate::exchanges::{ExchangeApi, ExchangeError, Result};

const EXCHANGE_NAME: &str = "binance-futures";

/// Order-creation endpoint on the futures API.
const ORDER_ENDPOINT: &str = "/fapi/v1/order";

/// Binance futures exchange adapter.
pub struct BinanceFutures {
    client: Client,
}

impl BinanceFutures {
    /// Creates the adapter from validated settings. Credentials have
    /// already been checked by [`Settings::from_env`].
    pub fn new(settings: &Settings) -> Self {
        let client = Client::from_settings(settings);
        info!(base_url = %settings.base_url, "initialized binance futures client");
        Self { client }
    }
}

#[async_trait]
impl ExchangeApi for BinanceFutures {
    async fn place_order(&self, order: &NewOrder) -> Result<serde_json::Value> {
        let mut params = vec![
            ("symbol".to_string(), order.symbol.clone()),
            ("side".to_string(), order.side.as_str().to_string()),
            ("type".to_string(), order.order_type.as_str().to_string()),
            ("quantity".to_string(), order.quantity.to_string()),
        ];

        if order.order_type == OrderType::Limit {
            if let Some(price) = order.price {
                params.push(("price".to_string(), price.to_string()));
            }
            let tif = order.time_in_force.unwrap_or_default();
            params.push(("timeInForce".to_string(), tif.as_str().to_string()));
        }

        info!(
            symbol = %order.symbol,
            side = order.side.as_str(),
            order_type = order.order_type.as_str(),
            quantity = %order.quantity,
            "placing order"
        );

        let body = self
            .client
            .send_signed(Method::POST, ORDER_ENDPOINT, params)
            .await
            .map_err(map_client_error)?;

        serde_json::from_slice(&body)
            .map_err(|e| ExchangeError::Parse(format!("order response: {}", e)))
    }

    fn name(&self) -> &str {
        EXCHANGE_NAME
    }
}

/// Maps client errors to exchange errors.
fn map_client_error(err: ClientError) -> ExchangeError {
    match err {
        ClientError::Api(api_err) => ExchangeError::Rejected {
            code: api_err.code,
            message: api_err.message,
        },
        ClientError::Request(e) => ExchangeError::Network(e.to_string()),
        ClientError::Json(e) => ExchangeError::Parse(e.to_string()),
    }
}
