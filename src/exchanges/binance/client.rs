//! HTTP client for the Binance USDT-M Futures REST API.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;

/// Default receive window for signed requests in milliseconds.
const DEFAULT_RECEIVE_WINDOW: i64 = 5000;

/// Public USDT-M Futures testnet endpoint.
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Binance API error.
#[derive(Debug, Error)]
#[error("binance api error {code}: {message}")]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Configuration for creating a new Client.
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub receive_window: i64,
}

impl ClientConfig {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            base_url: TESTNET_BASE_URL.to_string(),
            api_key,
            api_secret,
            receive_window: DEFAULT_RECEIVE_WINDOW,
        }
    }
}

/// HTTP client for the Binance futures API.
/// Handles request signing and error handling.
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
}

impl Client {
    /// Creates a new Binance API client.
    pub fn new(config: ClientConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");

        Self {
            config,
            http_client,
        }
    }

    /// Creates a new Binance API client from application settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config =
            ClientConfig::new(settings.api_key.clone(), settings.api_secret.clone());
        config.base_url = settings.base_url.trim_end_matches('/').to_string();
        Self::new(config)
    }

    /// Creates an HMAC-SHA256 signature over the full query string,
    /// hex-encoded as Binance expects.
    fn sign(&self, payload: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.config.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Sends a signed request to the Binance API.
    ///
    /// Signed endpoints carry all parameters in the query string, followed
    /// by `timestamp`, `recvWindow` and the `signature` computed over the
    /// preceding parameters. The API key travels in the `X-MBX-APIKEY`
    /// header.
    pub async fn send_signed(
        &self,
        method: Method,
        endpoint: &str,
        params: Vec<(String, String)>,
    ) -> Result<Vec<u8>> {
        let timestamp = chrono::Utc::now().timestamp_millis();

        let mut payload: String = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        if !payload.is_empty() {
            payload.push('&');
        }
        payload.push_str(&format!(
            "timestamp={}&recvWindow={}",
            timestamp, self.config.receive_window
        ));

        let signature = self.sign(&payload);
        let url = format!(
            "{}{}?{}&signature={}",
            self.config.base_url, endpoint, payload, signature
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-MBX-APIKEY",
            HeaderValue::from_str(&self.config.api_key).unwrap(),
        );

        debug!(method = %method, endpoint = %endpoint, "sending signed request");

        let response = self
            .http_client
            .request(method, &url)
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(self.parse_error_response(status, &body));
        }

        Ok(body.to_vec())
    }

    /// Creates a ClientError from an error response.
    fn parse_error_response(&self, status: StatusCode, body: &[u8]) -> ClientError {
        #[derive(Deserialize)]
        struct ErrorResponse {
            code: Option<i64>,
            msg: Option<String>,
        }

        let api_err = match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(resp) => ApiError {
                code: resp.code.unwrap_or(status.as_u16() as i64),
                message: resp
                    .msg
                    .unwrap_or_else(|| String::from_utf8_lossy(body).to_string()),
            },
            Err(_) => ApiError {
                code: status.as_u16() as i64,
                message: String::from_utf8_lossy(body).to_string(),
            },
        };

        warn!(code = api_err.code, message = %api_err.message, "api error");

        ClientError::Api(api_err)
    }
}
