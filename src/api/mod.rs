//! HTTP API and dashboard for order placement.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::exchanges::binance::BinanceFutures;
use crate::exchanges::ExchangeApi;
use crate::orders::{build_and_place_order, OrderError, OrderSummary};
use crate::storage::{OrderStore, SqliteOrderStore, StorageError};

/// Default number of records returned by the recent-orders endpoint.
const DEFAULT_RECENT_LIMIT: i64 = 20;

/// Server startup errors.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub exchange: Arc<dyn ExchangeApi>,
    pub store: Arc<dyn OrderStore>,
}

/// JSON body accepted by `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    #[serde(rename = "timeInForce")]
    pub time_in_force: Option<String>,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/orders", post(create_order))
        .route("/orders/recent", get(recent_orders))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Opens the store, wires the exchange client and serves the API until
/// the process is stopped.
pub async fn serve(settings: Settings) -> Result<(), ServeError> {
    let store = SqliteOrderStore::new(&settings.database_path).await?;
    let exchange = BinanceFutures::new(&settings);

    let state = AppState {
        exchange: Arc::new(exchange),
        store: Arc::new(store),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr.as_str()).await?;
    info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn dashboard() -> Html<&'static str> {
    Html(include_str!("dashboard.html"))
}

async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Result<Json<OrderSummary>, (StatusCode, Json<ErrorResponse>)> {
    let quantity = payload.quantity.to_string();
    let price = payload.price.map(|p| p.to_string());

    let response = build_and_place_order(
        state.exchange.as_ref(),
        &payload.symbol,
        &payload.side,
        &payload.order_type,
        &quantity,
        price.as_deref(),
        payload.time_in_force.as_deref(),
    )
    .await
    .map_err(|e| match e {
        OrderError::Validation(v) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: v.to_string(),
            }),
        ),
        OrderError::Exchange(x) => {
            error!(error = %x, "order placement failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: x.to_string(),
                }),
            )
        }
    })?;

    // The exchange accepted the order; a failed write must not turn the
    // placement into an error for the caller.
    if let Err(e) = state.store.save(&response).await {
        warn!(error = %e, "failed to record placed order");
    }

    Ok(Json(OrderSummary::from_response(&response)))
}

async fn recent_orders(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<crate::domain::OrderRecord>>, (StatusCode, Json<ErrorResponse>)> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    let records = state.store.recent(limit).await.map_err(|e| {
        error!(error = %e, "failed to load recent orders");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(records))
}
