//! Core entities for futures orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side represents the direction of an order (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy opens or increases a long position.
    Buy,
    /// Sell opens or increases a short position.
    Sell,
}

impl Side {
    /// Canonical wire form used by the exchange API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

/// OrderType represents the type of order execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Market executes immediately at the best available price.
    Market,
    /// Limit executes at the specified price or better.
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

/// TimeInForce governs how long a LIMIT order stays active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good-till-cancelled.
    #[default]
    Gtc,
    /// Immediate-or-cancel.
    Ioc,
    /// Fill-or-kill.
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

/// NewOrder is a fully validated, normalized order ready to be submitted.
///
/// Invariant: `price` and `time_in_force` are `Some` exactly when
/// `order_type` is LIMIT. MARKET orders never carry either field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// Upper-case alphanumeric trading symbol (e.g. "BTCUSDT").
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Market or limit.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Order quantity in base asset units, strictly positive.
    pub quantity: Decimal,
    /// Limit price, present only for LIMIT orders.
    pub price: Option<Decimal>,
    /// Time-in-force, present only for LIMIT orders (defaults to GTC).
    pub time_in_force: Option<TimeInForce>,
}

/// OrderRecord is the durable log entry created from a successful
/// exchange response. Write-once, read-many.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    /// Store-assigned monotonic identifier.
    pub id: i64,
    /// When the record was written (UTC).
    pub created_at: DateTime<Utc>,
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    /// Exchange-reported lifecycle state (e.g. NEW, FILLED).
    pub status: String,
    /// Exchange-assigned order identifier.
    pub order_id: String,
    /// Full raw response payload, kept for audit.
    #[serde(skip_serializing)]
    pub raw_response: serde_json::Value,
}
