//! Field-level validation and normalization of order parameters.
//!
//! All functions are pure and deterministic: they either reject the input
//! with the rule it violates or return the canonical form. Nothing here
//! performs I/O, so malformed input is rejected before any network call.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{OrderType, Side, TimeInForce};

/// Rejection of a single order field, carrying the rule violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("symbol must be a non-empty alphanumeric string, e.g. BTCUSDT")]
    InvalidSymbol,
    #[error("side must be BUY or SELL")]
    InvalidSide,
    #[error("order type must be MARKET or LIMIT")]
    InvalidOrderType,
    #[error("quantity must be a number greater than 0")]
    InvalidQuantity,
    #[error("price is required for LIMIT orders")]
    MissingPrice,
    #[error("price must be a number greater than 0")]
    InvalidPrice,
    #[error("time-in-force must be one of GTC, IOC, FOK for LIMIT orders")]
    InvalidTimeInForce,
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Checks that the symbol is non-empty and purely ASCII alphanumeric,
/// returning it upper-cased.
pub fn validate_symbol(symbol: &str) -> Result<String> {
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidSymbol);
    }
    Ok(symbol.to_ascii_uppercase())
}

/// Matches the side case-insensitively against BUY/SELL.
pub fn validate_side(side: &str) -> Result<Side> {
    match side.to_ascii_uppercase().as_str() {
        "BUY" => Ok(Side::Buy),
        "SELL" => Ok(Side::Sell),
        _ => Err(ValidationError::InvalidSide),
    }
}

/// Matches the order type case-insensitively against MARKET/LIMIT.
pub fn validate_order_type(order_type: &str) -> Result<OrderType> {
    match order_type.to_ascii_uppercase().as_str() {
        "MARKET" => Ok(OrderType::Market),
        "LIMIT" => Ok(OrderType::Limit),
        _ => Err(ValidationError::InvalidOrderType),
    }
}

/// Coerces the quantity to a decimal and requires it to be positive.
///
/// No upper bound and no symbol-specific step-size check is applied; the
/// exchange enforces its own filters.
pub fn validate_quantity(quantity: &str) -> Result<Decimal> {
    let value =
        Decimal::from_str(quantity.trim()).map_err(|_| ValidationError::InvalidQuantity)?;
    if value <= Decimal::ZERO {
        return Err(ValidationError::InvalidQuantity);
    }
    Ok(value)
}

/// Validates the price against the order type.
///
/// MARKET orders never carry a price: any supplied value is discarded and
/// `None` is returned. LIMIT orders require a positive decimal price.
pub fn validate_price(price: Option<&str>, order_type: OrderType) -> Result<Option<Decimal>> {
    if order_type != OrderType::Limit {
        return Ok(None);
    }
    let raw = price.ok_or(ValidationError::MissingPrice)?;
    let value = Decimal::from_str(raw.trim()).map_err(|_| ValidationError::InvalidPrice)?;
    if value <= Decimal::ZERO {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(Some(value))
}

/// Validates the time-in-force against the order type.
///
/// Meaningful only for LIMIT orders, where an absent value defaults to GTC.
/// For any other order type the input is discarded and `None` is returned.
pub fn validate_time_in_force(
    tif: Option<&str>,
    order_type: OrderType,
) -> Result<Option<TimeInForce>> {
    if order_type != OrderType::Limit {
        return Ok(None);
    }
    let Some(raw) = tif else {
        return Ok(Some(TimeInForce::Gtc));
    };
    match raw.to_ascii_uppercase().as_str() {
        "GTC" => Ok(Some(TimeInForce::Gtc)),
        "IOC" => Ok(Some(TimeInForce::Ioc)),
        "FOK" => Ok(Some(TimeInForce::Fok)),
        _ => Err(ValidationError::InvalidTimeInForce),
    }
}
