//! Domain models for order placement.

mod order;

pub use order::{NewOrder, OrderRecord, OrderType, Side, TimeInForce};
