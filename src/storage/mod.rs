//! Storage interfaces and implementations for persisting placed orders.

mod sqlite;

pub use sqlite::SqliteOrderStore;

use crate::domain::OrderRecord;
use async_trait::async_trait;

/// OrderStore defines the interface for the append-only order log.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Save writes one record from a raw exchange response and returns
    /// the store-assigned id. Records are never mutated afterwards.
    async fn save(&self, response: &serde_json::Value) -> Result<i64, StorageError>;

    /// Recent returns up to `limit` records, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<OrderRecord>, StorageError>;

    /// Count returns the total number of stored records.
    async fn count(&self) -> Result<i64, StorageError>;

    /// Close closes the storage connection.
    async fn close(&self) -> Result<(), StorageError>;
}

/// StorageError represents errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
