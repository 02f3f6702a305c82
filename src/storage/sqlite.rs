//! SQLite implementation of OrderStore.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

use crate::domain::OrderRecord;
use crate::storage::{OrderStore, StorageError};

/// Maximum number of connections in the pool.
const MAX_CONNECTIONS: u32 = 5;

/// SqliteOrderStore implements OrderStore using SQLite.
pub struct SqliteOrderStore {
    pool: Pool<Sqlite>,
}

impl SqliteOrderStore {
    /// Opens (creating if missing) the database at `path` and runs the
    /// schema migration.
    pub async fn new(path: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))
            .map_err(StorageError::Database)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let store = Self { pool };

        store.migrate().await?;

        info!(path = %path, "SQLite order store initialized");
        Ok(store)
    }

    /// Creates the orders table.
    async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                symbol TEXT NOT NULL,
                side TEXT NOT NULL,
                type TEXT NOT NULL,
                status TEXT NOT NULL,
                order_id TEXT NOT NULL,
                raw_response TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders(created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn save(&self, response: &Value) -> Result<i64, StorageError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO orders (created_at, symbol, side, type, status, order_id, raw_response)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(created_at.to_rfc3339())
        .bind(text_field(response, "symbol"))
        .bind(text_field(response, "side"))
        .bind(text_field(response, "type"))
        .bind(text_field(response, "status"))
        .bind(id_field(response, "orderId"))
        .bind(response.to_string())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        debug!(id = id, "order record saved");

        Ok(id)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<OrderRecord>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, symbol, side, type, status, order_id, raw_response
            FROM orders ORDER BY created_at DESC, id DESC LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_order_row).collect()
    }

    async fn count(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}

/// Extracts a string column from the raw response, defaulting to empty.
fn text_field(response: &Value, key: &str) -> String {
    response
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extracts the exchange order identifier as text. Binance reports it as
/// a number; other shapes are kept verbatim.
fn id_field(response: &Value, key: &str) -> String {
    match response.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Parses an order record from a database row.
fn parse_order_row(row: &sqlx::sqlite::SqliteRow) -> Result<OrderRecord, StorageError> {
    let created_at_str: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| StorageError::InvalidData(format!("invalid created_at: {}", e)))?
        .with_timezone(&Utc);

    let raw_str: String = row.try_get("raw_response")?;
    let raw_response: Value = serde_json::from_str(&raw_str)
        .map_err(|e| StorageError::InvalidData(format!("invalid raw_response: {}", e)))?;

    Ok(OrderRecord {
        id: row.try_get("id")?,
        created_at,
        symbol: row.try_get("symbol")?,
        side: row.try_get("side")?,
        order_type: row.try_get("type")?,
        status: row.try_get("status")?,
        order_id: row.try_get("order_id")?,
        raw_response,
    })
}
