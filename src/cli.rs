//! Command-line order placement.

use std::process::ExitCode;

use serde_json::Value;
use tracing::warn;

use crate::config::Settings;
use crate::exchanges::binance::BinanceFutures;
use crate::exchanges::ExchangeApi;
use crate::orders::{build_and_place_order, OrderError, OrderSummary};
use crate::storage::{OrderStore, SqliteOrderStore};

const ORDER_USAGE: &str = "\
Usage: futures-testnet-bot order --symbol=SYMBOL --side=SIDE --type=TYPE --quantity=QTY [options]

Required flags:
  --symbol=SYMBOL          Trading symbol, e.g. BTCUSDT
  --side=SIDE              Order side: BUY or SELL
  --type=TYPE              Order type: MARKET or LIMIT
  --quantity=QTY           Order quantity

Options:
  --price=PRICE            Price, required when --type=LIMIT
  --time-in-force=TIF      GTC, IOC or FOK for LIMIT orders (default: GTC)";

/// Raw flag values for one order, exactly as typed.
#[derive(Debug, Default, PartialEq)]
struct OrderArgs {
    symbol: String,
    side: String,
    order_type: String,
    quantity: String,
    price: Option<String>,
    time_in_force: Option<String>,
}

impl OrderArgs {
    /// Parses `--flag=value` arguments. Validation of the values happens
    /// later; this only checks that the required flags are present.
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = OrderArgs::default();

        for arg in args {
            if let Some(v) = arg.strip_prefix("--symbol=") {
                parsed.symbol = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--side=") {
                parsed.side = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--type=") {
                parsed.order_type = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--quantity=") {
                parsed.quantity = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--price=") {
                parsed.price = Some(v.to_string());
            } else if let Some(v) = arg.strip_prefix("--time-in-force=") {
                parsed.time_in_force = Some(v.to_string());
            } else {
                return Err(format!("unknown argument: {}", arg));
            }
        }

        for (flag, value) in [
            ("--symbol", &parsed.symbol),
            ("--side", &parsed.side),
            ("--type", &parsed.order_type),
            ("--quantity", &parsed.quantity),
        ] {
            if value.is_empty() {
                return Err(format!("missing required flag: {}", flag));
            }
        }

        Ok(parsed)
    }
}

/// Places one order from command-line flags, records it and prints the
/// exchange's summary. Exit code 0 on success, 1 on any failure.
pub async fn run(args: &[String]) -> ExitCode {
    let opts = match OrderArgs::parse(args) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{}\n\n{}", msg, ORDER_USAGE);
            return ExitCode::FAILURE;
        }
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    crate::init_tracing(settings.log_level.as_deref());

    println!("Order request:");
    print_row("Symbol", &opts.symbol);
    print_row("Side", &opts.side);
    print_row("Type", &opts.order_type);
    print_row("Quantity", &opts.quantity);
    print_row("Price", opts.price.as_deref().unwrap_or("-"));
    print_row("Time in force", opts.time_in_force.as_deref().unwrap_or("-"));

    // Open the store up front so a bad database path fails before any
    // order reaches the exchange.
    let store = match SqliteOrderStore::new(&settings.database_path).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open order store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let exchange = BinanceFutures::new(&settings);

    println!("\nPlacing order via {}...", exchange.name());

    let response = match build_and_place_order(
        &exchange,
        &opts.symbol,
        &opts.side,
        &opts.order_type,
        &opts.quantity,
        opts.price.as_deref(),
        opts.time_in_force.as_deref(),
    )
    .await
    {
        Ok(response) => response,
        Err(OrderError::Validation(e)) => {
            eprintln!("Validation error: {}", e);
            return ExitCode::FAILURE;
        }
        Err(OrderError::Exchange(e)) => {
            eprintln!("Failed to place order: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = store.save(&response).await {
        warn!(error = %e, "failed to record placed order");
    }

    let summary = OrderSummary::from_response(&response);

    println!("\nOrder response:");
    print_row("symbol", &display_value(&summary.symbol));
    print_row("orderId", &display_value(&summary.order_id));
    print_row("clientOrderId", &display_value(&summary.client_order_id));
    print_row("status", &display_value(&summary.status));
    print_row("type", &display_value(&summary.order_type));
    print_row("side", &display_value(&summary.side));
    print_row("origQty", &display_value(&summary.orig_qty));
    print_row("executedQty", &display_value(&summary.executed_qty));
    print_row("avgPrice", &display_value(&summary.avg_price));
    print_row("updateTime", &display_value(&summary.update_time));

    println!("\nOrder accepted by the exchange.");

    let _ = store.close().await;

    ExitCode::SUCCESS
}

fn print_row(field: &str, value: &str) {
    println!("  {:<16} {}", field, value);
}

/// Renders a raw JSON value for terminal output (strings unquoted).
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_market_order_flags() {
        let parsed = OrderArgs::parse(&args(&[
            "--symbol=BTCUSDT",
            "--side=BUY",
            "--type=MARKET",
            "--quantity=0.002",
        ]))
        .unwrap();

        assert_eq!(parsed.symbol, "BTCUSDT");
        assert_eq!(parsed.side, "BUY");
        assert_eq!(parsed.order_type, "MARKET");
        assert_eq!(parsed.quantity, "0.002");
        assert_eq!(parsed.price, None);
        assert_eq!(parsed.time_in_force, None);
    }

    #[test]
    fn test_parse_limit_order_flags() {
        let parsed = OrderArgs::parse(&args(&[
            "--symbol=ETHUSDT",
            "--side=SELL",
            "--type=LIMIT",
            "--quantity=0.5",
            "--price=2400.5",
            "--time-in-force=IOC",
        ]))
        .unwrap();

        assert_eq!(parsed.price.as_deref(), Some("2400.5"));
        assert_eq!(parsed.time_in_force.as_deref(), Some("IOC"));
    }

    #[test]
    fn test_parse_rejects_missing_required_flag() {
        let err = OrderArgs::parse(&args(&["--symbol=BTCUSDT", "--side=BUY"])).unwrap_err();
        assert!(err.contains("--type"));
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        let err = OrderArgs::parse(&args(&["--leverage=20"])).unwrap_err();
        assert!(err.contains("unknown argument"));
    }

    #[test]
    fn test_display_value_unquotes_strings() {
        assert_eq!(display_value(&Value::String("NEW".into())), "NEW");
        assert_eq!(display_value(&Value::Null), "-");
        assert_eq!(display_value(&serde_json::json!(4055001)), "4055001");
    }
}
