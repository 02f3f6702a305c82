mod api;
mod cli;
mod config;
mod domain;
mod exchanges;
mod orders;
mod storage;
mod validate;

use std::env;
use std::process::ExitCode;

use config::Settings;
use tracing::{error, Level};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "\
Usage: futures-testnet-bot <command>

Commands:
  serve    Run the HTTP API and dashboard
  order    Place a single order from the command line

Run `futures-testnet-bot order` without flags for order options.";

pub fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("serve") => run_server().await,
        Some("order") => cli::run(&args[1..]).await,
        _ => {
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}

async fn run_server() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(settings.log_level.as_deref());

    if let Err(e) = api::serve(settings).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
