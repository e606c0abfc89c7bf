//! `stockwatch` command line.
//!
//! ```bash
//! stockwatch seasonality --prices data/SAP.csv
//! stockwatch analyst --snapshot data/SAP-analysts.json
//! stockwatch alerts --prices data/SAP.csv --rules rules.json --snapshot data/SAP-analysts.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use stockwatch_backend::config::AnalyticsConfig;
use stockwatch_backend::logging::{init_logging, LoggingConfig};
use stockwatch_backend::services::alert_service::{self, MarketSnapshot};
use stockwatch_backend::services::import_service;

#[derive(Debug, Parser)]
#[command(name = "stockwatch", version, about = "Seasonality, analyst consensus and alerts for watchlist tickers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Month-of-year return statistics for all lookback windows
    Seasonality {
        /// CSV with `date,close` columns
        #[arg(long)]
        prices: PathBuf,
        /// Reference date for lookback windows (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Price-target upside and recommendation consensus
    Analyst {
        /// JSON analyst snapshot
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Evaluate alert rules against the latest prices
    Alerts {
        #[arg(long)]
        prices: PathBuf,
        /// JSON array of alert rules
        #[arg(long)]
        rules: PathBuf,
        /// Optional analyst snapshot for upside alerts
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Ticker the prices belong to (defaults to the file stem)
        #[arg(long)]
        ticker: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let cli = Cli::parse();
    let config = AnalyticsConfig::from_env().context("Invalid analytics configuration")?;
    let today = Utc::now().date_naive();

    match cli.command {
        Command::Seasonality { prices, as_of } => {
            let series = import_service::load_price_series(&prices)?;
            let report = config
                .seasonality_engine()?
                .all_seasonalities_as_of(&series, as_of.unwrap_or(today))
                .context("Failed to compute seasonality")?;
            tracing::info!(
                "Seasonality computed from {} closes through {:?}",
                series.len(),
                series.last().map(|p| p.date)
            );
            print_json(&report)
        }
        Command::Analyst { snapshot, as_of } => {
            let snapshot = import_service::load_analyst_snapshot(&snapshot)?;
            let metrics = config
                .analyst_engine()
                .aggregate_as_of(&snapshot, as_of.unwrap_or(today));
            print_json(&metrics)
        }
        Command::Alerts { prices, rules, snapshot, ticker } => {
            let series = import_service::load_price_series(&prices)?;
            let rules = import_service::load_alert_rules(&rules)?;

            let metrics = snapshot
                .map(|path| import_service::load_analyst_snapshot(&path))
                .transpose()?
                .map(|s| config.analyst_engine().aggregate_as_of(&s, today));

            let ticker = ticker
                .or_else(|| metrics.as_ref().and_then(|m| m.symbol.clone()))
                .or_else(|| prices.file_stem().map(|s| s.to_string_lossy().to_string()))
                .context("Cannot determine ticker; pass --ticker")?;

            let market = MarketSnapshot::from_series(&ticker, &series, metrics.as_ref());
            let response = alert_service::evaluate_all_alerts(&rules, &market, Utc::now());
            tracing::info!(
                "Evaluated {} rules for {}, {} triggered",
                response.evaluated_rules,
                ticker,
                response.triggered_alerts
            );
            print_json(&response)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}
