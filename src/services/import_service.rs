use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::models::{AlertRule, AnalystSnapshot, PricePoint, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvPriceRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Close", alias = "close_price")]
    close: String,
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    // Timestamps like "2024-01-31 00:00:00" or "2024-01-31T00:00:00Z" keep the date part.
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse date: {}", s))
}

fn parse_close(s: &str) -> Result<f64> {
    let cleaned = s.replace(',', "").trim().to_string();
    cleaned
        .parse::<f64>()
        .with_context(|| format!("Failed to parse close: {}", s))
}

/// Read a `date,close` CSV into a validated series.
///
/// Rows are sorted by date and a repeated day keeps its last row. Rows with
/// an empty close are skipped.
pub fn read_price_series(content: &str) -> Result<PriceSeries> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for (line, record) in reader.deserialize::<CsvPriceRow>().enumerate() {
        let row = record.with_context(|| format!("Failed to read CSV row {}", line + 2))?;
        if row.close.trim().is_empty() {
            skipped += 1;
            continue;
        }

        let date = parse_date(&row.date)?;
        let close = parse_close(&row.close)?;
        by_date.insert(date, close);
    }

    if skipped > 0 {
        warn!("Skipped {} CSV rows without a close", skipped);
    }

    let points: Vec<PricePoint> = by_date
        .into_iter()
        .map(|(date, close)| PricePoint::new(date, close))
        .collect();

    debug!("Loaded {} daily closes", points.len());

    PriceSeries::new(points).context("Invalid price series")
}

pub fn load_price_series(path: &Path) -> Result<PriceSeries> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    read_price_series(&content).with_context(|| format!("Failed to import prices from {:?}", path))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {:?}", path))
}

pub fn load_analyst_snapshot(path: &Path) -> Result<AnalystSnapshot> {
    load_json(path)
}

pub fn load_alert_rules(path: &Path) -> Result<Vec<AlertRule>> {
    load_json(path)
}
