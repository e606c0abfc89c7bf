use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalyticsError, Result};

// Represents a single daily close for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closing prices, strictly ascending by date.
///
/// Construction validates the caller contract: at most one close per day,
/// dates strictly increasing, every close finite and positive. Gaps for
/// weekends and holidays are expected and allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for point in &points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(AnalyticsError::Validation(format!(
                    "close on {} must be a finite positive number, got {}",
                    point.date, point.close
                )));
            }
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalyticsError::Validation(format!(
                "dates must be strictly increasing: {} follows {}",
                pair[1].date, pair[0].date
            )));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Return of one completed calendar month against the previous month's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// Calendar last day of the month the return belongs to.
    pub period_end: NaiveDate,
    pub return_pct: f64,
}

impl MonthlyReturn {
    pub fn new(period_end: NaiveDate, return_pct: f64) -> Self {
        Self { period_end, return_pct }
    }

    pub fn month(&self) -> u32 {
        self.period_end.month()
    }

    pub fn year(&self) -> i32 {
        self.period_end.year()
    }
}
