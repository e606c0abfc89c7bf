use chrono::{Datelike, NaiveDate};

use crate::models::PricePoint;

/// Close of the last trading day in a calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthEndClose {
    pub year: i32,
    pub month: u32,
    /// Last date with a recorded close in this month.
    pub last_trading_date: NaiveDate,
    pub close: f64,
}

impl MonthEndClose {
    /// Calendar last day of this month.
    pub fn period_end(&self) -> NaiveDate {
        last_day_of_month(self.year, self.month)
    }

    /// Whether the recorded data reaches the calendar end of the month.
    pub fn is_complete(&self) -> bool {
        self.last_trading_date >= self.period_end()
    }
}

/// Calendar last day of `year`/`month`.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month >= 12 { (year + 1, 1) } else { (year, month + 1) };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Resample daily closes to one close per calendar month, keeping the last
/// observation within each month. Input must be ascending by date.
pub fn month_end_closes(points: &[PricePoint]) -> Vec<MonthEndClose> {
    points.iter().fold(Vec::new(), |mut months: Vec<MonthEndClose>, point| {
        let (year, month) = (point.date.year(), point.date.month());

        match months.last_mut() {
            Some(current) if current.year == year && current.month == month => {
                current.last_trading_date = point.date;
                current.close = point.close;
            }
            _ => months.push(MonthEndClose {
                year,
                month,
                last_trading_date: point.date,
                close: point.close,
            }),
        }

        months
    })
}

/// Relative change from `previous` to `current` in percent.
pub fn relative_change_pct(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current / previous - 1.0) * 100.0)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Unbiased sample standard deviation (n - 1 denominator).
///
/// `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let sum_sq = values
        .iter()
        .fold(0.0, |acc, &v| acc + (v - avg) * (v - avg));

    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
