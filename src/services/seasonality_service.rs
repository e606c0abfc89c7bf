use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;

use crate::errors::{AnalyticsError, Result};
use crate::models::{
    LookbackWindow, MonthNames, MonthlyReturn, PriceSeries, SeasonalityReport, SeasonalityRow,
};
use crate::services::statistics;

// ==============================================================================
// Monthly Returns
// ==============================================================================

/// Month-over-month returns of a daily close series.
///
/// Each month is represented by its last recorded close. The most recent
/// month is dropped when its data stops before the calendar month end and an
/// earlier month exists, so a running month never reports a partial return.
/// This compares against the calendar month end, not the last trading day:
/// a final month that closed on a Friday before a weekend month-end (or
/// before a month-end holiday) is also treated as partial and dropped.
/// The first month has no predecessor and yields no return.
///
/// Fails with `EmptyInput` on an empty series; fewer than two qualifying
/// months gives an empty result.
pub fn compute_monthly_returns(series: &PriceSeries) -> Result<Vec<MonthlyReturn>> {
    if series.is_empty() {
        return Err(AnalyticsError::EmptyInput(
            "price series has no data points".to_string(),
        ));
    }

    let mut months = statistics::month_end_closes(series.points());

    if months.len() > 1 {
        if let Some(current) = months.last().filter(|m| !m.is_complete()) {
            debug!(
                "Dropping partial month {}-{:02} (data ends {})",
                current.year, current.month, current.last_trading_date
            );
            months.pop();
        }
    }

    let returns: Vec<MonthlyReturn> = months
        .windows(2)
        .filter_map(|pair| {
            statistics::relative_change_pct(pair[0].close, pair[1].close)
                .map(|pct| MonthlyReturn::new(pair[1].period_end(), pct))
        })
        .collect();

    debug!("Computed {} monthly returns from {} daily closes", returns.len(), series.len());

    Ok(returns)
}

// ==============================================================================
// Seasonality Statistics
// ==============================================================================

/// Per-calendar-month statistics over `returns`.
///
/// With `lookback_years`, only returns whose period end is on or after
/// `as_of - lookback_years * 365 days` are used. Months without observations
/// are omitted; rows are ordered January to December.
pub fn compute_seasonality(
    returns: &[MonthlyReturn],
    lookback_years: Option<u32>,
    as_of: NaiveDate,
    month_names: &MonthNames,
) -> Vec<SeasonalityRow> {
    let cutoff = lookback_years.map(|years| as_of - Duration::days(i64::from(years) * 365));

    let buckets = returns
        .iter()
        .filter(|r| cutoff.map_or(true, |c| r.period_end >= c))
        .fold(BTreeMap::<u32, Vec<f64>>::new(), |mut acc, r| {
            acc.entry(r.month()).or_default().push(r.return_pct);
            acc
        });

    buckets
        .into_iter()
        .filter_map(|(month, values)| build_row(month, &values, month_names))
        .collect()
}

fn build_row(month: u32, values: &[f64], month_names: &MonthNames) -> Option<SeasonalityRow> {
    let avg = statistics::mean(values)?;
    let median = statistics::median(values)?;
    let std_dev = statistics::sample_std_dev(values).map(statistics::round2);

    let total_count = values.len();
    let positive_count = values.iter().filter(|&&v| v > 0.0).count();
    let negative_count = values.iter().filter(|&&v| v < 0.0).count();
    let win_rate = positive_count as f64 / total_count as f64 * 100.0;

    Some(SeasonalityRow {
        month,
        month_name: month_names.name(month).to_string(),
        avg_return: statistics::round2(avg),
        median_return: statistics::round2(median),
        std_dev,
        positive_count,
        negative_count,
        total_count,
        win_rate: statistics::round2(win_rate),
    })
}

// ==============================================================================
// Seasonality Engine
// ==============================================================================

/// Stateless seasonality calculator bound to a month-name table.
#[derive(Debug, Clone, Default)]
pub struct SeasonalityEngine {
    month_names: MonthNames,
}

impl SeasonalityEngine {
    pub fn new(month_names: MonthNames) -> Self {
        Self { month_names }
    }

    pub fn month_names(&self) -> &MonthNames {
        &self.month_names
    }

    /// Full report for all lookback windows, relative to today.
    pub fn all_seasonalities(&self, series: &PriceSeries) -> Result<SeasonalityReport> {
        self.all_seasonalities_as_of(series, Utc::now().date_naive())
    }

    /// Full report for all lookback windows, relative to `as_of`.
    ///
    /// Monthly returns are computed once and then bucketed per window.
    pub fn all_seasonalities_as_of(
        &self,
        series: &PriceSeries,
        as_of: NaiveDate,
    ) -> Result<SeasonalityReport> {
        let returns = compute_monthly_returns(series)?;

        let mut report = SeasonalityReport::default();
        for window in LookbackWindow::ALL_WINDOWS {
            let rows = compute_seasonality(&returns, window.years(), as_of, &self.month_names);
            debug!("Seasonality window {}: {} months populated", window, rows.len());
            report.set_window(window, rows);
        }

        Ok(report)
    }
}

/// Full seasonality report with the default (German) month names.
pub fn get_all_seasonalities(series: &PriceSeries) -> Result<SeasonalityReport> {
    SeasonalityEngine::default().all_seasonalities(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(points: &[(NaiveDate, f64)]) -> PriceSeries {
        PriceSeries::new(points.iter().map(|&(date, close)| PricePoint::new(date, close)).collect())
            .unwrap()
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let empty = PriceSeries::new(Vec::new()).unwrap();
        assert!(matches!(
            compute_monthly_returns(&empty),
            Err(AnalyticsError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_final_month_ending_before_weekend_month_end_is_dropped() {
        // 2024-06-30 is a Sunday, so the last June session is Friday the 28th.
        let s = series(&[
            (d(2024, 4, 30), 100.0),
            (d(2024, 5, 31), 105.0),
            (d(2024, 6, 28), 120.0),
        ]);
        let returns = compute_monthly_returns(&s).unwrap();

        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].period_end, d(2024, 5, 31));
    }

    #[test]
    fn test_single_month_gives_no_returns() {
        let s = series(&[(d(2024, 1, 2), 10.0), (d(2024, 1, 31), 11.0)]);
        assert!(compute_monthly_returns(&s).unwrap().is_empty());
    }

    #[test]
    fn test_partial_current_month_is_dropped() {
        let s = series(&[
            (d(2024, 1, 31), 100.0),
            (d(2024, 2, 29), 110.0),
            (d(2024, 3, 15), 200.0),
        ]);
        let returns = compute_monthly_returns(&s).unwrap();

        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].period_end, d(2024, 2, 29));
        assert!((returns[0].return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_month_only_drops_last_month() {
        // February ends on the 28th trading day but is not the final month.
        let s = series(&[
            (d(2023, 1, 31), 100.0),
            (d(2023, 2, 27), 90.0),
            (d(2023, 3, 31), 99.0),
        ]);
        let returns = compute_monthly_returns(&s).unwrap();

        assert_eq!(returns.len(), 2);
        assert!((returns[0].return_pct + 10.0).abs() < 1e-9);
        assert!((returns[1].return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_months_with_partial_last_leaves_nothing() {
        let s = series(&[(d(2024, 1, 31), 100.0), (d(2024, 2, 10), 120.0)]);
        assert!(compute_monthly_returns(&s).unwrap().is_empty());
    }

    #[test]
    fn test_seasonality_single_observation_has_no_std_dev() {
        let returns = vec![MonthlyReturn::new(d(2024, 5, 31), 3.456)];
        let rows = compute_seasonality(&returns, None, d(2024, 6, 30), &MonthNames::german());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, 5);
        assert_eq!(rows[0].month_name, "Mai");
        assert_eq!(rows[0].avg_return, 3.46);
        assert_eq!(rows[0].std_dev, None);
        assert_eq!(rows[0].win_rate, 100.0);
    }

    #[test]
    fn test_seasonality_counts_and_ordering() {
        let returns = vec![
            MonthlyReturn::new(d(2021, 3, 31), -2.0),
            MonthlyReturn::new(d(2021, 1, 31), 4.0),
            MonthlyReturn::new(d(2022, 1, 31), -1.0),
            MonthlyReturn::new(d(2023, 1, 31), 0.0),
        ];
        let rows = compute_seasonality(&returns, None, d(2024, 1, 1), &MonthNames::english());

        assert_eq!(rows.iter().map(|r| r.month).collect::<Vec<_>>(), vec![1, 3]);
        let january = &rows[0];
        assert_eq!(january.total_count, 3);
        assert_eq!(january.positive_count, 1);
        assert_eq!(january.negative_count, 1);
        assert_eq!(january.win_rate, 33.33);
        assert_eq!(january.avg_return, 1.0);
        assert_eq!(january.median_return, 0.0);
        assert_eq!(january.std_dev, Some(2.65));
    }

    #[test]
    fn test_lookback_filters_by_days() {
        let returns = vec![
            MonthlyReturn::new(d(2010, 6, 30), 5.0),
            MonthlyReturn::new(d(2023, 6, 30), 1.0),
        ];
        let as_of = d(2024, 12, 31);
        let names = MonthNames::german();

        let all = compute_seasonality(&returns, None, as_of, &names);
        let recent = compute_seasonality(&returns, Some(5), as_of, &names);

        assert_eq!(all[0].total_count, 2);
        assert_eq!(recent[0].total_count, 1);
        assert_eq!(recent[0].avg_return, 1.0);
    }

    #[test]
    fn test_window_with_no_data_is_empty() {
        let returns = vec![MonthlyReturn::new(d(2000, 6, 30), 5.0)];
        let rows = compute_seasonality(&returns, Some(5), d(2024, 12, 31), &MonthNames::german());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_engine_uses_configured_names() {
        let s = series(&[(d(2024, 1, 31), 100.0), (d(2024, 2, 29), 101.0)]);
        let engine = SeasonalityEngine::new(MonthNames::english());
        let report = engine.all_seasonalities_as_of(&s, d(2024, 3, 1)).unwrap();

        assert_eq!(report.all.len(), 1);
        assert_eq!(report.all[0].month_name, "February");
    }
}
