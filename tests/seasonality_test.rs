/// Seasonality engine tests
///
/// End-to-end checks of monthly return extraction and per-month statistics
/// across the all / 5y / 10y / 15y lookback windows.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use stockwatch_backend::models::{LookbackWindow, MonthNames, PricePoint, PriceSeries};
use stockwatch_backend::services::seasonality_service::{
    compute_monthly_returns, compute_seasonality, get_all_seasonalities, SeasonalityEngine,
};
use stockwatch_backend::AnalyticsError;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Weekday closes from `start` to `end` inclusive with a smooth wave.
fn business_day_series(start: NaiveDate, end: NaiveDate) -> PriceSeries {
    let mut points = Vec::new();
    let mut date = start;
    let mut i = 0.0_f64;
    while date <= end {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            let close = 100.0 + 20.0 * (i / 17.0).sin() + i * 0.01;
            points.push(PricePoint::new(date, close));
            i += 1.0;
        }
        date += Duration::days(1);
    }
    PriceSeries::new(points).unwrap()
}

fn month_end_doubling_series() -> PriceSeries {
    let mut points = vec![PricePoint::new(d(2022, 12, 31), 1.0)];
    let mut price = 1.0;
    for month in 1..=12 {
        price *= 2.0;
        let next_first = if month == 12 { d(2024, 1, 1) } else { d(2023, month + 1, 1) };
        points.push(PricePoint::new(next_first.pred_opt().unwrap(), price));
    }
    PriceSeries::new(points).unwrap()
}

// ---------------------------------------------------------------------------
// Monthly returns
// ---------------------------------------------------------------------------

#[test]
fn test_doubling_month_ends_give_hundred_percent_january() {
    let series = month_end_doubling_series();
    let returns = compute_monthly_returns(&series).unwrap();
    assert_eq!(returns.len(), 12);

    let rows = compute_seasonality(&returns, None, d(2024, 1, 15), &MonthNames::german());
    let january = rows.iter().find(|r| r.month == 1).unwrap();

    assert_eq!(january.avg_return, 100.0);
    assert_eq!(january.total_count, 1);
    assert_eq!(january.std_dev, None);
    assert_eq!(january.month_name, "Januar");
    assert!(rows.iter().all(|r| r.avg_return == 100.0));
}

#[test]
fn test_series_ending_mid_month_drops_that_month() {
    let series = business_day_series(d(2023, 1, 2), d(2023, 6, 15));
    let returns = compute_monthly_returns(&series).unwrap();

    // January has no predecessor and June is incomplete: Feb..May remain.
    let months: Vec<u32> = returns.iter().map(|r| r.month()).collect();
    assert_eq!(months, vec![2, 3, 4, 5]);
}

#[test]
fn test_empty_series_is_rejected() {
    let series = PriceSeries::new(Vec::new()).unwrap();
    assert!(matches!(
        compute_monthly_returns(&series),
        Err(AnalyticsError::EmptyInput(_))
    ));
    assert!(get_all_seasonalities(&series).is_err());
}

#[test]
fn test_unsorted_input_is_a_validation_error() {
    let result = PriceSeries::new(vec![
        PricePoint::new(d(2023, 3, 1), 10.0),
        PricePoint::new(d(2023, 2, 1), 10.0),
    ]);
    assert!(matches!(result, Err(AnalyticsError::Validation(_))));
}

// ---------------------------------------------------------------------------
// Report properties
// ---------------------------------------------------------------------------

#[test]
fn test_rows_bounded_and_win_rate_in_range() {
    let series = business_day_series(d(2005, 1, 3), d(2024, 12, 31));
    let engine = SeasonalityEngine::new(MonthNames::english());
    let report = engine.all_seasonalities_as_of(&series, d(2025, 1, 15)).unwrap();

    for window in LookbackWindow::ALL_WINDOWS {
        let rows = report.window(window);
        assert!(rows.len() <= 12, "window {} has {} rows", window, rows.len());
        for row in rows {
            assert!((0.0..=100.0).contains(&row.win_rate));
            assert!(row.positive_count + row.negative_count <= row.total_count);
            if row.total_count < 2 {
                assert!(row.std_dev.is_none());
            } else {
                assert!(row.std_dev.is_some_and(|s| s.is_finite()));
            }
        }
        let months: Vec<u32> = rows.iter().map(|r| r.month).collect();
        let mut sorted = months.clone();
        sorted.sort();
        assert_eq!(months, sorted);
    }

    assert_eq!(report.all.len(), 12);
    assert_eq!(report.all[0].total_count, 19);
    assert!(report.five_years[0].total_count <= 5);
    assert!(report.ten_years[0].total_count <= 10);
    assert!(report.fifteen_years[0].total_count <= 15);
}

#[test]
fn test_short_history_gives_identical_windows() {
    let series = business_day_series(d(2022, 1, 3), d(2024, 10, 31));
    let report = SeasonalityEngine::default()
        .all_seasonalities_as_of(&series, d(2024, 11, 5))
        .unwrap();

    assert!(!report.all.is_empty());
    assert_eq!(report.all, report.five_years);
    assert_eq!(report.all, report.ten_years);
    assert_eq!(report.all, report.fifteen_years);
}

#[test]
fn test_all_window_covers_every_month_of_shorter_windows() {
    let series = business_day_series(d(2012, 1, 2), d(2024, 12, 31));
    let report = SeasonalityEngine::default()
        .all_seasonalities_as_of(&series, d(2025, 1, 2))
        .unwrap();

    for window in [LookbackWindow::FiveYears, LookbackWindow::TenYears, LookbackWindow::FifteenYears] {
        for row in report.window(window) {
            let all_row = report.all.iter().find(|r| r.month == row.month).unwrap();
            assert!(all_row.total_count >= row.total_count);
        }
    }
}

#[test]
fn test_report_json_shape() {
    let series = month_end_doubling_series();
    let report = SeasonalityEngine::default()
        .all_seasonalities_as_of(&series, d(2024, 1, 15))
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();

    let first = &value["all"][0];
    assert_eq!(first["month"], 1);
    assert_eq!(first["month_name"], "Januar");
    assert!(first["std_dev"].is_null());
    assert!(value["5y"].is_array());
    assert!(value["15y"].is_array());
}
