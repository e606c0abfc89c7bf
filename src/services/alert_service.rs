// Alert evaluation against in-memory market data. Delivery and persistence of
// triggered alerts belong to the caller.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::errors::{AnalyticsError, Result};
use crate::models::alert::*;
use crate::models::{AnalystMetrics, PriceSeries};
use crate::services::indicators;

// ==============================================================================
// Market Data Input
// ==============================================================================

/// Everything a condition may look at for one ticker.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub ticker: String,
    /// Daily closes, oldest first.
    pub closes: Vec<f64>,
    pub upside_pct: Option<f64>,
}

impl MarketSnapshot {
    pub fn from_series(ticker: &str, series: &PriceSeries, analyst: Option<&AnalystMetrics>) -> Self {
        Self {
            ticker: ticker.to_string(),
            closes: series.closes(),
            upside_pct: analyst.and_then(|m| m.upside_pct),
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}

// ==============================================================================
// Alert Evaluation
// ==============================================================================

/// Evaluate every rule for the snapshot's ticker, collecting triggered alerts.
pub fn evaluate_all_alerts(
    rules: &[AlertRule],
    market: &MarketSnapshot,
    now: DateTime<Utc>,
) -> AlertEvaluationResponse {
    let applicable: Vec<&AlertRule> = rules
        .iter()
        .filter(|r| r.ticker.eq_ignore_ascii_case(&market.ticker))
        .collect();

    let results: Vec<AlertEvaluationResult> = applicable
        .iter()
        .filter_map(|rule| evaluate_alert_rule(rule, market, now))
        .collect();

    AlertEvaluationResponse {
        evaluated_rules: applicable.len(),
        triggered_alerts: results.len(),
        results,
    }
}

/// Evaluate one rule. Returns `Some` only when the rule fires.
pub fn evaluate_alert_rule(
    rule: &AlertRule,
    market: &MarketSnapshot,
    now: DateTime<Utc>,
) -> Option<AlertEvaluationResult> {
    if !rule.enabled {
        return None;
    }

    if is_in_cooldown(rule.last_triggered_at, rule.cooldown_hours, now) {
        debug!("Alert '{}' for {} is cooling down", rule.name, rule.ticker);
        return None;
    }

    let kind = rule.condition.kind();
    let outcome = match evaluate_condition(&rule.condition, market) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Cannot evaluate {} alert '{}' for {}: {}", kind, rule.name, rule.ticker, e);
            return None;
        }
    };

    if !outcome.triggered {
        return None;
    }

    Some(AlertEvaluationResult {
        rule_id: rule.id,
        ticker: rule.ticker.clone(),
        kind,
        triggered: true,
        actual_value: outcome.actual_value,
        threshold: outcome.threshold,
        severity: calculate_severity(kind, outcome.threshold, outcome.actual_value),
        message: outcome.message,
        evaluated_at: now,
    })
}

/// Dispatch a condition to its evaluator. Fails with `InsufficientData` when
/// there are too few closes, and `EmptyInput` when analyst data is missing.
pub fn evaluate_condition(condition: &AlertCondition, market: &MarketSnapshot) -> Result<ConditionOutcome> {
    match *condition {
        AlertCondition::PriceAbove { price } => price_above(market, price),
        AlertCondition::PriceBelow { price } => price_below(market, price),
        AlertCondition::PriceChange { percentage, direction, lookback_days } => {
            price_change(market, percentage, direction, lookback_days)
        }
        AlertCondition::RsiAbove { threshold, period } => rsi_above(market, threshold, period),
        AlertCondition::RsiBelow { threshold, period } => rsi_below(market, threshold, period),
        AlertCondition::SmaCross { period, direction } => sma_cross(market, period, direction),
        AlertCondition::UpsideAbove { percentage } => upside_above(market, percentage),
    }
}

/// The market's closes, provided at least `needed` exist.
fn require_closes(market: &MarketSnapshot, needed: usize) -> Result<&[f64]> {
    let actual = market.closes.len();
    if actual < needed {
        return Err(AnalyticsError::InsufficientData { needed, actual });
    }
    Ok(&market.closes)
}

fn require_period(name: &str, period: usize) -> Result<usize> {
    if period == 0 {
        return Err(AnalyticsError::Validation(format!("{} must be at least 1", name)));
    }
    Ok(period)
}

fn latest_close(market: &MarketSnapshot) -> Result<f64> {
    market
        .last_close()
        .ok_or(AnalyticsError::InsufficientData { needed: 1, actual: 0 })
}

fn price_above(market: &MarketSnapshot, price: f64) -> Result<ConditionOutcome> {
    let close = latest_close(market)?;
    Ok(ConditionOutcome {
        triggered: close > price,
        actual_value: close,
        threshold: price,
        message: format!("{} closed at {:.2} (alert above {:.2})", market.ticker, close, price),
    })
}

fn price_below(market: &MarketSnapshot, price: f64) -> Result<ConditionOutcome> {
    let close = latest_close(market)?;
    Ok(ConditionOutcome {
        triggered: close < price,
        actual_value: close,
        threshold: price,
        message: format!("{} closed at {:.2} (alert below {:.2})", market.ticker, close, price),
    })
}

fn price_change(
    market: &MarketSnapshot,
    percentage: f64,
    direction: Direction,
    lookback_days: usize,
) -> Result<ConditionOutcome> {
    let lookback = require_period("lookback_days", lookback_days)?;
    let closes = require_closes(market, lookback.saturating_add(1))?;
    let change = indicators::percent_change(closes, lookback).ok_or_else(|| {
        AnalyticsError::Validation(format!("{} has a zero close {} days back", market.ticker, lookback))
    })?;
    let triggered = match direction {
        Direction::Up => change >= percentage,
        Direction::Down => change <= -percentage,
        Direction::Either => change.abs() >= percentage,
    };
    let verb = if change >= 0.0 { "rose" } else { "fell" };

    Ok(ConditionOutcome {
        triggered,
        actual_value: change,
        threshold: percentage,
        message: format!(
            "{} {} {:.2}% over {} days (threshold: {:.2}%)",
            market.ticker, verb, change.abs(), lookback_days, percentage
        ),
    })
}

fn latest_rsi(market: &MarketSnapshot, period: usize) -> Result<f64> {
    let period = require_period("period", period)?;
    let needed = period.saturating_add(1);
    let closes = require_closes(market, needed)?;
    indicators::rsi(closes, period).ok_or(AnalyticsError::InsufficientData {
        needed,
        actual: closes.len(),
    })
}

fn rsi_above(market: &MarketSnapshot, threshold: f64, period: usize) -> Result<ConditionOutcome> {
    let value = latest_rsi(market, period)?;
    Ok(ConditionOutcome {
        triggered: value > threshold,
        actual_value: value,
        threshold,
        message: format!("{} RSI({}) at {:.1} (overbought above {:.1})", market.ticker, period, value, threshold),
    })
}

fn rsi_below(market: &MarketSnapshot, threshold: f64, period: usize) -> Result<ConditionOutcome> {
    let value = latest_rsi(market, period)?;
    Ok(ConditionOutcome {
        triggered: value < threshold,
        actual_value: value,
        threshold,
        message: format!("{} RSI({}) at {:.1} (oversold below {:.1})", market.ticker, period, value, threshold),
    })
}

fn sma_cross(market: &MarketSnapshot, period: usize, direction: Direction) -> Result<ConditionOutcome> {
    let period = require_period("period", period)?;
    let closes = require_closes(market, period.saturating_add(1))?;

    let previous = &closes[..closes.len() - 1];
    let insufficient = || AnalyticsError::InsufficientData {
        needed: period.saturating_add(1),
        actual: closes.len(),
    };
    let prev_close = previous[previous.len() - 1];
    let prev_sma = indicators::sma(previous, period).ok_or_else(insufficient)?;
    let close = closes[closes.len() - 1];
    let sma = indicators::sma(closes, period).ok_or_else(insufficient)?;

    let crossed_up = prev_close <= prev_sma && close > sma;
    let crossed_down = prev_close >= prev_sma && close < sma;
    let triggered = match direction {
        Direction::Up => crossed_up,
        Direction::Down => crossed_down,
        Direction::Either => crossed_up || crossed_down,
    };
    let side = if close > sma { "above" } else { "below" };

    Ok(ConditionOutcome {
        triggered,
        actual_value: close,
        threshold: sma,
        message: format!("{} closed {} its {}-day SMA ({:.2} vs {:.2})", market.ticker, side, period, close, sma),
    })
}

fn upside_above(market: &MarketSnapshot, percentage: f64) -> Result<ConditionOutcome> {
    let upside = market
        .upside_pct
        .ok_or_else(|| AnalyticsError::EmptyInput(format!("no analyst upside for {}", market.ticker)))?;
    Ok(ConditionOutcome {
        triggered: upside > percentage,
        actual_value: upside,
        threshold: percentage,
        message: format!(
            "{} analyst upside {:.2}% (threshold: {:.2}%)",
            market.ticker, upside, percentage
        ),
    })
}

// ==============================================================================
// Helper Functions
// ==============================================================================

/// Check if alert is in cooldown period
pub fn is_in_cooldown(last_triggered: Option<DateTime<Utc>>, cooldown_hours: i32, now: DateTime<Utc>) -> bool {
    match last_triggered {
        Some(last) => now < last + Duration::hours(i64::from(cooldown_hours)),
        None => false,
    }
}

/// Calculate alert severity based on how far actual exceeds threshold
pub fn calculate_severity(kind: AlertKind, threshold: f64, actual_value: f64) -> AlertSeverity {
    let ratio = if threshold != 0.0 {
        (actual_value / threshold).abs()
    } else {
        1.0
    };

    match kind {
        AlertKind::PriceAbove | AlertKind::PriceBelow => {
            let deviation = (ratio - 1.0).abs();
            if deviation >= 0.10 {
                AlertSeverity::High
            } else if deviation >= 0.05 {
                AlertSeverity::Medium
            } else {
                AlertSeverity::Low
            }
        }
        AlertKind::PriceChange => {
            if ratio >= 2.0 {
                AlertSeverity::Critical
            } else if ratio >= 1.5 {
                AlertSeverity::High
            } else if ratio >= 1.2 {
                AlertSeverity::Medium
            } else {
                AlertSeverity::Low
            }
        }
        AlertKind::RsiAbove | AlertKind::RsiBelow => {
            if !(20.0..=80.0).contains(&actual_value) {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            }
        }
        AlertKind::SmaCross => AlertSeverity::Medium,
        AlertKind::UpsideAbove => {
            if ratio >= 2.0 {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            }
        }
    }
}
