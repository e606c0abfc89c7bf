use crate::models::{ConsensusLabel, ConsensusStrength, ConsensusThresholds};

/// Direction a free-text analyst grade points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeSignal {
    Buy,
    Sell,
    Neutral,
}

/// Coarse grade reading: any grade containing "buy" is a buy signal, any
/// containing "sell" a sell signal (case-insensitive). "Strong Buy" and
/// "Buy" therefore count the same.
pub fn classify_grade(grade: &str) -> GradeSignal {
    let grade = grade.to_lowercase();
    if grade.contains("buy") {
        GradeSignal::Buy
    } else if grade.contains("sell") {
        GradeSignal::Sell
    } else {
        GradeSignal::Neutral
    }
}

/// Gap from `current` to `target` as a percentage of `current`.
pub fn upside_pct(target: f64, current: f64) -> Option<f64> {
    if target == 0.0 || current == 0.0 || !target.is_finite() || !current.is_finite() {
        return None;
    }
    Some((target - current) / current * 100.0)
}

/// Width of the target range as a percentage of the mean target.
pub fn range_pct(high: f64, low: f64, mean: f64) -> Option<f64> {
    if mean <= 0.0 || !mean.is_finite() {
        return None;
    }
    Some((high - low) / mean * 100.0)
}

pub fn classify_range(range_pct: f64, thresholds: &ConsensusThresholds) -> ConsensusStrength {
    if range_pct < thresholds.strong_below_pct {
        ConsensusStrength::Strong
    } else if range_pct < thresholds.moderate_below_pct {
        ConsensusStrength::Moderate
    } else {
        ConsensusStrength::Weak
    }
}

/// Label for a weighted bucket score where 5 = Strong Buy and 1 = Strong Sell.
pub fn label_for_weighted_score(score: f64) -> ConsensusLabel {
    if score >= 4.5 {
        ConsensusLabel::StrongBuy
    } else if score >= 3.5 {
        ConsensusLabel::Buy
    } else if score >= 2.5 {
        ConsensusLabel::Hold
    } else if score >= 1.5 {
        ConsensusLabel::Sell
    } else {
        ConsensusLabel::StrongSell
    }
}

pub fn is_upgrade(action: Option<&str>) -> bool {
    action.is_some_and(|a| a.trim().eq_ignore_ascii_case("up"))
}

pub fn is_downgrade(action: Option<&str>) -> bool {
    action.is_some_and(|a| a.trim().eq_ignore_ascii_case("down"))
}
