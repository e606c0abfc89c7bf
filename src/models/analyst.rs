use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==============================================================================
// Analyst Inputs
// ==============================================================================

/// Analyst price-target summary. Every field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTargets {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Analyst counts per rating bucket at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSnapshot {
    pub as_of: NaiveDate,
    #[serde(default)]
    pub strong_buy: u32,
    #[serde(default)]
    pub buy: u32,
    #[serde(default)]
    pub hold: u32,
    #[serde(default)]
    pub sell: u32,
    #[serde(default)]
    pub strong_sell: u32,
}

impl RecommendationSnapshot {
    /// Analyst count across all buckets, widened so it cannot overflow.
    pub fn total(&self) -> u64 {
        [self.strong_buy, self.buy, self.hold, self.sell, self.strong_sell]
            .into_iter()
            .map(u64::from)
            .sum()
    }
}

/// A single dated rating change published by one analyst firm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRevision {
    pub date: NaiveDate,
    pub firm: Option<String>,
    pub to_grade: String,
    pub from_grade: Option<String>,
    /// Provider action code such as "up", "down", "main", "init".
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalystSnapshot {
    pub symbol: Option<String>,
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_targets: PriceTargets,
    /// Bucketed recommendation history, ascending by `as_of`.
    #[serde(default)]
    pub recommendations: Vec<RecommendationSnapshot>,
    /// Rating changes, ascending by `date`.
    #[serde(default)]
    pub revisions: Vec<GradeRevision>,
}

// ==============================================================================
// Classification Enums
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusStrength {
    Strong,
    Moderate,
    Weak,
}

impl std::fmt::Display for ConsensusStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusStrength::Strong => write!(f, "strong"),
            ConsensusStrength::Moderate => write!(f, "moderate"),
            ConsensusStrength::Weak => write!(f, "weak"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusLabel {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    #[serde(rename = "Buy")]
    Buy,
    #[serde(rename = "Hold")]
    Hold,
    #[serde(rename = "Sell")]
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl std::fmt::Display for ConsensusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusLabel::StrongBuy => write!(f, "Strong Buy"),
            ConsensusLabel::Buy => write!(f, "Buy"),
            ConsensusLabel::Hold => write!(f, "Hold"),
            ConsensusLabel::Sell => write!(f, "Sell"),
            ConsensusLabel::StrongSell => write!(f, "Strong Sell"),
        }
    }
}

/// Range-percentage cut-offs for `ConsensusStrength`.
///
/// These are calibration policy, not values derived from data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusThresholds {
    pub strong_below_pct: f64,
    pub moderate_below_pct: f64,
}

impl Default for ConsensusThresholds {
    fn default() -> Self {
        Self {
            strong_below_pct: 20.0,
            moderate_below_pct: 40.0,
        }
    }
}

// ==============================================================================
// Analyst Outputs
// ==============================================================================

/// Result of counting buy/sell grades across discrete revisions.
///
/// Polarity: LOWER is better (1.5 = buy-dominant, 4.5 = sell-dominant).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationScore {
    pub score: Option<f64>,
    pub analyst_count: usize,
}

/// Per-bucket deltas between two recommendation snapshots (newer - older).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationChanges {
    pub strong_buy: i64,
    pub buy: i64,
    pub hold: i64,
    pub sell: i64,
    pub strong_sell: i64,
    pub score_change: Option<f64>,
}

/// Rating-change activity inside a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionActivity {
    pub window_days: i64,
    pub revisions: usize,
    pub upgrades: usize,
    pub downgrades: usize,
    pub changes: Option<RecommendationChanges>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystMetrics {
    pub symbol: Option<String>,
    pub current_price: Option<f64>,
    pub target_mean: Option<f64>,
    pub target_median: Option<f64>,
    pub target_high: Option<f64>,
    pub target_low: Option<f64>,
    pub upside_pct: Option<f64>,
    pub consensus_strength: Option<ConsensusStrength>,
    /// Weighted bucket score. Polarity: HIGHER is better (5 = Strong Buy).
    pub consensus_score: Option<f64>,
    pub consensus_label: Option<ConsensusLabel>,
    pub number_of_analysts: u64,
    /// Revision grade score. Polarity: LOWER is better (1.5 = buy-dominant).
    pub revision_score: Option<f64>,
    pub revision_count: usize,
    pub revisions_1m: RevisionActivity,
    pub revisions_3m: RevisionActivity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_total() {
        let snapshot = RecommendationSnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            strong_buy: 5,
            buy: 10,
            hold: 3,
            sell: 1,
            strong_sell: 0,
        };
        assert_eq!(snapshot.total(), 19);
    }

    #[test]
    fn test_snapshot_total_with_saturated_buckets() {
        let snapshot = RecommendationSnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            strong_buy: u32::MAX,
            buy: u32::MAX,
            hold: u32::MAX,
            sell: u32::MAX,
            strong_sell: u32::MAX,
        };
        assert_eq!(snapshot.total(), 5 * u64::from(u32::MAX));
    }

    #[test]
    fn test_label_serializes_as_display_text() {
        let value = serde_json::to_value(ConsensusLabel::StrongBuy).unwrap();
        assert_eq!(value, serde_json::json!("Strong Buy"));
        assert_eq!(ConsensusLabel::StrongSell.to_string(), "Strong Sell");
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_sections() {
        let snapshot: AnalystSnapshot =
            serde_json::from_str(r#"{"current_price": 101.5}"#).unwrap();
        assert_eq!(snapshot.current_price, Some(101.5));
        assert!(snapshot.recommendations.is_empty());
        assert_eq!(snapshot.price_targets, PriceTargets::default());
    }
}
