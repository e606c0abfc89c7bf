use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// Alert Rule Models
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub ticker: String,
    pub name: String,
    pub condition: AlertCondition,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub cooldown_hours: i32,
    pub last_triggered_at: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

// ==============================================================================
// Alert Conditions
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config")]
pub enum AlertCondition {
    #[serde(rename = "price_above")]
    PriceAbove { price: f64 },
    #[serde(rename = "price_below")]
    PriceBelow { price: f64 },
    #[serde(rename = "price_change")]
    PriceChange {
        percentage: f64,
        direction: Direction,
        /// Number of trading days to look back.
        lookback_days: usize,
    },
    #[serde(rename = "rsi_above")]
    RsiAbove { threshold: f64, period: usize },
    #[serde(rename = "rsi_below")]
    RsiBelow { threshold: f64, period: usize },
    #[serde(rename = "sma_cross")]
    SmaCross { period: usize, direction: Direction },
    #[serde(rename = "upside_above")]
    UpsideAbove { percentage: f64 },
}

/// Discriminant of `AlertCondition`, as stored in the rule's `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    PriceAbove,
    PriceBelow,
    PriceChange,
    RsiAbove,
    RsiBelow,
    SmaCross,
    UpsideAbove,
}

impl AlertCondition {
    pub fn kind(&self) -> AlertKind {
        match self {
            AlertCondition::PriceAbove { .. } => AlertKind::PriceAbove,
            AlertCondition::PriceBelow { .. } => AlertKind::PriceBelow,
            AlertCondition::PriceChange { .. } => AlertKind::PriceChange,
            AlertCondition::RsiAbove { .. } => AlertKind::RsiAbove,
            AlertCondition::RsiBelow { .. } => AlertKind::RsiBelow,
            AlertCondition::SmaCross { .. } => AlertKind::SmaCross,
            AlertCondition::UpsideAbove { .. } => AlertKind::UpsideAbove,
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            AlertKind::PriceAbove => "price_above",
            AlertKind::PriceBelow => "price_below",
            AlertKind::PriceChange => "price_change",
            AlertKind::RsiAbove => "rsi_above",
            AlertKind::RsiBelow => "rsi_below",
            AlertKind::SmaCross => "sma_cross",
            AlertKind::UpsideAbove => "upside_above",
        };
        write!(f, "{}", tag)
    }
}

// ==============================================================================
// Alert Enums
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "either")]
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "critical")]
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "low"),
            AlertSeverity::Medium => write!(f, "medium"),
            AlertSeverity::High => write!(f, "high"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

// ==============================================================================
// Alert Evaluation Models
// ==============================================================================

/// What a single condition observed, before cooldown and severity are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionOutcome {
    pub triggered: bool,
    pub actual_value: f64,
    pub threshold: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvaluationResult {
    pub rule_id: Uuid,
    pub ticker: String,
    pub kind: AlertKind,
    pub triggered: bool,
    pub actual_value: f64,
    pub threshold: f64,
    pub message: String,
    pub severity: AlertSeverity,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvaluationResponse {
    pub evaluated_rules: usize,
    pub triggered_alerts: usize,
    pub results: Vec<AlertEvaluationResult>,
}
