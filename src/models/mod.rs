pub mod alert;
pub mod analyst;
pub mod price;
pub mod seasonality;

pub use alert::{
    AlertCondition, AlertEvaluationResponse, AlertEvaluationResult, AlertKind, AlertRule,
    AlertSeverity, ConditionOutcome, Direction,
};
pub use analyst::{
    AnalystMetrics, AnalystSnapshot, ConsensusLabel, ConsensusStrength, ConsensusThresholds,
    GradeRevision, PriceTargets, RecommendationChanges, RecommendationScore,
    RecommendationSnapshot, RevisionActivity,
};
pub use price::{MonthlyReturn, PricePoint, PriceSeries};
pub use seasonality::{LookbackWindow, MonthNames, SeasonalityReport, SeasonalityRow};
