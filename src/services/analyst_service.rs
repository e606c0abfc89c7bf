use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;

use crate::models::{
    AnalystMetrics, AnalystSnapshot, ConsensusLabel, ConsensusStrength, ConsensusThresholds,
    GradeRevision, RecommendationChanges, RecommendationScore, RecommendationSnapshot,
    RevisionActivity,
};
use crate::services::ratings::{self, GradeSignal};
use crate::services::statistics::round2;

pub const DEFAULT_SHORT_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_LONG_WINDOW_DAYS: i64 = 90;

// ==============================================================================
// Price Targets
// ==============================================================================

/// Upside from `current_price` to `mean_target` in percent, unrounded.
///
/// `None` when either side is missing or zero.
pub fn compute_upside_potential(mean_target: Option<f64>, current_price: Option<f64>) -> Option<f64> {
    ratings::upside_pct(mean_target?, current_price?)
}

/// How tightly analyst targets cluster, using the default thresholds.
pub fn classify_consensus_strength(
    high: Option<f64>,
    low: Option<f64>,
    mean: Option<f64>,
) -> Option<ConsensusStrength> {
    classify_consensus_strength_with(high, low, mean, &ConsensusThresholds::default())
}

pub fn classify_consensus_strength_with(
    high: Option<f64>,
    low: Option<f64>,
    mean: Option<f64>,
    thresholds: &ConsensusThresholds,
) -> Option<ConsensusStrength> {
    let range = ratings::range_pct(high?, low?, mean?)?;
    Some(ratings::classify_range(range, thresholds))
}

// ==============================================================================
// Recommendation Scores
// ==============================================================================

/// Score discrete rating revisions by counting buy and sell grades.
///
/// Polarity: lower is better. First matching rule wins:
/// buy > 2*sell -> 1.5, buy > sell -> 2.0, sell > 2*buy -> 4.5,
/// sell > buy -> 4.0, otherwise 3.0. Empty input yields no score.
pub fn score_recommendations<S: AsRef<str>>(grades: &[S]) -> RecommendationScore {
    if grades.is_empty() {
        return RecommendationScore {
            score: None,
            analyst_count: 0,
        };
    }

    let (buy, sell) = grades
        .iter()
        .fold((0usize, 0usize), |(buy, sell), grade| match ratings::classify_grade(grade.as_ref()) {
            GradeSignal::Buy => (buy + 1, sell),
            GradeSignal::Sell => (buy, sell + 1),
            GradeSignal::Neutral => (buy, sell),
        });

    let score = if buy > 2 * sell {
        1.5
    } else if buy > sell {
        2.0
    } else if sell > 2 * buy {
        4.5
    } else if sell > buy {
        4.0
    } else {
        3.0
    };

    RecommendationScore {
        score: Some(score),
        analyst_count: grades.len(),
    }
}

/// Weighted average over rating buckets.
///
/// Polarity: higher is better (5 = all Strong Buy, 1 = all Strong Sell).
/// `None` when the snapshot holds no analysts.
pub fn weighted_consensus_score(snapshot: &RecommendationSnapshot) -> Option<f64> {
    let total = snapshot.total();
    if total == 0 {
        return None;
    }

    // u64 holds 15 * u32::MAX comfortably.
    let weighted = 5 * u64::from(snapshot.strong_buy)
        + 4 * u64::from(snapshot.buy)
        + 3 * u64::from(snapshot.hold)
        + 2 * u64::from(snapshot.sell)
        + u64::from(snapshot.strong_sell);

    Some(weighted as f64 / total as f64)
}

/// Label for a weighted bucket score (see `weighted_consensus_score`).
pub fn get_consensus_rating(score: f64) -> ConsensusLabel {
    ratings::label_for_weighted_score(score)
}

/// Bucket deltas `newer - older` and the change in weighted score.
pub fn calculate_recommendation_changes(
    older: Option<&RecommendationSnapshot>,
    newer: Option<&RecommendationSnapshot>,
) -> Option<RecommendationChanges> {
    let (older, newer) = (older?, newer?);

    let delta = |new: u32, old: u32| i64::from(new) - i64::from(old);

    let score_change = match (weighted_consensus_score(older), weighted_consensus_score(newer)) {
        (Some(old), Some(new)) if old != 0.0 && new != 0.0 => Some(round2(new - old)),
        _ => None,
    };

    Some(RecommendationChanges {
        strong_buy: delta(newer.strong_buy, older.strong_buy),
        buy: delta(newer.buy, older.buy),
        hold: delta(newer.hold, older.hold),
        sell: delta(newer.sell, older.sell),
        strong_sell: delta(newer.strong_sell, older.strong_sell),
        score_change,
    })
}

// ==============================================================================
// Aggregation
// ==============================================================================

/// Composes price-target and recommendation metrics for one symbol.
#[derive(Debug, Clone)]
pub struct AnalystEngine {
    thresholds: ConsensusThresholds,
    short_window_days: i64,
    long_window_days: i64,
}

impl Default for AnalystEngine {
    fn default() -> Self {
        Self {
            thresholds: ConsensusThresholds::default(),
            short_window_days: DEFAULT_SHORT_WINDOW_DAYS,
            long_window_days: DEFAULT_LONG_WINDOW_DAYS,
        }
    }
}

impl AnalystEngine {
    pub fn new(thresholds: ConsensusThresholds, short_window_days: i64, long_window_days: i64) -> Self {
        Self {
            thresholds,
            short_window_days,
            long_window_days,
        }
    }

    pub fn aggregate(&self, snapshot: &AnalystSnapshot) -> AnalystMetrics {
        self.aggregate_as_of(snapshot, Utc::now().date_naive())
    }

    /// Every field is derived independently, so a missing input category
    /// only blanks the fields that depend on it.
    pub fn aggregate_as_of(&self, snapshot: &AnalystSnapshot, as_of: NaiveDate) -> AnalystMetrics {
        let targets = &snapshot.price_targets;

        let upside_pct =
            compute_upside_potential(targets.mean, snapshot.current_price).map(round2);
        let consensus_strength =
            classify_consensus_strength_with(targets.high, targets.low, targets.mean, &self.thresholds);

        let latest = snapshot_at(&snapshot.recommendations, as_of);
        let raw_score = latest.and_then(weighted_consensus_score);

        let recent: Vec<&str> = revisions_within(&snapshot.revisions, as_of, self.long_window_days)
            .map(|r| r.to_grade.as_str())
            .collect();
        let revision_score = score_recommendations(&recent);

        debug!(
            "Aggregated analyst metrics for {:?}: {} snapshots, {} recent revisions",
            snapshot.symbol,
            snapshot.recommendations.len(),
            recent.len()
        );

        AnalystMetrics {
            symbol: snapshot.symbol.clone(),
            current_price: snapshot.current_price,
            target_mean: targets.mean,
            target_median: targets.median,
            target_high: targets.high,
            target_low: targets.low,
            upside_pct,
            consensus_strength,
            consensus_score: raw_score.map(round2),
            consensus_label: raw_score.map(get_consensus_rating),
            number_of_analysts: latest.map(RecommendationSnapshot::total).unwrap_or(0),
            revision_score: revision_score.score,
            revision_count: revision_score.analyst_count,
            revisions_1m: self.revision_activity(snapshot, as_of, self.short_window_days),
            revisions_3m: self.revision_activity(snapshot, as_of, self.long_window_days),
        }
    }

    fn revision_activity(&self, snapshot: &AnalystSnapshot, as_of: NaiveDate, window_days: i64) -> RevisionActivity {
        let (revisions, upgrades, downgrades) = revisions_within(&snapshot.revisions, as_of, window_days)
            .fold((0, 0, 0), |(n, up, down), r| {
                let action = r.action.as_deref();
                (
                    n + 1,
                    up + usize::from(ratings::is_upgrade(action)),
                    down + usize::from(ratings::is_downgrade(action)),
                )
            });

        let newer = snapshot_at(&snapshot.recommendations, as_of);
        let older = snapshot_at(&snapshot.recommendations, window_start(as_of, window_days));
        // Same snapshot on both sides means no history reaches back that far.
        let changes = match (older, newer) {
            (Some(o), Some(n)) if o.as_of == n.as_of => None,
            _ => calculate_recommendation_changes(older, newer),
        };

        RevisionActivity {
            window_days,
            revisions,
            upgrades,
            downgrades,
            changes,
        }
    }
}

/// Aggregate with default thresholds and windows, relative to today.
pub fn aggregate_analyst_metrics(snapshot: &AnalystSnapshot) -> AnalystMetrics {
    AnalystEngine::default().aggregate(snapshot)
}

/// `as_of - window_days`, clamped to the earliest representable date when
/// the window reaches past the calendar range.
fn window_start(as_of: NaiveDate, window_days: i64) -> NaiveDate {
    Duration::try_days(window_days)
        .and_then(|window| as_of.checked_sub_signed(window))
        .unwrap_or(NaiveDate::MIN)
}

/// Latest snapshot dated on or before `date`.
fn snapshot_at(snapshots: &[RecommendationSnapshot], date: NaiveDate) -> Option<&RecommendationSnapshot> {
    snapshots
        .iter()
        .filter(|s| s.as_of <= date)
        .max_by_key(|s| s.as_of)
}

/// Revisions dated in `(as_of - window_days, as_of]`.
fn revisions_within<'a>(
    revisions: &'a [GradeRevision],
    as_of: NaiveDate,
    window_days: i64,
) -> impl Iterator<Item = &'a GradeRevision> {
    let start = window_start(as_of, window_days);
    revisions
        .iter()
        .filter(move |r| r.date > start && r.date <= as_of)
}
