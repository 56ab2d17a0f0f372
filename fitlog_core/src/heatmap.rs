//! Muscle heatmap engine.
//!
//! Converts a window of session history into per-muscle intensity scores via
//! linear time decay, then discretizes scores into display heat levels and
//! propagates group synonyms. Pure functions of the history snapshot and the
//! supplied clock; no I/O, no ambient state.

use crate::catalog::muscle_aliases;
use crate::types::WorkoutSession;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Horizon beyond which a session no longer contributes heat
pub const DECAY_WINDOW_DAYS: f64 = 30.0;

/// Score added per matching session at full (same-day) weight.
/// At most three to four same-day sessions saturate a muscle to 1.0;
/// saturation is a hard ceiling.
pub const SESSION_WEIGHT: f64 = 0.3;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Compute per-muscle heat scores from session history.
///
/// Sessions older than the 30-day window contribute nothing. Each retained
/// session adds `weight * 0.3` per muscle key, where `weight` decays
/// linearly from 1 (now) to 0 (30 days ago). Scores are capped at 1.0.
///
/// Never fails: sessions with missing or malformed muscle lists simply
/// contribute an empty key set.
pub fn compute_heatmap(
    sessions: &[WorkoutSession],
    now: DateTime<Utc>,
) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = HashMap::new();

    for session in sessions {
        let days_since =
            (now - session.created_at).num_seconds() as f64 / SECONDS_PER_DAY;
        if days_since > DECAY_WINDOW_DAYS {
            continue;
        }

        let weight = (1.0 - days_since / DECAY_WINDOW_DAYS).max(0.0);
        for key in session.muscle_keys() {
            let entry = scores.entry(key).or_insert(0.0);
            *entry = (*entry + weight * SESSION_WEIGHT).min(1.0);
        }
    }

    tracing::debug!("Computed heatmap for {} muscle groups", scores.len());
    scores
}

/// A discretized display bucket for a heat score
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeatLevel {
    Faint,
    Low,
    Medium,
    High,
    Max,
}

impl HeatLevel {
    /// The display attribute value used by renderers
    pub fn as_str(&self) -> &'static str {
        match self {
            HeatLevel::Faint => "0.2",
            HeatLevel::Low => "0.4",
            HeatLevel::Medium => "0.6",
            HeatLevel::High => "0.8",
            HeatLevel::Max => "1.0",
        }
    }
}

/// Threshold a continuous score into a display heat level.
///
/// Returns `None` at exactly 0 (no visual encoding). Shared by the direct
/// and alias paths so the thresholding ladder exists exactly once.
pub fn score_to_level(score: f64) -> Option<HeatLevel> {
    if score >= 0.8 {
        Some(HeatLevel::Max)
    } else if score >= 0.6 {
        Some(HeatLevel::High)
    } else if score >= 0.4 {
        Some(HeatLevel::Medium)
    } else if score >= 0.2 {
        Some(HeatLevel::Low)
    } else if score > 0.0 {
        Some(HeatLevel::Faint)
    } else {
        None
    }
}

/// Produce display heat levels from raw scores, including alias propagation.
///
/// Direct scores are thresholded first. Then each `(source, target)` synonym
/// pair propagates the source's level to the target, but only if the target
/// has no level of its own yet; aliases never overwrite a directly-observed
/// score.
pub fn heat_levels(scores: &HashMap<String, f64>) -> HashMap<String, HeatLevel> {
    let mut levels: HashMap<String, HeatLevel> = HashMap::new();

    for (muscle, score) in scores {
        if let Some(level) = score_to_level(*score) {
            levels.insert(muscle.clone(), level);
        }
    }

    for (source, target) in muscle_aliases() {
        if levels.contains_key(*target) {
            continue;
        }
        if let Some(score) = scores.get(*source) {
            if let Some(level) = score_to_level(*score) {
                levels.insert(target.to_string(), level);
            }
        }
    }

    levels
}
