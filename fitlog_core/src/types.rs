//! Core domain types for the workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Logged workout sessions and their derived tags
//! - Workout templates (catalog entries)
//! - Ephemeral user state (energy/rest sliders)
//! - Weekly summary counts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// ============================================================================
// Session Types
// ============================================================================

/// One logged workout with derived tags.
///
/// Field names follow the persisted wire schema (`created_at`, `muscles_hit`,
/// etc.) so records written by earlier deployments deserialize unchanged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub muscles_hit: Vec<String>,
    #[serde(default = "default_exertion")]
    pub exertion_score: i32,
    #[serde(default = "default_intensity")]
    pub intensity_score: i32,
    #[serde(default)]
    pub cardio_detected: bool,
    #[serde(default)]
    pub flexibility_detected: bool,
    #[serde(default)]
    pub duration_seconds: u32,
}

pub(crate) fn default_exertion() -> i32 {
    5
}

pub(crate) fn default_intensity() -> i32 {
    3
}

impl WorkoutSession {
    /// Canonical muscle keys for this session: lower-cased, trimmed,
    /// deduplicated, empty entries dropped.
    ///
    /// The store does not enforce any of this, so consumers normalize at
    /// read time.
    pub fn muscle_keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for muscle in &self.muscles_hit {
            let key = muscle.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
        keys
    }
}

// ============================================================================
// Template Types
// ============================================================================

/// Broad template classification used by the recommendation scorer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Strength,
    Cardio,
    Flexibility,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Strength => "strength",
            TemplateKind::Cardio => "cardio",
            TemplateKind::Flexibility => "flexibility",
        }
    }
}

/// A workout template from the static catalog.
///
/// Templates are read-only value objects; nothing mutates them after the
/// catalog is built. `name` is the unique key within the catalog. `category`
/// is a free-form tag used only for advice lookup and is distinct from
/// `kind`, which drives recommendation scoring.
#[derive(Clone, Debug)]
pub struct WorkoutTemplate {
    pub name: String,
    pub muscles: Vec<String>,
    pub kind: TemplateKind,
    pub category: String,
    pub exercises: Vec<String>,
}

// ============================================================================
// User State
// ============================================================================

/// Ephemeral per-session user state driving recommendations.
///
/// Mutated only by direct user input (sliders/flags); never persisted.
/// Both values live in 0..=100.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserState {
    pub energy_level: u8,
    pub rest_level: u8,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            energy_level: 50,
            rest_level: 50,
        }
    }
}

/// Clamp a raw slider value into the 0..=100 range the engines require.
///
/// The engines themselves document the range as a precondition and do not
/// clamp; callers run inputs through this before invoking them.
pub fn clamp_level(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

// ============================================================================
// Weekly Summary
// ============================================================================

/// Category counts for the current calendar week.
///
/// `strength` is the raw subtraction `total - cardio - flexibility` and may
/// go negative when a session is tagged both cardio and flexibility; display
/// paths clamp via [`WeeklySummary::strength_display`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeeklySummary {
    pub total: u32,
    pub cardio: u32,
    pub flexibility: u32,
    pub strength: i32,
}

impl WeeklySummary {
    /// Strength count floored at zero for display.
    pub fn strength_display(&self) -> u32 {
        self.strength.max(0) as u32
    }
}

// ============================================================================
// Recommendation
// ============================================================================

/// A recommendation produced by the engine: a catalog template plus the
/// human-readable reason it was selected.
#[derive(Clone, Debug)]
pub struct Recommendation<'a> {
    pub template: &'a WorkoutTemplate,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session_with_muscles(muscles: &[&str]) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            raw_text: String::new(),
            summary: String::new(),
            muscles_hit: muscles.iter().map(|m| m.to_string()).collect(),
            exertion_score: 5,
            intensity_score: 3,
            cardio_detected: false,
            flexibility_detected: false,
            duration_seconds: 0,
        }
    }

    #[test]
    fn test_muscle_keys_normalizes_and_dedupes() {
        let session = session_with_muscles(&[" Chest ", "chest", "BACK", "", "  "]);
        assert_eq!(session.muscle_keys(), vec!["chest", "back"]);
    }

    #[test]
    fn test_session_deserializes_with_missing_fields() {
        let json = format!(
            r#"{{"id":"{}","created_at":"2026-08-01T10:00:00Z"}}"#,
            Uuid::new_v4()
        );
        let session: WorkoutSession = serde_json::from_str(&json).unwrap();
        assert!(session.muscles_hit.is_empty());
        assert_eq!(session.exertion_score, 5);
        assert_eq!(session.intensity_score, 3);
        assert!(!session.cardio_detected);
        assert_eq!(session.duration_seconds, 0);
    }

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(-20), 0);
        assert_eq!(clamp_level(50), 50);
        assert_eq!(clamp_level(250), 100);
    }

    #[test]
    fn test_strength_display_floors_at_zero() {
        let summary = WeeklySummary {
            total: 1,
            cardio: 1,
            flexibility: 1,
            strength: -1,
        };
        assert_eq!(summary.strength_display(), 0);
    }
}
