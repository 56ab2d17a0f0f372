//! Rule-based workout recommendation engine.
//!
//! Decision order matters: the energy/rest rules overlap, so they are
//! evaluated top to bottom and the first match wins. Only when no rule fires
//! does the engine fall back to history-balance scoring over the most recent
//! entries.
//!
//! All entry points are pure functions of their explicit inputs (history
//! snapshot, user state, clock, injected randomness); calling them twice
//! with the same inputs yields identical outputs, except `resample` which
//! draws from the caller-supplied generator.

use crate::catalog::{
    category_muscles, Catalog, CARDIO_CORE_TEMPLATE, HIIT_TEMPLATE, HYPERTROPHY_TEMPLATE,
    RECOVERY_TEMPLATE,
};
use crate::types::{Recommendation, TemplateKind, WorkoutSession, WorkoutTemplate};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashSet;

/// How many recent history entries the balance fallback examines
const HISTORY_WINDOW: usize = 7;

const REASON_LOW_ENERGY_REST: &str =
    "You're low on energy and need rest. Light recovery is best today.";
const REASON_WELL_RESTED: &str =
    "You're well-rested and energized! Time to push hard with strength training.";
const REASON_HIGH_ENERGY: &str = "High energy detected! Channel it into an intense workout.";
const REASON_NEEDS_RECOVERY: &str =
    "Your body needs recovery. Focus on mobility and stretching.";
const REASON_GENERIC: &str = "Based on your current state and workout history.";

fn named<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a WorkoutTemplate> {
    catalog
        .by_name(name)
        .ok_or_else(|| Error::Catalog(format!("Expected template '{}' not in catalog", name)))
}

/// Recommend a workout template for the given user state and history.
///
/// `history` must be ordered most-recent-first. Precondition: `energy` and
/// `rest` are already clamped to 0..=100 by the caller.
///
/// Fails only on catalog misconfiguration (a rule references a template
/// name that does not exist); that is a programmer error and is surfaced
/// loudly rather than masked.
pub fn recommend<'a>(
    catalog: &'a Catalog,
    energy: u8,
    rest: u8,
    history: &[WorkoutSession],
) -> Result<Recommendation<'a>> {
    // Rule 1: depleted on both axes
    if energy < 30 && rest < 30 {
        return Ok(Recommendation {
            template: named(catalog, RECOVERY_TEMPLATE)?,
            reason: REASON_LOW_ENERGY_REST.to_string(),
        });
    }

    // Rule 2: fresh and energized
    if rest > 70 && energy > 60 {
        return Ok(Recommendation {
            template: named(catalog, HYPERTROPHY_TEMPLATE)?,
            reason: REASON_WELL_RESTED.to_string(),
        });
    }

    // Rule 3: high energy, adequately rested
    if energy > 70 && rest > 50 {
        return Ok(Recommendation {
            template: named(catalog, HIIT_TEMPLATE)?,
            reason: REASON_HIGH_ENERGY.to_string(),
        });
    }

    // Rule 4: under-rested regardless of energy
    if rest < 40 {
        let template = catalog.first_of_kind(TemplateKind::Flexibility).ok_or_else(|| {
            Error::Catalog("No flexibility template available for recovery rule".to_string())
        })?;
        return Ok(Recommendation {
            template,
            reason: REASON_NEEDS_RECOVERY.to_string(),
        });
    }

    // Rule 5: low energy
    if energy < 50 {
        return Ok(Recommendation {
            template: named(catalog, CARDIO_CORE_TEMPLATE)?,
            reason: REASON_GENERIC.to_string(),
        });
    }

    // Fallback: balance against recent history
    let template = balance_by_history(catalog, energy, rest, history)?;
    Ok(Recommendation {
        template,
        reason: REASON_GENERIC.to_string(),
    })
}

/// Score every template against the recent history window and pick the best.
///
/// Ties break in favor of catalog order: a later template only replaces the
/// current best on a strictly higher score.
fn balance_by_history<'a>(
    catalog: &'a Catalog,
    energy: u8,
    rest: u8,
    history: &[WorkoutSession],
) -> Result<&'a WorkoutTemplate> {
    let mut recent_muscles: HashSet<String> = HashSet::new();
    let mut recent_cardio = 0u32;
    let mut recent_flex = 0u32;

    for session in history.iter().take(HISTORY_WINDOW) {
        recent_muscles.extend(session.muscle_keys());
        if session.cardio_detected {
            recent_cardio += 1;
        }
        if session.flexibility_detected {
            recent_flex += 1;
        }
    }

    let mut best: Option<&WorkoutTemplate> = None;
    let mut best_score = -1i32;

    for template in &catalog.templates {
        let mut score = 0i32;

        // Prefer muscles not recently worked
        for muscle in &template.muscles {
            if !recent_muscles.contains(muscle) {
                score += 2;
            }
        }

        // Balance cardio and flexibility coverage
        if template.kind == TemplateKind::Cardio && recent_cardio < 2 {
            score += 3;
        }
        if template.kind == TemplateKind::Flexibility && recent_flex < 1 {
            score += 3;
        }

        // Adjust by the user's current state
        if template.kind == TemplateKind::Strength && rest > 50 {
            score += 2;
        }
        if template.kind == TemplateKind::Cardio && energy > 50 {
            score += 1;
        }

        if score > best_score {
            best_score = score;
            best = Some(template);
        }
    }

    tracing::debug!(best_score, "History-balance fallback selected a template");
    best.ok_or_else(|| Error::Catalog("Catalog has no templates to score".to_string()))
}

/// Pick a random alternative to the currently displayed template.
///
/// The current template is identified by its stable name key, never by
/// rendered display text, and is always excluded from the draw. Randomness
/// comes from the injected generator so tests can seed it.
pub fn resample<'a, R: Rng>(
    catalog: &'a Catalog,
    current_name: &str,
    rng: &mut R,
) -> Result<Recommendation<'a>> {
    let others: Vec<&WorkoutTemplate> = catalog
        .templates
        .iter()
        .filter(|t| t.name != current_name)
        .collect();

    if others.is_empty() {
        return Err(Error::Catalog(
            "Resample needs at least one alternative template".to_string(),
        ));
    }

    let pick = others[rng.gen_range(0..others.len())];
    let focus = if pick.muscles.is_empty() {
        pick.kind.as_str().to_string()
    } else {
        pick.muscles.join(", ")
    };

    Ok(Recommendation {
        template: pick,
        reason: format!("Alternative: {} focuses on {}.", pick.name, focus),
    })
}

/// Contextual advice for a workout category, keyed to the last matching
/// session in history.
///
/// `history` must be ordered most-recent-first. A session matches when it is
/// cardio-tagged (category "cardio"), flexibility-tagged (category
/// "recovery"), or hits any of the category's target muscles. Advice bands
/// on that session's intensity, with a days-since clause appended outside
/// the 2..=7 day window.
pub fn advise_for(category: &str, history: &[WorkoutSession], now: DateTime<Utc>) -> String {
    let targets = category_muscles(category);

    let last = history.iter().find(|session| {
        if category == "cardio" && session.cardio_detected {
            return true;
        }
        if category == "recovery" && session.flexibility_detected {
            return true;
        }
        let keys = session.muscle_keys();
        targets.iter().any(|m| keys.iter().any(|k| k == m))
    });

    let Some(session) = last else {
        return "No recent history for this workout type. Start with moderate intensity \
                and focus on proper form."
            .to_string();
    };

    // User-selected intensity wins; fall back to the derived exertion score.
    let intensity = if session.intensity_score > 0 {
        session.intensity_score
    } else if session.exertion_score > 0 {
        session.exertion_score
    } else {
        3
    };

    let mut advice = if intensity >= 4 {
        "Last time was a grinder! Dial it back today and focus on form. \
         Your muscles need time to adapt."
            .to_string()
    } else if intensity <= 2 {
        "You crushed it easily last time! Push harder today - add weight or reps \
         to keep progressing."
            .to_string()
    } else {
        "Your last session was moderate. Maintain the intensity or slightly \
         increase the challenge."
            .to_string()
    };

    let days_since = (now - session.created_at).num_days();
    if days_since > 7 {
        advice.push_str(&format!(
            " It's been {} days since you trained this - ease back in.",
            days_since
        ));
    } else if days_since < 2 {
        advice.push_str(" You trained this recently - consider recovery if feeling sore.");
    }

    advice
}
