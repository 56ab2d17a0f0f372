//! Workout-note analysis.
//!
//! The tag-extraction schema matches the external analyzer's JSON response,
//! with serde defaults so a partial or failed response degrades to the
//! documented fallback values instead of blocking session creation. A small
//! keyword matcher provides a deterministic offline stand-in.

use crate::types::default_exertion;
use serde::{Deserialize, Serialize};

/// Muscle groups the analyzer knows how to tag
const KNOWN_MUSCLES: &[&str] = &[
    "chest",
    "back",
    "shoulders",
    "biceps",
    "triceps",
    "forearms",
    "core",
    "abs",
    "quads",
    "legs",
    "hamstrings",
    "glutes",
    "calves",
];

const CARDIO_KEYWORDS: &[&str] = &[
    "cardio", "run", "running", "jog", "cycling", "bike", "hiit", "sprint", "rowing",
    "jump rope", "swimming",
];

const FLEXIBILITY_KEYWORDS: &[&str] =
    &["stretch", "stretching", "yoga", "mobility", "foam roll"];

/// Structured tags extracted from free-form workout notes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub muscles: Vec<String>,
    #[serde(default = "default_exertion")]
    pub exertion_score: i32,
    #[serde(default)]
    pub cardio_detected: bool,
    #[serde(default)]
    pub flexibility_detected: bool,
    #[serde(default)]
    pub summary: String,
}

impl AnalysisResult {
    /// The result used when analysis is unavailable or fails: no tags,
    /// exertion 5, summary echoes the notes.
    pub fn fallback(text: &str) -> Self {
        Self {
            muscles: vec![],
            exertion_score: default_exertion(),
            cardio_detected: false,
            flexibility_detected: false,
            summary: text.to_string(),
        }
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == needle)
}

/// Extract tags from workout notes with keyword matching.
///
/// Deterministic and never fails; empty notes produce the fallback result.
pub fn analyze_notes(text: &str) -> AnalysisResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return AnalysisResult::fallback(text);
    }
    let lower = trimmed.to_lowercase();

    let muscles: Vec<String> = KNOWN_MUSCLES
        .iter()
        .filter(|m| contains_word(&lower, m))
        .map(|m| m.to_string())
        .collect();

    let cardio_detected = CARDIO_KEYWORDS.iter().any(|k| {
        if k.contains(' ') {
            lower.contains(k)
        } else {
            contains_word(&lower, k)
        }
    });
    let flexibility_detected = FLEXIBILITY_KEYWORDS.iter().any(|k| {
        if k.contains(' ') {
            lower.contains(k)
        } else {
            contains_word(&lower, k)
        }
    });

    let exertion_score = if contains_word(&lower, "easy") || contains_word(&lower, "light") {
        3
    } else if contains_word(&lower, "hard")
        || contains_word(&lower, "brutal")
        || contains_word(&lower, "exhausting")
    {
        8
    } else {
        default_exertion()
    };

    // First sentence (or the whole note) as the summary
    let summary = trimmed
        .split_inclusive(['.', '!', '?'])
        .next()
        .unwrap_or(trimmed)
        .trim()
        .to_string();

    tracing::debug!(
        muscles = muscles.len(),
        cardio_detected,
        flexibility_detected,
        "Analyzed workout notes"
    );

    AnalysisResult {
        muscles,
        exertion_score,
        cardio_detected,
        flexibility_detected,
        summary,
    }
}
