//! Advisory heatmap cache.
//!
//! A best-effort accumulator that mirrors the heatmap engine's `+0.3` per
//! session without re-reading full history. It is a display hint only:
//! [`crate::heatmap::compute_heatmap`] over a fresh history snapshot remains
//! ground truth, and callers fall back to it whenever the cache is missing
//! or stale.
//!
//! Unlike a plain accumulator, each entry carries its last-update timestamp
//! and the 30-day linear decay is applied on read, so an untouched entry
//! converges to zero instead of drifting upward forever.

use crate::heatmap::{DECAY_WINDOW_DAYS, SESSION_WEIGHT};
use crate::types::WorkoutSession;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CacheEntry {
    score: f64,
    updated_at: DateTime<Utc>,
}

/// Per-muscle advisory heat scores with decay-on-read
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HeatmapCache {
    #[serde(default)]
    entries: HashMap<String, CacheEntry>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

fn decay_factor(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - updated_at).num_seconds() as f64 / SECONDS_PER_DAY;
    (1.0 - days / DECAY_WINDOW_DAYS).clamp(0.0, 1.0)
}

impl HeatmapCache {
    /// Fold one session into the cache: decay each touched entry to `now`,
    /// then add the per-session weight, capped at 1.0.
    pub fn accumulate(&mut self, session: &WorkoutSession, now: DateTime<Utc>) {
        for key in session.muscle_keys() {
            let entry = self.entries.entry(key).or_insert(CacheEntry {
                score: 0.0,
                updated_at: now,
            });
            let decayed = entry.score * decay_factor(entry.updated_at, now);
            entry.score = (decayed + SESSION_WEIGHT).min(1.0);
            entry.updated_at = now;
        }
        self.last_update = Some(now);
    }

    /// Current scores with decay applied; fully-decayed entries are dropped
    pub fn snapshot(&self, now: DateTime<Utc>) -> HashMap<String, f64> {
        self.entries
            .iter()
            .filter_map(|(muscle, entry)| {
                let score = entry.score * decay_factor(entry.updated_at, now);
                if score > 0.0 {
                    Some((muscle.clone(), score))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the cache from disk.
    ///
    /// Missing or corrupt files yield an empty cache with a warning; the
    /// cache is advisory, so this path never blocks the caller.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(cache) => cache,
                Err(e) => {
                    tracing::warn!("Discarding corrupt heatmap cache {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Unable to read heatmap cache {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Atomically write the cache to disk via temp file rename
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let parent = path
            .parent()
            .ok_or_else(|| Error::Store("Cache path has no parent directory".to_string()))?;
        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved heatmap cache to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn session(muscles: &[&str], created_at: DateTime<Utc>) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            created_at,
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
    fn test_accumulate_adds_point_three() {
        let now = Utc::now();
        let mut cache = HeatmapCache::default();
        cache.accumulate(&session(&["chest"], now), now);

        let scores = cache.snapshot(now);
        assert!((scores["chest"] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_accumulate_caps_at_one() {
        let now = Utc::now();
        let mut cache = HeatmapCache::default();
        for _ in 0..5 {
            cache.accumulate(&session(&["chest"], now), now);
        }

        let scores = cache.snapshot(now);
        assert!((scores["chest"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_decays_stale_entries() {
        let now = Utc::now();
        let mut cache = HeatmapCache::default();
        cache.accumulate(&session(&["back"], now), now);

        // Half the window elapsed: half the score remains
        let later = now + Duration::days(15);
        let scores = cache.snapshot(later);
        assert!((scores["back"] - 0.15).abs() < 1e-9);

        // Past the window the entry disappears entirely
        let far = now + Duration::days(31);
        assert!(cache.snapshot(far).is_empty());
    }

    #[test]
    fn test_accumulate_decays_before_adding() {
        let now = Utc::now();
        let mut cache = HeatmapCache::default();
        cache.accumulate(&session(&["core"], now), now);

        // 15 days later: 0.3 has decayed to 0.15, plus a fresh 0.3
        let later = now + Duration::days(15);
        cache.accumulate(&session(&["core"], later), later);

        let scores = cache.snapshot(later);
        assert!((scores["core"] - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap_cache.json");
        let now = Utc::now();

        let mut cache = HeatmapCache::default();
        cache.accumulate(&session(&["glutes"], now), now);
        cache.save(&path).unwrap();

        let loaded = HeatmapCache::load(&path);
        let scores = loaded.snapshot(now);
        assert!((scores["glutes"] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_load_corrupt_cache_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap_cache.json");
        std::fs::write(&path, "{ not json }").unwrap();

        let cache = HeatmapCache::load(&path);
        assert!(cache.is_empty());
    }
}
