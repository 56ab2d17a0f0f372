#![forbid(unsafe_code)]

//! Core domain model and derived-state engines for the fitlog workout
//! tracker.
//!
//! This crate provides:
//! - Domain types (sessions, templates, user state, weekly summaries)
//! - The static workout catalog
//! - The muscle heatmap engine (time-decayed scoring and display levels)
//! - The weekly summary engine and insight derivation
//! - The rule-based recommendation engine (resample, advice)
//! - Persistence (JSONL session store, advisory heatmap cache, CSV export)
//!
//! The three engines are pure: they read only the history snapshot, clock,
//! and user state handed to them, making repeated calls idempotent and safe
//! from any thread.

pub mod analysis;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod heatmap;
pub mod logging;
pub mod store;
pub mod summary;
pub mod types;

// Re-export commonly used types
pub use analysis::{analyze_notes, AnalysisResult};
pub use cache::HeatmapCache;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use engine::{advise_for, recommend, resample};
pub use error::{Error, Result};
pub use export::export_sessions_csv;
pub use heatmap::{compute_heatmap, heat_levels, score_to_level, HeatLevel};
pub use store::{NewSession, SessionEdit, SessionStore};
pub use summary::{compute_weekly_summary, derive_insight, week_start};
pub use types::*;
