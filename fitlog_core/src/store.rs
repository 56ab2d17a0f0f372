//! JSONL-backed session store.
//!
//! Sessions append to a JSON Lines file with file locking for safe
//! concurrent access. Edits and deletes rewrite the file atomically via a
//! temp file rename. Reads are lenient: a line that fails to parse
//! (including an unparsable `created_at`) is logged and skipped rather than
//! failing the whole load, so one bad record never poisons the history
//! the engines consume.

use crate::types::WorkoutSession;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Fields supplied by the caller when logging a workout.
/// The store assigns the id and defaults `created_at` to now.
#[derive(Clone, Debug, Default)]
pub struct NewSession {
    pub created_at: Option<DateTime<Utc>>,
    pub raw_text: String,
    pub summary: String,
    pub muscles_hit: Vec<String>,
    pub exertion_score: i32,
    pub intensity_score: i32,
    pub cardio_detected: bool,
    pub flexibility_detected: bool,
    pub duration_seconds: u32,
}

/// An explicit edit to an existing session. Only the date and notes are
/// user-mutable; everything else is immutable after creation.
#[derive(Clone, Debug, Default)]
pub struct SessionEdit {
    pub created_at: Option<DateTime<Utc>>,
    pub raw_text: Option<String>,
}

/// JSONL session store scoped to a single user's data directory
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given JSONL file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Insert a new session, assigning its id and timestamp.
    ///
    /// The timestamp is caller-adjustable but must not be in the future
    /// relative to `now`.
    pub fn insert(&self, new: NewSession, now: DateTime<Utc>) -> Result<WorkoutSession> {
        let created_at = new.created_at.unwrap_or(now);
        if created_at > now {
            return Err(Error::Store(
                "Session date must not be in the future".to_string(),
            ));
        }

        let session = WorkoutSession {
            id: Uuid::new_v4(),
            created_at,
            raw_text: new.raw_text,
            summary: new.summary,
            muscles_hit: new.muscles_hit,
            exertion_score: new.exertion_score,
            intensity_score: new.intensity_score,
            cardio_detected: new.cardio_detected,
            flexibility_detected: new.flexibility_detected,
            duration_seconds: new.duration_seconds,
        };

        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(&session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Inserted session {}", session.id);
        Ok(session)
    }

    /// Load all sessions, skipping unparsable lines with a warning
    fn read_all(&self) -> Result<Vec<WorkoutSession>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut sessions = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<WorkoutSession>(&line) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!("Skipping malformed session at line {}: {}", line_num + 1, e);
                }
            }
        }

        file.unlock()?;
        Ok(sessions)
    }

    /// Query sessions by recency, newest first, up to `limit`
    pub fn recent(&self, limit: usize) -> Result<Vec<WorkoutSession>> {
        let mut sessions = self.read_all()?;
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions.truncate(limit);
        tracing::debug!("Loaded {} recent sessions", sessions.len());
        Ok(sessions)
    }

    /// Apply an explicit edit (date and/or notes) to a session
    pub fn update(
        &self,
        id: Uuid,
        edit: SessionEdit,
        now: DateTime<Utc>,
    ) -> Result<WorkoutSession> {
        if let Some(date) = edit.created_at {
            if date > now {
                return Err(Error::Store(
                    "Session date must not be in the future".to_string(),
                ));
            }
        }

        let mut sessions = self.read_all()?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::Store(format!("No session with id {}", id)))?;

        if let Some(date) = edit.created_at {
            session.created_at = date;
        }
        if let Some(notes) = edit.raw_text {
            session.raw_text = notes;
        }
        let updated = session.clone();

        self.rewrite(&sessions)?;
        tracing::debug!("Updated session {}", id);
        Ok(updated)
    }

    /// Delete a session by id
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let mut sessions = self.read_all()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Err(Error::Store(format!("No session with id {}", id)));
        }

        self.rewrite(&sessions)?;
        tracing::debug!("Deleted session {}", id);
        Ok(())
    }

    /// Atomically replace the store file with the given sessions
    fn rewrite(&self, sessions: &[WorkoutSession]) -> Result<()> {
        self.ensure_parent_dir()?;

        let parent = self.path.parent().ok_or_else(|| {
            Error::Store("Store path has no parent directory".to_string())
        })?;
        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for session in sessions {
                let line = serde_json::to_string(session)?;
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        Ok(())
    }
}
