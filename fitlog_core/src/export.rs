//! CSV export of session history.

use crate::types::WorkoutSession;
use crate::Result;
use std::path::Path;

/// A row in the CSV output, using the persisted wire field names
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    created_at: String,
    summary: String,
    muscles_hit: String,
    exertion_score: i32,
    intensity_score: i32,
    cardio_detected: bool,
    flexibility_detected: bool,
    duration_seconds: u32,
    raw_text: String,
}

impl From<&WorkoutSession> for CsvRow {
    fn from(session: &WorkoutSession) -> Self {
        CsvRow {
            id: session.id.to_string(),
            created_at: session.created_at.to_rfc3339(),
            summary: session.summary.clone(),
            muscles_hit: session.muscle_keys().join(";"),
            exertion_score: session.exertion_score,
            intensity_score: session.intensity_score,
            cardio_detected: session.cardio_detected,
            flexibility_detected: session.flexibility_detected,
            duration_seconds: session.duration_seconds,
            raw_text: session.raw_text.clone(),
        }
    }
}

/// Write the given sessions to a CSV file, returning the row count.
///
/// One-shot write with headers; any existing file is replaced.
pub fn export_sessions_csv(sessions: &[WorkoutSession], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for session in sessions {
        writer.serialize(CsvRow::from(session))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} sessions to {:?}", sessions.len(), path);
    Ok(sessions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(summary: &str) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            raw_text: "notes".into(),
            summary: summary.into(),
            muscles_hit: vec!["Chest".into(), "chest".into(), "back".into()],
            exertion_score: 6,
            intensity_score: 4,
            cardio_detected: true,
            flexibility_detected: false,
            duration_seconds: 1200,
        }
    }

    #[test]
    fn test_export_writes_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.csv");

        let sessions = vec![session("a"), session("b"), session("c")];
        let count = export_sessions_csv(&sessions, &path).unwrap();
        assert_eq!(count, 3);

        let reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.into_records().count(), 3);
    }

    #[test]
    fn test_export_normalizes_muscle_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.csv");

        export_sessions_csv(&[session("x")], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("chest;back"));
    }

    #[test]
    fn test_export_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.csv");

        let count = export_sessions_csv(&[], &path).unwrap();
        assert_eq!(count, 0);
        assert!(path.exists());
    }
}
