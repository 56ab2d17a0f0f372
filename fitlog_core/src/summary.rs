//! Weekly summary engine.
//!
//! Aggregates sessions in the current calendar week into category counts and
//! derives a short insight string. The week starts on the most recent Sunday
//! at 00:00:00 local time.

use crate::types::{WeeklySummary, WorkoutSession};
use chrono::{DateTime, Datelike, Duration, Local, NaiveTime, TimeZone, Utc};

/// Start of the current calendar week: the most recent Sunday at local
/// midnight, expressed in UTC for comparison against stored timestamps.
pub fn week_start(now: DateTime<Local>) -> DateTime<Utc> {
    let days_back = now.weekday().num_days_from_sunday() as i64;
    let start_naive = (now.date_naive() - Duration::days(days_back)).and_time(NaiveTime::MIN);

    // Midnight can be skipped by a DST transition; fall back to reading the
    // naive time as UTC rather than failing.
    start_naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&start_naive))
}

/// Count this week's sessions by category.
///
/// Ordering of the input is irrelevant; any session with
/// `created_at >= week_start` is in scope. `strength` is the raw
/// subtraction and may be negative when sessions carry both tags.
pub fn compute_weekly_summary(
    sessions: &[WorkoutSession],
    now: DateTime<Local>,
) -> WeeklySummary {
    let start = week_start(now);

    let mut total = 0u32;
    let mut cardio = 0u32;
    let mut flexibility = 0u32;

    for session in sessions {
        if session.created_at >= start {
            total += 1;
            if session.cardio_detected {
                cardio += 1;
            }
            if session.flexibility_detected {
                flexibility += 1;
            }
        }
    }

    WeeklySummary {
        total,
        cardio,
        flexibility,
        strength: total as i32 - cardio as i32 - flexibility as i32,
    }
}

/// Derive the weekly insight message.
///
/// A fixed decision ladder on the total count, evaluated top to bottom,
/// plus at most one appended balance clause; the cardio check takes
/// priority over the flexibility one.
pub fn derive_insight(summary: &WeeklySummary) -> String {
    if summary.total == 0 {
        return "No workouts this week yet. Time to start!".to_string();
    }

    let mut insight = if summary.total >= 5 {
        "You worked out consistently this week. Good job!".to_string()
    } else if summary.total >= 3 {
        format!("{} workouts this week. Keep up the momentum!", summary.total)
    } else {
        format!(
            "{} workout{} this week. Let's add more!",
            summary.total,
            if summary.total > 1 { "s" } else { "" }
        )
    };

    if summary.cardio == 0 && summary.total >= 2 {
        insight.push_str(" Consider adding some cardio.");
    } else if summary.flexibility == 0 && summary.total >= 3 {
        insight.push_str(" Don't forget flexibility work!");
    }

    insight
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use uuid::Uuid;

    fn session(hours_ago: i64, cardio: bool, flexibility: bool, now: DateTime<Local>) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            created_at: (now - Duration::hours(hours_ago)).with_timezone(&Utc),
            raw_text: String::new(),
            summary: String::new(),
            muscles_hit: vec![],
            exertion_score: 5,
            intensity_score: 3,
            cardio_detected: cardio,
            flexibility_detected: flexibility,
            duration_seconds: 0,
        }
    }

    #[test]
    fn test_week_start_is_sunday_midnight() {
        let now = Local::now();
        let start = week_start(now).with_timezone(&Local);
        assert_eq!(start.weekday(), Weekday::Sun);
        assert_eq!(start.time(), NaiveTime::MIN);
        assert!(start <= now);
    }

    #[test]
    fn test_counts_for_busy_week() {
        // Pin "now" to a Saturday evening so the whole week is in scope.
        let now = Local
            .with_ymd_and_hms(2026, 8, 22, 20, 0, 0)
            .single()
            .unwrap();
        let sessions = vec![
            session(1, false, false, now),
            session(5, true, false, now),
            session(24, false, false, now),
            session(48, true, false, now),
            session(72, false, true, now),
            session(96, false, false, now),
            // Previous week, out of scope
            session(24 * 10, true, false, now),
        ];

        let summary = compute_weekly_summary(&sessions, now);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.cardio, 2);
        assert_eq!(summary.flexibility, 1);
        assert_eq!(summary.strength, 3);

        // total >= 5, cardio > 0 and flexibility > 0: no appended clause
        let insight = derive_insight(&summary);
        assert_eq!(insight, "You worked out consistently this week. Good job!");
    }

    #[test]
    fn test_empty_week_insight() {
        let summary = WeeklySummary::default();
        assert_eq!(
            derive_insight(&summary),
            "No workouts this week yet. Time to start!"
        );
    }

    #[test]
    fn test_singular_and_plural_encouragement() {
        let one = WeeklySummary {
            total: 1,
            cardio: 1,
            flexibility: 0,
            strength: 0,
        };
        assert_eq!(derive_insight(&one), "1 workout this week. Let's add more!");

        let two = WeeklySummary {
            total: 2,
            cardio: 1,
            flexibility: 0,
            strength: 1,
        };
        assert_eq!(derive_insight(&two), "2 workouts this week. Let's add more!");
    }

    #[test]
    fn test_cardio_suggestion_takes_priority() {
        // Both appendable conditions hold; only the cardio clause appears.
        let summary = WeeklySummary {
            total: 3,
            cardio: 0,
            flexibility: 0,
            strength: 3,
        };
        let insight = derive_insight(&summary);
        assert!(insight.ends_with("Consider adding some cardio."));
        assert!(!insight.contains("flexibility"));
    }

    #[test]
    fn test_flexibility_suggestion() {
        let summary = WeeklySummary {
            total: 4,
            cardio: 2,
            flexibility: 0,
            strength: 2,
        };
        let insight = derive_insight(&summary);
        assert!(insight.ends_with("Don't forget flexibility work!"));
    }

    #[test]
    fn test_dual_tagged_session_can_push_strength_negative() {
        let now = Local::now();
        let sessions = vec![session(1, true, true, now)];
        let summary = compute_weekly_summary(&sessions, now);
        assert_eq!(summary.strength, -1);
        assert_eq!(summary.strength_display(), 0);
    }
}
