use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use fitlog_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Workout logging and recommendation tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout from free-form notes
    Log {
        /// Workout notes (analyzed for muscle groups and tags)
        notes: Option<String>,

        /// Perceived intensity, 1-5
        #[arg(long, default_value_t = 3)]
        intensity: i32,

        /// Workout duration in seconds
        #[arg(long, default_value_t = 0)]
        duration: u32,

        /// Backdate the session (RFC 3339, must not be in the future)
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },

    /// List recent workouts
    List {
        /// How many entries to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the muscle heatmap
    Heatmap {
        /// Read the advisory cache instead of recomputing from history
        #[arg(long)]
        cached: bool,
    },

    /// Show this week's summary and insight
    Summary,

    /// Recommend the next workout
    Recommend {
        /// Energy level, 0-100 (out-of-range values are clamped)
        #[arg(long, default_value_t = 50)]
        energy: i64,

        /// Rest level, 0-100 (out-of-range values are clamped)
        #[arg(long, default_value_t = 50)]
        rest: i64,

        /// Pick a random alternative to the named template
        #[arg(long)]
        another: Option<String>,

        /// Include advice based on the last matching session
        #[arg(long)]
        advise: bool,
    },

    /// Edit a session's date or notes
    Edit {
        id: Uuid,

        #[arg(long)]
        date: Option<DateTime<Utc>>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a session
    Delete { id: Uuid },

    /// Export full history to CSV
    Export {
        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },
}

struct Paths {
    sessions: PathBuf,
    cache: PathBuf,
}

fn main() -> Result<()> {
    fitlog_core::logging::init("warn");

    let cli = Cli::parse();
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths {
        sessions: data_dir.join("sessions.jsonl"),
        cache: data_dir.join("heatmap_cache.json"),
    };
    let store = SessionStore::new(&paths.sessions);

    match cli.command {
        Commands::Log {
            notes,
            intensity,
            duration,
            date,
        } => cmd_log(&store, &paths, notes, intensity, duration, date),
        Commands::List { limit } => cmd_list(&store, &config, limit),
        Commands::Heatmap { cached } => cmd_heatmap(&store, &config, &paths, cached),
        Commands::Summary => cmd_summary(&store, &config),
        Commands::Recommend {
            energy,
            rest,
            another,
            advise,
        } => cmd_recommend(&store, &config, energy, rest, another, advise),
        Commands::Edit { id, date, notes } => cmd_edit(&store, id, date, notes),
        Commands::Delete { id } => cmd_delete(&store, id),
        Commands::Export { out } => cmd_export(&store, &out),
    }
}

fn cmd_log(
    store: &SessionStore,
    paths: &Paths,
    notes: Option<String>,
    intensity: i32,
    duration: u32,
    date: Option<DateTime<Utc>>,
) -> Result<()> {
    let notes = notes.unwrap_or_default();
    if notes.trim().is_empty() && duration == 0 {
        return Err(Error::Store(
            "Record a duration or add notes first".to_string(),
        ));
    }

    let analysis = if notes.trim().is_empty() {
        AnalysisResult::fallback(&format!("{} min workout", duration / 60))
    } else {
        analyze_notes(&notes)
    };

    let raw_text = if notes.trim().is_empty() {
        format!("{} min workout", duration / 60)
    } else {
        notes
    };

    let now = Utc::now();
    let session = store.insert(
        NewSession {
            created_at: date,
            raw_text,
            summary: analysis.summary.clone(),
            muscles_hit: analysis.muscles.clone(),
            exertion_score: analysis.exertion_score,
            intensity_score: intensity.clamp(1, 5),
            cardio_detected: analysis.cardio_detected,
            flexibility_detected: analysis.flexibility_detected,
            duration_seconds: duration,
        },
        now,
    )?;

    // Advisory cache update is best-effort; the heatmap recomputes from
    // history when it is missing.
    let mut cache = HeatmapCache::load(&paths.cache);
    cache.accumulate(&session, now);
    if let Err(e) = cache.save(&paths.cache) {
        tracing::warn!("Heatmap cache update failed: {}", e);
    }

    println!("Logged: {}", session.summary);
    if !session.muscles_hit.is_empty() {
        println!("  Muscles: {}", session.muscle_keys().join(", "));
    }
    let mut tags = Vec::new();
    if session.cardio_detected {
        tags.push("cardio");
    }
    if session.flexibility_detected {
        tags.push("flexibility");
    }
    if !tags.is_empty() {
        println!("  Tags: {}", tags.join(", "));
    }
    println!("  Id: {}", session.id);
    Ok(())
}

fn cmd_list(store: &SessionStore, config: &Config, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(config.display.list_items);
    let sessions = store.recent(limit)?;

    if sessions.is_empty() {
        println!("No workouts logged yet. Start recording!");
        return Ok(());
    }

    for session in &sessions {
        let local = session.created_at.with_timezone(&Local);
        let keys = session.muscle_keys();
        let title = if keys.is_empty() {
            "Workout".to_string()
        } else {
            keys.iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(" & ")
        };

        let mut tags = String::new();
        if session.cardio_detected {
            tags.push_str(" [cardio]");
        }
        if session.flexibility_detected {
            tags.push_str(" [flexibility]");
        }

        println!(
            "{}  {}: {}{}",
            session.id,
            local.format("%a %b %e, %l:%M %p"),
            title,
            tags
        );
    }
    Ok(())
}

fn cmd_heatmap(
    store: &SessionStore,
    config: &Config,
    paths: &Paths,
    cached: bool,
) -> Result<()> {
    let now = Utc::now();

    let scores = if cached {
        let cache = HeatmapCache::load(&paths.cache);
        if cache.is_empty() {
            // Advisory cache unavailable: fall back to local recomputation
            let sessions = store.recent(config.display.recent_limit)?;
            compute_heatmap(&sessions, now)
        } else {
            cache.snapshot(now)
        }
    } else {
        let sessions = store.recent(config.display.recent_limit)?;
        compute_heatmap(&sessions, now)
    };

    let levels = heat_levels(&scores);
    if levels.is_empty() {
        println!("No heat in the last 30 days.");
        return Ok(());
    }

    let mut rows: Vec<_> = levels.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (muscle, level) in rows {
        println!("{:<12} {}", muscle, level.as_str());
    }
    Ok(())
}

fn cmd_summary(store: &SessionStore, config: &Config) -> Result<()> {
    let sessions = store.recent(config.display.recent_limit)?;
    let summary = compute_weekly_summary(&sessions, Local::now());

    println!("This week:");
    println!("  Strength:    {}", summary.strength_display());
    println!("  Cardio:      {}", summary.cardio);
    println!("  Flexibility: {}", summary.flexibility);
    println!();
    println!("{}", derive_insight(&summary));
    Ok(())
}

fn cmd_recommend(
    store: &SessionStore,
    config: &Config,
    energy: i64,
    rest: i64,
    another: Option<String>,
    advise: bool,
) -> Result<()> {
    let history = store.recent(config.display.recent_limit)?;
    let catalog = get_default_catalog();

    let recommendation = match another {
        Some(current) => resample(catalog, &current, &mut rand::thread_rng())?,
        None => recommend(catalog, clamp_level(energy), clamp_level(rest), &history)?,
    };

    println!("{}", recommendation.template.name);
    println!("  {}", recommendation.reason);
    println!();
    for exercise in &recommendation.template.exercises {
        println!("  - {}", exercise);
    }

    if advise {
        let advice = advise_for(&recommendation.template.category, &history, Utc::now());
        println!();
        println!("{}", advice);
    }
    Ok(())
}

fn cmd_edit(
    store: &SessionStore,
    id: Uuid,
    date: Option<DateTime<Utc>>,
    notes: Option<String>,
) -> Result<()> {
    if date.is_none() && notes.is_none() {
        return Err(Error::Store("Nothing to edit: pass --date or --notes".to_string()));
    }

    let updated = store.update(
        id,
        SessionEdit {
            created_at: date,
            raw_text: notes,
        },
        Utc::now(),
    )?;
    println!("Updated session {}", updated.id);
    Ok(())
}

fn cmd_delete(store: &SessionStore, id: Uuid) -> Result<()> {
    store.delete(id)?;
    println!("Deleted session {}", id);
    Ok(())
}

fn cmd_export(store: &SessionStore, out: &PathBuf) -> Result<()> {
    let sessions = store.recent(usize::MAX)?;
    let count = export_sessions_csv(&sessions, out)?;
    println!("Exported {} sessions to {}", count, out.display());
    Ok(())
}
