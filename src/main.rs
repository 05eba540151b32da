use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trilha::app::state::AppState;
use trilha::engine::{sequencer, view};
use trilha::lesson::catalog::{self, LessonLibrary, LessonSummary};
use trilha::lesson::model::LessonDocument;
use trilha::progress::ProgressStore;
use trilha::{App, Config};

#[derive(Parser)]
#[command(name = "trilha")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Lesson to open (defaults to the first available lesson)
    lesson: Option<String>,

    /// Directory holding catalog.json and lesson documents
    #[arg(short = 'd', long)]
    lessons: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List lessons in the catalog
    List,
    /// Show progress for a lesson
    Progress {
        /// Lesson id
        lesson: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trilha=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.lessons {
        config.lessons_dir = Some(dir);
    }
    let lessons_dir = config.lessons_dir()?;

    match cli.command {
        Some(Commands::List) => list_lessons(&lessons_dir),
        Some(Commands::Progress { lesson }) => show_progress(&lessons_dir, &lesson),
        None => play(config, &lessons_dir, cli.lesson),
    }
}

/// Open the library, tolerating a missing catalog for single-document dirs
fn open_library(dir: &Path) -> Result<LessonLibrary> {
    if dir.join("catalog.json").exists() {
        LessonLibrary::open(dir)
    } else {
        Ok(LessonLibrary::without_catalog(dir))
    }
}

fn list_lessons(dir: &Path) -> Result<()> {
    let library = LessonLibrary::open(dir)?;
    let now = catalog::unix_now();

    for module in &library.catalog().modules {
        println!("{}", module.title);
        for lesson in &module.lessons {
            let marker = if catalog::is_available(lesson, now) { " " } else { "🔒" };
            let duration = lesson.duration.as_deref().unwrap_or("--:--");
            println!("  {marker} {:<24} {:>8}  {}", lesson.id, duration, lesson.title);
        }
    }
    Ok(())
}

fn show_progress(dir: &Path, lesson_id: &str) -> Result<()> {
    let library = open_library(dir)?;
    let doc = library.load_document(lesson_id)?;
    let store = ProgressStore::open(lesson_id)?;

    let order = sequencer::flatten(&doc);
    let total = view::total_activities(&doc, &order);
    let snapshot = store.snapshot(total, doc.points_per_section());

    println!("{lesson_id}");
    println!(
        "  {} of {} activities ({:.0}%)",
        snapshot.completed_count, total, snapshot.progress_percentage
    );
    println!("  {} points", snapshot.points);

    let specs = doc.badge_specs();
    for key in store.badges() {
        match specs.get(&key) {
            Some(spec) => println!("  {} {}", spec.icon, spec.label),
            None => println!("  {key}"),
        }
    }
    Ok(())
}

fn play(config: Config, dir: &Path, lesson: Option<String>) -> Result<()> {
    let library = open_library(dir)?;

    let lesson_id = match lesson {
        Some(id) => id,
        None => {
            let now = catalog::unix_now();
            match library
                .catalog()
                .lessons()
                .find(|l| catalog::is_available(l, now))
            {
                Some(lesson) => lesson.id.clone(),
                None => bail!(
                    "No available lessons in {:?}. Pass a lesson id or add a catalog.json.",
                    dir
                ),
            }
        }
    };

    let summary = library.catalog().find_lesson(&lesson_id).cloned();
    let locked = summary
        .as_ref()
        .filter(|s| !catalog::is_available(s, catalog::unix_now()))
        .map(lock_message);

    let state = match &locked {
        Some(message) => {
            let mut state = AppState::new(lesson_id.as_str(), LessonDocument::default());
            state.locked = Some(message.clone());
            state
        }
        None => AppState::new(lesson_id.as_str(), library.load_document(&lesson_id)?),
    };

    let store = ProgressStore::open(lesson_id.as_str())?;
    App::new(config, library, store, state)?.run()
}

/// Message shown instead of locked content
fn lock_message(summary: &LessonSummary) -> String {
    match summary.release_at {
        Some(release_at) => {
            let diff = release_at - catalog::unix_now();
            if diff > 0 {
                let days = diff / 86_400;
                let hours = (diff % 86_400) / 3_600;
                format!(
                    "\n\n🔒 \"{}\" is locked.\n\nIt unlocks in about {}d {}h. Press q to leave.",
                    summary.title, days, hours
                )
            } else {
                format!("\n\n🔒 \"{}\" is locked. Press q to leave.", summary.title)
            }
        }
        None => format!(
            "\n\n🔒 \"{}\" is for enrolled students only. Press q to leave.",
            summary.title
        ),
    }
}
