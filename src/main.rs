//! Word Game - vocabulary learning TUI
//!
//! Flip through a unit's word cards, then take a generated listening and
//! matching quiz to earn stars. Progress is kept on this device.

mod catalog;
mod config;
mod models;
mod progress;
mod quiz;
mod session;
mod speech;
mod telemetry;
mod ui;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use tracing::{error, info};

use catalog::Catalog;
use config::Config;
use progress::{FileStore, KeyValueStore, MemoryStore, ProgressStore};
use ui::App;

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "wordgame")]
#[command(author, version, about = "Vocabulary cards and quizzes in the terminal", long_about = None)]
struct Args {
    /// Word catalog JSON file (defaults to the bundled catalog)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// File holding learner progress
    #[arg(short, long)]
    progress_file: Option<PathBuf>,

    /// Log file location
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Open this unit's word cards directly
    #[arg(short, long)]
    unit: Option<String>,

    /// Print units with progress and exit
    #[arg(short, long)]
    list: bool,

    /// Clear all saved progress and exit
    #[arg(long)]
    reset: bool,

    /// Seed for reproducible quizzes
    #[arg(long)]
    seed: Option<u64>,

    /// Practice without saving progress
    #[arg(short, long)]
    guest: bool,
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(telemetry::default_log_path);
    telemetry::init_tracing(&log_path)?;

    let catalog = match args.catalog {
        Some(ref path) => Catalog::load(path)?,
        None => Catalog::bundled()?,
    };

    if args.guest {
        info!("Guest session, progress will not be saved");
        return launch(&args, catalog, ProgressStore::new(MemoryStore::default()));
    }

    let progress_path = args.progress_file.clone().unwrap_or_else(FileStore::default_path);
    let progress = ProgressStore::new(FileStore::new(progress_path)?);

    if args.reset {
        progress.reset_all()?;
        println!("✓ Progress cleared");
        return Ok(());
    }

    if args.list {
        print_units(&catalog, &progress);
        return Ok(());
    }

    launch(&args, catalog, progress)
}

fn launch<S: KeyValueStore>(args: &Args, catalog: Catalog, progress: ProgressStore<S>) -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        error!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    let speaker = speech::speaker_for(config.speech.enabled, config.speech.command.as_deref());
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut app = App::new(catalog, progress, speaker, config, rng);
    if let Some(unit_id) = args.unit.as_deref() {
        app.open_unit(unit_id);
    }

    info!("Starting TUI");
    run_tui(app)
}

fn print_units<S: KeyValueStore>(catalog: &Catalog, progress: &ProgressStore<S>) {
    let (stars, learned) = progress.totals();
    println!("{} ({} stars, {} words learned)", catalog.name, stars, learned);

    for (module, unit) in catalog.all_units() {
        let unit_progress = progress.unit_progress(&unit.id);
        println!(
            "  {:<18} {} · {}  [{} words, {}% learned, {} stars]",
            unit.id,
            module.name,
            unit.name,
            unit.words.len(),
            progress.learned_percentage(&unit.id, unit.words.len()),
            unit_progress.stars,
        );
    }
}

fn run_tui<S: KeyValueStore>(mut app: App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    app.speaker.stop();

    // Handle any errors
    if let Err(err) = result {
        error!(error = %err, "TUI exited with error");
        eprintln!("Error: {}", err);
        return Err(err);
    }

    info!("Exiting");
    Ok(())
}

fn run_app<B: Backend, S: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}
