//! Grid skirmish command line runner.
//!
//! # Usage
//!
//! ```bash
//! # Fight a map with default rules
//! skirmish run --map maps/opening.txt --show-board
//!
//! # Override Elf attack power and emit JSON
//! skirmish run --map maps/opening.txt --elf-power 15 --json
//!
//! # Search for the weakest flawless Elf attack power
//! skirmish tune --map maps/opening.txt
//!
//! # Check that repeated runs end in the same state
//! skirmish verify --map maps/opening.txt --runs 10
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skirmish_headless::{run_battle, tune, verify, BattleOptions, ReportError};

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Deterministic Elves vs Goblins grid combat")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fight one battle to the end
    Run {
        /// Map file to load
        #[arg(short, long)]
        map: PathBuf,

        /// RON file with combat rules
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override Elf attack power
        #[arg(long)]
        elf_power: Option<i32>,

        /// Fail after this many full rounds
        #[arg(long)]
        max_rounds: Option<u32>,

        /// Print the final board with hit points
        #[arg(long)]
        show_board: bool,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Find the weakest Elf attack power that wins without losses
    Tune {
        /// Map file to load
        #[arg(short, long)]
        map: PathBuf,

        /// RON file with combat rules
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Verify determinism by running the same map multiple times
    Verify {
        /// Map file to load
        #[arg(short, long)]
        map: PathBuf,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr, reports to stdout
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let result = match cli.command {
        Commands::Run {
            map,
            config,
            elf_power,
            max_rounds,
            show_board,
            json,
        } => cmd_run(
            &BattleOptions {
                map,
                config,
                elf_power,
                max_rounds,
            },
            show_board,
            json,
        ),
        Commands::Tune { map, config, json } => cmd_tune(
            &BattleOptions {
                config,
                ..BattleOptions::new(map)
            },
            json,
        ),
        Commands::Verify { map, runs } => cmd_verify(&BattleOptions::new(map), runs),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

/// Run a single battle
fn cmd_run(options: &BattleOptions, show_board: bool, json: bool) -> Result<(), ReportError> {
    let report = run_battle(options)?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render_text(show_board));
    }
    Ok(())
}

/// Search for the flawless Elf attack power
fn cmd_tune(options: &BattleOptions, json: bool) -> Result<(), ReportError> {
    let report = tune(options)?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render_text(true));
    }
    Ok(())
}

/// Run the same map repeatedly and compare final hashes
fn cmd_verify(options: &BattleOptions, runs: u32) -> Result<(), ReportError> {
    tracing::info!(map = %options.map.display(), runs, "Verifying determinism");

    let report = verify(options, runs)?;

    println!("Determinism verified: {} runs", report.hashes.len());
    if let Some(hash) = report.hashes.first() {
        println!("Final hash: {hash:016x}");
    }
    if let Some(score) = report.scores.first() {
        println!("Outcome: {score}");
    }
    Ok(())
}
