use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Result};
use chesstocsv::{GameExporter, GameReader, ScoreTable, TableExporter, UciEngine};

#[derive(Parser)]
#[command(name = "chesstocsv")]
#[command(about = "Convert chess score tables and PGN archives to CSV training datasets")]
#[command(version = "0.1.0")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a persisted FEN -> centipawn score table (JSON object) to CSV
    Table {
        /// Path to the score table
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Output CSV file (if not specified, uses the table path with a .csv extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Force overwrite existing output file
        #[arg(short, long)]
        force: bool,

        /// Log progress every N records (0 disables progress logging)
        #[arg(long, default_value = "10000")]
        log_interval: usize,
    },

    /// Score every mainline position of a PGN archive with a UCI engine and write CSV rows
    Games {
        /// Path to the PGN archive
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Path to the UCI engine executable
        #[arg(short, long, value_name = "ENGINE")]
        engine: PathBuf,

        /// Search depth per position
        #[arg(short, long, default_value = "8")]
        depth: u32,

        /// Output CSV file (if not specified, uses the archive path with a .csv extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Force overwrite existing output file
        #[arg(short, long)]
        force: bool,

        /// Write raw White-relative centipawn scores instead of normalized
        /// side-to-move-relative scores
        #[arg(long)]
        raw: bool,

        /// Maximum number of games to process (0 = all games)
        #[arg(long, default_value = "0")]
        max_games: usize,
    },
}

fn main() {
    let args = Args::parse();
    let _ = SimpleLogger::init(LevelFilter::Info, Config::default());

    let result = match args.command {
        Command::Table {
            table,
            output,
            force,
            log_interval,
        } => run_table(&table, output, force, log_interval),
        Command::Games {
            archive,
            engine,
            depth,
            output,
            force,
            raw,
            max_games,
        } => run_games(&archive, &engine, depth, output, force, raw, max_games),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run_table(
    table_path: &Path,
    output: Option<PathBuf>,
    force: bool,
    log_interval: usize,
) -> Result<()> {
    let output_path = resolve_output(table_path, output, force)?;

    println!("Converting score table '{}' to CSV...", table_path.display());

    let table = ScoreTable::load(table_path)?;
    println!("Loaded table with {} positions", table.len());

    let exporter = TableExporter::new().with_log_interval(log_interval);
    let written = exporter.export(&table, &output_path)?;

    println!(
        "Successfully wrote {} rows to '{}'",
        written,
        output_path.display()
    );
    Ok(())
}

fn run_games(
    archive: &Path,
    engine_path: &Path,
    depth: u32,
    output: Option<PathBuf>,
    force: bool,
    raw: bool,
    max_games: usize,
) -> Result<()> {
    let output_path = resolve_output(archive, output, force)?;

    println!(
        "Evaluating games from '{}' with engine '{}' (depth {})...",
        archive.display(),
        engine_path.display(),
        depth
    );

    let mut engine = UciEngine::spawn(engine_path)?;
    let mut reader = GameReader::open(archive)?;

    let exporter = GameExporter::new()
        .with_depth(depth)
        .with_raw_scores(raw)
        .with_max_games(max_games);

    let stats = exporter.export(&mut reader, &mut engine, &output_path)?;

    println!(
        "Successfully wrote {} rows from {} games to '{}'",
        stats.rows,
        stats.games,
        output_path.display()
    );
    Ok(())
}

/// Default the output path to the input path with a .csv extension, and
/// refuse to overwrite an existing file unless forced.
fn resolve_output(input: &Path, output: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let output_path = match output {
        Some(path) => path,
        None => {
            let mut path = input.to_path_buf();
            path.set_extension("csv");
            path
        }
    };

    if output_path.exists() && !force {
        bail!(
            "output file '{}' already exists (use --force to overwrite)",
            output_path.display()
        );
    }

    Ok(output_path)
}
