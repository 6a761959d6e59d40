use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::pgn::GameReader;
use crate::score::{normalize_cp, side_to_move_relative};
use crate::uci::Evaluator;

const DEFAULT_DEPTH: u32 = 8;

/// Counters reported by a completed export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStats {
    pub games: usize,
    pub rows: usize,
}

/// CSV exporter for PGN game archives.
///
/// Every mainline position of every game is scored by the evaluator and
/// written as one `(fen, score)` row. By default scores are normalized to
/// [-1, 1] and flipped to the side-to-move perspective; `with_raw_scores`
/// writes the raw White-relative centipawn integer instead.
pub struct GameExporter {
    depth: u32,
    raw_scores: bool,
    max_games: Option<usize>,
    progress: bool,
}

impl GameExporter {
    pub fn new() -> Self {
        GameExporter {
            depth: DEFAULT_DEPTH,
            raw_scores: false,
            max_games: None,
            progress: true,
        }
    }

    /// Search depth per position.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Write raw White-relative centipawn scores instead of normalized
    /// side-to-move-relative scores.
    pub fn with_raw_scores(mut self, raw: bool) -> Self {
        self.raw_scores = raw;
        self
    }

    /// Stop after this many games (0 = all games).
    pub fn with_max_games(mut self, max: usize) -> Self {
        self.max_games = if max > 0 { Some(max) } else { None };
        self
    }

    /// Show a progress spinner while exporting.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Drive `reader` to exhaustion (or the game limit), scoring every
    /// mainline position with `evaluator` and appending rows to a single
    /// output file.
    pub fn export<R: Read, E: Evaluator>(
        &self,
        reader: &mut GameReader<R>,
        evaluator: &mut E,
        output_path: &Path,
    ) -> Result<GameStats> {
        let mut writer = csv::Writer::from_path(output_path).with_context(|| {
            format!("failed to create output file: {}", output_path.display())
        })?;

        let bar = if self.progress {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} games {pos} • {elapsed_precise} {msg}")
                    .unwrap(),
            );
            Some(bar)
        } else {
            None
        };

        let mut stats = GameStats { games: 0, rows: 0 };

        while let Some(positions) = reader.next_game()? {
            for position in &positions {
                let score = evaluator.evaluate(&position.fen, self.depth)?;
                let white_cp = score.white_relative(position.turn);
                let field = if self.raw_scores {
                    white_cp.to_string()
                } else {
                    side_to_move_relative(normalize_cp(white_cp), position.turn).to_string()
                };
                writer.write_record([position.fen.as_str(), field.as_str()])?;
                stats.rows += 1;
            }

            stats.games += 1;

            if let Some(bar) = &bar {
                bar.inc(1);
                bar.set_message(format!("{} positions", stats.rows));
            }

            if let Some(limit) = self.max_games {
                if stats.games >= limit {
                    break;
                }
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        writer.flush()?;
        Ok(stats)
    }
}

impl Default for GameExporter {
    fn default() -> Self {
        Self::new()
    }
}
