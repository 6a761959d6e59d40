//! Chess dataset converter library
//!
//! Reads chess training data in two on-disk formats (persisted FEN score
//! tables and PGN game archives) and converts them to two-column CSV
//! datasets of `(fen, score)` rows.

pub mod dataset;
pub mod pgn;
pub mod score;
pub mod table;
pub mod uci;

pub use dataset::{GameExporter, GameStats, TableExporter};
pub use pgn::{EvalPosition, GameReader};
pub use table::ScoreTable;
pub use uci::{Evaluator, Score, UciEngine};
