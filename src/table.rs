use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

/// A persisted FEN -> centipawn-score mapping, read wholesale into memory.
///
/// Stored on disk as a single JSON object: `{"<fen>": <score>, ...}`.
/// Scores are signed centipawns from White's perspective, with mate lines
/// already clamped to the ±10000 sentinel.
pub struct ScoreTable {
    scores: BTreeMap<String, i32>,
}

impl ScoreTable {
    /// Load a score table from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("score table not found: {}", path.display()))?;
        let scores = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse score table: {}", path.display()))?;
        Ok(ScoreTable { scores })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Entries in sorted key order, so repeated exports of the same table
    /// produce byte-identical output.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.scores.iter().map(|(fen, &score)| (fen.as_str(), score))
    }
}
