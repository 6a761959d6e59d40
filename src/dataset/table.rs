use std::path::Path;

use anyhow::{Context, Result};

use crate::score::{normalize_cp, side_to_move, side_to_move_relative};
use crate::table::ScoreTable;

const DEFAULT_LOG_INTERVAL: usize = 10_000;

/// CSV exporter for persisted score tables.
///
/// Each table entry becomes one `(fen, score)` row, with the score
/// normalized to [-1, 1] and flipped to the side-to-move perspective.
pub struct TableExporter {
    log_interval: usize,
}

impl TableExporter {
    pub fn new() -> Self {
        TableExporter {
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }

    /// Log progress every `interval` records (0 disables progress logging).
    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Export the table to `output_path`. Returns the number of rows written,
    /// which always equals the number of table entries.
    pub fn export(&self, table: &ScoreTable, output_path: &Path) -> Result<usize> {
        let mut writer = csv::Writer::from_path(output_path).with_context(|| {
            format!("failed to create output file: {}", output_path.display())
        })?;

        let total = table.len();
        let mut written = 0;

        for (fen, raw) in table.iter() {
            let turn = side_to_move(fen)?;
            let score = side_to_move_relative(normalize_cp(raw), turn).to_string();
            writer.write_record([fen, score.as_str()])?;
            written += 1;

            if self.log_interval > 0 && written % self.log_interval == 0 {
                log::info!("Parsed {}/{} positions", written, total);
            }
        }

        writer.flush()?;
        Ok(written)
    }
}

impl Default for TableExporter {
    fn default() -> Self {
        Self::new()
    }
}
