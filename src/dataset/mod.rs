pub mod games;
pub mod table;

pub use games::{GameExporter, GameStats};
pub use table::TableExporter;
