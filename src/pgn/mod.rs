pub mod reader;

pub use reader::{EvalPosition, GameReader};
