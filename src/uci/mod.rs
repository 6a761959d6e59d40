pub mod engine;

pub use engine::{Evaluator, Score, UciEngine};
