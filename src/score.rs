use anyhow::{bail, Context, Result};
use shakmaty::Color;

/// Sentinel magnitude substituted for forced-mate evaluations, which have no
/// finite centipawn value. Raw centipawn scores are clamped to the same range.
pub const MATE_SCORE: i32 = 10_000;

/// Linearly rescale a raw centipawn score from [-5000, 5000] into [-1, 1],
/// saturating outside that range.
pub fn normalize_cp(x: i32) -> f64 {
    const MAX: f64 = 5000.0;
    const MIN: f64 = -5000.0;
    (2.0 * (x as f64 - MIN) / (MAX - MIN) - 1.0).clamp(-1.0, 1.0)
}

/// Extract the side to move from the second field of a FEN string.
pub fn side_to_move(fen: &str) -> Result<Color> {
    let field = fen
        .split_whitespace()
        .nth(1)
        .with_context(|| format!("FEN is missing a side-to-move field: {}", fen))?;
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => bail!("invalid side-to-move field '{}' in FEN: {}", other, fen),
    }
}

/// Convert a White-relative score into a side-to-move-relative score.
pub fn side_to_move_relative(white_pov: f64, turn: Color) -> f64 {
    match turn {
        Color::White => white_pov,
        Color::Black => -white_pov,
    }
}
