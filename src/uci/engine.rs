use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use shakmaty::Color;

use crate::score::MATE_SCORE;

/// An evaluation as reported by the engine, relative to the side to move
/// (the UCI convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawns.
    Cp(i32),
    /// Moves until forced mate; non-positive means the side to move is mated.
    Mate(i32),
}

impl Score {
    /// Convert to a White-relative centipawn value. Mate lines collapse to
    /// the ±MATE_SCORE sentinel and centipawn values are clamped to the same
    /// range.
    pub fn white_relative(self, turn: Color) -> i32 {
        let pov = match self {
            Score::Cp(cp) => cp.clamp(-MATE_SCORE, MATE_SCORE),
            Score::Mate(moves) if moves > 0 => MATE_SCORE,
            Score::Mate(_) => -MATE_SCORE,
        };
        match turn {
            Color::White => pov,
            Color::Black => -pov,
        }
    }
}

/// Anything that can score a position to a fixed search depth. The game
/// pipeline is written against this seam so tests can drive it with a stub.
pub trait Evaluator {
    fn evaluate(&mut self, fen: &str, depth: u32) -> Result<Score>;
}

/// A spawned UCI engine process.
///
/// The process is started once, handshaken with `uci`/`isready`, and driven
/// synchronously: each `evaluate` call blocks until the engine prints
/// `bestmove`. Dropping the handle sends `quit` and reaps the child, so the
/// engine is released on every exit path, error cases included.
pub struct UciEngine {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl UciEngine {
    /// Spawn the engine at `engine_path` and complete the UCI handshake.
    pub fn spawn<P: AsRef<Path>>(engine_path: P) -> Result<Self> {
        let path = engine_path.as_ref();
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start engine: {}", path.display()))?;

        let stdin = BufWriter::new(
            child
                .stdin
                .take()
                .context("failed to get stdin handle for engine process")?,
        );
        let stdout = BufReader::new(
            child
                .stdout
                .take()
                .context("failed to get stdout handle for engine process")?,
        );

        let mut engine = UciEngine {
            child,
            stdin,
            stdout,
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;

        Ok(engine)
    }

    fn send(&mut self, command: &str) -> Result<()> {
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn wait_for(&mut self, token: &str) -> Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                bail!("engine closed its output while waiting for '{}'", token);
            }
            if line.trim() == token {
                return Ok(());
            }
        }
    }
}

impl Evaluator for UciEngine {
    fn evaluate(&mut self, fen: &str, depth: u32) -> Result<Score> {
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!("go depth {}", depth))?;
        read_search_score(&mut self.stdout, fen)
    }
}

/// Drain engine output until `bestmove`, keeping the score of the last
/// `info` line seen. A `bestmove` with no preceding score is an error, as is
/// the engine closing its output mid-search.
fn read_search_score<R: BufRead>(output: &mut R, fen: &str) -> Result<Score> {
    let mut last_score = None;
    let mut line = String::new();
    loop {
        line.clear();
        if output.read_line(&mut line)? == 0 {
            bail!("engine closed its output during search");
        }
        let line = line.trim();
        if line.starts_with("info") {
            if let Some(score) = parse_info_score(line) {
                last_score = Some(score);
            }
        } else if line.starts_with("bestmove") {
            break;
        }
    }

    last_score.with_context(|| format!("engine returned no score for position: {}", fen))
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.wait();
    }
}

/// Extract the `score cp N` or `score mate N` pair from a UCI `info` line.
fn parse_info_score(line: &str) -> Option<Score> {
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if token != "score" {
            continue;
        }
        let kind = tokens.next()?;
        let value = tokens.next()?.parse().ok()?;
        return match kind {
            "cp" => Some(Score::Cp(value)),
            "mate" => Some(Score::Mate(value)),
            _ => None,
        };
    }
    None
}
