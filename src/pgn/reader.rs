use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use pgn_reader::{BufferedReader, SanPlus, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::{Chess, Color, EnPassantMode, Position};

/// A mainline position to be scored: the FEN reached after a move, plus
/// whose turn it is in that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalPosition {
    pub fen: String,
    pub turn: Color,
}

/// Replays a game's main line on a board and records the position after
/// every move. Variations are skipped; an unparseable SAN poisons the game.
struct MainlineVisitor {
    board: Chess,
    positions: Vec<EvalPosition>,
    error: Option<String>,
}

impl MainlineVisitor {
    fn new() -> Self {
        MainlineVisitor {
            board: Chess::default(),
            positions: Vec::new(),
            error: None,
        }
    }
}

impl Visitor for MainlineVisitor {
    type Result = Result<Vec<EvalPosition>, String>;

    fn begin_game(&mut self) {
        self.board = Chess::default();
        self.positions.clear();
        self.error = None;
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.error.is_some() {
            return;
        }
        match san_plus.san.to_move(&self.board) {
            Ok(mv) => {
                self.board.play_unchecked(&mv);
                let fen = Fen(self.board.clone().into_setup(EnPassantMode::Legal)).to_string();
                self.positions.push(EvalPosition {
                    fen,
                    turn: self.board.turn(),
                });
            }
            Err(err) => {
                self.error = Some(format!("move {} does not apply: {}", san_plus, err));
            }
        }
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true) // mainline only
    }

    fn end_game(&mut self) -> Self::Result {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(std::mem::take(&mut self.positions)),
        }
    }
}

/// Lazy, forward-only reader over a PGN archive. Games are parsed one at a
/// time; the archive is never loaded into memory as a whole.
pub struct GameReader<R> {
    inner: BufferedReader<R>,
    visitor: MainlineVisitor,
}

impl GameReader<BufReader<File>> {
    /// Open a PGN archive on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("PGN archive not found: {}", path.display()))?;
        Ok(GameReader::new(BufReader::new(file)))
    }
}

impl<R: Read> GameReader<R> {
    pub fn new(read: R) -> Self {
        GameReader {
            inner: BufferedReader::new(read),
            visitor: MainlineVisitor::new(),
        }
    }

    /// The next game's mainline positions, or `None` once the archive is
    /// exhausted.
    pub fn next_game(&mut self) -> Result<Option<Vec<EvalPosition>>> {
        match self.inner.read_game(&mut self.visitor)? {
            None => Ok(None),
            Some(Ok(positions)) => Ok(Some(positions)),
            Some(Err(err)) => Err(anyhow!("malformed game record: {}", err)),
        }
    }
}
