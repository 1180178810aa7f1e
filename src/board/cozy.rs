use cozy_chess::{Board, Color, Move, Piece, Square};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// Mutable game state over a cozy-chess board.
///
/// `make` and `undo` are paired 1:1; the undo stack of prior board states
/// also serves as the known history for repetition detection.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    history: Vec<Board>,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: Board::default(), history: Vec::new() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Board::from_fen(fen, false)
            .map(|board| Self { board, history: Vec::new() })
            .map_err(|e| PositionError::InvalidFen(format!("{e:?}")))
    }

    pub fn board(&self) -> &Board { &self.board }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    /// Position signature covering piece placement, side to move, and
    /// castling/en-passant rights.
    pub fn key(&self) -> u64 { self.board.hash() }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn ply(&self) -> usize { self.history.len() }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|ml| {
            for m in ml { moves.push(m); }
            false
        });
        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|_| { any = true; true });
        any
    }

    /// Applies a legal move in place. Must be balanced by exactly one `undo`.
    pub fn make(&mut self, mv: Move) {
        self.history.push(self.board.clone());
        self.board.play(mv);
    }

    /// Reverts the most recent `make`. A no-op when there is nothing to revert.
    pub fn undo(&mut self) {
        if let Some(prev) = self.history.pop() {
            self.board = prev;
        }
    }

    /// Applies a move given in UCI notation, returning the resolved move.
    pub fn make_uci(&mut self, uci: &str) -> Result<Move, PositionError> {
        let mv = self
            .find_move(uci)
            .ok_or_else(|| PositionError::IllegalMove(uci.to_string()))?;
        self.make(mv);
        Ok(mv)
    }

    pub fn find_move(&self, uci: &str) -> Option<Move> {
        if let Some(m) = self.find_move_exact(uci) {
            return Some(m);
        }
        // Standard castling notation (king moves two files) maps to
        // cozy-chess's king-takes-rook encoding.
        self.castle_alias(uci).and_then(|alias| self.find_move_exact(alias))
    }

    fn find_move_exact(&self, uci: &str) -> Option<Move> {
        let mut found = None;
        self.board.generate_moves(|ml| {
            for m in ml {
                if format!("{}", m) == uci { found = Some(m); break; }
            }
            found.is_some()
        });
        found
    }

    fn castle_alias(&self, uci: &str) -> Option<&'static str> {
        let (home, alias) = match uci {
            "e1g1" => (Square::E1, "e1h1"),
            "e1c1" => (Square::E1, "e1a1"),
            "e8g8" => (Square::E8, "e8h8"),
            "e8c8" => (Square::E8, "e8a8"),
            _ => return None,
        };
        if self.board.piece_on(home) == Some(Piece::King) { Some(alias) } else { None }
    }

    pub fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && !self.has_legal_moves()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_moves()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.board.halfmove_clock() >= 100
    }

    /// Threefold repetition over the history this position has seen.
    pub fn is_repetition_draw(&self) -> bool {
        let current = self.board.hash();
        let prior = self.history.iter().filter(|b| b.hash() == current).count();
        prior >= 2
    }

    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.board.pieces(Piece::Pawn)
            | self.board.pieces(Piece::Rook)
            | self.board.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let minors = self.board.pieces(Piece::Knight) | self.board.pieces(Piece::Bishop);
        minors.into_iter().count() <= 1
    }

    pub fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_fifty_move_draw()
            || self.is_repetition_draw()
            || self.is_insufficient_material()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    /// The piece a move would capture, if any. A king landing on its own
    /// rook encodes castling and is not a capture.
    pub fn captured_piece(&self, mv: Move) -> Option<Piece> {
        if let Some(piece) = self.board.piece_on(mv.to) {
            if self.board.color_on(mv.to) == Some(self.side_to_move()) {
                return None;
            }
            return Some(piece);
        }
        // En passant: a pawn changing file onto an empty square.
        if self.board.piece_on(mv.from) == Some(Piece::Pawn) && mv.from.file() != mv.to.file() {
            return Some(Piece::Pawn);
        }
        None
    }

    pub fn is_capture(&self, mv: Move) -> bool {
        self.captured_piece(mv).is_some()
    }

    /// Whether a move checks the opponent. Probes on a scratch copy; the
    /// position itself is left unchanged.
    pub fn gives_check(&self, mv: Move) -> bool {
        let mut board = self.board.clone();
        board.play(mv);
        !board.checkers().is_empty()
    }

    pub fn render(&self) -> String {
        use cozy_chess::{File, Rank};
        let mut out = String::new();
        for rank in (0..8).rev() {
            out.push_str(&format!("{} ", rank + 1));
            for file in 0..8 {
                let sq = Square::new(File::index(file), Rank::index(rank));
                let ch = match (self.board.piece_on(sq), self.board.color_on(sq)) {
                    (Some(piece), Some(color)) => piece_char(piece, color),
                    _ => '.',
                };
                out.push(ch);
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h");
        out
    }
}

fn piece_char(piece: Piece, color: Color) -> char {
    let ch = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => ch.to_ascii_uppercase(),
        Color::Black => ch,
    }
}
