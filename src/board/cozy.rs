use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
    Board as CozyBoard, Color, File, GameStatus, Move, Piece, Square,
};

use crate::board::{opponent, GameBoard, Undo};
use crate::error::EngineError;

/// Reversible cozy-chess board. `cozy_chess::Board` has no undo, so every
/// `make` and null move pushes the prior board onto a history stack.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<(Undo, CozyBoard)>,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), history: Vec::with_capacity(16) }
    }

    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        CozyBoard::from_fen(fen, false)
            .map(|b| Self { board: b, history: Vec::with_capacity(16) })
            .map_err(|e| EngineError::Fen { fen: fen.to_string(), reason: format!("{e:?}") })
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// Finds the legal move whose UCI text is `mv_uci`. Castling is accepted
    /// in standard form (`e1g1`).
    pub fn find_move(&self, mv_uci: &str) -> Option<Move> {
        let mut found = None;
        self.board.generate_moves(|moves| {
            for m in moves {
                if uci_move(&self.board, m) == mv_uci { found = Some(m); break; }
            }
            found.is_some()
        });
        found
    }

    /// Plays a move given as UCI text. Not undoable: the history is cleared.
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), EngineError> {
        let m = self.find_move(mv_uci).ok_or_else(|| EngineError::IllegalMove(mv_uci.to_string()))?;
        self.play(m);
        Ok(())
    }

    /// Plays a legal move for good, outside any search.
    pub fn play(&mut self, mv: Move) {
        self.board.play(mv);
        self.history.clear();
    }

    pub fn legal_moves_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|moves| { ct += moves.len(); false });
        ct
    }

    /// Ongoing, won (side to move is mated) or drawn (stalemate, fifty moves).
    pub fn status(&self) -> GameStatus { self.board.status() }

    /// Number of unmatched `make`/skip calls.
    pub fn pending_undos(&self) -> usize { self.history.len() }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, EngineError> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    pub fn set_from_fen_and_moves(fen: &str, moves: &[String]) -> Result<Self, EngineError> {
        let mut pos = Self::from_fen(fen)?;
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }
}

impl Position {
    fn restore(&mut self, kind: Undo) {
        let popped = self.history.pop();
        debug_assert!(popped.is_some(), "undo with empty history");
        if let Some((recorded, prev)) = popped {
            debug_assert_eq!(recorded, kind, "undo out of order");
            self.board = prev;
        }
    }
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

/// True if any piece of `by` attacks `sq`.
pub fn attacked_by(board: &CozyBoard, sq: Square, by: Color) -> bool {
    let occ = board.occupied();
    let theirs = |p: Piece| board.colors(by) & board.pieces(p);
    let diag = theirs(Piece::Bishop) | theirs(Piece::Queen);
    let line = theirs(Piece::Rook) | theirs(Piece::Queen);
    // pawns of `by` attack `sq` from where a pawn of the other color on `sq` would capture
    !(get_pawn_attacks(sq, opponent(by)) & theirs(Piece::Pawn)).is_empty()
        || !(get_knight_moves(sq) & theirs(Piece::Knight)).is_empty()
        || !(get_king_moves(sq) & theirs(Piece::King)).is_empty()
        || !(get_bishop_moves(sq, occ) & diag).is_empty()
        || !(get_rook_moves(sq, occ) & line).is_empty()
}

/// UCI text for a legal move. cozy-chess encodes castling as king-takes-rook;
/// this maps it back to the king's destination square.
pub fn uci_move(board: &CozyBoard, mut mv: Move) -> String {
    if board.piece_on(mv.from) == Some(Piece::King) && board.colors(board.side_to_move()).has(mv.to) {
        let file = if (mv.to.file() as usize) > (mv.from.file() as usize) { File::G } else { File::C };
        mv.to = Square::new(file, mv.from.rank());
    }
    format!("{}", mv)
}

impl GameBoard for Position {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.board.generate_moves(|moves| { out.extend(moves); false });
        out
    }

    fn make(&mut self, mv: Move) {
        self.history.push((Undo::Move, self.board.clone()));
        self.board.play(mv);
    }

    fn unmake(&mut self) {
        self.restore(Undo::Move);
    }

    fn try_skip_turn(&mut self) -> bool {
        match self.board.null_move() {
            Some(next) => {
                let prev = std::mem::replace(&mut self.board, next);
                self.history.push((Undo::Null, prev));
                true
            }
            None => false,
        }
    }

    fn undo_skip_turn(&mut self) { self.restore(Undo::Null); }

    fn is_checkmate(&self) -> bool { self.board.status() == GameStatus::Won }

    fn is_square_attacked_by_opponent(&self, sq: Square) -> bool {
        attacked_by(&self.board, sq, opponent(self.board.side_to_move()))
    }

    fn piece_count(&self, piece: Piece, color: Color) -> u32 {
        (self.board.colors(color) & self.board.pieces(piece)).len()
    }

    fn side_to_move(&self) -> Color { self.board.side_to_move() }

    fn fen(&self) -> String { format!("{}", self.board) }

    fn move_to_uci(&self, mv: Move) -> String { uci_move(&self.board, mv) }
}
