#![cfg(feature = "board-pleco")]
use cozy_chess::{Color, Piece, Square};
use pleco::{BitMove, Board as PlecoBoard, PieceType, Player, SQ};

use crate::board::{GameBoard, Undo};
use crate::error::EngineError;

/// Pleco board with native make/unmake. The stack records what each undo
/// must revert so moves and null moves cannot be unwound out of order.
pub struct RevBoard {
    board: PlecoBoard,
    stack: Vec<Undo>,
}

impl RevBoard {
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        PlecoBoard::from_fen(fen)
            .map(|b| Self { board: b, stack: Vec::with_capacity(128) })
            .map_err(|e| EngineError::Fen { fen: fen.to_string(), reason: format!("{e:?}") })
    }
    pub fn startpos() -> Self { Self { board: PlecoBoard::start_pos(), stack: Vec::with_capacity(128) } }
    pub fn inner(&self) -> &PlecoBoard { &self.board }
}

fn player(color: Color) -> Player {
    match color { Color::White => Player::White, Color::Black => Player::Black }
}

fn piece_type(piece: Piece) -> PieceType {
    match piece {
        Piece::Pawn => PieceType::P,
        Piece::Knight => PieceType::N,
        Piece::Bishop => PieceType::B,
        Piece::Rook => PieceType::R,
        Piece::Queen => PieceType::Q,
        Piece::King => PieceType::K,
    }
}

impl GameBoard for RevBoard {
    type Move = BitMove;

    fn legal_moves(&self) -> Vec<BitMove> { self.board.generate_moves().iter().copied().collect() }

    fn make(&mut self, mv: BitMove) { self.board.apply_move(mv); self.stack.push(Undo::Move); }

    fn unmake(&mut self) {
        let popped = self.stack.pop();
        debug_assert_eq!(popped, Some(Undo::Move), "unmake out of order");
        if popped == Some(Undo::Move) { self.board.undo_move(); }
    }

    fn try_skip_turn(&mut self) -> bool {
        if self.board.in_check() { return false; }
        // apply_null_move requires the side to move not to be in check
        unsafe { self.board.apply_null_move(); }
        self.stack.push(Undo::Null);
        true
    }

    fn undo_skip_turn(&mut self) {
        let popped = self.stack.pop();
        debug_assert_eq!(popped, Some(Undo::Null), "undo_skip_turn out of order");
        if popped == Some(Undo::Null) { unsafe { self.board.undo_null_move(); } }
    }

    fn is_checkmate(&self) -> bool { self.board.checkmate() }

    fn is_square_attacked_by_opponent(&self, sq: Square) -> bool {
        let them = self.board.get_occupied_player(self.board.turn().other_player());
        let attackers = self.board.attackers_to(SQ(sq as u8), self.board.occupied()) & them;
        attackers.0 != 0
    }

    fn piece_count(&self, piece: Piece, color: Color) -> u32 {
        self.board.count_piece(player(color), piece_type(piece)) as u32
    }

    fn side_to_move(&self) -> Color {
        match self.board.turn() { Player::White => Color::White, Player::Black => Color::Black }
    }

    fn fen(&self) -> String { self.board.fen() }

    fn move_to_uci(&self, mv: BitMove) -> String { mv.stringify() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::Position;

    #[test]
    fn agrees_with_cozy_on_probes() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 2 3",
            "6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1",
        ];
        for fen in fens {
            let p = RevBoard::from_fen(fen).unwrap();
            let c = Position::from_fen(fen).unwrap();
            assert_eq!(p.legal_moves().len(), c.legal_moves().len(), "{fen}");
            for sq in [Square::D4, Square::E4, Square::D5, Square::E5] {
                assert_eq!(p.is_square_attacked_by_opponent(sq), c.is_square_attacked_by_opponent(sq), "{fen} {sq}");
            }
            for piece in [Piece::Pawn, Piece::Knight, Piece::Queen] {
                assert_eq!(p.piece_count(piece, Color::White), c.piece_count(piece, Color::White));
            }
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unmake out of order")]
    fn unmake_after_skip_is_rejected() {
        let mut p = RevBoard::startpos();
        let mv = p.legal_moves()[0];
        p.make(mv);
        assert!(p.try_skip_turn());
        p.unmake();
    }

    #[test]
    fn null_move_round_trip() {
        let mut p = RevBoard::startpos();
        let before = p.fen();
        assert!(p.try_skip_turn());
        assert_eq!(p.side_to_move(), Color::Black);
        p.undo_skip_turn();
        assert_eq!(p.fen(), before);
    }
}
