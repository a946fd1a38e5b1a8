//! Board collaborator interface used by the search.
//!
//! The search never copies a position: it mutates one board in place and
//! relies on every `make`/`try_skip_turn` being undone in LIFO order. The
//! [`Played`] and [`SkippedTurn`] guards tie each undo to a scope so that the
//! order holds on every exit path.

use std::ops::{Deref, DerefMut};

use cozy_chess::{Color, Piece, Square};

pub mod cozy;
#[cfg(feature = "board-pleco")]
pub mod pleco;

pub fn opponent(color: Color) -> Color {
    match color { Color::White => Color::Black, Color::Black => Color::White }
}

/// Operations the search and evaluator need from a board implementation.
pub trait GameBoard {
    type Move: Copy + Eq + std::fmt::Debug;

    /// All legal moves for the side to move. Order is the tie-break order.
    fn legal_moves(&self) -> Vec<Self::Move>;
    fn make(&mut self, mv: Self::Move);
    /// Reverts the most recent `make`.
    fn unmake(&mut self);
    /// Passes the turn. Returns false (and changes nothing) when the side to
    /// move is in check.
    fn try_skip_turn(&mut self) -> bool;
    /// Reverts the most recent successful `try_skip_turn`.
    fn undo_skip_turn(&mut self);
    fn is_checkmate(&self) -> bool;
    /// True iff `sq` is attacked by any piece of the side not to move.
    fn is_square_attacked_by_opponent(&self, sq: Square) -> bool;
    fn piece_count(&self, piece: Piece, color: Color) -> u32;
    fn side_to_move(&self) -> Color;
    fn fen(&self) -> String;
    /// UCI text for `mv`, which must be legal in the current position.
    fn move_to_uci(&self, mv: Self::Move) -> String;
}

/// Kind of change a backend's undo stack records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Undo {
    Move,
    Null,
}

/// A move applied to a board; undone when dropped.
pub struct Played<'a, B: GameBoard> {
    board: &'a mut B,
}

impl<'a, B: GameBoard> Played<'a, B> {
    pub fn new(board: &'a mut B, mv: B::Move) -> Self {
        board.make(mv);
        Self { board }
    }
}

impl<B: GameBoard> Deref for Played<'_, B> {
    type Target = B;
    fn deref(&self) -> &B { self.board }
}

impl<B: GameBoard> DerefMut for Played<'_, B> {
    fn deref_mut(&mut self) -> &mut B { self.board }
}

impl<B: GameBoard> Drop for Played<'_, B> {
    fn drop(&mut self) { self.board.unmake(); }
}

/// A passed turn; undone when dropped.
pub struct SkippedTurn<'a, B: GameBoard> {
    board: &'a mut B,
}

impl<'a, B: GameBoard> SkippedTurn<'a, B> {
    /// `None` when the backend refuses the null move (side to move in check).
    pub fn try_new(board: &'a mut B) -> Option<Self> {
        if board.try_skip_turn() { Some(Self { board }) } else { None }
    }
}

impl<B: GameBoard> Deref for SkippedTurn<'_, B> {
    type Target = B;
    fn deref(&self) -> &B { self.board }
}

impl<B: GameBoard> DerefMut for SkippedTurn<'_, B> {
    fn deref_mut(&mut self) -> &mut B { self.board }
}

impl<B: GameBoard> Drop for SkippedTurn<'_, B> {
    fn drop(&mut self) { self.board.undo_skip_turn(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::Position;

    #[test]
    fn played_guard_restores_on_drop() {
        let mut pos = Position::startpos();
        let before = pos.fen();
        let mv = pos.legal_moves()[0];
        {
            let child = Played::new(&mut pos, mv);
            assert_ne!(child.fen(), before);
            assert_eq!(child.side_to_move(), Color::Black);
        }
        assert_eq!(pos.fen(), before);
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let mut pos = Position::startpos();
        let before = pos.fen();
        let first = pos.legal_moves()[0];
        {
            let mut child = Played::new(&mut pos, first);
            let reply = child.legal_moves()[0];
            let mut grandchild = Played::new(&mut *child, reply);
            let skipped = SkippedTurn::try_new(&mut *grandchild).expect("not in check");
            assert_eq!(skipped.side_to_move(), Color::Black);
        }
        assert_eq!(pos.fen(), before);
    }

    #[test]
    fn skip_refused_in_check() {
        let mut pos = Position::from_fen("k7/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        let before = pos.fen();
        assert!(SkippedTurn::try_new(&mut pos).is_none());
        assert_eq!(pos.fen(), before);
    }
}
