use std::time::Duration;

use cozy_chess::Color;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{GameBoard, Played};
use crate::error::EngineError;
use crate::search::eval::{evaluate, EvalConfig, Score, DRAW_SCORE, SCORE_BEST, SCORE_WORST};

/// Plies searched from the root, root move included.
pub const FIXED_DEPTH: u32 = 4;

/// What a node strictly below the root returns when it has no legal moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MidTreeTerminal {
    /// Return the node's untouched accumulator: `SCORE_WORST` where `us` is to
    /// move, `SCORE_BEST` otherwise. Right for checkmate, wrong for stalemate.
    #[default]
    Sentinel,
    /// Checkmate scores the mated side's sentinel, stalemate scores `DRAW_SCORE`.
    Adjudicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub depth: u32,
    pub mid_tree_terminal: MidTreeTerminal,
}

impl Default for SearchParams {
    fn default() -> Self { Self { depth: FIXED_DEPTH, mid_tree_terminal: MidTreeTerminal::Sentinel } }
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.depth == 0 {
            return Err(EngineError::Config("search depth must be at least 1 ply".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub bestmove: M,
    pub score: Score,
    /// Nodes below the root, leaves included.
    pub nodes: u64,
    /// Static evaluations performed.
    pub leaves: u64,
    /// Nodes below the root that had no legal moves before depth ran out.
    pub terminals: u64,
}

/// Full-width fixed-depth minimax. All scores are relative to the side to
/// move at the root; there is no pruning, ordering or caching.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    params: SearchParams,
    eval: EvalConfig,
    nodes: u64,
    leaves: u64,
    terminals: u64,
}

impl Searcher {
    pub fn new(params: SearchParams, eval: EvalConfig) -> Self {
        Self { params, eval, ..Self::default() }
    }

    pub fn params(&self) -> &SearchParams { &self.params }
    pub fn set_depth(&mut self, depth: u32) { self.params.depth = depth; }
    pub fn eval_config(&self) -> &EvalConfig { &self.eval }

    /// Picks the root move with the strictly greatest score; ties keep the
    /// move the generator produced first.
    ///
    /// `budget` is reported but never consulted: the search always runs to
    /// the configured depth. The board is returned unchanged.
    pub fn choose_move<B: GameBoard>(&mut self, board: &mut B, budget: Duration) -> Result<SearchResult<B::Move>, EngineError> {
        self.params.validate()?;
        self.nodes = 0;
        self.leaves = 0;
        self.terminals = 0;

        let us = board.side_to_move();
        let moves = board.legal_moves();
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves { fen: board.fen() });
        }
        debug!("think: {} root moves, depth {}, budget {:?} (unused), fen {}", moves.len(), self.params.depth, budget, board.fen());

        let child_depth = self.params.depth - 1;
        let mut best: Option<(B::Move, Score)> = None;
        for mv in moves {
            let uci = board.move_to_uci(mv);
            let score = {
                let mut child = Played::new(board, mv);
                self.search(&mut *child, child_depth, us)
            };
            trace!("root {} -> {}", uci, score);
            if best.map_or(true, |(_, bs)| score > bs) { best = Some((mv, score)); }
        }

        let (bestmove, score) = best.ok_or_else(|| EngineError::NoLegalMoves { fen: board.fen() })?;
        debug!("think: best {} score {} nodes {} leaves {}", board.move_to_uci(bestmove), score, self.nodes, self.leaves);
        Ok(SearchResult { bestmove, score, nodes: self.nodes, leaves: self.leaves, terminals: self.terminals })
    }

    /// Value of `board` (already reflecting the move under judgement) for
    /// `us`, searched `depth` more plies.
    pub fn search<B: GameBoard>(&mut self, board: &mut B, depth: u32, us: Color) -> Score {
        self.nodes += 1;
        if depth == 0 {
            self.leaves += 1;
            return evaluate(board, us, &self.eval);
        }

        let maximizing = board.side_to_move() == us;
        let moves = board.legal_moves();
        if moves.is_empty() {
            self.terminals += 1;
            debug!("no legal moves below root at depth {}: {}", depth, board.fen());
            if self.params.mid_tree_terminal == MidTreeTerminal::Adjudicate {
                if !board.is_checkmate() { return DRAW_SCORE; }
                return if maximizing { SCORE_WORST } else { SCORE_BEST };
            }
        }

        let mut best = if maximizing { SCORE_WORST } else { SCORE_BEST };
        for mv in moves {
            let score = {
                let mut child = Played::new(board, mv);
                self.search(&mut *child, depth - 1, us)
            };
            best = if maximizing { best.max(score) } else { best.min(score) };
        }
        best
    }

    pub fn nodes(&self) -> u64 { self.nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::Position;

    // Black to move, stalemated: Kh8 vs Qf7 + Kg6.
    const STALEMATE: &str = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";

    #[test]
    fn sentinel_leaks_best_for_stalemated_opponent() {
        let mut pos = Position::from_fen(STALEMATE).unwrap();
        let mut s = Searcher::default();
        assert_eq!(s.search(&mut pos, 1, Color::White), SCORE_BEST);
        assert_eq!(s.terminals, 1);
    }

    #[test]
    fn adjudicate_scores_stalemate_as_draw() {
        let mut pos = Position::from_fen(STALEMATE).unwrap();
        let params = SearchParams { mid_tree_terminal: MidTreeTerminal::Adjudicate, ..SearchParams::default() };
        let mut s = Searcher::new(params, EvalConfig::default());
        assert_eq!(s.search(&mut pos, 1, Color::White), DRAW_SCORE);
        assert_eq!(s.search(&mut pos, 3, Color::Black), DRAW_SCORE);
    }

    #[test]
    fn depth_zero_is_static_eval() {
        let mut pos = Position::from_fen("k7/8/8/8/8/8/4Q3/7K b - - 0 1").unwrap();
        let mut s = Searcher::default();
        let expected = evaluate(&mut pos, Color::White, &EvalConfig::default());
        assert_eq!(s.search(&mut pos, 0, Color::White), expected);
        assert_eq!((s.nodes, s.leaves), (1, 1));
    }

    #[test]
    fn zero_depth_rejected() {
        let mut pos = Position::startpos();
        let params = SearchParams { depth: 0, ..SearchParams::default() };
        let mut s = Searcher::new(params, EvalConfig::default());
        assert!(matches!(s.choose_move(&mut pos, Duration::ZERO), Err(EngineError::Config(_))));
    }
}
