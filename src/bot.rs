//! Move-choosing players.
//!
//! A bot is asked for one move per decision point and keeps no game state
//! between calls beyond its own configuration (and RNG for [`RandomBot`]).

use std::time::Duration;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::GameBoard;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::search::minimax::Searcher;

pub trait Bot<B: GameBoard> {
    fn name(&self) -> &str;
    /// Returns one legal move and leaves `board` as it was.
    fn think(&mut self, board: &mut B, budget: Duration) -> Result<B::Move, EngineError>;
}

/// Fixed-depth full-width minimax.
#[derive(Debug, Clone, Default)]
pub struct MinimaxBot {
    searcher: Searcher,
    name: String,
}

impl MinimaxBot {
    pub fn new(cfg: EngineConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        let name = format!("minimax-d{}", cfg.search.depth);
        Ok(Self { searcher: Searcher::new(cfg.search, cfg.eval), name })
    }

    pub fn searcher(&self) -> &Searcher { &self.searcher }
    pub fn searcher_mut(&mut self) -> &mut Searcher { &mut self.searcher }
}

impl<B: GameBoard> Bot<B> for MinimaxBot {
    fn name(&self) -> &str { &self.name }

    fn think(&mut self, board: &mut B, budget: Duration) -> Result<B::Move, EngineError> {
        let res = self.searcher.choose_move(board, budget)?;
        debug!("{}: score {} nodes {} terminals {}", self.name, res.score, res.nodes, res.terminals);
        Ok(res.bestmove)
    }
}

/// Always plays the first generated move.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstOptionBot;

impl<B: GameBoard> Bot<B> for FirstOptionBot {
    fn name(&self) -> &str { "first-option" }

    fn think(&mut self, board: &mut B, _budget: Duration) -> Result<B::Move, EngineError> {
        board.legal_moves().first().copied().ok_or_else(|| EngineError::NoLegalMoves { fen: board.fen() })
    }
}

/// Uniformly random legal move, reproducible from its seed.
#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: SmallRng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self { Self { rng: SmallRng::seed_from_u64(seed) } }
}

impl<B: GameBoard> Bot<B> for RandomBot {
    fn name(&self) -> &str { "random" }

    fn think(&mut self, board: &mut B, _budget: Duration) -> Result<B::Move, EngineError> {
        let moves = board.legal_moves();
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves { fen: board.fen() });
        }
        Ok(moves[self.rng.gen_range(0..moves.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::Position;

    #[test]
    fn first_option_takes_generator_head() {
        let mut pos = Position::startpos();
        let first = pos.legal_moves()[0];
        assert_eq!(FirstOptionBot.think(&mut pos, Duration::ZERO).unwrap(), first);
    }

    #[test]
    fn random_bot_is_seeded() {
        let mut pos = Position::startpos();
        let mut a = RandomBot::new(7);
        let mut b = RandomBot::new(7);
        for _ in 0..5 {
            let ma: cozy_chess::Move = a.think(&mut pos, Duration::ZERO).unwrap();
            assert_eq!(ma, b.think(&mut pos, Duration::ZERO).unwrap());
        }
    }

    #[test]
    fn bots_report_mate_as_error() {
        let mut pos = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(matches!(FirstOptionBot.think(&mut pos, Duration::ZERO), Err(EngineError::NoLegalMoves { .. })));
        let mut bot = MinimaxBot::new(EngineConfig::reference()).unwrap();
        assert!(matches!(bot.think(&mut pos, Duration::ZERO), Err(EngineError::NoLegalMoves { .. })));
    }
}
