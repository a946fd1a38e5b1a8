//! Short opening lines used to vary match games.
//! Each line is 4 half-moves in UCI notation.

use serde::{Deserialize, Serialize};

use crate::board::cozy::Position;
use crate::error::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opening {
    pub name: String,
    pub moves: Vec<String>,
}

impl Opening {
    fn new(name: &str, moves: &[&str]) -> Self {
        Self { name: name.to_string(), moves: moves.iter().map(|m| m.to_string()).collect() }
    }

    pub fn position(&self) -> Result<Position, EngineError> {
        Position::set_from_start_and_moves(&self.moves)
    }
}

pub fn get_openings() -> Vec<Opening> {
    vec![
        Opening::new("Italian Game", &["e2e4", "e7e5", "g1f3", "b8c6"]),
        Opening::new("Queen's Gambit", &["d2d4", "d7d5", "c2c4", "e7e6"]),
        Opening::new("Sicilian Defense", &["e2e4", "c7c5", "g1f3", "d7d6"]),
        Opening::new("French Defense", &["e2e4", "e7e6", "d2d4", "d7d5"]),
        Opening::new("Caro-Kann Defense", &["e2e4", "c7c6", "d2d4", "d7d5"]),
        Opening::new("English Opening", &["c2c4", "e7e5", "b1c3", "g8f6"]),
        Opening::new("King's Indian Defense", &["d2d4", "g8f6", "c2c4", "g7g6"]),
        Opening::new("Scandinavian Defense", &["e2e4", "d7d5", "e4d5", "d8d5"]),
    ]
}
