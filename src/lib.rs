// Fixed-depth full-width minimax bot over a reversible board
pub mod board;
pub mod bot;
pub mod config;
pub mod error;
pub mod match_runner;
pub mod openings;
pub mod perft;
pub mod search;
pub mod uci;

pub use board::cozy::Position;
pub use board::GameBoard;
pub use bot::{Bot, FirstOptionBot, MinimaxBot, RandomBot};
pub use config::EngineConfig;
pub use error::EngineError;
