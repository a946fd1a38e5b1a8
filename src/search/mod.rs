pub mod eval;
pub mod minimax;

pub use eval::{evaluate, EvalConfig, Score, SCORE_BEST, SCORE_WORST};
pub use minimax::{SearchParams, SearchResult, Searcher, FIXED_DEPTH};
