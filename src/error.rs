use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN `{fen}`: {reason}")]
    Fen { fen: String, reason: String },
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("no legal moves in position {fen}")]
    NoLegalMoves { fen: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
