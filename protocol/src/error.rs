use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Board row {row} has {found} cells, expected {expected}")]
    RaggedBoard {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Board is too large: {cols}x{rows}")]
    BoardTooLarge { cols: usize, rows: usize },
    #[error("Unknown game size: {0}")]
    UnknownSize(String),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;
