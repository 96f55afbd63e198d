use thiserror::Error;

#[derive(Debug, Error)]
pub enum TeamError {
    #[error("invalid hook input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TeamError>;
