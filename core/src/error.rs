use thiserror::Error;

#[derive(Error, Debug)]
pub enum CdrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration in '{path}': {reason}")]
    Config { path: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CdrResult<T> = Result<T, CdrError>;
