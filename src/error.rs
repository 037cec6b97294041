use thiserror::Error;

/// Failure of a remote store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure. The message is preserved verbatim so callers
    /// (and test doubles) see exactly what the store reported.
    #[error("{0}")]
    Transport(String),

    #[error("bills request failed with status {0}")]
    Status(u16),

    #[error("failed to encode bill payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unparseable date: {raw}")]
    BadDate { raw: String },
}
