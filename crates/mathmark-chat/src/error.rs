use thiserror::Error;

/// Errors raised while talking to the chat backend or loading configuration.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("server reported an error: {0}")]
    Server(String),

    #[error("unexpected send status: {0}")]
    UnexpectedStatus(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
