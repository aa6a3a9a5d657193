use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerationError>;

/// Failure taxonomy of one generation attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Required configuration is missing or malformed. Never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The automation API answered with a non-success status.
    #[error("Remote API rejected the request ({status}): {body}")]
    Remote { status: u16, body: String },

    /// Network unreachable or timed out.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response whose body could not be decoded.
    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("{0}")]
    InvalidPrompt(String),

    #[error("A signed-in session is required to generate workflows")]
    Unauthenticated,

    /// A newer attempt started before this one reached submission.
    #[error("Attempt {0} was superseded by a newer prompt")]
    Superseded(u64),
}

impl GenerationError {
    /// Only transport failures may be retried, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Transport(_))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Transport(format!("request timed out: {}", e))
        } else if e.is_decode() {
            GenerationError::Decode(e.to_string())
        } else {
            GenerationError::Transport(e.to_string())
        }
    }
}
