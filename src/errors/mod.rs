use thiserror::Error;

/// Typed error hierarchy for the Moodflix client.
///
/// Input errors are raised before any network attempt. `Http` and `Transport`
/// describe the last failed candidate path once every path has been tried.
/// Storage failures never surface here: the cache and session degrade to
/// "absent" instead.
#[derive(Debug, Error)]
pub enum MoodflixError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("HTTP {status} from {path}: {message}")]
    Http {
        status: u16,
        path: String,
        message: String,
    },

    #[error("Request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("All candidate paths failed")]
    Exhausted,

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias for results using `MoodflixError`.
pub type MoodflixResult<T> = std::result::Result<T, MoodflixError>;

impl MoodflixError {
    /// HTTP status of the failed exchange, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Candidate path the error was recorded against.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Http { path, .. } | Self::Transport { path, .. } => Some(path),
            _ => None,
        }
    }

    /// 401 or 403: the caller should prompt for a fresh login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}
