use thiserror::Error;

/// Shared error type used across all Attractor faucet crates.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing process env {0}")]
    MissingEnv(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    /// The contract rejected a call. `reason` is the decoded custom error
    /// (e.g. `DeadlineIsTooFar()`) or the raw revert data.
    #[error("{method} reverted: {reason}")]
    Revert { method: &'static str, reason: String },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] eyre::Error),
}

impl AppError {
    /// Custom error name of a revert, if this error is one.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            AppError::Revert { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
