use thiserror::Error;

pub type Result<T, E = FourthDownError> = std::result::Result<T, E>;

/// Unified error type covering common failure scenarios across subsystems.
#[derive(Debug, Error)]
pub enum FourthDownError {
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Transport or body-parse failure talking to the decision service. The
    /// payload is the message shown to the user.
    #[error("{0}")]
    Request(String),
    #[error("operational error: {0}")]
    Ops(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FourthDownError {
    /// Message suitable for the dashboard's error banner.
    pub fn user_message(&self) -> String {
        match self {
            FourthDownError::Request(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
