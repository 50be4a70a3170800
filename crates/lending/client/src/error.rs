use lending_projection::ProjectionError;
use lending_types::RecordError;
use thiserror::Error;

use crate::wallet::WalletError;

/// Failure of a single user action. None of these is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("no user profile found, register first")]
    NotRegistered,

    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("wallet call failed: {0}")]
    Wallet(#[from] WalletError),

    #[error("failed to encode transition input: {0}")]
    Encode(String),
}

impl From<RecordError> for ActionError {
    fn from(err: RecordError) -> Self {
        ActionError::Encode(err.to_string())
    }
}

/// How an [`ActionError`] is surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureClass {
    /// Nothing to act on yet; a warning, no external call was made
    InputAbsence,
    /// The action cannot proceed in the current state
    Precondition,
    /// The wallet or network refused the call
    External,
}

impl ActionError {
    pub fn class(&self) -> FailureClass {
        match self {
            ActionError::NotConnected
            | ActionError::NotRegistered
            | ActionError::MissingInput(_)
            | ActionError::InvalidInput { .. } => FailureClass::InputAbsence,
            ActionError::Precondition(_)
            | ActionError::Projection(_)
            | ActionError::Encode(_) => FailureClass::Precondition,
            ActionError::Wallet(_) => FailureClass::External,
        }
    }
}

/// Errors loading [`ClientConfig`](crate::config::ClientConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(String),
}
