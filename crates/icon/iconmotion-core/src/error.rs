//! Error types for players, triggers and the registry context.

use iconmotion_props::PropsError;

/// Coarse grouping used by hosts to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing loader, unknown trigger or icon. Fix the setup before retrying.
    Configuration,
    /// Lifecycle misuse (double connect, operating on a disconnected player).
    State,
    /// Malformed input at a call site.
    Data,
    /// The engine or a description failed to load.
    Load,
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum IconError {
    #[error("no animation engine loader registered")]
    MissingLoader,

    #[error("trigger '{0}' is not registered")]
    UnregisteredTrigger(String),

    #[error("icon '{0}' is not registered")]
    UnknownIcon(String),

    #[error("player is already connected")]
    AlreadyConnected,

    #[error("player is not connected")]
    NotConnected,

    #[error("no player loaded")]
    NoPlayer,

    #[error(transparent)]
    Props(#[from] PropsError),

    #[error("invalid sequence action: {0}")]
    InvalidSequenceAction(String),

    #[error("invalid value '{value}' for attribute '{name}'")]
    InvalidAttribute { name: String, value: String },

    #[error("invalid animation description: {0}")]
    Description(#[from] serde_json::Error),

    #[error("engine failed to load: {0}")]
    Engine(String),
}

impl IconError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingLoader | Self::UnregisteredTrigger(_) | Self::UnknownIcon(_) => {
                ErrorCategory::Configuration
            }
            Self::AlreadyConnected | Self::NotConnected | Self::NoPlayer => ErrorCategory::State,
            Self::Props(_) | Self::InvalidSequenceAction(_) | Self::InvalidAttribute { .. } => {
                ErrorCategory::Data
            }
            Self::Description(_) | Self::Engine(_) => ErrorCategory::Load,
        }
    }
}

pub type Result<T, E = IconError> = std::result::Result<T, E>;
