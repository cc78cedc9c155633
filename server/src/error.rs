//! Error types for the game server
//!
//! None of these are fatal to the process. Action errors are either reported
//! back to the originating player (`action_ignored`) or dropped with a log line.

use shared::PlayerId;
use thiserror::Error;

/// Reasons an inbound player action does not reach the pending queue
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Player acted again before the cooldown elapsed
    #[error("action rejected: cooldown active since {last_action}")]
    Cooldown { last_action: u64 },

    /// Action targets an already neutralized token
    #[error("action rejected: neutral tokens cannot be targeted")]
    NeutralTarget { last_action: u64 },

    /// Sender is not (or no longer) in the roster
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// Payload does not describe a valid add or remove
    #[error("invalid action: {0}")]
    InvalidAction(String),
}

impl ActionError {
    /// Timestamp to report in `action_ignored`, for errors the player is told about
    pub fn reported_timestamp(&self) -> Option<u64> {
        match self {
            ActionError::Cooldown { last_action } | ActionError::NeutralTarget { last_action } => {
                Some(*last_action)
            }
            ActionError::UnknownPlayer(_) | ActionError::InvalidAction(_) => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min combo must be at least 2, got {0}")]
    MinComboTooSmall(usize),

    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("at least one placeable color is required")]
    NoColors,

    #[error("neutral is not a placeable color")]
    NeutralColor,
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
