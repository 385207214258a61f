//! Error type shared by the collectors, the session and the CLI.

use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("property store unavailable: {0}")]
    PropertyAccess(String),

    #[error("no privileged shell available")]
    ShellUnavailable,

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("device already detected")]
    AlreadyDetected,

    #[error("device not detected yet")]
    NotDetected,

    #[error("root diagnostics already running")]
    AlreadyRunning,

    #[error("root diagnostics already collected")]
    AlreadyCollected,

    #[error("root diagnostics task ended without a report")]
    RootTaskLost,

    #[error("preferences: {0}")]
    Preferences(String),

    #[error("invalid theme color '{0}'")]
    InvalidColor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
