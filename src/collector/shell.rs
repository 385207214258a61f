//! Privileged command execution through `su`.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::collector::runner::{run_command_with_timeout, DEFAULT_TIMEOUT};
use crate::error::Error;
use crate::types::ShellOutcome;

pub const DEFAULT_SU: &str = "su";

/// A command interpreter that runs with elevated privileges.
pub trait PrivilegedShell: Send + Sync {
    /// Whether the interpreter can be located. Never fails.
    fn is_available(&self) -> bool;

    /// Runs `command` through the interpreter.
    fn execute(&self, command: &str) -> ShellOutcome;
}

#[derive(Debug, Clone)]
pub struct SuShell {
    binary: String,
    timeout: Duration,
}

impl SuShell {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

impl Default for SuShell {
    fn default() -> Self {
        Self::new(DEFAULT_SU, DEFAULT_TIMEOUT)
    }
}

impl PrivilegedShell for SuShell {
    fn is_available(&self) -> bool {
        match run_command_with_timeout("which", &[self.binary.as_str()], self.timeout) {
            Ok(result) => {
                let found = result.exit_code == Some(0) && !result.stdout.trim().is_empty();
                info!(binary = %self.binary, found, "probed privileged shell");
                found
            }
            Err(err) => {
                debug!(binary = %self.binary, error = %err, "privileged shell probe failed");
                false
            }
        }
    }

    fn execute(&self, command: &str) -> ShellOutcome {
        let outcome =
            match run_command_with_timeout(&self.binary, &["-c", command], self.timeout) {
                Ok(result) => ShellOutcome::from_result(result),
                Err(Error::Timeout { .. }) => ShellOutcome::TimedOut,
                Err(err) => {
                    warn!(command, error = %err, "privileged command could not run");
                    ShellOutcome::NotAvailable
                }
            };
        match &outcome {
            ShellOutcome::Ok(_) => debug!(command, "privileged command succeeded"),
            ShellOutcome::Failed { exit_code, stderr } => {
                warn!(command, ?exit_code, stderr = %stderr, "privileged command failed")
            }
            other => debug!(command, outcome = ?other, "privileged command gave no output"),
        }
        outcome
    }
}
