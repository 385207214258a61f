//! Shared data types for device and root reports.

use serde::{Deserialize, Serialize};

/// Sentinel for any field that could not be resolved.
pub const UNKNOWN: &str = "unknown";

/// Properties read straight from the property store, before classification
/// and recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProps {
    pub brand: String,
    pub model: String,
    pub os_release: String,
    pub sdk_level: u32,
    pub abi: String,
    pub vndk_version: String,
    pub first_api_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    pub brand: String,
    pub model: String,
    pub os_release: String,
    pub sdk_level: u32,
    pub abi: String,
    pub vndk_version: String,
    pub first_api_level: String,
    pub is_ab_partition: bool,
    pub recommended_gsi_url: String,
}

impl DeviceReport {
    pub fn new(props: DeviceProps, is_ab_partition: bool, recommended_gsi_url: String) -> Self {
        Self {
            brand: props.brand,
            model: props.model,
            os_release: props.os_release,
            sdk_level: props.sdk_level,
            abi: props.abi,
            vndk_version: props.vndk_version,
            first_api_level: props.first_api_level,
            is_ab_partition,
            recommended_gsi_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path")]
pub enum RootManager {
    Magisk,
    KernelSU,
    SuperSU,
    Other(String),
    Unknown,
}

impl RootManager {
    /// Classifies the resolved `su` path. Precedence: magisk, ksu, superuser.
    /// Only the superuser match ignores case.
    pub fn from_su_path(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return RootManager::Unknown;
        };
        if path.contains("magisk") {
            RootManager::Magisk
        } else if path.contains("ksu") {
            RootManager::KernelSU
        } else if path.to_ascii_lowercase().contains("superuser") {
            RootManager::SuperSU
        } else {
            RootManager::Other(path.to_string())
        }
    }

    pub fn is_magisk(&self) -> bool {
        matches!(self, RootManager::Magisk)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagiskInfo {
    pub version_name: String,
    pub version_code: String,
    /// `None` when the marker could not be checked.
    pub zygisk_enabled: Option<bool>,
    pub ramdisk_present: Option<bool>,
    pub package_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootReport {
    pub kernel_version: String,
    pub root_manager: RootManager,
    pub selinux_mode: String,
    pub magisk: Option<MagiskInfo>,
}

/// Raw capture of one child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// What a privileged command produced, keeping "could not run" apart from
/// "ran but gave nothing useful".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    NotAvailable,
    TimedOut,
    Failed { exit_code: Option<i32>, stderr: String },
    Empty,
    Ok(String),
}

impl ShellOutcome {
    pub fn from_result(result: ShellResult) -> Self {
        if result.exit_code != Some(0) {
            return ShellOutcome::Failed {
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            };
        }
        let stdout = result.stdout.trim();
        if stdout.is_empty() {
            ShellOutcome::Empty
        } else {
            ShellOutcome::Ok(stdout.to_string())
        }
    }

    pub fn output(self) -> Option<String> {
        match self {
            ShellOutcome::Ok(out) => Some(out),
            _ => None,
        }
    }
}
