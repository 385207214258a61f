//! Root environment diagnostics gathered through the privileged shell.

use tracing::{debug, info};

use crate::collector::shell::PrivilegedShell;
use crate::types::{MagiskInfo, RootManager, RootReport, UNKNOWN};

const KERNEL_CMD: &str = "uname -r";
const SU_PATH_CMD: &str = "which su";
const SELINUX_CMD: &str = "getenforce";
const MAGISK_CODE_CMD: &str = "magisk -V";
const MAGISK_NAME_CMD: &str = "magisk -v";
const MAGISK_PKG_CMD: &str =
    "magisk --sqlite \"SELECT value FROM strings WHERE key='requester'\"";

pub const ZYGISK_MARKER: &str = "/data/adb/magisk/zygisk";
pub const RAMDISK_MARKER: &str = "/data/adb/magisk/ramdisk.cpio";
pub const DEFAULT_MAGISK_PACKAGE: &str = "com.topjohnwu.magisk";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Probing,
    Complete,
}

pub struct RootDiagnostics<'a> {
    shell: &'a dyn PrivilegedShell,
    phase: Phase,
}

impl<'a> RootDiagnostics<'a> {
    pub fn new(shell: &'a dyn PrivilegedShell) -> Self {
        Self {
            shell,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs every query; a failed query only blanks its own field.
    pub fn gather(&mut self) -> RootReport {
        self.enter(Phase::Probing);

        let kernel_version = self.query_or_unknown(KERNEL_CMD);
        let root_manager = RootManager::from_su_path(self.query(SU_PATH_CMD).as_deref());
        let selinux_mode = self.query_or_unknown(SELINUX_CMD);
        let magisk = root_manager.is_magisk().then(|| self.magisk_info());

        self.enter(Phase::Complete);
        info!(
            kernel = %kernel_version,
            manager = ?root_manager,
            selinux = %selinux_mode,
            "root diagnostics complete"
        );
        RootReport {
            kernel_version,
            root_manager,
            selinux_mode,
            magisk,
        }
    }

    fn magisk_info(&self) -> MagiskInfo {
        let package_name = self
            .query(MAGISK_PKG_CMD)
            .and_then(|out| parse_sqlite_value(&out))
            .unwrap_or_else(|| DEFAULT_MAGISK_PACKAGE.to_string());

        MagiskInfo {
            version_name: self.query_or_unknown(MAGISK_NAME_CMD),
            version_code: self.query_or_unknown(MAGISK_CODE_CMD),
            zygisk_enabled: self.marker_exists(ZYGISK_MARKER),
            ramdisk_present: self.marker_exists(RAMDISK_MARKER),
            package_name,
        }
    }

    fn marker_exists(&self, path: &str) -> Option<bool> {
        let cmd = format!("if [ -e {path} ]; then echo true; else echo false; fi");
        match self.query(&cmd)?.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn query(&self, command: &str) -> Option<String> {
        self.shell.execute(command).output()
    }

    fn query_or_unknown(&self, command: &str) -> String {
        self.query(command).unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "root diagnostics");
        self.phase = phase;
    }
}

/// `magisk --sqlite` prints rows as `column=value`.
fn parse_sqlite_value(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("value="))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
