//! Process-local detection state: the report slot, the duplicate guards and
//! the background root task.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{info, warn};

use crate::analyzer::gsi;
use crate::collector::partition;
use crate::collector::props::{PropertyReader, PropertyStore};
use crate::collector::root::RootDiagnostics;
use crate::collector::shell::PrivilegedShell;
use crate::error::{Error, Result};
use crate::report::text::{self, Lang};
use crate::types::{DeviceReport, RootReport};

pub struct Session {
    lang: Lang,
    device: Option<DeviceReport>,
    root: Option<RootReport>,
    rendered: String,
    root_rx: Option<Receiver<RootReport>>,
}

impl Session {
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            device: None,
            root: None,
            rendered: String::new(),
            root_rx: None,
        }
    }

    pub fn device(&self) -> Option<&DeviceReport> {
        self.device.as_ref()
    }

    pub fn root(&self) -> Option<&RootReport> {
        self.root.as_ref()
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn root_pending(&self) -> bool {
        self.root_rx.is_some()
    }

    /// Builds the device report once per session.
    pub fn detect(&mut self, store: &dyn PropertyStore) -> Result<&DeviceReport> {
        if self.device.is_some() {
            return Err(Error::AlreadyDetected);
        }
        let props = PropertyReader::new(store).read();
        let is_ab = partition::classify(store);
        let url = gsi::recommend(props.sdk_level).to_string();
        let report = DeviceReport::new(props, is_ab, url);

        self.rendered = text::render_device(&report, self.lang);
        info!(sdk = report.sdk_level, is_ab, "device detected");
        Ok(self.device.insert(report))
    }

    /// Starts a new detection cycle. The old reports are dropped, not merged.
    pub fn redetect(&mut self, store: &dyn PropertyStore) -> Result<&DeviceReport> {
        if self.root_pending() {
            return Err(Error::AlreadyRunning);
        }
        self.device = None;
        self.root = None;
        self.rendered.clear();
        self.detect(store)
    }

    /// Starts root diagnostics on a background thread.
    ///
    /// The root section follows the device report, so `detect` must run
    /// first. Diagnostics never run when the shell is unavailable; a second
    /// request is rejected, not queued.
    pub fn request_root(&mut self, shell: Arc<dyn PrivilegedShell>) -> Result<()> {
        if self.device.is_none() {
            return Err(Error::NotDetected);
        }
        if self.root_pending() {
            return Err(Error::AlreadyRunning);
        }
        if self.root.is_some() || self.rendered.contains(self.lang.root_marker()) {
            return Err(Error::AlreadyCollected);
        }
        if !shell.is_available() {
            warn!("root requested but no privileged shell is available");
            return Err(Error::ShellUnavailable);
        }

        let (tx, rx) = mpsc::channel();
        self.root_rx = Some(rx);
        thread::spawn(move || {
            let report = RootDiagnostics::new(shell.as_ref()).gather();
            let _ = tx.send(report);
        });
        Ok(())
    }

    /// Non-blocking check for a finished root task. Returns true once the
    /// root section has been appended.
    pub fn poll_root(&mut self) -> Result<bool> {
        let Some(rx) = &self.root_rx else {
            return Ok(false);
        };
        match rx.try_recv() {
            Ok(report) => {
                self.root_rx = None;
                Ok(self.attach_root(report))
            }
            Err(TryRecvError::Empty) => Ok(false),
            Err(TryRecvError::Disconnected) => {
                self.root_rx = None;
                Err(Error::RootTaskLost)
            }
        }
    }

    /// Blocks until the root task delivers. Returns false when nothing was
    /// pending or the section was already present.
    pub fn wait_root(&mut self) -> Result<bool> {
        let Some(rx) = self.root_rx.take() else {
            return Ok(false);
        };
        let report = rx.recv().map_err(|_| Error::RootTaskLost)?;
        Ok(self.attach_root(report))
    }

    fn attach_root(&mut self, report: RootReport) -> bool {
        match text::append_root(&self.rendered, &report, self.lang) {
            Some(updated) => {
                self.rendered = updated;
                self.root = Some(report);
                info!("root diagnostics appended");
                true
            }
            None => {
                warn!("root section already present, ignoring duplicate report");
                false
            }
        }
    }
}
