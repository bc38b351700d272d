//! Shared backend status cell.
//!
//! The fault injector owns the only [`BackendSwitch`]; observers hold
//! [`BackendView`]s. `BackendSwitch` is deliberately not `Clone`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Whether the backend service is believed to be up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    /// Service is up.
    Running,
    /// Service is down.
    Stopped,
}

impl BackendStatus {
    /// Map a running flag onto a status.
    pub fn from_running(running: bool) -> Self {
        if running {
            BackendStatus::Running
        } else {
            BackendStatus::Stopped
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Running => write!(f, "running"),
            BackendStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Create a status cell with its single writer.
pub fn backend_status(initial: BackendStatus) -> BackendSwitch {
    let (tx, _rx) = watch::channel(initial);
    BackendSwitch { tx }
}

/// Write half of the status cell.
#[derive(Debug)]
pub struct BackendSwitch {
    tx: watch::Sender<BackendStatus>,
}

impl BackendSwitch {
    /// Current status.
    pub fn status(&self) -> BackendStatus {
        *self.tx.borrow()
    }

    /// Publish a new status.
    pub fn set(&self, status: BackendStatus) {
        self.tx.send_replace(status);
    }

    /// A read-only view for an observer.
    pub fn view(&self) -> BackendView {
        BackendView {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read half of the status cell.
#[derive(Debug, Clone)]
pub struct BackendView {
    rx: watch::Receiver<BackendStatus>,
}

impl BackendView {
    /// Current status.
    pub fn status(&self) -> BackendStatus {
        *self.rx.borrow()
    }

    /// Returns true if the backend is believed to be up.
    pub fn is_running(&self) -> bool {
        self.status() == BackendStatus::Running
    }
}
