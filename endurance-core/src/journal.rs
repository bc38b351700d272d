//! Run journal.
//!
//! Actors record what happened and on which tick. When a path is configured
//! every entry is also appended to it as one JSON line, so a killed run keeps
//! everything recorded up to that point.

use crate::backend::BackendStatus;
use crate::clock::TickClock;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Something worth remembering about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The station confirmed it is streaming.
    StationStreaming,
    /// An observer won its connect trial.
    ConnectAttempt {
        /// Observer name.
        observer: String,
    },
    /// A connect attempt ended early without changing state.
    ConnectAborted {
        /// Observer name.
        observer: String,
        /// Why the attempt was dropped.
        reason: String,
    },
    /// An observer is watching the stream.
    ObserverConnected {
        /// Observer name.
        observer: String,
    },
    /// An observer released its session.
    ObserverDisconnected {
        /// Observer name.
        observer: String,
    },
    /// The backend was stopped.
    BackendStopped,
    /// The backend was started.
    BackendStarted,
    /// The run ended.
    RunEnded {
        /// Human readable termination.
        termination: String,
        /// Backend status at the end.
        backend: BackendStatus,
    },
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Cycle the event happened in.
    pub tick: u64,
    /// What happened.
    #[serde(flatten)]
    pub event: Event,
}

/// Shared, append-only event log.
#[derive(Debug, Clone)]
pub struct Journal {
    clock: TickClock,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<Entry>,
    sink: Option<LineWriter<File>>,
}

impl Journal {
    /// Create an in-memory journal stamped by `clock`.
    pub fn new(clock: TickClock) -> Self {
        Self {
            clock,
            inner: Arc::default(),
        }
    }

    /// Create a journal that also appends every entry to `path` as JSON lines.
    ///
    /// Missing parent directories are created and an existing file is
    /// truncated.
    pub fn with_file(clock: TickClock, path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let journal = Self::new(clock);
        journal.lock().sink = Some(LineWriter::new(file));
        Ok(journal)
    }

    /// Record an event at the current tick.
    pub fn record(&self, event: Event) {
        let tick = self.clock.now();
        tracing::debug!(tick, ?event, "journal");
        let entry = Entry { tick, event };

        let mut inner = self.lock();
        if let Some(sink) = inner.sink.as_mut() {
            if let Err(e) = append(sink, &entry) {
                tracing::error!(error = %e, "journal file write failed, keeping entries in memory only");
                inner.sink = None;
            }
        }
        inner.entries.push(entry);
    }

    /// Returns true if entries are being written to a file.
    pub fn is_persistent(&self) -> bool {
        self.lock().sink.is_some()
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    /// Count entries matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.lock().entries.iter().filter(|e| pred(&e.event)).count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn append(sink: &mut LineWriter<File>, entry: &Entry) -> std::io::Result<()> {
    serde_json::to_writer(&mut *sink, entry)?;
    sink.write_all(b"\n")
}

/// Read a journal file written by [`Journal::with_file`].
pub fn read_json_lines(path: &Path) -> std::io::Result<Vec<Entry>> {
    std::fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(std::io::Error::from))
        .collect()
}
