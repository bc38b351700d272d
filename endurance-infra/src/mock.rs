//! Mock service control for testing.
//!
//! Tracks a running flag and counts calls. Failures and "silently ignored"
//! commands can be injected to exercise the fault injector's checks.

use crate::{InfraError, ServiceControl};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct MockServiceInner {
    running: bool,
    stops: usize,
    starts: usize,
    fail_next_stop: Option<String>,
    fail_next_start: Option<String>,
    ignore_commands: bool,
}

/// In-memory [`ServiceControl`].
#[derive(Debug, Clone)]
pub struct MockServiceControl {
    name: String,
    inner: Arc<Mutex<MockServiceInner>>,
}

impl Default for MockServiceControl {
    fn default() -> Self {
        Self::running()
    }
}

impl MockServiceControl {
    /// A service that is currently up.
    pub fn running() -> Self {
        Self::with_state(true)
    }

    /// A service that is currently down.
    pub fn stopped() -> Self {
        Self::with_state(false)
    }

    fn with_state(running: bool) -> Self {
        Self {
            name: "mock-backend".into(),
            inner: Arc::new(Mutex::new(MockServiceInner {
                running,
                stops: 0,
                starts: 0,
                fail_next_stop: None,
                fail_next_start: None,
                ignore_commands: false,
            })),
        }
    }

    /// Current running flag.
    pub fn is_up(&self) -> bool {
        self.inner.lock().unwrap().running
    }

    /// Number of successful stop calls.
    pub fn stops(&self) -> usize {
        self.inner.lock().unwrap().stops
    }

    /// Number of successful start calls.
    pub fn starts(&self) -> usize {
        self.inner.lock().unwrap().starts
    }

    /// Cause the next stop call to fail.
    pub fn fail_next_stop(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_stop = Some(error.to_string());
    }

    /// Cause the next start call to fail.
    pub fn fail_next_start(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_start = Some(error.to_string());
    }

    /// Report success for stop/start without changing the running flag.
    pub fn ignore_commands(&self, ignore: bool) {
        self.inner.lock().unwrap().ignore_commands = ignore;
    }
}

#[async_trait]
impl ServiceControl for MockServiceControl {
    fn service(&self) -> &str {
        &self.name
    }

    async fn stop_service(&self) -> Result<(), InfraError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_stop.take() {
            return Err(InfraError::CommandFailed(error));
        }
        inner.stops += 1;
        if !inner.ignore_commands {
            inner.running = false;
        }
        Ok(())
    }

    async fn start_service(&self) -> Result<(), InfraError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_start.take() {
            return Err(InfraError::CommandFailed(error));
        }
        inner.starts += 1;
        if !inner.ignore_commands {
            inner.running = true;
        }
        Ok(())
    }

    async fn is_running(&self) -> Result<bool, InfraError> {
        Ok(self.inner.lock().unwrap().running)
    }
}
