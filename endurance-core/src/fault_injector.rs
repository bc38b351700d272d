//! Backend fault injector.
//!
//! Holds the only [`BackendSwitch`]. While the backend is running it draws a
//! stop trial each cycle; while stopped, a start trial. The published status
//! changes only once the control call has succeeded and, with verification
//! on, the service reports the expected state.

use crate::backend::{BackendStatus, BackendSwitch};
use crate::journal::{Event, Journal};
use crate::trial::{Probability, Trials};
use crate::{Actor, FatalError, Step};
use async_trait::async_trait;
use endurance_infra::ServiceControl;
use std::sync::Arc;

/// Toggles the backend service.
pub struct FaultInjector {
    control: Arc<dyn ServiceControl>,
    switch: BackendSwitch,
    stop: Probability,
    start: Probability,
    trials: Trials,
    verify: bool,
    journal: Journal,
}

impl FaultInjector {
    /// Actor name.
    pub const NAME: &'static str = "fault-injector";

    /// Create an injector publishing through `switch`.
    pub fn new(
        control: Arc<dyn ServiceControl>,
        switch: BackendSwitch,
        stop: Probability,
        start: Probability,
        trials: Trials,
        journal: Journal,
    ) -> Self {
        Self {
            control,
            switch,
            stop,
            start,
            trials,
            verify: true,
            journal,
        }
    }

    /// Whether to inspect the service after each transition (default: true).
    pub fn verify_transitions(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Published backend status.
    pub fn status(&self) -> BackendStatus {
        self.switch.status()
    }

    async fn transition(&mut self, to: BackendStatus) -> Result<(), FatalError> {
        let service = self.control.service().to_string();
        let result = match to {
            BackendStatus::Stopped => {
                tracing::info!(%service, "stopping backend");
                self.control.stop_service().await
            }
            BackendStatus::Running => {
                tracing::info!(%service, "starting backend");
                self.control.start_service().await
            }
        };
        result.map_err(|e| FatalError::infra(Self::NAME, e))?;

        if self.verify {
            let running = self
                .control
                .is_running()
                .await
                .map_err(|e| FatalError::infra(Self::NAME, e))?;
            let observed = BackendStatus::from_running(running);
            if observed != to {
                return Err(FatalError::BackendMismatch {
                    actor: Self::NAME.to_string(),
                    expected: to,
                    observed,
                });
            }
        }

        self.switch.set(to);
        self.journal.record(match to {
            BackendStatus::Stopped => Event::BackendStopped,
            BackendStatus::Running => Event::BackendStarted,
        });
        Ok(())
    }
}

#[async_trait]
impl Actor for FaultInjector {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn step(&mut self) -> Step {
        let (p, next) = match self.switch.status() {
            BackendStatus::Running => (self.stop, BackendStatus::Stopped),
            BackendStatus::Stopped => (self.start, BackendStatus::Running),
        };
        if !self.trials.draw(p) {
            return Step::Continue;
        }
        self.transition(next).await.into()
    }
}
