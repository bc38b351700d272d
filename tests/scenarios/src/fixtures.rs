//! Harness builders and scripted actors for scenarios.

use async_trait::async_trait;
use endurance_core::testing::FakeApp;
use endurance_core::{Actor, Cadence, Config, Harness, ObserverConfig, Step, TickClock};
use endurance_infra::MockServiceControl;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The fake client and backend a scenario runs against.
#[derive(Debug, Clone)]
pub struct Rig {
    /// In-memory web client.
    pub app: FakeApp,
    /// In-memory backend service.
    pub control: MockServiceControl,
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}

impl Rig {
    /// A working client with a running backend.
    pub fn new() -> Self {
        Self::with_control(MockServiceControl::running())
    }

    /// A working client with the given backend.
    pub fn with_control(control: MockServiceControl) -> Self {
        Self {
            app: FakeApp::new(),
            control,
        }
    }

    /// A harness wired to this rig.
    pub fn harness(&self, config: Config) -> Harness {
        Harness::new(
            config,
            Arc::new(self.app.launcher().clone()),
            Arc::new(self.control.clone()),
        )
    }

    /// Sessions still open.
    pub fn live_sessions(&self) -> usize {
        self.app.launcher().live_sessions()
    }
}

/// Seeded config with no observers and the fault injector switched off.
pub fn quiet_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.run.seed = Some(seed);
    config.observers.clear();
    config.backend.stop_every_cycles = Cadence::NEVER;
    config.backend.start_every_cycles = Cadence::NEVER;
    config
}

/// An observer entry.
pub fn observer(name: &str, connect_every: u32, disconnect_every: u32) -> ObserverConfig {
    ObserverConfig::new(name, connect_every, disconnect_every)
}

/// Runs `action` once, in the first step at or after `at_tick`.
///
/// Pushed behind the pacer it sees the tick the pacer just completed, so an
/// action at tick `n` takes effect during cycle `n + 1`.
pub struct Saboteur {
    clock: TickClock,
    at_tick: u64,
    action: Option<Box<dyn FnOnce() + Send>>,
    steps: Arc<AtomicU64>,
}

impl Saboteur {
    /// Actor name.
    pub const NAME: &'static str = "saboteur";

    /// Create a saboteur.
    pub fn new(clock: TickClock, at_tick: u64, action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            clock,
            at_tick,
            action: Some(Box::new(action)),
            steps: Arc::default(),
        }
    }

    /// Counter of steps taken, readable after the actor is moved away.
    pub fn steps(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.steps)
    }
}

#[async_trait]
impl Actor for Saboteur {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn step(&mut self) -> Step {
        self.steps.fetch_add(1, Ordering::SeqCst);
        if self.clock.now() >= self.at_tick {
            if let Some(action) = self.action.take() {
                tracing::info!(tick = self.clock.now(), "sabotage");
                action();
            }
        }
        Step::Continue
    }
}
