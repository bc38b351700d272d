//! Pace actor.
//!
//! The only actor that sleeps on every pass, so one scheduler cycle lasts
//! about one tick interval. It also owns the cycle count.

use crate::clock::TickClock;
use crate::{Actor, Step};
use async_trait::async_trait;
use std::time::Duration;

/// Sleeps one interval per cycle and counts cycles.
pub struct Pacer {
    interval: Duration,
    clock: TickClock,
    budget: Option<u64>,
}

impl Pacer {
    /// Actor name.
    pub const NAME: &'static str = "pacer";

    /// Pace cycles to `interval`, advancing `clock`.
    pub fn new(interval: Duration, clock: TickClock) -> Self {
        Self {
            interval,
            clock,
            budget: None,
        }
    }

    /// Finish the run after this many cycles.
    pub fn budget(mut self, cycles: Option<u64>) -> Self {
        self.budget = cycles;
        self
    }
}

#[async_trait]
impl Actor for Pacer {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn step(&mut self) -> Step {
        tokio::time::sleep(self.interval).await;
        let ticks = self.clock.advance();
        tracing::trace!(tick = ticks, "tick");

        match self.budget {
            Some(budget) if ticks >= budget => {
                tracing::info!(ticks, "cycle budget reached");
                Step::Finish
            }
            _ => Step::Continue,
        }
    }

    async fn release(&mut self) {
        tracing::info!(ticks = self.clock.now(), "test ran for {} ticks", self.clock.now());
    }
}
