//! Cooperative round-robin scheduler.
//!
//! The scheduler is a trampoline over a FIFO queue: pop the head, await its
//! step, enqueue what the step asks for at the tail. With k actors that all
//! continue, every actor runs exactly once per k steps and nobody runs twice
//! before everyone else has run once.
//!
//! Steps are awaited one at a time on the calling task, so actors never run
//! in parallel and need no locking between them.

use crate::{Actor, FatalError, Step};
use futures_util::FutureExt;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

/// Why a run ended.
#[derive(Debug)]
pub enum Termination {
    /// An actor's step failed.
    Fatal {
        /// Actor whose step failed.
        actor: String,
        /// The failure.
        error: FatalError,
    },
    /// An actor asked for an orderly end.
    Finished {
        /// Actor that asked.
        by: String,
    },
    /// The shutdown signal fired.
    Interrupted,
    /// Every actor deregistered.
    Drained,
}

impl Termination {
    /// Returns true if the run ended on a fatal step.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Termination::Fatal { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Fatal { error, .. } => write!(f, "fatal: {}", error),
            Termination::Finished { by } => write!(f, "finished by {}", by),
            Termination::Interrupted => write!(f, "interrupted"),
            Termination::Drained => write!(f, "all actors deregistered"),
        }
    }
}

/// FIFO queue of actors plus the loop that drives it.
pub struct Scheduler {
    queue: VecDeque<Box<dyn Actor>>,
    steps: u64,
}

impl Scheduler {
    /// Create a scheduler with the given actors, in order.
    pub fn new(actors: impl IntoIterator<Item = Box<dyn Actor>>) -> Self {
        Self {
            queue: actors.into_iter().collect(),
            steps: 0,
        }
    }

    /// Append an actor to the tail of the queue.
    pub fn push(&mut self, actor: Box<dyn Actor>) {
        self.queue.push_back(actor);
    }

    /// Number of queued actors.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no actor is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Steps executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Names of the queued actors, head first.
    pub fn names(&self) -> Vec<&str> {
        self.queue.iter().map(|a| a.name()).collect()
    }

    /// Drive the queue until a step is fatal, an actor finishes the run, the
    /// queue drains, or `shutdown` completes.
    ///
    /// `shutdown` is only checked between steps, never in the middle of one.
    /// Whatever the reason, every remaining actor is released before this
    /// returns, the one that ended the run first.
    pub async fn run<F>(&mut self, shutdown: F) -> Termination
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let termination = loop {
            if shutdown.as_mut().now_or_never().is_some() {
                tracing::info!(steps = self.steps, "shutdown requested");
                break Termination::Interrupted;
            }

            let Some(mut actor) = self.queue.pop_front() else {
                break Termination::Drained;
            };

            self.steps += 1;
            let step = actor.step().await;
            tracing::trace!(actor = actor.name(), ?step, "stepped");

            match step {
                Step::Continue => self.queue.push_back(actor),
                Step::Fork(spawned) => {
                    self.queue.push_back(actor);
                    self.queue.extend(spawned);
                }
                Step::Deregister => {
                    tracing::debug!(actor = actor.name(), "deregistered");
                    actor.release().await;
                }
                Step::Finish => {
                    let by = actor.name().to_string();
                    self.queue.push_front(actor);
                    break Termination::Finished { by };
                }
                Step::Fatal(error) => {
                    let name = actor.name().to_string();
                    tracing::error!(actor = %name, %error, "fatal step, aborting run");
                    self.queue.push_front(actor);
                    break Termination::Fatal { actor: name, error };
                }
            }
        };

        self.release_all().await;
        termination
    }

    async fn release_all(&mut self) {
        while let Some(mut actor) = self.queue.pop_front() {
            actor.release().await;
        }
    }
}
