//! The actor abstraction driven by the [`Scheduler`](crate::Scheduler).
//!
//! An actor is a state machine that advances by one step per scheduler pass.
//! The scheduler owns every actor as an opaque `Box<dyn Actor>` handle and
//! decides what to enqueue next from the [`Step`] the actor returns.

use crate::FatalError;
use async_trait::async_trait;
use std::fmt;

/// Outcome of one actor step.
pub enum Step {
    /// Run this actor again next cycle.
    Continue,
    /// Run this actor again next cycle, followed by these new actors.
    Fork(Vec<Box<dyn Actor>>),
    /// Leave the queue for good. The scheduler releases the actor.
    Deregister,
    /// End the run in an orderly way.
    Finish,
    /// Abort the run.
    Fatal(FatalError),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Continue => write!(f, "Continue"),
            Step::Fork(actors) => f
                .debug_tuple("Fork")
                .field(&actors.iter().map(|a| a.name()).collect::<Vec<_>>())
                .finish(),
            Step::Deregister => write!(f, "Deregister"),
            Step::Finish => write!(f, "Finish"),
            Step::Fatal(e) => f.debug_tuple("Fatal").field(e).finish(),
        }
    }
}

impl From<Result<(), FatalError>> for Step {
    fn from(result: Result<(), FatalError>) -> Self {
        match result {
            Ok(()) => Step::Continue,
            Err(e) => Step::Fatal(e),
        }
    }
}

/// A cooperatively scheduled state machine.
#[async_trait]
pub trait Actor: Send {
    /// Name used in logs and fatal errors.
    fn name(&self) -> &str;

    /// Advance by one step.
    async fn step(&mut self) -> Step;

    /// Release any resources the actor owns (browser sessions).
    ///
    /// Called exactly once, when the actor leaves the queue or the run ends.
    async fn release(&mut self) {}
}
