//! # endurance-core
//!
//! Endurance and chaos harness for a real-time streaming client.
//!
//! One station streams, several observers come and go at random, and a fault
//! injector stops and starts the backend, for hours, until something breaks.
//!
//! ## Model
//!
//! - **Actors**: state machines stepped one at a time by a cooperative
//!   [`Scheduler`]. Each step returns a [`Step`] telling the scheduler what
//!   to enqueue next.
//! - **Trials**: every state change is a per-cycle Bernoulli trial drawn from
//!   the actor's own seeded stream.
//! - **Fail fast**: the first broken invariant ends the run. No retries.
//!
//! ## Example
//!
//! ```ignore
//! use endurance_core::{Config, Harness};
//!
//! let harness = Harness::new(config, launcher, control);
//! let report = harness.run(tokio::signal::ctrl_c().map(drop)).await?;
//! if report.is_failure() {
//!     eprintln!("{} after {} ticks", report.termination, report.ticks);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod actor;
pub mod backend;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fault_injector;
pub mod harness;
pub mod journal;
pub mod observer;
pub mod pacer;
pub mod scheduler;
pub mod station;
pub mod trial;
pub mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use account::{create_account, login, Credentials};
pub use actor::{Actor, Step};
pub use backend::{backend_status, BackendStatus, BackendSwitch, BackendView};
pub use clock::TickClock;
pub use config::{Config, ConfigError, ControlKind, ObserverConfig};
pub use diagnostics::Diagnostics;
pub use error::{FatalError, HarnessError};
pub use fault_injector::FaultInjector;
pub use harness::{Assembly, Harness, RunReport};
pub use journal::{read_json_lines, Entry, Event, Journal};
pub use observer::{Observer, ObserverContext, ObserverStatus};
pub use pacer::Pacer;
pub use scheduler::{Scheduler, Termination};
pub use station::{AccountSetup, Station};
pub use trial::{Cadence, Probability, SeedSequence, TrialError, Trials};
