//! End-to-end scenarios for the endurance harness.
//!
//! Every scenario runs the real scheduler, actors and fault injector against
//! the in-memory web client and service control, with tokio's clock paused
//! so thousands of cycles finish in milliseconds.
//!
//! ## Modules
//!
//! - `assertions`: checks over a run's journal
//! - `fixtures`: harness builders and scripted extra actors
//! - `scenarios`: the scenarios themselves
//!
//! ## Running
//!
//! ```bash
//! cargo test -p endurance-scenarios
//! ```

pub mod assertions;
pub mod fixtures;
pub mod scenarios;
