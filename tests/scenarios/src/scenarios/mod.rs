//! Scenario modules.
//!
//! - `steady_viewer`: one observer connects and stays connected
//! - `backend_down`: no observer attempts while the backend is stopped
//! - `failures`: the first failing check ends the run
//! - `churn`: many observers and backend restarts over long runs

pub mod backend_down;
pub mod churn;
pub mod failures;
pub mod steady_viewer;
