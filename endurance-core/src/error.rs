//! Error types for the harness.

use crate::backend::BackendStatus;
use crate::config::ConfigError;
use endurance_driver::DriverError;
use endurance_infra::InfraError;
use std::path::PathBuf;
use thiserror::Error;

/// A condition that aborts the whole run.
///
/// Every variant names the actor whose step detected it.
#[derive(Debug, Error)]
pub enum FatalError {
    /// The system under test broke an invariant (e.g. the stream vanished).
    #[error("{actor}: {detail}")]
    Invariant {
        /// Actor that observed the violation.
        actor: String,
        /// What was expected and what was seen.
        detail: String,
    },

    /// Browser automation failed, including element lookups that timed out.
    #[error("{actor}: {source}")]
    Driver {
        /// Actor whose session failed.
        actor: String,
        /// Underlying driver error.
        source: DriverError,
    },

    /// A backend stop/start/inspect call failed.
    #[error("{actor}: backend control failed: {source}")]
    Infra {
        /// Actor issuing the call.
        actor: String,
        /// Underlying infrastructure error.
        source: InfraError,
    },

    /// The backend did not end up in the state the control call asked for.
    #[error("{actor}: backend should be {expected} but the service is {observed}")]
    BackendMismatch {
        /// Actor issuing the call.
        actor: String,
        /// State the injector was moving to.
        expected: BackendStatus,
        /// State reported by the service.
        observed: BackendStatus,
    },
}

impl FatalError {
    /// Build an invariant violation.
    pub fn invariant(actor: &str, detail: impl Into<String>) -> Self {
        FatalError::Invariant {
            actor: actor.to_string(),
            detail: detail.into(),
        }
    }

    /// Wrap a driver error raised inside `actor`'s step.
    pub fn driver(actor: &str, source: DriverError) -> Self {
        FatalError::Driver {
            actor: actor.to_string(),
            source,
        }
    }

    /// Wrap an infrastructure error raised inside `actor`'s step.
    pub fn infra(actor: &str, source: InfraError) -> Self {
        FatalError::Infra {
            actor: actor.to_string(),
            source,
        }
    }

    /// The actor that raised this error.
    pub fn actor(&self) -> &str {
        match self {
            FatalError::Invariant { actor, .. }
            | FatalError::Driver { actor, .. }
            | FatalError::Infra { actor, .. }
            | FatalError::BackendMismatch { actor, .. } => actor,
        }
    }
}

/// Errors that prevent a run from starting or from being reported.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The station never reached the streaming state.
    #[error("station failed to start streaming: {0}")]
    StationStartup(#[source] DriverError),

    /// Could not reach the backend control.
    #[error("backend control unavailable: {0}")]
    Infra(#[from] InfraError),

    /// The journal file could not be created.
    #[error("cannot open journal {path}: {source}")]
    Journal {
        /// Configured journal path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Shutdown was requested before the station was streaming.
    #[error("interrupted during startup")]
    Interrupted,
}
