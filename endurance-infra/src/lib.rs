//! # endurance-infra
//!
//! Infrastructure control for the endurance harness: stopping and starting
//! the backend service the system under test depends on.
//!
//! - [`DockerServiceControl`] talks to the Docker Engine API via bollard.
//! - [`ComposeServiceControl`] shells out to `docker compose`.
//! - [`MockServiceControl`] keeps the service state in memory, for tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod compose;
mod docker;
mod mock;

pub use compose::{ComposeAction, ComposeServiceControl};
pub use docker::DockerServiceControl;
pub use mock::MockServiceControl;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while controlling the backend service.
#[derive(Debug, Error)]
pub enum InfraError {
    /// Docker API error.
    #[error("docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    /// Docker Compose CLI error.
    #[error("compose error: {0}")]
    Compose(String),

    /// The service does not exist.
    #[error("service not found: {0}")]
    NotFound(String),

    /// Control command was rejected.
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// General I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start/stop control over one backend service.
#[async_trait]
pub trait ServiceControl: Send + Sync {
    /// Name of the controlled service, for logging.
    fn service(&self) -> &str;

    /// Stop the service.
    async fn stop_service(&self) -> Result<(), InfraError>;

    /// Start the service.
    async fn start_service(&self) -> Result<(), InfraError>;

    /// Whether the service is currently running.
    async fn is_running(&self) -> Result<bool, InfraError>;
}
