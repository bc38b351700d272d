//! Backend control via the Docker Engine API.

use crate::{InfraError, ServiceControl};
use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, StartContainerOptions, StopContainerOptions};
use bollard::Docker;

/// Seconds Docker waits after SIGTERM before killing the container.
const DEFAULT_STOP_GRACE_SECS: u64 = 10;

/// Stops and starts one container by name.
pub struct DockerServiceControl {
    docker: Docker,
    container: String,
    stop_grace_secs: u64,
}

impl DockerServiceControl {
    /// Connect to the local Docker daemon and control `container`.
    pub fn new(container: &str) -> Result<Self, InfraError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self {
            docker,
            container: container.to_string(),
            stop_grace_secs: DEFAULT_STOP_GRACE_SECS,
        })
    }

    /// Set the grace period before Docker kills a stopping container.
    pub fn stop_grace_secs(mut self, secs: u64) -> Self {
        self.stop_grace_secs = secs;
        self
    }

    /// Options sent with every stop request.
    pub fn stop_options(&self) -> StopContainerOptions {
        StopContainerOptions {
            t: i64::try_from(self.stop_grace_secs).unwrap_or(i64::MAX),
        }
    }

    fn not_found(&self, e: bollard::errors::Error) -> InfraError {
        match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => InfraError::NotFound(self.container.clone()),
            other => InfraError::Docker(other),
        }
    }
}

#[async_trait]
impl ServiceControl for DockerServiceControl {
    fn service(&self) -> &str {
        &self.container
    }

    async fn stop_service(&self) -> Result<(), InfraError> {
        tracing::debug!(container = %self.container, "docker stop");
        self.docker
            .stop_container(&self.container, Some(self.stop_options()))
            .await
            .map_err(|e| self.not_found(e))
    }

    async fn start_service(&self) -> Result<(), InfraError> {
        tracing::debug!(container = %self.container, "docker start");
        self.docker
            .start_container(&self.container, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| self.not_found(e))
    }

    async fn is_running(&self) -> Result<bool, InfraError> {
        let inspect = self
            .docker
            .inspect_container(&self.container, None::<InspectContainerOptions>)
            .await
            .map_err(|e| self.not_found(e))?;
        Ok(inspect
            .state
            .and_then(|state| state.running)
            .unwrap_or(false))
    }
}
