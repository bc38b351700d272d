//! Backend control via the `docker compose` CLI.
//!
//! Useful when the backend container name is chosen by Compose and the
//! harness only knows the service name from the compose file.

use crate::{InfraError, ServiceControl};
use async_trait::async_trait;
use std::path::PathBuf;

/// Compose subcommand issued for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    /// `docker compose stop [-t <secs>] <service>`
    Stop,
    /// `docker compose start <service>`
    Start,
    /// `docker compose ps --status running --services`
    ListRunning,
}

impl ComposeAction {
    /// Get the action as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeAction::Stop => "stop",
            ComposeAction::Start => "start",
            ComposeAction::ListRunning => "ps",
        }
    }
}

/// Stops and starts one Compose service.
#[derive(Debug, Clone)]
pub struct ComposeServiceControl {
    compose_file: Option<PathBuf>,
    project: Option<String>,
    service: String,
    stop_timeout_secs: Option<u64>,
}

impl ComposeServiceControl {
    /// Control `service` in the compose project found from the working directory.
    pub fn new(service: &str) -> Self {
        Self {
            compose_file: None,
            project: None,
            service: service.to_string(),
            stop_timeout_secs: None,
        }
    }

    /// Use an explicit compose file.
    pub fn compose_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.compose_file = Some(path.into());
        self
    }

    /// Use an explicit project name.
    pub fn project(mut self, project: &str) -> Self {
        self.project = Some(project.to_string());
        self
    }

    /// Seconds the service gets to exit on `stop` before it is killed.
    pub fn stop_timeout(mut self, secs: u64) -> Self {
        self.stop_timeout_secs = Some(secs);
        self
    }

    /// Build the `docker` arguments for an action.
    pub fn build_args(&self, action: ComposeAction) -> Vec<String> {
        let mut args = vec!["compose".to_string()];

        if let Some(file) = &self.compose_file {
            args.push("-f".into());
            args.push(file.to_string_lossy().into_owned());
        }
        if let Some(project) = &self.project {
            args.push("-p".into());
            args.push(project.clone());
        }

        args.push(action.as_str().into());
        match action {
            ComposeAction::Stop => {
                if let Some(secs) = self.stop_timeout_secs {
                    args.push("-t".into());
                    args.push(secs.to_string());
                }
                args.push(self.service.clone());
            }
            ComposeAction::Start => args.push(self.service.clone()),
            ComposeAction::ListRunning => {
                args.extend(["--status", "running", "--services"].map(String::from));
            }
        }

        args
    }

    async fn docker(&self, action: ComposeAction) -> Result<String, InfraError> {
        let args = self.build_args(action);
        tracing::debug!(service = %self.service, "docker {}", args.join(" "));

        let output = tokio::process::Command::new("docker")
            .args(&args)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InfraError::Compose(format!(
                "docker compose {} failed: {}",
                action.as_str(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Whether `service` appears in `docker compose ps --services` output.
fn lists_service(stdout: &str, service: &str) -> bool {
    stdout.lines().any(|line| line.trim() == service)
}

#[async_trait]
impl ServiceControl for ComposeServiceControl {
    fn service(&self) -> &str {
        &self.service
    }

    async fn stop_service(&self) -> Result<(), InfraError> {
        self.docker(ComposeAction::Stop).await.map(drop)
    }

    async fn start_service(&self) -> Result<(), InfraError> {
        self.docker(ComposeAction::Start).await.map(drop)
    }

    async fn is_running(&self) -> Result<bool, InfraError> {
        let stdout = self.docker(ComposeAction::ListRunning).await?;
        Ok(lists_service(&stdout, &self.service))
    }
}
