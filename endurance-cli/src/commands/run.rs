//! Run the harness.

use anyhow::{Context, Result};
use clap::Args;
use endurance_core::{Config, ControlKind, Harness, HarnessError, RunReport, Termination};
use endurance_driver::RemoteLauncher;
use endurance_infra::{ComposeServiceControl, DockerServiceControl, ServiceControl};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Overrides for a single run.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Master seed for every random trial
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many cycles
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// WebDriver hub URL
    #[arg(long)]
    pub hub_url: Option<String>,

    /// Base URL of the web client
    #[arg(long)]
    pub base_url: Option<String>,

    /// Append the event journal here as JSON lines
    #[arg(long)]
    pub journal: Option<PathBuf>,

    /// Write screenshots of failing actors here
    #[arg(long)]
    pub diagnostics_dir: Option<PathBuf>,
}

impl RunArgs {
    /// Fold command line overrides into the file configuration.
    pub fn apply(self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.run.seed = Some(seed);
        }
        if let Some(max) = self.max_cycles {
            config.run.max_cycles = Some(max);
        }
        if let Some(url) = self.hub_url {
            config.webdriver.hub_url = url;
        }
        if let Some(url) = self.base_url {
            config.app.base_url = url;
        }
        if let Some(path) = self.journal {
            config.run.journal_path = Some(path);
        }
        if let Some(dir) = self.diagnostics_dir {
            config.run.diagnostics_dir = Some(dir);
        }
    }
}

fn service_control(config: &Config) -> Result<Arc<dyn ServiceControl>> {
    let backend = &config.backend;
    Ok(match backend.control {
        ControlKind::Docker => Arc::new(
            DockerServiceControl::new(&backend.container)
                .context("Failed to connect to the Docker daemon")?
                .stop_grace_secs(backend.stop_grace_secs),
        ),
        ControlKind::Compose => {
            let mut control =
                ComposeServiceControl::new(&backend.service).stop_timeout(backend.stop_grace_secs);
            if let Some(file) = &backend.compose_file {
                control = control.compose_file(file);
            }
            if let Some(project) = &backend.compose_project {
                control = control.project(project);
            }
            Arc::new(control)
        }
    })
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
///
/// The handler is installed on first poll, which the harness does before
/// opening any browser session.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Run the run command.
pub async fn run(mut config: Config, args: RunArgs) -> Result<ExitCode> {
    args.apply(&mut config);
    config.validate()?;

    let launcher = RemoteLauncher::new(config.webdriver.driver_config())
        .context("Failed to set up the WebDriver client")?;
    let control = service_control(&config)?;
    let diagnostics_dir = config.run.diagnostics_dir.clone();

    let harness = Harness::new(config, Arc::new(launcher), control);
    let report = match harness.run(interrupted()).await {
        Ok(report) => report,
        Err(HarnessError::Interrupted) => {
            println!();
            println!("=== endurance run ===");
            println!("  Result: interrupted before the station was streaming");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e.into()),
    };

    print_report(&report, diagnostics_dir.as_deref());
    Ok(if report.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_report(report: &RunReport, diagnostics_dir: Option<&std::path::Path>) {
    println!();
    println!("=== endurance run ===");
    println!("  Result: {}", report.termination);
    println!("  Ticks:  {}", report.ticks);
    println!("  Steps:  {}", report.steps);
    println!("  Seed:   {}", report.seed);

    if let Termination::Fatal { actor, .. } = &report.termination {
        println!("  Failed: {}", actor);
        match diagnostics_dir {
            Some(dir) => println!("  Diagnostics: {}", dir.display()),
            None => println!("  Diagnostics: none (set run.diagnostics_dir to keep screenshots)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_file() {
        let mut config = Config::default();
        config.run.seed = Some(1);

        RunArgs {
            seed: Some(2),
            hub_url: Some("http://localhost:4444".into()),
            ..RunArgs::default()
        }
        .apply(&mut config);

        assert_eq!(config.run.seed, Some(2));
        assert_eq!(config.webdriver.hub_url, "http://localhost:4444");
        assert_eq!(config.app.base_url, "https://app.beddybytes.local");
    }

    #[test]
    fn absent_overrides_keep_file_values() {
        let mut config = Config::default();
        config.run.max_cycles = Some(10);
        RunArgs::default().apply(&mut config);
        assert_eq!(config.run.max_cycles, Some(10));
    }

    #[test]
    fn compose_control_uses_service_name() {
        let mut config = Config::default();
        config.backend.control = ControlKind::Compose;
        config.backend.service = "signal".into();
        let control = service_control(&config).unwrap();
        assert_eq!(control.service(), "signal");
    }
}
