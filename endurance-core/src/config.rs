//! Configuration loading for the endurance harness.
//!
//! Configuration is loaded from a TOML file (default: `endurance.toml`).
//! Every section and field is optional; missing values fall back to the
//! defaults below, which reproduce the long-running soak setup.

use crate::account::Credentials;
use crate::trial::Cadence;
use endurance_driver::{Capabilities, WebDriverConfig, DEFAULT_CHROME_ARGS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote WebDriver hub.
    #[serde(default)]
    pub webdriver: HubConfig,
    /// Web client under test.
    #[serde(default)]
    pub app: AppConfig,
    /// Shared account used by the station and every observer.
    #[serde(default)]
    pub account: AccountConfig,
    /// Backend service and fault injection.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Pacing and run control.
    #[serde(default)]
    pub run: RunConfig,
    /// Observer actors, in queue order.
    #[serde(default = "default_observers")]
    pub observers: Vec<ObserverConfig>,
}

/// Remote WebDriver hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Hub URL (default: http://selenium_hub:4444).
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    /// Browser to request (default: chrome).
    #[serde(default = "default_browser_name")]
    pub browser_name: String,
    /// Browser command line arguments.
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,
    /// Accept the self-signed certificate of the local deployment (default: true).
    #[serde(default = "default_true")]
    pub accept_insecure_certs: bool,
    /// Per-request timeout in seconds (default: 60).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Web client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the web client.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bounded wait for page elements, in milliseconds (default: 1000).
    #[serde(default = "default_element_wait_ms")]
    pub element_wait_ms: u64,
    /// Pause after selecting a station before checking the stream (default: 500).
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// How long the station may take to start streaming (default: 60).
    #[serde(default = "default_station_ready_timeout_secs")]
    pub station_ready_timeout_secs: u64,
    /// Poll interval while waiting for the station (default: 1000).
    #[serde(default = "default_station_ready_poll_ms")]
    pub station_ready_poll_ms: u64,
}

/// Account configuration.
///
/// When both fields are absent a random account is generated and created by
/// the station at start. When both are present the station logs in instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// How the backend is stopped and started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Docker Engine API on a container name.
    Docker,
    /// `docker compose` CLI on a service name.
    Compose,
}

/// Backend and fault injection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Control mechanism (default: docker).
    #[serde(default = "default_control")]
    pub control: ControlKind,
    /// Container name for `control = "docker"` (default: backend).
    #[serde(default = "default_backend_name")]
    pub container: String,
    /// Service name for `control = "compose"` (default: backend).
    #[serde(default = "default_backend_name")]
    pub service: String,
    /// Compose file, when not discoverable from the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_file: Option<PathBuf>,
    /// Compose project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_project: Option<String>,
    /// Seconds the service gets to exit after a stop before it is killed (default: 10).
    #[serde(default = "default_stop_grace_secs")]
    pub stop_grace_secs: u64,
    /// Inspect the service after every stop/start (default: true).
    #[serde(default = "default_true")]
    pub verify_transitions: bool,
    /// Stop the backend once every N cycles on average (default: 7200, 0 = never).
    #[serde(default = "default_stop_every")]
    pub stop_every_cycles: Cadence,
    /// Start the backend once every N cycles on average (default: 600, 0 = never).
    #[serde(default = "default_start_every")]
    pub start_every_cycles: Cadence,
}

/// Pacing and run control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Length of one cycle in milliseconds (default: 1000).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Master seed for every random trial. Drawn at start when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Stop after this many cycles. Runs until failure when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<u64>,
    /// Append every journal entry to this file as a JSON line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_path: Option<PathBuf>,
    /// Write screenshots and console dumps of failing actors here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics_dir: Option<PathBuf>,
}

/// One observer actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Name used in logs, the journal and diagnostics file names.
    pub name: String,
    /// Connect once every N cycles on average (0 = never).
    pub connect_every_cycles: Cadence,
    /// Disconnect once every N cycles on average (0 = never).
    pub disconnect_every_cycles: Cadence,
}

impl ObserverConfig {
    /// Build an observer entry from whole cycle counts.
    pub fn new(name: &str, connect_every: u32, disconnect_every: u32) -> Self {
        Self {
            name: name.to_string(),
            connect_every_cycles: Cadence::from(connect_every),
            disconnect_every_cycles: Cadence::from(disconnect_every),
        }
    }
}

// Default value functions
fn default_hub_url() -> String {
    "http://selenium_hub:4444".to_string()
}

fn default_browser_name() -> String {
    "chrome".to_string()
}

fn default_browser_args() -> Vec<String> {
    DEFAULT_CHROME_ARGS.iter().map(|a| a.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    "https://app.beddybytes.local".to_string()
}

fn default_element_wait_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_station_ready_timeout_secs() -> u64 {
    60
}

fn default_station_ready_poll_ms() -> u64 {
    1000
}

fn default_control() -> ControlKind {
    ControlKind::Docker
}

fn default_backend_name() -> String {
    "backend".to_string()
}

fn default_stop_grace_secs() -> u64 {
    10
}

fn default_stop_every() -> Cadence {
    Cadence::from(7200) // two hours
}

fn default_start_every() -> Cadence {
    Cadence::from(600) // ten minutes
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_observers() -> Vec<ObserverConfig> {
    vec![
        ObserverConfig::new("parent_station_1", 20, 7200),
        ObserverConfig::new("parent_station_2", 600, 20),
        ObserverConfig::new("parent_station_3", 3600, 600),
    ]
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_url: default_hub_url(),
            browser_name: default_browser_name(),
            args: default_browser_args(),
            accept_insecure_certs: default_true(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            element_wait_ms: default_element_wait_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            station_ready_timeout_secs: default_station_ready_timeout_secs(),
            station_ready_poll_ms: default_station_ready_poll_ms(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            control: default_control(),
            container: default_backend_name(),
            service: default_backend_name(),
            compose_file: None,
            compose_project: None,
            stop_grace_secs: default_stop_grace_secs(),
            verify_transitions: default_true(),
            stop_every_cycles: default_stop_every(),
            start_every_cycles: default_start_every(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            seed: None,
            max_cycles: None,
            journal_path: None,
            diagnostics_dir: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webdriver: HubConfig::default(),
            app: AppConfig::default(),
            account: AccountConfig::default(),
            backend: BackendConfig::default(),
            run: RunConfig::default(),
            observers: default_observers(),
        }
    }
}

impl HubConfig {
    /// Settings for [`endurance_driver::RemoteLauncher`].
    pub fn driver_config(&self) -> WebDriverConfig {
        WebDriverConfig {
            hub_url: self.hub_url.clone(),
            capabilities: Capabilities {
                browser_name: self.browser_name.clone(),
                args: self.args.clone(),
                accept_insecure_certs: self.accept_insecure_certs,
            },
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

impl AppConfig {
    /// Bounded wait for page elements.
    pub fn element_wait(&self) -> Duration {
        Duration::from_millis(self.element_wait_ms)
    }

    /// Pause after selecting a station.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Station startup timeout.
    pub fn station_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.station_ready_timeout_secs)
    }

    /// Station startup poll interval.
    pub fn station_ready_poll(&self) -> Duration {
        Duration::from_millis(self.station_ready_poll_ms)
    }

    /// Absolute URL for a path on the web client.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl AccountConfig {
    /// Configured credentials, if both fields are present.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }
}

impl RunConfig {
    /// Length of one cycle.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or is invalid.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.tick_ms == 0 {
            return Err(ConfigError::Invalid("run.tick_ms must be greater than 0".into()));
        }
        if self.webdriver.hub_url.trim().is_empty() {
            return Err(ConfigError::Invalid("webdriver.hub_url is empty".into()));
        }
        if self.app.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("app.base_url is empty".into()));
        }
        if self.account.email.is_some() != self.account.password.is_some() {
            return Err(ConfigError::Invalid(
                "account.email and account.password must be set together".into(),
            ));
        }

        let mut seen = HashSet::new();
        for observer in &self.observers {
            if observer.name.trim().is_empty() {
                return Err(ConfigError::Invalid("observer name is empty".into()));
            }
            if !seen.insert(observer.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate observer name: {}",
                    observer.name
                )));
            }
        }

        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// Failed to render configuration.
    #[error("failed to render config: {0}")]
    SerializeError(#[source] toml::ser::Error),
    /// Values parse but do not make sense together.
    #[error("invalid config: {0}")]
    Invalid(String),
}
