//! Remote WebDriver client over HTTP.
//!
//! Speaks the W3C WebDriver wire protocol to a Selenium hub (or a bare
//! chromedriver). Only the commands the harness needs are implemented.

use crate::{Browser, Capabilities, DriverError, ElementRef, Locator, LogEntry, SessionLauncher};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

/// Key under which W3C returns web element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Remote WebDriver configuration.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Base URL of the hub, e.g. `http://selenium_hub:4444`.
    pub hub_url: String,
    /// Capabilities requested for every session.
    pub capabilities: Capabilities,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            hub_url: "http://selenium_hub:4444".into(),
            capabilities: Capabilities::chrome(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Opens sessions on a remote WebDriver hub.
pub struct RemoteLauncher {
    config: WebDriverConfig,
    http: reqwest::Client,
}

impl RemoteLauncher {
    /// Create a launcher for the configured hub.
    pub fn new(config: WebDriverConfig) -> Result<Self, DriverError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Get the hub URL.
    pub fn hub_url(&self) -> &str {
        &self.config.hub_url
    }

    /// Build the new-session endpoint URL.
    pub fn new_session_url(&self) -> String {
        format!("{}/session", self.config.hub_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SessionLauncher for RemoteLauncher {
    async fn open(&self) -> Result<Box<dyn Browser>, DriverError> {
        let body = json!({ "capabilities": self.config.capabilities.to_w3c() });
        let response = self
            .http
            .post(self.new_session_url())
            .json(&body)
            .send()
            .await?;
        let value = decode(response).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::Protocol(format!("no sessionId in {}", value)))?
            .to_string();

        tracing::debug!(session = %session_id, "webdriver session opened");

        Ok(Box::new(RemoteSession {
            http: self.http.clone(),
            base_url: format!("{}/{}", self.new_session_url(), session_id),
            session_id,
        }))
    }
}

/// A session on a remote WebDriver hub.
pub struct RemoteSession {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl RemoteSession {
    /// Build the URL for a session-relative command path.
    pub fn command_url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        let mut request = self.http.request(method.clone(), self.command_url(path));
        if method == Method::POST {
            // W3C requires a JSON body on every POST, even an empty one
            request = request.json(&body.unwrap_or_else(|| json!({})));
        }
        decode(request.send().await?).await
    }

    async fn find_from(
        &self,
        scope: &str,
        locator: &Locator,
        many: bool,
    ) -> Result<Value, DriverError> {
        let (using, value) = locator.to_w3c();
        let endpoint = if many { "elements" } else { "element" };
        let path = if scope.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}/{}", scope, endpoint)
        };
        self.command(
            Method::POST,
            &path,
            Some(json!({ "using": using, "value": value })),
        )
        .await
    }
}

#[async_trait]
impl Browser for RemoteSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.command(Method::POST, "url", Some(json!({ "url": url })))
            .await
            .map(drop)
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementRef, DriverError> {
        let value = self.find_from("", locator, false).await?;
        parse_element(&value)
    }

    async fn find_element_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<ElementRef, DriverError> {
        let scope = format!("element/{}", parent.id());
        let value = self.find_from(&scope, locator, false).await?;
        parse_element(&value)
    }

    async fn find_elements_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, DriverError> {
        let scope = format!("element/{}", parent.id());
        let value = self.find_from(&scope, locator, true).await?;
        value
            .as_array()
            .ok_or_else(|| DriverError::Protocol(format!("expected element list, got {}", value)))?
            .iter()
            .map(parse_element)
            .collect()
    }

    async fn click(&self, element: &ElementRef) -> Result<(), DriverError> {
        self.command(Method::POST, &format!("element/{}/click", element.id()), None)
            .await
            .map(drop)
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        self.command(
            Method::POST,
            &format!("element/{}/value", element.id()),
            Some(json!({ "text": text })),
        )
        .await
        .map(drop)
    }

    async fn text(&self, element: &ElementRef) -> Result<String, DriverError> {
        let value = self
            .command(Method::GET, &format!("element/{}/text", element.id()), None)
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DriverError::Protocol(format!("expected text, got {}", value)))
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, DriverError> {
        let value = self
            .command(
                Method::GET,
                &format!("element/{}/displayed", element.id()),
                None,
            )
            .await?;
        value
            .as_bool()
            .ok_or_else(|| DriverError::Protocol(format!("expected bool, got {}", value)))
    }

    async fn browser_log(&self) -> Result<Vec<LogEntry>, DriverError> {
        // Selenium extension endpoint; W3C WebDriver has no log command.
        let value = self
            .command(Method::POST, "se/log", Some(json!({ "type": "browser" })))
            .await?;
        serde_json::from_value(value).map_err(|e| DriverError::Protocol(e.to_string()))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        let value = self.command(Method::GET, "screenshot", None).await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| DriverError::Protocol("screenshot was not a string".into()))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| DriverError::Protocol(format!("screenshot base64: {}", e)))
    }

    async fn quit(&self) -> Result<(), DriverError> {
        tracing::debug!(session = %self.session_id, "webdriver session closing");
        self.command(Method::DELETE, "", None).await.map(drop)
    }
}

/// Unwrap a W3C response envelope, turning error objects into [`DriverError`].
async fn decode(response: reqwest::Response) -> Result<Value, DriverError> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| DriverError::Protocol(format!("HTTP {}: {}", status, e)))?;
    unwrap_envelope(status.is_success(), body)
}

fn unwrap_envelope(success: bool, body: Value) -> Result<Value, DriverError> {
    let value = match body {
        Value::Object(mut map) => map.remove("value").unwrap_or(Value::Null),
        other => return Err(DriverError::Protocol(format!("not a W3C envelope: {}", other))),
    };

    match value.get("error").and_then(Value::as_str) {
        Some(code) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Err(DriverError::from_w3c(code, message))
        }
        None if success => Ok(value),
        None => Err(DriverError::Protocol(format!("error status without code: {}", value))),
    }
}

fn parse_element(value: &Value) -> Result<ElementRef, DriverError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(ElementRef::new)
        .ok_or_else(|| DriverError::Protocol(format!("not a web element: {}", value)))
}
