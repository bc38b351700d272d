//! Browser session abstraction.
//!
//! # Design
//!
//! The trait is async and session-oriented:
//! - a [`SessionLauncher`] opens a fresh session
//! - the [`Browser`] it returns drives one tab of one browser
//! - `quit()` ends the session on the remote end
//!
//! Sessions are exclusively owned by whoever opened them. Nothing in this
//! crate shares a session between callers.

use crate::{DriverError, Locator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque reference to an element inside one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    /// Wrap a remote element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The remote element id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One browser console log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity (`SEVERE`, `WARNING`, `INFO`, ...).
    pub level: String,
    /// Log text.
    pub message: String,
    /// Milliseconds since the epoch, as reported by the browser.
    #[serde(default)]
    pub timestamp: i64,
}

/// A live browser session.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Remote session id, for logging.
    fn session_id(&self) -> &str;

    /// Load a URL in the current tab.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Find the first element matching `locator` on the page.
    async fn find_element(&self, locator: &Locator) -> Result<ElementRef, DriverError>;

    /// Find the first element matching `locator` below `parent`.
    async fn find_element_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<ElementRef, DriverError>;

    /// Find every element matching `locator` below `parent`.
    async fn find_elements_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, DriverError>;

    /// Click an element.
    async fn click(&self, element: &ElementRef) -> Result<(), DriverError>;

    /// Type text into an element.
    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), DriverError>;

    /// Rendered text of an element.
    async fn text(&self, element: &ElementRef) -> Result<String, DriverError>;

    /// Whether an element is rendered visibly.
    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, DriverError>;

    /// Drain the browser console log.
    async fn browser_log(&self) -> Result<Vec<LogEntry>, DriverError>;

    /// Capture a PNG screenshot of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError>;

    /// End the session. Further calls fail with [`DriverError::SessionClosed`].
    async fn quit(&self) -> Result<(), DriverError>;
}

/// Opens new browser sessions.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    /// Open a fresh session.
    async fn open(&self) -> Result<Box<dyn Browser>, DriverError>;
}

/// The `<option>` children of a `<select>` element, in document order.
pub async fn select_options(
    browser: &dyn Browser,
    select: &ElementRef,
) -> Result<Vec<ElementRef>, DriverError> {
    browser.find_elements_in(select, &Locator::tag("option")).await
}
