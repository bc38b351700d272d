//! # endurance-driver
//!
//! Browser automation for the endurance harness.
//!
//! The harness never talks to a browser directly. It goes through the
//! [`Browser`] trait, which mirrors the small slice of the W3C WebDriver
//! protocol the harness needs, and obtains fresh sessions from a
//! [`SessionLauncher`].
//!
//! - [`RemoteLauncher`] opens real sessions on a Selenium hub over HTTP.
//! - [`MockLauncher`] hands out [`MockBrowser`] sessions backed by an
//!   in-memory [`MockPage`], for tests.
//!
//! Waiting is always bounded: [`wait_until`] and [`wait_for_element`] give up
//! with [`DriverError::Timeout`] instead of spinning forever.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod browser;
mod capabilities;
mod error;
mod locator;
mod mock;
mod wait;
mod webdriver;

pub use browser::{select_options, Browser, ElementRef, LogEntry, SessionLauncher};
pub use capabilities::{Capabilities, DEFAULT_CHROME_ARGS};
pub use error::DriverError;
pub use locator::Locator;
pub use mock::{MockBrowser, MockDom, MockElement, MockLauncher, MockPage};
pub use wait::{wait_for_element, wait_until, DEFAULT_POLL_INTERVAL};
pub use webdriver::{RemoteLauncher, RemoteSession, WebDriverConfig};
