//! Failure diagnostics: screenshots and browser console dumps.
//!
//! Capturing is best effort. A failed capture is logged and never turns into
//! a second error on top of the one being diagnosed.

use crate::clock::TickClock;
use endurance_driver::Browser;
use std::path::{Path, PathBuf};

/// Writes diagnostics for failing actors.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    dir: Option<PathBuf>,
    clock: TickClock,
}

impl Diagnostics {
    /// Write screenshots under `dir`. `None` only logs the console.
    pub fn new(dir: Option<PathBuf>, clock: TickClock) -> Self {
        Self { dir, clock }
    }

    /// Directory screenshots go to, if any.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Screenshot path for `actor` at the current tick.
    pub fn screenshot_path(&self, actor: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}-{}.png", actor, self.clock.now())))
    }

    /// Capture the state of `browser` on behalf of a failing `actor`.
    ///
    /// Returns the screenshot path when one was written.
    pub async fn capture(&self, actor: &str, browser: &dyn Browser) -> Option<PathBuf> {
        log_browser_console(actor, browser).await;

        let path = self.screenshot_path(actor)?;
        let png = match browser.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!(actor, error = %e, "screenshot failed");
                return None;
            }
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!(actor, error = %e, "cannot create diagnostics dir");
                return None;
            }
        }
        match tokio::fs::write(&path, png).await {
            Ok(()) => {
                tracing::info!(actor, path = %path.display(), "screenshot saved");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(actor, error = %e, "cannot write screenshot");
                None
            }
        }
    }
}

/// Drain the browser console into the log.
pub async fn log_browser_console(actor: &str, browser: &dyn Browser) {
    match browser.browser_log().await {
        Ok(entries) => {
            for entry in entries {
                tracing::info!(
                    actor,
                    session = browser.session_id(),
                    level = %entry.level,
                    "console: {}",
                    entry.message
                );
            }
        }
        Err(e) => tracing::warn!(actor, error = %e, "cannot read browser console"),
    }
}
