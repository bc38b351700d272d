//! Observer actors.
//!
//! An observer alternates between Disconnected and Connected. Each cycle it
//! draws one trial to change state, and only tries to connect while the
//! backend is believed to be running. It owns a browser session exactly while
//! connected (and, briefly, during a connect attempt).

use crate::account::{login, Credentials};
use crate::backend::BackendView;
use crate::config::{AppConfig, ObserverConfig};
use crate::diagnostics::{log_browser_console, Diagnostics};
use crate::journal::{Event, Journal};
use crate::trial::{Probability, Trials};
use crate::{ui, Actor, FatalError, Step};
use async_trait::async_trait;
use endurance_driver::{
    select_options, wait_for_element, Browser, DriverError, Locator, SessionLauncher,
};
use std::fmt;
use std::sync::Arc;

/// Observer connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverStatus {
    /// No session.
    Disconnected,
    /// Watching the stream.
    Connected,
}

impl fmt::Display for ObserverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverStatus::Disconnected => write!(f, "disconnected"),
            ObserverStatus::Connected => write!(f, "connected"),
        }
    }
}

/// What every observer shares with the rest of the harness.
#[derive(Clone)]
pub struct ObserverContext {
    /// Opens observer sessions.
    pub launcher: Arc<dyn SessionLauncher>,
    /// Web client settings.
    pub app: AppConfig,
    /// Account to log in with.
    pub credentials: Credentials,
    /// Read-only backend status.
    pub backend: BackendView,
    /// Run journal.
    pub journal: Journal,
    /// Failure diagnostics.
    pub diagnostics: Diagnostics,
}

/// Result of walking the observer view up to the station picker.
enum Attach {
    /// A station was selected.
    Selected,
    /// No station could be selected. Not an error.
    Unavailable(String),
}

/// One independent viewer of the stream.
pub struct Observer {
    name: String,
    connect: Probability,
    disconnect: Probability,
    trials: Trials,
    status: ObserverStatus,
    browser: Option<Box<dyn Browser>>,
    ctx: ObserverContext,
}

impl Observer {
    /// Create a disconnected observer.
    pub fn new(config: &ObserverConfig, trials: Trials, ctx: ObserverContext) -> Self {
        Self {
            name: config.name.clone(),
            connect: config.connect_every_cycles.probability(),
            disconnect: config.disconnect_every_cycles.probability(),
            trials,
            status: ObserverStatus::Disconnected,
            browser: None,
            ctx,
        }
    }

    /// Current state.
    pub fn status(&self) -> ObserverStatus {
        self.status
    }

    /// Whether the observer holds a browser session.
    pub fn has_session(&self) -> bool {
        self.browser.is_some()
    }

    async fn while_disconnected(&mut self) -> Result<(), FatalError> {
        if !self.ctx.backend.is_running() {
            return Ok(());
        }
        if !self.trials.draw(self.connect) {
            return Ok(());
        }
        self.connect().await
    }

    async fn connect(&mut self) -> Result<(), FatalError> {
        tracing::info!(observer = %self.name, "connecting");
        self.ctx.journal.record(Event::ConnectAttempt {
            observer: self.name.clone(),
        });

        let browser = self
            .ctx
            .launcher
            .open()
            .await
            .map_err(|e| FatalError::driver(&self.name, e))?;
        // held on self so release() can close it if this attempt turns fatal
        let browser: &dyn Browser = &**self.browser.insert(browser);

        match attach(browser, &self.ctx).await {
            Ok(Attach::Selected) => {}
            Ok(Attach::Unavailable(reason)) => {
                tracing::info!(observer = %self.name, %reason, "could not connect");
                self.ctx.journal.record(Event::ConnectAborted {
                    observer: self.name.clone(),
                    reason,
                });
                return self.close_session().await;
            }
            Err(e) => {
                self.ctx.diagnostics.capture(&self.name, browser).await;
                return Err(FatalError::driver(&self.name, e));
            }
        }

        tokio::time::sleep(self.ctx.app.settle_delay()).await;
        check_stream(&self.name, browser, &self.ctx).await?;

        self.status = ObserverStatus::Connected;
        tracing::info!(observer = %self.name, session = browser.session_id(), "connected");
        self.ctx.journal.record(Event::ObserverConnected {
            observer: self.name.clone(),
        });
        Ok(())
    }

    async fn while_connected(&mut self) -> Result<(), FatalError> {
        let Some(browser) = self.browser.as_deref() else {
            return Err(FatalError::invariant(&self.name, "connected without a session"));
        };
        check_stream(&self.name, browser, &self.ctx).await?;

        if self.trials.draw(self.disconnect) {
            self.disconnect().await?;
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), FatalError> {
        tracing::info!(observer = %self.name, "disconnecting");
        if let Some(browser) = self.browser.as_deref() {
            log_browser_console(&self.name, browser).await;
        }
        self.close_session().await?;
        self.status = ObserverStatus::Disconnected;
        self.ctx.journal.record(Event::ObserverDisconnected {
            observer: self.name.clone(),
        });
        Ok(())
    }

    async fn close_session(&mut self) -> Result<(), FatalError> {
        match self.browser.take() {
            Some(browser) => browser
                .quit()
                .await
                .map_err(|e| FatalError::driver(&self.name, e)),
            None => Ok(()),
        }
    }
}

/// Log in, open the observer view and pick the first station.
async fn attach(browser: &dyn Browser, ctx: &ObserverContext) -> Result<Attach, DriverError> {
    let wait = ctx.app.element_wait();
    browser.navigate(&ctx.app.url("/")).await?;
    login(browser, &ctx.credentials, wait).await?;

    let nav = wait_for_element(browser, &Locator::id(ui::NAV_OBSERVER), wait).await?;
    browser.click(&nav).await?;

    let dropdown = wait_for_element(browser, &Locator::id(ui::SESSION_DROPDOWN), wait).await?;
    let options = select_options(browser, &dropdown).await?;
    let Some(option) = options.get(ui::FIRST_REAL_OPTION) else {
        return Ok(Attach::Unavailable("no station listed".into()));
    };

    let label = browser.text(option).await?;
    if label.ends_with(ui::UNAVAILABLE_MARKER) {
        return Ok(Attach::Unavailable(format!("station unavailable: {}", label)));
    }

    browser.click(option).await?;
    Ok(Attach::Selected)
}

/// The stream surface must exist and be visible.
async fn check_stream(
    name: &str,
    browser: &dyn Browser,
    ctx: &ObserverContext,
) -> Result<(), FatalError> {
    let visible = match wait_for_element(
        browser,
        &Locator::id(ui::STREAM_VIDEO),
        ctx.app.element_wait(),
    )
    .await
    {
        Ok(video) => browser.is_displayed(&video).await,
        Err(e) => Err(e),
    };

    match visible {
        Ok(true) => Ok(()),
        Ok(false) => {
            ctx.diagnostics.capture(name, browser).await;
            Err(FatalError::invariant(name, "video element is not displayed"))
        }
        Err(e) => {
            ctx.diagnostics.capture(name, browser).await;
            Err(FatalError::driver(name, e))
        }
    }
}

#[async_trait]
impl Actor for Observer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn step(&mut self) -> Step {
        let result = match self.status {
            ObserverStatus::Disconnected => self.while_disconnected().await,
            ObserverStatus::Connected => self.while_connected().await,
        };
        result.into()
    }

    async fn release(&mut self) {
        if let Some(browser) = self.browser.take() {
            tracing::info!(observer = %self.name, "quitting");
            if let Err(e) = browser.quit().await {
                tracing::warn!(observer = %self.name, error = %e, "quit failed");
            }
        }
    }
}
