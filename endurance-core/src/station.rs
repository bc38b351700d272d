//! The streaming station.
//!
//! Brought up once when the harness starts. Afterwards every step checks the
//! session toggle still offers to stop the stream.

use crate::account::{create_account, login, Credentials};
use crate::config::AppConfig;
use crate::diagnostics::Diagnostics;
use crate::journal::{Event, Journal};
use crate::{ui, Actor, FatalError, HarnessError, Step};
use async_trait::async_trait;
use endurance_driver::{
    select_options, wait_for_element, wait_until, Browser, DriverError, ElementRef, Locator,
    SessionLauncher,
};
use std::future::Future;
use std::pin::Pin;

/// How the station gets its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSetup {
    /// Create a fresh account with the credentials.
    Create,
    /// Log in with existing credentials.
    Login,
}

/// The single stream producer.
pub struct Station {
    browser: Option<Box<dyn Browser>>,
    toggle: ElementRef,
    diagnostics: Diagnostics,
}

impl Station {
    /// Actor name.
    pub const NAME: &'static str = "station";

    /// Open a session, sign in and start streaming.
    ///
    /// Waits until the session toggle reads `Stop`. On any failure the
    /// session is captured for diagnostics and closed. If `interrupt`
    /// completes first the session is closed and
    /// [`HarnessError::Interrupted`] returned.
    pub async fn start<I>(
        launcher: &dyn SessionLauncher,
        app: &AppConfig,
        credentials: &Credentials,
        account: AccountSetup,
        diagnostics: Diagnostics,
        journal: &Journal,
        mut interrupt: Pin<&mut I>,
    ) -> Result<Self, HarnessError>
    where
        I: Future<Output = ()>,
    {
        tracing::info!("station starting");
        let browser = launcher.open().await.map_err(HarnessError::StationStartup)?;

        let outcome = tokio::select! {
            biased;
            () = interrupt.as_mut() => None,
            outcome = bring_up(browser.as_ref(), app, credentials, account) => Some(outcome),
        };

        match outcome {
            Some(Ok(toggle)) => {
                tracing::info!(session = browser.session_id(), "station streaming");
                journal.record(Event::StationStreaming);
                Ok(Self {
                    browser: Some(browser),
                    toggle,
                    diagnostics,
                })
            }
            Some(Err(e)) => {
                diagnostics.capture(Self::NAME, browser.as_ref()).await;
                quit(browser.as_ref()).await;
                Err(HarnessError::StationStartup(e))
            }
            None => {
                tracing::warn!("station startup interrupted");
                quit(browser.as_ref()).await;
                Err(HarnessError::Interrupted)
            }
        }
    }

    async fn check(&self, browser: &dyn Browser) -> Result<(), FatalError> {
        let text = match browser.text(&self.toggle).await {
            Ok(text) => text,
            Err(e) => {
                self.diagnostics.capture(Self::NAME, browser).await;
                return Err(FatalError::driver(Self::NAME, e));
            }
        };

        if text != ui::TOGGLE_STREAMING_TEXT {
            self.diagnostics.capture(Self::NAME, browser).await;
            return Err(FatalError::invariant(
                Self::NAME,
                format!(
                    "session toggle reads {:?}, expected {:?}",
                    text,
                    ui::TOGGLE_STREAMING_TEXT
                ),
            ));
        }
        Ok(())
    }
}

async fn click_when_present(
    browser: &dyn Browser,
    id: &str,
    app: &AppConfig,
) -> Result<ElementRef, DriverError> {
    let element = wait_for_element(browser, &Locator::id(id), app.element_wait()).await?;
    browser.click(&element).await?;
    Ok(element)
}

async fn bring_up(
    browser: &dyn Browser,
    app: &AppConfig,
    credentials: &Credentials,
    account: AccountSetup,
) -> Result<ElementRef, DriverError> {
    browser.navigate(&app.url("/")).await?;
    match account {
        AccountSetup::Create => create_account(browser, credentials, app.element_wait()).await?,
        AccountSetup::Login => login(browser, credentials, app.element_wait()).await?,
    }

    click_when_present(browser, ui::NAV_STATION, app).await?;
    click_when_present(browser, ui::MEDIA_PERMISSION_CONTINUE, app).await?;

    let select_locator = Locator::id(ui::VIDEO_DEVICE_SELECT);
    let select = wait_for_element(browser, &select_locator, app.element_wait()).await?;
    let options = select_options(browser, &select).await?;
    let device = options.get(ui::FIRST_REAL_OPTION).ok_or_else(|| {
        DriverError::NoSuchElement(format!("{} option {}", select_locator, ui::FIRST_REAL_OPTION))
    })?;
    browser.click(device).await?;

    let toggle = click_when_present(browser, ui::SESSION_TOGGLE, app).await?;
    let toggle_ref = &toggle;
    wait_until(
        "session toggle to read Stop",
        app.station_ready_timeout(),
        app.station_ready_poll(),
        move || async move {
            let text = browser.text(toggle_ref).await?;
            Ok((text == ui::TOGGLE_STREAMING_TEXT).then_some(()))
        },
    )
    .await?;

    Ok(toggle)
}

#[async_trait]
impl Actor for Station {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn step(&mut self) -> Step {
        let Some(browser) = self.browser.as_deref() else {
            return Step::Fatal(FatalError::invariant(Self::NAME, "station session is gone"));
        };
        self.check(browser).await.into()
    }

    async fn release(&mut self) {
        if let Some(browser) = self.browser.take() {
            tracing::info!("station quitting");
            quit(browser.as_ref()).await;
        }
    }
}

async fn quit(browser: &dyn Browser) {
    if let Err(e) = browser.quit().await {
        tracing::warn!(error = %e, "station quit failed");
    }
}
