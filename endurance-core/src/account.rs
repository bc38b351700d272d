//! Account creation and login on the web client.

use crate::ui;
use endurance_driver::{wait_for_element, Browser, DriverError, Locator};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;
use std::time::Duration;

const EMAIL_DOMAIN: &str = "@integrationtests.com";
const EMAIL_LOCAL_LEN: usize = 10;
const PASSWORD_LEN: usize = 20;

/// Login credentials shared by the station and its observers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Wrap existing credentials.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Fresh random credentials for a throwaway account.
    pub fn generate() -> Self {
        Self {
            email: format!("{}{}", random_string(EMAIL_LOCAL_LEN), EMAIL_DOMAIN),
            password: random_string(PASSWORD_LEN),
        }
    }
}

/// Random alphanumeric string.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Fill in and submit a form, then wait for the landing page.
async fn submit_form(
    browser: &dyn Browser,
    form: &str,
    fields: [(&str, &str); 2],
    submit: &str,
    timeout: Duration,
) -> Result<(), DriverError> {
    let form = wait_for_element(browser, &Locator::id(form), timeout).await?;
    for (id, value) in fields {
        let input = browser.find_element_in(&form, &Locator::id(id)).await?;
        browser.send_keys(&input, value).await?;
    }
    let submit = browser.find_element_in(&form, &Locator::id(submit)).await?;
    browser.click(&submit).await?;

    wait_for_element(browser, &Locator::id(ui::PAGE_INDEX), timeout).await?;
    Ok(())
}

/// Create an account. The browser must be on the web client.
pub async fn create_account(
    browser: &dyn Browser,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<(), DriverError> {
    use ui::create_account::*;

    tracing::info!(email = %credentials.email, "creating account");
    submit_form(
        browser,
        FORM,
        [(EMAIL, credentials.email.as_str()), (PASSWORD, credentials.password.as_str())],
        SUBMIT,
        timeout,
    )
    .await
}

/// Log in to an existing account. The browser must be on the web client.
pub async fn login(
    browser: &dyn Browser,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<(), DriverError> {
    use ui::login::*;

    let nav = wait_for_element(browser, &Locator::id(NAV), timeout).await?;
    browser.click(&nav).await?;
    submit_form(
        browser,
        FORM,
        [(EMAIL, credentials.email.as_str()), (PASSWORD, credentials.password.as_str())],
        SUBMIT,
        timeout,
    )
    .await
}
