//! Bounded waits.

use crate::{Browser, DriverError, ElementRef, Locator};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Poll interval used by [`wait_for_element`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll `probe` until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once. `Ok(None)` means "not yet"; an `Err`
/// ends the wait immediately. Expiry returns [`DriverError::Timeout`] naming
/// `what`.
pub async fn wait_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<T, DriverError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, DriverError>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(DriverError::Timeout {
                what: what.to_string(),
                waited: timeout,
            });
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Wait for an element to appear, ignoring "no such element" in between.
pub async fn wait_for_element(
    browser: &dyn Browser,
    locator: &Locator,
    timeout: Duration,
) -> Result<ElementRef, DriverError> {
    wait_until(
        &locator.to_string(),
        timeout,
        DEFAULT_POLL_INTERVAL,
        move || async move {
            match browser.find_element(locator).await {
                Ok(element) => Ok(Some(element)),
                Err(e) if e.is_not_found() => Ok(None),
                Err(e) => Err(e),
            }
        },
    )
    .await
}
