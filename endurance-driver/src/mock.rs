//! Mock browser for testing.
//!
//! A [`MockPage`] is an in-memory page model shared between a test and every
//! session a [`MockLauncher`] opens. Tests mutate the page to script what the
//! harness sees (a toggle changing its label, a video element disappearing)
//! and read it back to check what the harness did (clicks, typed text).
//!
//! Element references handed out by the mock are the element ids themselves.

use crate::{Browser, DriverError, ElementRef, Locator, LogEntry, SessionLauncher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Bytes returned by [`MockBrowser::screenshot`].
const MOCK_PNG: &[u8] = b"\x89PNG\r\n\x1a\nmock";

type ClickHook = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// One element of a mock page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Tag name, matched by [`Locator::Tag`].
    pub tag: String,
    /// Rendered text.
    pub text: String,
    /// Whether the element is visible.
    pub displayed: bool,
    /// Ids of child elements, in document order.
    pub children: Vec<String>,
}

impl MockElement {
    /// A visible `div` with the given text.
    pub fn visible(text: &str) -> Self {
        Self {
            tag: "div".into(),
            text: text.into(),
            displayed: true,
            children: Vec::new(),
        }
    }

    /// A hidden `div` with the given text.
    pub fn hidden(text: &str) -> Self {
        Self {
            displayed: false,
            ..Self::visible(text)
        }
    }

    /// Set the tag name.
    pub fn tagged(mut self, tag: &str) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the child ids.
    pub fn with_children(mut self, ids: &[&str]) -> Self {
        self.children = ids.iter().map(|id| id.to_string()).collect();
        self
    }
}

/// In-memory page state.
#[derive(Default)]
pub struct MockDom {
    elements: HashMap<String, MockElement>,
    click_hooks: HashMap<String, ClickHook>,
    typed: HashMap<String, String>,
    clicks: Vec<String>,
    navigations: Vec<String>,
    console: Vec<LogEntry>,
}

impl fmt::Debug for MockDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDom")
            .field("elements", &self.elements)
            .field("clicks", &self.clicks)
            .field("navigations", &self.navigations)
            .finish_non_exhaustive()
    }
}

impl MockDom {
    /// Add or replace an element.
    pub fn insert(&mut self, id: &str, element: MockElement) {
        self.elements.insert(id.to_string(), element);
    }

    /// Remove an element.
    pub fn remove(&mut self, id: &str) -> Option<MockElement> {
        self.elements.remove(id)
    }

    /// Look up an element.
    pub fn element(&self, id: &str) -> Option<&MockElement> {
        self.elements.get(id)
    }

    /// Change an element's text. Unknown ids are ignored.
    pub fn set_text(&mut self, id: &str, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.text = text.to_string();
        }
    }

    /// Change an element's visibility. Unknown ids are ignored.
    pub fn set_displayed(&mut self, id: &str, displayed: bool) {
        if let Some(element) = self.elements.get_mut(id) {
            element.displayed = displayed;
        }
    }

    /// Run `hook` every time the element is clicked.
    pub fn on_click(&mut self, id: &str, hook: impl Fn(&mut MockDom) + Send + Sync + 'static) {
        self.click_hooks.insert(id.to_string(), Arc::new(hook));
    }

    /// Ids clicked so far, in order.
    pub fn clicks(&self) -> &[String] {
        &self.clicks
    }

    /// Text typed into an element so far.
    pub fn typed(&self, id: &str) -> Option<&str> {
        self.typed.get(id).map(String::as_str)
    }

    /// URLs navigated to so far, in order.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Append a console log line.
    pub fn push_console(&mut self, level: &str, message: &str) {
        self.console.push(LogEntry {
            level: level.into(),
            message: message.into(),
            timestamp: 0,
        });
    }

    fn descendants(&self, id: &str, out: &mut Vec<String>) {
        if let Some(element) = self.elements.get(id) {
            for child in &element.children {
                out.push(child.clone());
                self.descendants(child, out);
            }
        }
    }

    fn matches(&self, id: &str, locator: &Locator) -> bool {
        match locator {
            Locator::Id(want) => id == want,
            Locator::Css(selector) => selector.strip_prefix('#') == Some(id),
            Locator::Tag(tag) => self.elements.get(id).is_some_and(|e| &e.tag == tag),
        }
    }
}

/// Shared handle to a [`MockDom`].
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    inner: Arc<Mutex<MockDom>>,
}

impl MockPage {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the page.
    pub fn with<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> R {
        let mut dom = self.inner.lock().unwrap();
        f(&mut dom)
    }
}

#[derive(Debug, Default)]
struct LauncherStats {
    opened: usize,
    quit: usize,
}

/// A session on a [`MockPage`].
pub struct MockBrowser {
    session_id: String,
    page: MockPage,
    stats: Arc<Mutex<LauncherStats>>,
    closed: AtomicBool,
}

impl MockBrowser {
    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(DriverError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn existing(&self, dom: &MockDom, element: &ElementRef) -> Result<(), DriverError> {
        if dom.elements.contains_key(element.id()) {
            Ok(())
        } else {
            Err(DriverError::WebDriver {
                code: "stale element reference".into(),
                message: element.id().to_string(),
            })
        }
    }
}

#[async_trait]
impl Browser for MockBrowser {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.page.with(|dom| dom.navigations.push(url.to_string()));
        Ok(())
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementRef, DriverError> {
        self.ensure_open()?;
        self.page.with(|dom| {
            let mut ids: Vec<&String> = dom.elements.keys().collect();
            ids.sort();
            ids.into_iter()
                .find(|id| dom.matches(id, locator))
                .map(|id| ElementRef::new(id.clone()))
                .ok_or_else(|| DriverError::NoSuchElement(locator.to_string()))
        })
    }

    async fn find_element_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<ElementRef, DriverError> {
        self.find_elements_in(parent, locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NoSuchElement(locator.to_string()))
    }

    async fn find_elements_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, DriverError> {
        self.ensure_open()?;
        self.page.with(|dom| {
            self.existing(dom, parent)?;
            let mut ids = Vec::new();
            dom.descendants(parent.id(), &mut ids);
            Ok(ids
                .into_iter()
                .filter(|id| dom.elements.contains_key(id) && dom.matches(id, locator))
                .map(ElementRef::new)
                .collect())
        })
    }

    async fn click(&self, element: &ElementRef) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.page.with(|dom| {
            self.existing(dom, element)?;
            dom.clicks.push(element.id().to_string());
            if let Some(hook) = dom.click_hooks.get(element.id()).cloned() {
                hook(dom);
            }
            Ok(())
        })
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.page.with(|dom| {
            self.existing(dom, element)?;
            dom.typed
                .entry(element.id().to_string())
                .or_default()
                .push_str(text);
            Ok(())
        })
    }

    async fn text(&self, element: &ElementRef) -> Result<String, DriverError> {
        self.ensure_open()?;
        self.page.with(|dom| {
            self.existing(dom, element)?;
            Ok(dom.elements[element.id()].text.clone())
        })
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, DriverError> {
        self.ensure_open()?;
        self.page.with(|dom| {
            self.existing(dom, element)?;
            Ok(dom.elements[element.id()].displayed)
        })
    }

    async fn browser_log(&self) -> Result<Vec<LogEntry>, DriverError> {
        self.ensure_open()?;
        Ok(self.page.with(|dom| std::mem::take(&mut dom.console)))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.ensure_open()?;
        Ok(MOCK_PNG.to_vec())
    }

    async fn quit(&self) -> Result<(), DriverError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(DriverError::SessionClosed);
        }
        self.stats.lock().unwrap().quit += 1;
        Ok(())
    }
}

/// Launcher handing out [`MockBrowser`] sessions on one shared page.
#[derive(Debug, Clone)]
pub struct MockLauncher {
    page: MockPage,
    stats: Arc<Mutex<LauncherStats>>,
    fail_next_open: Arc<Mutex<Option<String>>>,
}

impl MockLauncher {
    /// Create a launcher for `page`.
    pub fn new(page: MockPage) -> Self {
        Self {
            page,
            stats: Arc::default(),
            fail_next_open: Arc::default(),
        }
    }

    /// The page every session sees.
    pub fn page(&self) -> &MockPage {
        &self.page
    }

    /// Sessions opened so far.
    pub fn opened(&self) -> usize {
        self.stats.lock().unwrap().opened
    }

    /// Sessions quit so far.
    pub fn quit_count(&self) -> usize {
        self.stats.lock().unwrap().quit
    }

    /// Sessions opened and not yet quit.
    pub fn live_sessions(&self) -> usize {
        let stats = self.stats.lock().unwrap();
        stats.opened - stats.quit
    }

    /// Cause the next `open()` to fail with the given message.
    pub fn fail_next_open(&self, error: &str) {
        *self.fail_next_open.lock().unwrap() = Some(error.to_string());
    }
}

#[async_trait]
impl SessionLauncher for MockLauncher {
    async fn open(&self) -> Result<Box<dyn Browser>, DriverError> {
        if let Some(error) = self.fail_next_open.lock().unwrap().take() {
            return Err(DriverError::ConnectionFailed(error));
        }

        let session_id = {
            let mut stats = self.stats.lock().unwrap();
            stats.opened += 1;
            format!("mock-session-{}", stats.opened)
        };

        Ok(Box::new(MockBrowser {
            session_id,
            page: self.page.clone(),
            stats: Arc::clone(&self.stats),
            closed: AtomicBool::new(false),
        }))
    }
}
