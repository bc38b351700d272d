//! Element locators.

use std::fmt;

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Match the element's `id` attribute.
    Id(String),
    /// Arbitrary CSS selector.
    Css(String),
    /// Match by tag name (e.g. `option`).
    Tag(String),
}

impl Locator {
    /// Locate by `id`.
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    /// Locate by CSS selector.
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    /// Locate by tag name.
    pub fn tag(tag: impl Into<String>) -> Self {
        Locator::Tag(tag.into())
    }

    /// The W3C `(using, value)` pair for this locator.
    ///
    /// W3C has no id strategy, so ids become an attribute selector the same
    /// way Selenium's client bindings rewrite them.
    pub fn to_w3c(&self) -> (&'static str, String) {
        match self {
            Locator::Id(id) => (
                "css selector",
                format!("[id=\"{}\"]", id.replace('\\', "\\\\").replace('"', "\\\"")),
            ),
            Locator::Css(selector) => ("css selector", selector.clone()),
            Locator::Tag(tag) => ("tag name", tag.clone()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "#{}", id),
            Locator::Css(selector) => write!(f, "{}", selector),
            Locator::Tag(tag) => write!(f, "<{}>", tag),
        }
    }
}
