//! Page driver abstraction.
//!
//! The watcher never touches page structure directly; it consumes located
//! elements and their extracted text/attributes through this trait. The
//! production implementation is an HTTP cookie session (`HttpSession`);
//! tests script a mock.

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpSession;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Credentials;

/// A readiness condition to wait for after navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyCondition {
    /// The page title equals the given string
    TitleEquals(String),
    /// An element with the given ID is present
    ElementWithId(String),
    /// An element with the given class is present
    ElementWithClass(String),
}

/// How to locate elements on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    ClassName(String),
    Css(String),
}

impl Locator {
    /// Render as a CSS selector string.
    pub fn as_css(&self) -> String {
        match self {
            Locator::Id(id) => format!("#{id}"),
            Locator::ClassName(class) => format!(".{class}"),
            Locator::Css(css) => css.clone(),
        }
    }
}

/// An element located on a page: an owned snapshot of its text content,
/// attributes, and markup. Detached from the live page, so it stays valid
/// across navigation.
#[derive(Debug, Clone, Default)]
pub struct Element {
    text: String,
    attrs: HashMap<String, String>,
    html: String,
}

impl Element {
    pub fn new(text: impl Into<String>, attrs: HashMap<String, String>, html: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs,
            html: html.into(),
        }
    }

    /// Concatenated text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The element's own markup, used for nested lookups.
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Driver for a logged-in page session.
#[async_trait]
pub trait PageDriver: Send {
    /// Perform the site login handshake. Opaque: succeeds or fails `Auth`.
    async fn login(&mut self, credentials: &Credentials) -> Result<()>;

    /// Load the given URL as the current page.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Wait until the condition holds on the current page, re-checking
    /// until the bound elapses. Fails `Timeout` when it does.
    async fn wait_for(&mut self, condition: &ReadyCondition, timeout: Duration) -> Result<()>;

    /// All elements matching the locator, in page order.
    fn find_all(&self, locator: &Locator) -> Result<Vec<Element>>;

    /// All elements matching the locator within a previously located element.
    fn find_in(&self, element: &Element, locator: &Locator) -> Result<Vec<Element>>;

    /// Activate an element (follow a link, toggle a control).
    async fn click(&mut self, element: &Element) -> Result<()>;
}
