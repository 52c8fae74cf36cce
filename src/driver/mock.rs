// src/driver/mock.rs

//! Scripted page driver for tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::http::{select_in_document, select_in_fragment};
use crate::driver::{Element, Locator, PageDriver, ReadyCondition};
use crate::error::{AppError, Result};
use crate::models::Credentials;

/// A page driver that serves canned HTML pages. Each `navigate` consumes
/// the next scripted page; the last page sticks once the script runs dry.
/// Waits never sleep: a condition either holds on the current page or the
/// wait "times out" immediately.
#[derive(Debug, Default)]
pub struct MockDriver {
    pages: VecDeque<String>,
    current: String,
    /// When set, `login` fails with `Auth`.
    pub login_error: Option<&'static str>,
}

impl MockDriver {
    /// Driver pinned to a single page.
    pub fn with_page(html: impl Into<String>) -> Self {
        Self {
            current: html.into(),
            ..Self::default()
        }
    }

    /// Driver serving the given pages in order, one per `navigate`.
    pub fn with_pages(pages: Vec<String>) -> Self {
        Self {
            pages: pages.into(),
            ..Self::default()
        }
    }

    fn title(&self) -> Option<String> {
        select_in_document(&self.current, &Locator::Css("title".to_string()))
            .ok()?
            .first()
            .map(|el| el.text().trim().to_string())
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn login(&mut self, _credentials: &Credentials) -> Result<()> {
        match self.login_error {
            Some(message) => Err(AppError::auth(message)),
            None => Ok(()),
        }
    }

    async fn navigate(&mut self, _url: &str) -> Result<()> {
        if let Some(page) = self.pages.pop_front() {
            self.current = page;
        }
        Ok(())
    }

    async fn wait_for(&mut self, condition: &ReadyCondition, timeout: Duration) -> Result<()> {
        let holds = match condition {
            ReadyCondition::TitleEquals(expected) => {
                self.title().as_deref() == Some(expected.as_str())
            }
            ReadyCondition::ElementWithId(id) => {
                !select_in_document(&self.current, &Locator::Id(id.clone()))?.is_empty()
            }
            ReadyCondition::ElementWithClass(class) => {
                !select_in_document(&self.current, &Locator::ClassName(class.clone()))?.is_empty()
            }
        };
        if holds {
            Ok(())
        } else {
            Err(AppError::timeout(format!("{condition:?}"), timeout.as_secs()))
        }
    }

    fn find_all(&self, locator: &Locator) -> Result<Vec<Element>> {
        select_in_document(&self.current, locator)
    }

    fn find_in(&self, element: &Element, locator: &Locator) -> Result<Vec<Element>> {
        select_in_fragment(element.html(), locator)
    }

    async fn click(&mut self, _element: &Element) -> Result<()> {
        Ok(())
    }
}
