// src/driver/http.rs

//! HTTP cookie-session implementation of the page driver.
//!
//! Pages are fetched with a cookie-carrying `reqwest` client and parsed
//! with `scraper`. "Waiting" for a readiness condition re-fetches the
//! current URL until the condition holds or the bound elapses. Clicking is
//! only meaningful for link elements: it follows the `href`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::driver::{Element, Locator, PageDriver, ReadyCondition};
use crate::error::{AppError, Result};
use crate::models::{Credentials, SiteConfig};

/// How often `wait_for` re-fetches the current page.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A logged-in HTTP session holding the most recently fetched page.
pub struct HttpSession {
    client: reqwest::Client,
    site: SiteConfig,
    current_url: Option<Url>,
    current_html: String,
}

impl HttpSession {
    /// Create a fresh session (empty cookie jar, no current page).
    pub fn new(site: &SiteConfig, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&site.user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            site: site.clone(),
            current_url: None,
            current_html: String::new(),
        })
    }

    async fn fetch(&mut self, url: Url) -> Result<()> {
        let response = self.client.get(url.clone()).send().await?;
        self.current_html = response.text().await?;
        self.current_url = Some(url);
        Ok(())
    }

    /// Title of the current page, if it has one.
    fn page_title(&self) -> Option<String> {
        let document = Html::parse_document(&self.current_html);
        let title = Selector::parse("title").ok()?;
        document
            .select(&title)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    fn condition_holds(&self, condition: &ReadyCondition) -> Result<bool> {
        match condition {
            ReadyCondition::TitleEquals(expected) => {
                Ok(self.page_title().as_deref() == Some(expected.as_str()))
            }
            ReadyCondition::ElementWithId(id) => {
                Ok(!self.find_all(&Locator::Id(id.clone()))?.is_empty())
            }
            ReadyCondition::ElementWithClass(class) => {
                Ok(!self.find_all(&Locator::ClassName(class.clone()))?.is_empty())
            }
        }
    }

    /// Value of the `name` attribute of the first element matching the
    /// selector, falling back to its `id`.
    fn input_name(&self, selector: &str) -> Result<String> {
        let input = self
            .find_all(&Locator::Css(selector.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::auth(format!("login field {selector:?} not found")))?;
        input
            .attr("name")
            .or_else(|| input.attr("id"))
            .map(str::to_string)
            .ok_or_else(|| AppError::auth(format!("login field {selector:?} has no name")))
    }

    /// Hidden inputs on the current page (CSRF and friends), as form data.
    fn hidden_form_fields(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .find_all(&Locator::Css("input[type=hidden]".to_string()))?
            .into_iter()
            .filter_map(|input| {
                let name = input.attr("name")?.to_string();
                let value = input.attr("value").unwrap_or_default().to_string();
                Some((name, value))
            })
            .collect())
    }
}

/// All elements matching the locator in a full document.
pub(crate) fn select_in_document(html: &str, locator: &Locator) -> Result<Vec<Element>> {
    let selector = parse_selector(&locator.as_css())?;
    let document = Html::parse_document(html);
    Ok(select_into_elements(&document, &selector))
}

/// All elements matching the locator in an element fragment.
pub(crate) fn select_in_fragment(html: &str, locator: &Locator) -> Result<Vec<Element>> {
    let selector = parse_selector(&locator.as_css())?;
    let fragment = Html::parse_fragment(html);
    Ok(select_into_elements(&fragment, &selector))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn select_into_elements(html: &Html, selector: &Selector) -> Vec<Element> {
    html.select(selector)
        .map(|el| {
            let attrs: HashMap<String, String> = el
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            Element::new(el.text().collect::<String>(), attrs, el.html())
        })
        .collect()
}

#[async_trait]
impl PageDriver for HttpSession {
    async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let login_url = Url::parse(&self.site.login_url)?;
        self.fetch(login_url.clone()).await?;

        if self.page_title().as_deref() != Some(self.site.pre_login_title.as_str()) {
            return Err(AppError::auth(format!(
                "unexpected login page title {:?}",
                self.page_title().unwrap_or_default()
            )));
        }

        let mut form = self.hidden_form_fields()?;
        form.push((
            self.input_name(&self.site.username_field)?,
            credentials.username.clone(),
        ));
        form.push((
            self.input_name(&self.site.password_field)?,
            credentials.password.clone(),
        ));

        let response = self
            .client
            .post(login_url.clone())
            .form(&form)
            .send()
            .await?;
        let landed = response.url().clone();
        self.current_html = response.text().await?;
        self.current_url = Some(landed);

        if self.page_title().as_deref() != Some(self.site.post_login_title.as_str()) {
            return Err(AppError::auth("login did not reach the profile page"));
        }
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.fetch(Url::parse(url)?).await
    }

    async fn wait_for(&mut self, condition: &ReadyCondition, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.condition_holds(condition)? {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(AppError::timeout(
                    format!("{condition:?}"),
                    timeout.as_secs(),
                ));
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;

            let Some(url) = self.current_url.clone() else {
                return Err(AppError::config("wait_for called before navigate"));
            };
            self.fetch(url).await?;
        }
    }

    fn find_all(&self, locator: &Locator) -> Result<Vec<Element>> {
        select_in_document(&self.current_html, locator)
    }

    fn find_in(&self, element: &Element, locator: &Locator) -> Result<Vec<Element>> {
        select_in_fragment(element.html(), locator)
    }

    async fn click(&mut self, element: &Element) -> Result<()> {
        let href = element
            .attr("href")
            .ok_or_else(|| AppError::invalid_input("click target", "element has no href"))?;
        let target = match &self.current_url {
            Some(base) => base.join(href)?,
            None => Url::parse(href)?,
        };
        self.fetch(target).await
    }
}
