// src/services/listings.rs

//! Listing scraper service.
//!
//! Walks the located job cards on the listings page and extracts one
//! `Listing` per card using the configured CSS selectors, normalizing the
//! age, pay rate, and description on the way in.

use url::Url;

use crate::driver::{Element, Locator, PageDriver};
use crate::error::{AppError, Result};
use crate::models::{Listing, SiteConfig, Snapshot};
use crate::utils::normalize::{age_to_minutes, normalize_description, parse_pay_rate};
use crate::utils::{extract_listing_id, resolve_url};

/// The applications-flag string the site shows in place of an age span.
const NO_APPLICATIONS: &str = "No applications yet";

/// Service for scraping job listings from the current page.
pub struct ListingScraper {
    site: SiteConfig,
}

impl ListingScraper {
    /// Create a new listing scraper with the given site configuration.
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// Scrape every visible job card into a fresh snapshot.
    ///
    /// A malformed card fails the whole scrape rather than producing a
    /// partial snapshot.
    pub fn scrape(&self, driver: &dyn PageDriver) -> Result<Snapshot> {
        let base_url = Url::parse(&self.site.jobs_url)?;
        let cards = driver.find_all(&Locator::ClassName(self.site.card_class.clone()))?;

        let mut snapshot = Snapshot::new();
        for (card_num, card) in cards.iter().enumerate() {
            let listing = self
                .scrape_card(driver, card, &base_url)
                .map_err(|e| AppError::scrape(format!("card {card_num}"), e))?;
            snapshot.insert(listing);
        }

        log::debug!("scraped {} listing(s)", snapshot.len());
        Ok(snapshot)
    }

    /// Extract one listing from one card element.
    fn scrape_card(
        &self,
        driver: &dyn PageDriver,
        card: &Element,
        base_url: &Url,
    ) -> Result<Listing> {
        let selectors = &self.site.card;

        let link = self.first_in(driver, card, &selectors.topic_link, "topic link")?;
        let href = link
            .attr("href")
            .ok_or_else(|| AppError::scrape("topic link", "missing href"))?;
        let url = resolve_url(base_url, href);
        let id = extract_listing_id(&url)
            .ok_or_else(|| AppError::scrape("topic link", format!("no listing id in {url}")))?;
        let topic = link.text().trim().to_string();

        // The first span either carries the age or the applications flag;
        // when it is the flag, the age moves to the second span.
        let spans = driver.find_in(card, &Locator::Css(selectors.age_spans.clone()))?;
        let first = spans
            .first()
            .ok_or_else(|| AppError::scrape("age", "no spans in card header"))?;
        let (has_applications, age_text) = if first.text().trim() == NO_APPLICATIONS {
            let second = spans
                .get(1)
                .ok_or_else(|| AppError::scrape("age", "no age span after applications flag"))?;
            (false, second.text().trim().to_string())
        } else {
            (true, first.text().trim().to_string())
        };
        let age_minutes = age_to_minutes(&age_text)?;

        let student = self
            .first_in(driver, card, &selectors.student, "student name")?
            .text()
            .trim()
            .to_string();
        let rate_text = self.first_in(driver, card, &selectors.rate, "pay rate")?;
        let rate = parse_pay_rate(rate_text.text())?;
        let description =
            normalize_description(self.first_in(driver, card, &selectors.description, "description")?.text());

        let mut listing = Listing {
            id,
            position: 0, // assigned by the snapshot store on insert
            age_minutes,
            student,
            topic,
            rate,
            description,
            has_applications,
            url,
            extra: Default::default(),
        };
        self.scrape_details(driver, card, &mut listing)?;
        Ok(listing)
    }

    /// Collect the open-ended key/value detail rows of an expanded card.
    fn scrape_details(
        &self,
        driver: &dyn PageDriver,
        card: &Element,
        listing: &mut Listing,
    ) -> Result<()> {
        let selectors = &self.site.card;
        let rows = driver.find_in(card, &Locator::Css(selectors.detail_row.clone()))?;

        for row in rows {
            let Some(key) = driver
                .find_in(&row, &Locator::Css(selectors.detail_key.clone()))?
                .into_iter()
                .next()
            else {
                continue;
            };
            let Some(value) = driver
                .find_in(&row, &Locator::Css(selectors.detail_value.clone()))?
                .into_iter()
                .next()
            else {
                // Some rows render the value outside the key/value spans;
                // those carry nothing we can attribute to a field name.
                continue;
            };

            let key = key.text().replace(':', "").trim().to_string();
            if !key.is_empty() {
                listing
                    .extra
                    .insert(key, value.text().trim().to_string());
            }
        }
        Ok(())
    }

    fn first_in(
        &self,
        driver: &dyn PageDriver,
        card: &Element,
        selector: &str,
        what: &str,
    ) -> Result<Element> {
        driver
            .find_in(card, &Locator::Css(selector.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::scrape(what, format!("no match for {selector:?}")))
    }
}
