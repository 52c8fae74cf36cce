//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site URLs, page titles, and scrape selectors
    #[serde(default)]
    pub site: SiteConfig,

    /// Poll loop behavior settings
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Snapshot output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site.jobs_url.trim().is_empty() {
            return Err(AppError::config("site.jobs_url is empty"));
        }
        if self.site.login_url.trim().is_empty() {
            return Err(AppError::config("site.login_url is empty"));
        }
        if self.site.card_class.trim().is_empty() {
            return Err(AppError::config("site.card_class is empty"));
        }
        if self.watcher.timeout_secs == 0 {
            return Err(AppError::config("watcher.timeout_secs must be > 0"));
        }
        if self.watcher.poll_interval_secs == 0 {
            return Err(AppError::config("watcher.poll_interval_secs must be > 0"));
        }
        if self.watcher.backoff_secs == 0 {
            return Err(AppError::config("watcher.backoff_secs must be > 0"));
        }
        Ok(())
    }
}

/// Which candidate IDs the diff engine trusts as "new".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewListingPolicy {
    /// Trust only IDs ranked ahead of the oldest listing both polls agree
    /// existed. Robust against re-surfaced duplicate postings.
    #[default]
    OrdinalPosition,

    /// Trust every ID absent from the previous snapshot.
    SetDifference,
}

/// Site login credentials, never stored in configuration files.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from `JOBWATCH_USERNAME` / `JOBWATCH_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        let username = std::env::var("JOBWATCH_USERNAME")
            .map_err(|_| AppError::config("JOBWATCH_USERNAME is not set"))?;
        let password = std::env::var("JOBWATCH_PASSWORD")
            .map_err(|_| AppError::config("JOBWATCH_PASSWORD is not set"))?;
        Ok(Self { username, password })
    }
}

/// Site URLs, expected page titles, and scrape selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Login page URL
    #[serde(default = "defaults::login_url")]
    pub login_url: String,

    /// Page title shown on the login page
    #[serde(default = "defaults::pre_login_title")]
    pub pre_login_title: String,

    /// Page title shown after a successful login
    #[serde(default = "defaults::post_login_title")]
    pub post_login_title: String,

    /// CSS selector for the username input
    #[serde(default = "defaults::username_field")]
    pub username_field: String,

    /// CSS selector for the password input
    #[serde(default = "defaults::password_field")]
    pub password_field: String,

    /// Job listings page URL (filters baked into the query string)
    #[serde(default = "defaults::jobs_url")]
    pub jobs_url: String,

    /// Element ID that signals the listings page has rendered
    #[serde(default = "defaults::jobs_list_id")]
    pub jobs_list_id: String,

    /// Class name of one job card
    #[serde(default = "defaults::card_class")]
    pub card_class: String,

    /// Selectors for the fields within one card
    #[serde(default)]
    pub card: CardSelectors,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_url: defaults::login_url(),
            pre_login_title: defaults::pre_login_title(),
            post_login_title: defaults::post_login_title(),
            username_field: defaults::username_field(),
            password_field: defaults::password_field(),
            jobs_url: defaults::jobs_url(),
            jobs_list_id: defaults::jobs_list_id(),
            card_class: defaults::card_class(),
            card: CardSelectors::default(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// CSS selectors for the fields within one job card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSelectors {
    /// Topic link; its href carries the listing URL and ID
    #[serde(default = "defaults::topic_link")]
    pub topic_link: String,

    /// Spans holding the applications flag and the age string
    #[serde(default = "defaults::age_spans")]
    pub age_spans: String,

    /// Student/requester name
    #[serde(default = "defaults::student")]
    pub student: String,

    /// Suggested pay rate
    #[serde(default = "defaults::rate")]
    pub rate: String,

    /// Posting description
    #[serde(default = "defaults::description")]
    pub description: String,

    /// One detail row (key/value pair) in the expanded card
    #[serde(default = "defaults::detail_row")]
    pub detail_row: String,

    /// Key span within a detail row
    #[serde(default = "defaults::detail_key")]
    pub detail_key: String,

    /// Value span within a detail row
    #[serde(default = "defaults::detail_value")]
    pub detail_value: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            topic_link: defaults::topic_link(),
            age_spans: defaults::age_spans(),
            student: defaults::student(),
            rate: defaults::rate(),
            description: defaults::description(),
            detail_row: defaults::detail_row(),
            detail_key: defaults::detail_key(),
            detail_value: defaults::detail_value(),
        }
    }
}

/// Poll loop behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Page readiness wait bound, in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between poll cycles, in seconds
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,

    /// Sleep before re-login after a fatal error, in seconds
    #[serde(default = "defaults::backoff")]
    pub backoff_secs: u64,

    /// Only notify for listings at most this old, in minutes.
    /// Absent means no age filter.
    #[serde(default = "defaults::max_age_minutes")]
    pub max_age_minutes: Option<u32>,

    /// New-listing detection policy
    #[serde(default)]
    pub policy: NewListingPolicy,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout(),
            poll_interval_secs: defaults::poll_interval(),
            backoff_secs: defaults::backoff(),
            max_age_minutes: defaults::max_age_minutes(),
            policy: NewListingPolicy::default(),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Print notifications to the console
    #[serde(default = "defaults::yes")]
    pub console: bool,

    /// Ring the terminal bell on new listings
    #[serde(default = "defaults::yes")]
    pub bell: bool,

    /// Append notifications to this report log file
    #[serde(default)]
    pub report_log: Option<PathBuf>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            console: true,
            bell: true,
            report_log: None,
        }
    }
}

/// Snapshot output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write the latest scraped snapshot to this JSON file after each cycle
    #[serde(default)]
    pub snapshot_file: Option<PathBuf>,
}

mod defaults {
    // Watcher defaults
    pub fn timeout() -> u64 {
        30
    }
    pub fn poll_interval() -> u64 {
        30
    }
    pub fn backoff() -> u64 {
        30
    }
    pub fn max_age_minutes() -> Option<u32> {
        Some(10)
    }
    pub fn yes() -> bool {
        true
    }

    // Site defaults
    pub fn login_url() -> String {
        "https://www.wyzant.com/login".into()
    }
    pub fn pre_login_title() -> String {
        "Sign In | Wyzant Tutoring".into()
    }
    pub fn post_login_title() -> String {
        "My Profile | Wyzant Tutoring".into()
    }
    pub fn username_field() -> String {
        "input#Username".into()
    }
    pub fn password_field() -> String {
        "input#Password".into()
    }
    pub fn jobs_url() -> String {
        "https://www.wyzant.com/tutor/jobs?lesson_type=online".into()
    }
    pub fn jobs_list_id() -> String {
        "jobs-list".into()
    }
    pub fn card_class() -> String {
        "academy-card".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jobwatch/0.1)".into()
    }

    // Card selector defaults
    pub fn topic_link() -> String {
        "h3 > a".into()
    }
    pub fn age_spans() -> String {
        "div:nth-of-type(1) > span".into()
    }
    pub fn student() -> String {
        "p:nth-of-type(1)".into()
    }
    pub fn rate() -> String {
        "div:nth-of-type(3) span div div:nth-of-type(1) span".into()
    }
    pub fn description() -> String {
        "p:nth-of-type(2)".into()
    }
    pub fn detail_row() -> String {
        ".spc-zero".into()
    }
    pub fn detail_key() -> String {
        "span:nth-of-type(1)".into()
    }
    pub fn detail_value() -> String {
        "span:nth-of-type(2)".into()
    }
}
