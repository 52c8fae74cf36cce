// src/pipeline/poll.rs

//! The watch loop.
//!
//! State machine: `Init → LoggedIn → Polling ⟲`; any fatal error sends the
//! loop through `Reinitializing` back to `Init`. Reinitializing drops the
//! page session and clears the previous snapshot, so the first poll after
//! a restart never reports new listings.

use std::sync::Arc;
use std::time::Duration;

use crate::driver::{PageDriver, ReadyCondition};
use crate::error::{AppError, Result};
use crate::models::{Config, Credentials, Listing, Snapshot};
use crate::notify::Notifier;
use crate::pipeline::DiffEngine;
use crate::services::ListingScraper;
use crate::storage::{LocalSink, SnapshotSink};

/// Subject line for failure alerts, distinct from new-listing subjects so
/// the two are distinguishable in every notification channel.
const ERROR_SUBJECT: &str = "Watcher error";

/// Where the watch loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Init,
    LoggedIn,
    Polling,
    Reinitializing,
}

/// What the loop does after a poll-cycle error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Log and try again next cycle
    Retry,
    /// Tear down the session and start over from login
    Reinitialize,
}

/// Classify a cycle error. Timeouts are transient page conditions; every
/// other error invalidates the session.
pub fn recovery_for(error: &AppError) -> Recovery {
    if error.is_recoverable() {
        Recovery::Retry
    } else {
        Recovery::Reinitialize
    }
}

/// The poll loop: owns the current and previous snapshots and drives one
/// scrape+diff+notify cycle per interval.
pub struct Watcher<N: Notifier> {
    config: Arc<Config>,
    credentials: Credentials,
    scraper: ListingScraper,
    engine: DiffEngine,
    notifier: N,
    sink: Option<LocalSink>,
    previous: Snapshot,
}

impl<N: Notifier> Watcher<N> {
    pub fn new(config: Arc<Config>, credentials: Credentials, notifier: N) -> Self {
        let scraper = ListingScraper::new(config.site.clone());
        let engine = DiffEngine::new(config.watcher.policy);
        let sink = config
            .output
            .snapshot_file
            .as_ref()
            .map(LocalSink::new);
        Self {
            config,
            credentials,
            scraper,
            engine,
            notifier,
            sink,
            previous: Snapshot::new(),
        }
    }

    /// Run the watch loop until the process is interrupted.
    ///
    /// `new_session` supplies a fresh page driver whenever the loop
    /// (re)initializes.
    pub async fn run<D, F>(&mut self, mut new_session: F) -> Result<()>
    where
        D: PageDriver,
        F: FnMut() -> Result<D>,
    {
        let poll_interval = Duration::from_secs(self.config.watcher.poll_interval_secs);
        let backoff = Duration::from_secs(self.config.watcher.backoff_secs);

        let mut state = WatcherState::Init;
        let mut session: Option<D> = None;

        loop {
            state = match state {
                WatcherState::Init => match new_session() {
                    Ok(mut driver) => match driver.login(&self.credentials).await {
                        Ok(()) => {
                            log::info!("logged in");
                            session = Some(driver);
                            WatcherState::LoggedIn
                        }
                        Err(error) => {
                            self.report_failure(&error).await;
                            WatcherState::Reinitializing
                        }
                    },
                    Err(error) => {
                        self.report_failure(&error).await;
                        WatcherState::Reinitializing
                    }
                },

                WatcherState::LoggedIn => match session.as_mut() {
                    Some(driver) => match self.go_to_listings(driver).await {
                        Ok(()) => {
                            log::info!("at the job listings page");
                            WatcherState::Polling
                        }
                        Err(error) => {
                            self.report_failure(&error).await;
                            WatcherState::Reinitializing
                        }
                    },
                    None => WatcherState::Init,
                },

                WatcherState::Polling => match session.as_mut() {
                    Some(driver) => match self.poll_cycle(driver).await {
                        Ok(new_listings) => {
                            if !new_listings.is_empty() {
                                log::info!("{} new listing(s)", new_listings.len());
                            }
                            tokio::time::sleep(poll_interval).await;
                            WatcherState::Polling
                        }
                        Err(error) => match recovery_for(&error) {
                            Recovery::Retry => {
                                log::warn!("poll cycle failed: {error}; retrying");
                                tokio::time::sleep(poll_interval).await;
                                WatcherState::Polling
                            }
                            Recovery::Reinitialize => {
                                self.report_failure(&error).await;
                                WatcherState::Reinitializing
                            }
                        },
                    },
                    None => WatcherState::Init,
                },

                WatcherState::Reinitializing => {
                    // Drop the session and forget the baseline: after a
                    // restart there is no trustworthy previous snapshot.
                    session = None;
                    self.reinitialize();
                    tokio::time::sleep(backoff).await;
                    WatcherState::Init
                }
            };
        }
    }

    /// Navigate to the listings page and wait for it to render.
    async fn go_to_listings<D: PageDriver>(&self, driver: &mut D) -> Result<()> {
        driver.navigate(&self.config.site.jobs_url).await?;
        driver
            .wait_for(
                &ReadyCondition::ElementWithId(self.config.site.jobs_list_id.clone()),
                Duration::from_secs(self.config.watcher.timeout_secs),
            )
            .await
    }

    /// One scrape+diff+notify cycle. Returns the listings that were
    /// announced as new this cycle.
    pub async fn poll_cycle<D: PageDriver>(&mut self, driver: &mut D) -> Result<Vec<Listing>> {
        self.go_to_listings(driver).await?;
        let snapshot = self.scraper.scrape(driver)?;

        if snapshot.is_empty() {
            // Faulty page load. Keep the previous snapshot as the baseline
            // rather than comparing against nothing next cycle.
            log::warn!("scrape produced no listings; keeping previous snapshot");
            return Ok(Vec::new());
        }

        let new_ids = self.engine.new_listing_ids(&snapshot, &self.previous);

        let mut announced = Vec::new();
        for id in &new_ids {
            let listing = snapshot.get(id)?.clone();
            if let Some(max_age) = self.config.watcher.max_age_minutes {
                if listing.age_minutes > max_age {
                    log::debug!(
                        "skipping {id}: {}m old exceeds the {max_age}m threshold",
                        listing.age_minutes
                    );
                    continue;
                }
            }
            announced.push(listing);
        }
        announced.sort_by_key(|listing| listing.position);

        for listing in &announced {
            let subject = format!("New job at {}", listing.url);
            if let Err(error) = self.notifier.notify(&subject, &listing.report_body()).await {
                log::warn!("notification failed: {error}");
            }
        }

        if let Some(sink) = &self.sink {
            if let Err(error) = sink.write_snapshot(&snapshot).await {
                log::warn!("snapshot dump failed: {error}");
            }
        }

        self.previous = snapshot;
        Ok(announced)
    }

    /// Forget the baseline snapshot ahead of a session restart.
    fn reinitialize(&mut self) {
        self.previous.reset();
    }

    /// Log a fatal error and emit the low-urgency failure alert.
    async fn report_failure(&mut self, error: &AppError) {
        log::error!("{error}");
        if let Err(notify_error) = self.notifier.notify(ERROR_SUBJECT, &error.to_string()).await {
            log::warn!("failure alert not delivered: {notify_error}");
        }
    }
}
