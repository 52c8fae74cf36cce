//! Notification dispatch for new listings.
//!
//! The watcher only supplies subject and body text; this module decides
//! where it lands (console, terminal bell, report log file).

mod console;
mod file;

pub use console::ConsoleNotifier;
pub use file::FileNotifier;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::NotifyConfig;

/// Sink for notification messages. Fire-and-forget from the watcher's
/// perspective: implementations report failures, the watcher logs them
/// and moves on.
#[async_trait]
pub trait Notifier: Send {
    async fn notify(&mut self, subject: &str, body: &str) -> Result<()>;
}

/// Fans one notification out to several notifiers.
///
/// A failing notifier is logged and skipped; the rest still fire.
#[derive(Default)]
pub struct MultiNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the notifier stack described by the configuration.
    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        let mut multi = Self::new();
        if config.console {
            multi.push(Box::new(ConsoleNotifier::new(config.bell)));
        }
        if let Some(path) = &config.report_log {
            multi.push(Box::new(FileNotifier::open(path)?));
        }
        Ok(multi)
    }

    pub fn push(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn notify(&mut self, subject: &str, body: &str) -> Result<()> {
        for notifier in &mut self.notifiers {
            if let Err(error) = notifier.notify(subject, body).await {
                log::warn!("notifier failed: {error}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Notifier that records every message it receives.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub messages: Vec<(String, String)>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&mut self, subject: &str, body: &str) -> Result<()> {
            self.messages.push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }
}
