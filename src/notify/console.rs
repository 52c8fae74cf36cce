// src/notify/console.rs

//! Console notifier with optional terminal bell.

use async_trait::async_trait;

use chrono::Local;

use crate::error::Result;
use crate::notify::Notifier;

/// Prints notifications to stdout, optionally preceded by the terminal
/// bell.
pub struct ConsoleNotifier {
    bell: bool,
}

impl ConsoleNotifier {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&mut self, subject: &str, body: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y/%m/%d %H:%M:%S");
        if self.bell {
            print!("\x07");
        }
        println!("{timestamp}    {subject}");
        if !body.is_empty() {
            println!("{body}");
        }
        Ok(())
    }
}
