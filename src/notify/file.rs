// src/notify/file.rs

//! Append-only report log notifier.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;

use crate::error::Result;
use crate::notify::Notifier;

/// Appends notifications to a report log file, flushing after every write.
pub struct FileNotifier {
    file: File,
    path: PathBuf,
}

impl FileNotifier {
    /// Open the report log for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Notifier for FileNotifier {
    async fn notify(&mut self, subject: &str, body: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y/%m/%d %H:%M:%S");
        writeln!(self.file, "{timestamp}    {subject}")?;
        if !body.is_empty() {
            writeln!(self.file, "{body}")?;
        }
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_appends_and_flushes_each_notification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.log");

        let mut notifier = FileNotifier::open(&path).unwrap();
        notifier.notify("first subject", "line one").await.unwrap();
        notifier.notify("second subject", "").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first subject"));
        assert!(contents.contains("line one"));
        let first = contents.find("first subject").unwrap();
        let second = contents.find("second subject").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_reopening_appends_rather_than_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.log");

        {
            let mut notifier = FileNotifier::open(&path).unwrap();
            notifier.notify("kept", "").await.unwrap();
        }
        let mut notifier = FileNotifier::open(&path).unwrap();
        notifier.notify("added", "").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("kept"));
        assert!(contents.contains("added"));
    }
}
