//! Daily audit log
//!
//! Summary lines that record an actual mutation are appended to
//! `<directory>/<name>-<YYYY-MM-DD>.log`, one file per synchronizable kind
//! per local day.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use fs2::FileExt;

use crate::Result;

/// Appends audit lines to rolling daily files
#[derive(Debug, Clone)]
pub struct AuditLog {
    directory: PathBuf,
}

impl AuditLog {
    /// Create an audit log writing into `directory`
    ///
    /// The directory is created on first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file for `name` on `date`
    pub fn path_for(&self, name: &str, date: NaiveDate) -> PathBuf {
        self.directory
            .join(format!("{}-{}.log", name, date.format("%Y-%m-%d")))
    }

    /// Append `lines` to today's file for `name`
    pub fn append(&self, name: &str, lines: &[String]) -> Result<()> {
        self.append_at(name, lines, Local::now())
    }

    /// Append `lines` to the file for `name` on the day of `now`
    pub fn append_at(&self, name: &str, lines: &[String], now: DateTime<Local>) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(&self.directory)?;
        let path = self.path_for(name, now.date_naive());
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        file.lock_exclusive()?;
        let timestamp = now.to_rfc3339();
        let mut buffer = String::new();
        for line in lines {
            buffer.push_str(&format!("[{timestamp}] {line}\n"));
        }
        let written = file.write_all(buffer.as_bytes()).and_then(|_| file.flush());
        file.unlock()?;
        written?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn appends_to_daily_file() {
        let temp = TempDir::new().unwrap();
        let audit = AuditLog::new(temp.path().join("logs"));
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();

        audit.append_at("groupsync", &["Add role: [vip:1]".to_string()], now).unwrap();
        audit.append_at("groupsync", &["Remove group: [vip:1]".to_string()], now).unwrap();

        let path = temp.path().join("logs").join("groupsync-2026-03-14.log");
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Add role: [vip:1]"));
        assert!(lines[1].starts_with('['));
    }

    #[test]
    fn days_roll_over_to_new_files() {
        let temp = TempDir::new().unwrap();
        let audit = AuditLog::new(temp.path());
        let first = Local.with_ymd_and_hms(2026, 3, 14, 23, 59, 0).unwrap();
        let second = Local.with_ymd_and_hms(2026, 3, 15, 0, 1, 0).unwrap();

        audit.append_at("nicknamesync", &["a".to_string()], first).unwrap();
        audit.append_at("nicknamesync", &["b".to_string()], second).unwrap();

        assert!(audit.path_for("nicknamesync", first.date_naive()).exists());
        assert!(audit.path_for("nicknamesync", second.date_naive()).exists());
    }

    #[test]
    fn empty_append_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let audit = AuditLog::new(temp.path().join("never"));

        audit.append("groupsync", &[]).unwrap();

        assert!(!audit.directory().exists());
    }
}
