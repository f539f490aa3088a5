//! Append-only audit log of successful sends.
//!
//! Each line is `<partition_key>,<YYYY-MM-DD HH:MM:SS.mmm>`. The file is
//! opened and closed on every write; concurrent writers rely on the
//! operating system's append semantics.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp format of audit log lines (millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for a successful send.
    pub fn append<Tz>(&self, partition_key: &str, timestamp: &DateTime<Tz>) -> std::io::Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let line = format!("{},{}\n", partition_key, format_timestamp(timestamp));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Single write so concurrent appenders do not interleave within a line
        file.write_all(line.as_bytes())
    }
}

pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn fixed_time() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 7, 42)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&fixed_time()), "2024-03-09 14:05:07.042");
    }

    #[test]
    fn test_append_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("kinesis.csv"));

        log.append("0xabc", &fixed_time()).unwrap();
        log.append("0xdef", &fixed_time()).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "0xabc,2024-03-09 14:05:07.042\n0xdef,2024-03-09 14:05:07.042\n"
        );
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("missing").join("kinesis.csv"));

        assert!(log.append("0xabc", &fixed_time()).is_err());
    }
}
