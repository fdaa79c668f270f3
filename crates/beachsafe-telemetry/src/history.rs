//! Append-only CSV log of predictions
//!
//! One row per prediction with the columns
//! `timestamp,beach,weather,crowd,tide,hazard,safety`. The header is written
//! only when the file is created.

use beachsafe_core::{Error, Result, SafetyLabel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp format used in the log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration for the prediction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// CSV log file
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Days covered by the trend summary
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            window_days: default_window_days(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("logs/safety_log.csv")
}

fn default_window_days() -> u32 {
    7
}

/// One logged prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub beach: String,
    pub weather: String,
    pub crowd: String,
    pub tide: String,
    pub hazard: String,
    pub safety: SafetyLabel,
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// CSV prediction log at a fixed path
#[derive(Debug, Clone)]
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.path.clone())
    }

    /// Log file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file and its directory if needed
    pub fn append(&self, record: &PredictionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| Error::history(format!("failed to write {}: {e}", self.path.display())))?;
        writer.flush()?;

        debug!(
            path = %self.path.display(),
            beach = %record.beach,
            safety = %record.safety,
            "Logged prediction"
        );
        Ok(())
    }

    /// Read every record; a missing log is empty
    pub fn read_all(&self) -> Result<Vec<PredictionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| Error::history(format!("failed to open {}: {e}", self.path.display())))?;

        reader
            .deserialize()
            .enumerate()
            .map(|(i, row)| {
                row.map_err(|e| {
                    Error::history(format!("{}: bad row {}: {e}", self.path.display(), i + 1))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, safety: SafetyLabel) -> PredictionRecord {
        PredictionRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 12, day)
                .unwrap()
                .and_hms_opt(9, 30, 5)
                .unwrap(),
            beach: "Baga".into(),
            weather: "Sunny".into(),
            crowd: "High".into(),
            tide: "High".into(),
            hazard: "Glass".into(),
            safety,
        }
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("logs").join("safety_log.csv"));

        log.append(&record(1, SafetyLabel::Red)).unwrap();
        log.append(&record(2, SafetyLabel::Green)).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,beach,weather,crowd,tide,hazard,safety");
        assert_eq!(lines[1], "2025-12-01 09:30:05,Baga,Sunny,High,High,Glass,Red");
    }

    #[test]
    fn test_read_all_parses_records() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("safety_log.csv"));

        let written = vec![record(1, SafetyLabel::Red), record(3, SafetyLabel::Yellow)];
        for r in &written {
            log.append(r).unwrap();
        }

        assert_eq!(log.read_all().unwrap(), written);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("absent.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_bad_row_is_history_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("safety_log.csv");
        std::fs::write(
            &path,
            "timestamp,beach,weather,crowd,tide,hazard,safety\n\
             yesterday,Baga,Sunny,High,High,Glass,Red\n",
        )
        .unwrap();

        let err = PredictionLog::new(path).read_all().unwrap_err();
        assert!(matches!(err, Error::History(_)));
    }

    #[test]
    fn test_history_config_defaults() {
        let config = HistoryConfig::default();
        assert_eq!(config.path, PathBuf::from("logs/safety_log.csv"));
        assert_eq!(config.window_days, 7);
    }
}
