use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::Dataset;
use crate::llm::CallOutcome;

// ---------------------------------------------------------------------------
// Activity log entry (JSONL)
// ---------------------------------------------------------------------------

/// Kind of event recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEvent {
    Analyze,
    Summary,
    Recommendations,
    Explain,
}

impl ActivityEvent {
    /// Whether this event is a round trip to the AI endpoint.
    pub fn is_remote_call(self) -> bool {
        !matches!(self, Self::Analyze)
    }
}

impl std::fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analyze => write!(f, "analyze"),
            Self::Summary => write!(f, "summary"),
            Self::Recommendations => write!(f, "recommendations"),
            Self::Explain => write!(f, "explain"),
        }
    }
}

/// Row counts of the three parsed collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub categories: usize,
    pub trending: usize,
    pub topics: usize,
}

impl RowCounts {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            categories: dataset.categories.len(),
            trending: dataset.trending.len(),
            topics: dataset.topics.len(),
        }
    }
}

/// A single line of `~/.supportlens/activity-log.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub timestamp: String,
    pub event: ActivityEvent,
    #[serde(default = "default_true")]
    pub success: bool,
    /// Round-trip latency (AI calls only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
    /// Parsed row counts (successful analyze actions only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rows: Option<RowCounts>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ActivityLogEntry {
    fn now(event: ActivityEvent) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            event,
            success: true,
            latency_ms: None,
            rows: None,
            error: None,
        }
    }

    /// Entry for an analyze action.
    pub fn analysis<E: std::fmt::Display>(result: Result<RowCounts, &E>) -> Self {
        let mut entry = Self::now(ActivityEvent::Analyze);
        match result {
            Ok(rows) => entry.rows = Some(rows),
            Err(e) => {
                entry.success = false;
                entry.error = Some(e.to_string());
            }
        }
        entry
    }

    /// Entry for one AI round trip.
    pub fn remote_call(event: ActivityEvent, outcome: &CallOutcome) -> Self {
        let mut entry = Self::now(event);
        entry.latency_ms = Some(outcome.latency_ms);
        if let Err(e) = &outcome.result {
            entry.success = false;
            entry.error = Some(e.to_string());
        }
        entry
    }
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Log an analyze action. Failures to write are ignored.
///
/// The caller checks `logging.enabled`; these functions always write.
pub fn log_analysis<E: std::fmt::Display>(result: Result<RowCounts, &E>) {
    record(&ActivityLogEntry::analysis(result));
}

/// Log one AI round trip. Failures to write are ignored.
pub fn log_remote_call(event: ActivityEvent, outcome: &CallOutcome) {
    record(&ActivityLogEntry::remote_call(event, outcome));
}

fn record(entry: &ActivityLogEntry) {
    let _ = append_log_entry(entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries. Malformed lines are skipped; a missing file reads as
/// empty.
pub fn read_all_entries() -> Vec<ActivityLogEntry> {
    let Some(path) = activity_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<ActivityLogEntry>(&line).ok())
        .collect()
}

/// Read entries from the last N days (all entries if `days` is `None`).
pub fn read_entries_since_days(days: Option<u32>) -> Vec<ActivityLogEntry> {
    let entries = read_all_entries();

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &ActivityLogEntry) -> Result<()> {
    let Some(path) = activity_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the activity log file.
pub fn activity_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".supportlens").join("activity-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputError, RemoteCallError};

    #[test]
    fn analysis_entry_records_row_counts() {
        let dataset = Dataset {
            topics: crate::parse::normalize_topics("Topic\tViews\na\t1\nb\t2"),
            ..Dataset::default()
        };
        let entry = ActivityLogEntry::analysis::<InputError>(Ok(RowCounts::of(&dataset)));
        assert!(entry.success);
        assert_eq!(
            entry.rows,
            Some(RowCounts {
                categories: 0,
                trending: 0,
                topics: 2
            })
        );
    }

    #[test]
    fn failed_analysis_entry_keeps_message() {
        let entry = ActivityLogEntry::analysis::<InputError>(Err(&InputError::NoData));
        assert!(!entry.success);
        assert!(entry.rows.is_none());
        assert!(entry.error.unwrap().starts_with("No data provided"));
    }

    #[test]
    fn remote_call_entry_serializes_compactly() {
        let outcome = CallOutcome {
            result: Err(RemoteCallError::Status { status: 429 }),
            latency_ms: 120,
        };
        let entry = ActivityLogEntry::remote_call(ActivityEvent::Summary, &outcome);
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"event\":\"summary\""));
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"latency_ms\":120"));
        assert!(!json.contains("rows"));
    }

    #[test]
    fn entry_without_optional_fields_deserializes() {
        let line = r#"{"timestamp":"2026-01-02T03:04:05+00:00","event":"explain"}"#;
        let entry: ActivityLogEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.event, ActivityEvent::Explain);
        assert!(entry.success);
        assert!(entry.latency_ms.is_none());
    }

    #[test]
    fn only_analyze_is_local() {
        assert!(!ActivityEvent::Analyze.is_remote_call());
        assert!(ActivityEvent::Explain.is_remote_call());
    }
}
