//! Activity reporter: aggregates the JSONL activity log for
//! `supportlens activity`.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::activity::logger::{self, ActivityEvent, ActivityLogEntry};

// ---------------------------------------------------------------------------
// Aggregated activity
// ---------------------------------------------------------------------------

/// Per-event-kind totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventStat {
    pub event: ActivityEvent,
    pub count: usize,
    pub successes: usize,
    /// Mean latency over entries that recorded one.
    pub avg_latency_ms: Option<u64>,
}

impl EventStat {
    /// Success rate in percent; 0.0 with no entries.
    pub fn success_pct(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.successes as f64 / self.count as f64) * 100.0
        }
    }
}

/// Events on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    pub date: String,
    pub analyses: usize,
    pub ai_calls: usize,
    pub failures: usize,
}

/// Summary for `supportlens activity`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub total_events: usize,
    pub events: Vec<EventStat>,
    pub daily: Vec<DailyActivity>,
}

/// Summarise the log, optionally limited to the last `days` days.
pub fn compute_summary(days: Option<u32>) -> ActivitySummary {
    let entries = logger::read_entries_since_days(days);
    summarize_entries(&entries)
}

pub fn summarize_entries(entries: &[ActivityLogEntry]) -> ActivitySummary {
    ActivitySummary {
        total_events: entries.len(),
        events: event_stats(entries),
        daily: daily_activity(entries),
    }
}

/// One [`EventStat`] per event kind present, in declaration order.
fn event_stats(entries: &[ActivityLogEntry]) -> Vec<EventStat> {
    let mut groups: BTreeMap<ActivityEvent, Vec<&ActivityLogEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.event).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(event, group)| {
            let latencies: Vec<u64> = group.iter().filter_map(|e| e.latency_ms).collect();
            let avg_latency_ms = if latencies.is_empty() {
                None
            } else {
                Some(latencies.iter().sum::<u64>() / latencies.len() as u64)
            };

            EventStat {
                event,
                count: group.len(),
                successes: group.iter().filter(|e| e.success).count(),
                avg_latency_ms,
            }
        })
        .collect()
}

/// Group by the date prefix of the RFC 3339 timestamp, oldest first.
fn daily_activity(entries: &[ActivityLogEntry]) -> Vec<DailyActivity> {
    let mut daily: HashMap<String, DailyActivity> = HashMap::new();
    for entry in entries {
        let date = entry.timestamp.get(..10).unwrap_or("unknown").to_string();
        let day = daily.entry(date.clone()).or_insert_with(|| DailyActivity {
            date,
            analyses: 0,
            ai_calls: 0,
            failures: 0,
        });

        if entry.event.is_remote_call() {
            day.ai_calls += 1;
        } else {
            day.analyses += 1;
        }
        if !entry.success {
            day.failures += 1;
        }
    }

    let mut days: Vec<DailyActivity> = daily.into_values().collect();
    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, event: ActivityEvent, success: bool, latency_ms: Option<u64>) -> ActivityLogEntry {
        ActivityLogEntry {
            timestamp: ts.to_string(),
            event,
            success,
            latency_ms,
            rows: None,
            error: None,
        }
    }

    fn sample_entries() -> Vec<ActivityLogEntry> {
        vec![
            entry("2026-03-01T09:00:00+00:00", ActivityEvent::Analyze, true, None),
            entry("2026-03-01T09:01:00+00:00", ActivityEvent::Summary, true, Some(1200)),
            entry("2026-03-01T09:01:02+00:00", ActivityEvent::Recommendations, true, Some(800)),
            entry("2026-03-02T10:00:00+00:00", ActivityEvent::Analyze, false, None),
            entry("2026-03-02T10:05:00+00:00", ActivityEvent::Summary, false, Some(400)),
            entry("2026-03-02T10:06:00+00:00", ActivityEvent::Explain, true, Some(900)),
        ]
    }

    #[test]
    fn event_stats_group_and_average() {
        let summary = summarize_entries(&sample_entries());
        assert_eq!(summary.total_events, 6);

        let kinds: Vec<ActivityEvent> = summary.events.iter().map(|s| s.event).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityEvent::Analyze,
                ActivityEvent::Summary,
                ActivityEvent::Recommendations,
                ActivityEvent::Explain
            ]
        );

        let summary_stat = &summary.events[1];
        assert_eq!(summary_stat.count, 2);
        assert_eq!(summary_stat.successes, 1);
        assert_eq!(summary_stat.avg_latency_ms, Some(800));
        assert_eq!(summary_stat.success_pct(), 50.0);

        assert_eq!(summary.events[0].avg_latency_ms, None);
    }

    #[test]
    fn daily_activity_splits_local_and_remote() {
        let summary = summarize_entries(&sample_entries());
        assert_eq!(
            summary.daily,
            vec![
                DailyActivity {
                    date: "2026-03-01".to_string(),
                    analyses: 1,
                    ai_calls: 2,
                    failures: 0
                },
                DailyActivity {
                    date: "2026-03-02".to_string(),
                    analyses: 1,
                    ai_calls: 2,
                    failures: 2
                },
            ]
        );
    }

    #[test]
    fn empty_log_summarizes_to_nothing() {
        let summary = summarize_entries(&[]);
        assert_eq!(summary.total_events, 0);
        assert!(summary.events.is_empty());
        assert!(summary.daily.is_empty());
    }
}
