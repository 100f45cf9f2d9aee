//! Tab-separated table parsing for the three dashboard inputs.
//!
//! Every input is pasted straight from a spreadsheet: the first line is a
//! header and is always discarded, each remaining line is one data row and
//! fields are separated by a literal tab. There is no quoting or escaping.
//!
//! - [`count_categories`]: keyword table → per-category counts
//! - [`normalize_trending`]: trending-search table → typed records
//! - [`normalize_topics`]: top-topic table → typed records
//!
//! All three are pure and independent of each other.

pub mod numeric;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use numeric::parse_numeric_or_default;

// ---------------------------------------------------------------------------
// Parsed shapes
// ---------------------------------------------------------------------------

/// Occurrence count for one distinct category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: u64,
}

/// One row of the trending-searches table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingRecord {
    pub term: String,
    pub searches: u64,
    /// Click-through rate as pasted, e.g. `59.5` for `59.50%`.
    pub ctr: f64,
}

/// One row of the top-topics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub topic: String,
    pub views: u64,
}

// ---------------------------------------------------------------------------
// Line splitting
// ---------------------------------------------------------------------------

/// Data lines of a pasted table: everything after the header line.
///
/// Lines are split on `\n` only, so a trailing newline yields a final empty
/// row. A `\r` left over from a CRLF paste is dropped with the terminator.
fn data_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('\n')
        .skip(1)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// Count keyword rows per category, in first-seen order.
///
/// The category is the first tab field, compared by exact string equality.
/// Rows whose first field is empty are skipped.
pub fn count_categories(raw: &str) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for line in data_lines(raw) {
        let category = line.split('\t').next().unwrap_or("");
        if category.is_empty() {
            continue;
        }

        match index.get(category) {
            Some(&pos) => counts[pos].value += 1,
            None => {
                index.insert(category, counts.len());
                counts.push(CategoryCount {
                    name: category.to_string(),
                    value: 1,
                });
            }
        }
    }

    counts
}

/// Convert the trending-searches table into typed records.
///
/// Fields are `term`, `searches`, `ctr`; extra fields are ignored and
/// missing or unparseable numbers become zero.
pub fn normalize_trending(raw: &str) -> Vec<TrendingRecord> {
    data_lines(raw)
        .map(|line| {
            let mut fields = line.split('\t');
            let term = fields.next().unwrap_or("").to_string();
            TrendingRecord {
                term,
                searches: parse_numeric_or_default(fields.next()),
                ctr: parse_numeric_or_default(fields.next()),
            }
        })
        .collect()
}

/// Convert the top-topics table into typed records.
pub fn normalize_topics(raw: &str) -> Vec<TopicRecord> {
    data_lines(raw)
        .map(|line| {
            let mut fields = line.split('\t');
            let topic = fields.next().unwrap_or("").to_string();
            TopicRecord {
                topic,
                views: parse_numeric_or_default(fields.next()),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
