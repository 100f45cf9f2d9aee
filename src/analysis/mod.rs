//! Orchestration and derived aggregates over the parsed inputs.
//!
//! [`analyze`] runs the three parsers against their raw inputs and decides
//! whether there is anything to show. [`Aggregates`] and [`Dashboard`] are
//! the read-only views the dashboard (web or terminal) renders.

pub mod chart;

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::parse::{self, CategoryCount, TopicRecord, TrendingRecord};

use chart::{PieSlice, category_slices};

/// Shown as the top category when no keyword data was provided.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Inputs and parsed data
// ---------------------------------------------------------------------------

/// The three pasted tables, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputs {
    pub keywords: String,
    pub trending: String,
    pub topics: String,
}

/// Parsed collections produced by one analyze action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub categories: Vec<CategoryCount>,
    pub trending: Vec<TrendingRecord>,
    pub topics: Vec<TopicRecord>,
}

impl Dataset {
    /// True when none of the three collections holds a single entry.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.trending.is_empty() && self.topics.is_empty()
    }
}

/// Parse all three inputs.
///
/// Fails only when every collection comes out empty; one or two empty
/// inputs are accepted as partial data.
pub fn analyze(inputs: &RawInputs) -> Result<Dataset, InputError> {
    let dataset = Dataset {
        categories: parse::count_categories(&inputs.keywords),
        trending: parse::normalize_trending(&inputs.trending),
        topics: parse::normalize_topics(&inputs.topics),
    };

    if dataset.is_empty() {
        return Err(InputError::NoData);
    }

    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Headline figures for the KPI cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub total_topic_views: u64,
    pub total_searches: u64,
    /// Name of the largest category, or [`NOT_AVAILABLE`].
    pub top_category: String,
}

impl Aggregates {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            total_topic_views: saturating_total(dataset.topics.iter().map(|t| t.views)),
            total_searches: saturating_total(dataset.trending.iter().map(|t| t.searches)),
            top_category: top_category(&dataset.categories)
                .map_or_else(|| NOT_AVAILABLE.to_string(), |c| c.name.clone()),
        }
    }
}

/// Sum that stops at `u64::MAX` instead of overflowing.
pub(crate) fn saturating_total(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// The category with the largest count; the earliest one wins a tie.
pub fn top_category(categories: &[CategoryCount]) -> Option<&CategoryCount> {
    categories.iter().fold(None, |best, current| match best {
        Some(max) if current.value <= max.value => Some(max),
        _ => Some(current),
    })
}

// ---------------------------------------------------------------------------
// Dashboard view
// ---------------------------------------------------------------------------

/// Everything the results view renders, derived from one [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub aggregates: Aggregates,
    pub category_slices: Vec<PieSlice>,
    pub topics: Vec<TopicRecord>,
    pub trending: Vec<TrendingRecord>,
}

impl Dashboard {
    pub fn build(dataset: &Dataset) -> Self {
        Self {
            aggregates: Aggregates::from_dataset(dataset),
            category_slices: category_slices(&dataset.categories),
            topics: dataset.topics.clone(),
            trending: dataset.trending.clone(),
        }
    }
}

/// Format an integer with thousands separators (`1234567` → `1,234,567`).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn count(name: &str, value: u64) -> CategoryCount {
        CategoryCount {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn top_category_prefers_first_maximum() {
        let counts = vec![count("A", 3), count("B", 5), count("C", 5)];
        assert_eq!(top_category(&counts).map(|c| c.name.as_str()), Some("B"));
    }

    #[test]
    fn top_category_of_empty_is_none() {
        assert!(top_category(&[]).is_none());
        let agg = Aggregates::from_dataset(&Dataset::default());
        assert_eq!(agg.top_category, NOT_AVAILABLE);
        assert_eq!(agg.total_searches, 0);
        assert_eq!(agg.total_topic_views, 0);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let inputs = RawInputs {
            trending: "Term\tSearches\tCTR\na\t18446744073709551615\t1\nb\t1\t1".to_string(),
            topics: "Topic\tViews\na\t18446744073709551615\nb\t1".to_string(),
            ..RawInputs::default()
        };
        let dataset = analyze(&inputs).unwrap();
        assert_eq!(dataset.topics[0].views, u64::MAX);

        let agg = Aggregates::from_dataset(&dataset);
        assert_eq!(agg.total_topic_views, u64::MAX);
        assert_eq!(agg.total_searches, u64::MAX);
    }

    #[test]
    fn analyze_rejects_all_empty_inputs() {
        assert_eq!(analyze(&RawInputs::default()), Err(InputError::NoData));
    }

    #[test]
    fn analyze_rejects_header_only_inputs() {
        let inputs = RawInputs {
            keywords: "Category\tKeyword".to_string(),
            trending: "Term\tSearches\tCTR".to_string(),
            topics: "Topic\tViews".to_string(),
        };
        assert_eq!(analyze(&inputs), Err(InputError::NoData));
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }
}
