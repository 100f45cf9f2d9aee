//! Chart-ready shapes: donut slices for the category breakdown and ranked
//! bars for the topic and search lists.

use serde::Serialize;

use crate::parse::{CategoryCount, TopicRecord, TrendingRecord};

/// Slice colours, reused cyclically once there are more than eight categories.
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#6366F1", "#818CF8", "#A5B4FC", "#C7D2FE", "#F87171", "#34D399", "#A78BFA", "#FBBF24",
];

/// One slice of the category donut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
    /// Share of all keywords, 0–100.
    pub percent: f64,
    pub color: &'static str,
}

impl PieSlice {
    /// Percentage label with two decimals, e.g. `"42.86%"`.
    pub fn percent_label(&self) -> String {
        format!("{:.2}%", self.percent)
    }
}

/// A labelled horizontal bar scaled against the largest value in its list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    /// `value / max`, in `0.0..=1.0`.
    pub ratio: f64,
}

pub fn category_slices(categories: &[CategoryCount]) -> Vec<PieSlice> {
    let total = super::saturating_total(categories.iter().map(|c| c.value));

    categories
        .iter()
        .enumerate()
        .map(|(i, c)| PieSlice {
            name: c.name.clone(),
            value: c.value,
            percent: share(c.value, total) * 100.0,
            color: CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()],
        })
        .collect()
}

/// The first `limit` topics, in pasted order.
pub fn topic_bars(topics: &[TopicRecord], limit: usize) -> Vec<Bar> {
    bars(topics.iter().take(limit).map(|t| (t.topic.as_str(), t.views)))
}

/// The first `limit` search terms, in pasted order.
pub fn search_bars(trending: &[TrendingRecord], limit: usize) -> Vec<Bar> {
    bars(trending.iter().take(limit).map(|t| (t.term.as_str(), t.searches)))
}

fn bars<'a>(items: impl Iterator<Item = (&'a str, u64)> + Clone) -> Vec<Bar> {
    let max = items.clone().map(|(_, v)| v).max().unwrap_or(0);
    items
        .map(|(label, value)| Bar {
            label: label.to_string(),
            value,
            ratio: share(value, max),
        })
        .collect()
}

fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_carry_percent_and_cycle_palette() {
        let categories: Vec<CategoryCount> = (0..9)
            .map(|i| CategoryCount {
                name: format!("c{i}"),
                value: if i == 0 { 2 } else { 1 },
            })
            .collect();
        let slices = category_slices(&categories);

        assert_eq!(slices.len(), 9);
        assert_eq!(slices[0].percent_label(), "20.00%");
        assert_eq!(slices[1].percent_label(), "10.00%");
        assert_eq!(slices[8].color, slices[0].color);
        let total: f64 = slices.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn bars_scale_against_max_and_respect_limit() {
        let topics = vec![
            TopicRecord {
                topic: "a".to_string(),
                views: 50,
            },
            TopicRecord {
                topic: "b".to_string(),
                views: 100,
            },
            TopicRecord {
                topic: "c".to_string(),
                views: 500,
            },
        ];
        let bars = topic_bars(&topics, 2);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].ratio, 0.5);
        assert_eq!(bars[1].ratio, 1.0);
    }

    #[test]
    fn huge_category_counts_do_not_overflow_total() {
        let categories = vec![
            CategoryCount {
                name: "a".to_string(),
                value: u64::MAX,
            },
            CategoryCount {
                name: "b".to_string(),
                value: 1,
            },
        ];
        let slices = category_slices(&categories);
        assert_eq!(slices[0].percent_label(), "100.00%");
    }

    #[test]
    fn all_zero_values_give_zero_ratios() {
        let trending = vec![TrendingRecord {
            term: "x".to_string(),
            searches: 0,
            ctr: 0.0,
        }];
        assert_eq!(search_bars(&trending, 5)[0].ratio, 0.0);
        assert!(category_slices(&[]).is_empty());
    }
}
