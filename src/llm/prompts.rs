//! Prompt templates for the three AI features.
//!
//! - [`summary_prompt`]: problem summary from the leading topics and searches
//! - [`recommendations_prompt`]: follow-up actions quoting that summary
//! - [`explanation_prompt`]: beginner explanation of one topic

use crate::parse::{TopicRecord, TrendingRecord};

/// `'<topic>' (<views> views)` for the first `top_n` topics, comma-joined.
pub fn top_topics_text(topics: &[TopicRecord], top_n: usize) -> String {
    topics
        .iter()
        .take(top_n)
        .map(|t| format!("'{}' ({} views)", t.topic, t.views))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `'<term>' (<searches> searches)` for the first `top_n` terms, comma-joined.
pub fn top_searches_text(trending: &[TrendingRecord], top_n: usize) -> String {
    trending
        .iter()
        .take(top_n)
        .map(|s| format!("'{}' ({} searches)", s.term, s.searches))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Step one of the analysis pipeline.
///
/// Uses the first `top_n` rows in pasted order, not the highest counts;
/// support exports are usually sorted already.
pub fn summary_prompt(topics: &[TopicRecord], trending: &[TrendingRecord], top_n: usize) -> String {
    format!(
        "You are a data analyst for a developer support team. Based on the following data, \
         write a concise summary of the main user problems. Top viewed topics: {}. \
         Top search terms: {}.",
        top_topics_text(topics, top_n),
        top_searches_text(trending, top_n),
    )
}

/// Step two of the analysis pipeline, fed with step one's text.
pub fn recommendations_prompt(summary: &str) -> String {
    format!(
        "Based on this analysis of user problems: \"{summary}\", suggest 3-5 concrete, \
         actionable recommendations for the support team to improve documentation and \
         reduce user friction."
    )
}

pub fn explanation_prompt(topic: &str) -> String {
    format!(
        "You are a helpful assistant for developers. Explain the following topic to a \
         beginner developer in a clear and simple way. If it is an error message, explain \
         the common causes and how to fix it. If it is a concept, provide a simple code \
         example if relevant. The topic is: \"{topic}\""
    )
}
