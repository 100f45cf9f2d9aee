/// AI summarisation layer.
///
/// Three independent round trips to a generative-language API:
///
/// 1. **Summary**: the leading topics and search terms, condensed into prose.
/// 2. **Recommendations**: 3–5 actions, built from step 1's text.
/// 3. **Explanation**: a beginner-level explanation of any one topic.
///
/// Steps 1 and 2 form a strict two-step pipeline ([`run_analysis_pipeline`]);
/// step 2 starts once step 1 has finished and is built from whatever step 1
/// displayed, including its `"Error: ..."` text. The explanation call is
/// unrelated to the pipeline and may run alongside it.
///
/// Every remote call goes through the [`TextGenerator`] seam so the pipeline
/// can be driven by a mock in tests.
use std::time::Instant;

use crate::analysis::Dataset;
use crate::config::schema::AiConfig;
use crate::error::RemoteCallError;

pub mod gemini;
pub mod prompts;

use gemini::GeminiClient;

/// Anything that turns a prompt into generated text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, RemoteCallError>;
}

/// Build the configured generator, or the reason AI features are unavailable.
pub fn generator_from_config(config: &AiConfig) -> Result<GeminiClient, RemoteCallError> {
    if !config.enabled {
        return Err(RemoteCallError::Disabled);
    }
    if config.api_key.trim().is_empty() {
        return Err(RemoteCallError::MissingApiKey);
    }
    Ok(GeminiClient::from_config(config))
}

/// Stand-in generator that fails every call with the same error.
#[derive(Debug, Clone)]
pub struct Unavailable(pub RemoteCallError);

impl TextGenerator for Unavailable {
    fn generate(&self, _prompt: &str) -> Result<String, RemoteCallError> {
        Err(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Call outcomes
// ---------------------------------------------------------------------------

/// Result of one remote call together with its wall-clock latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub result: Result<String, RemoteCallError>,
    pub latency_ms: u64,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The generated text, or `"Error: ..."` in its place.
    pub fn display_text(&self) -> String {
        match &self.result {
            Ok(text) => text.clone(),
            Err(e) => e.display_text(),
        }
    }
}

/// Run one prompt through the generator, timing it.
fn timed_call(generator: &dyn TextGenerator, prompt: &str) -> CallOutcome {
    let start = Instant::now();
    let result = generator.generate(prompt);
    CallOutcome {
        result,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Step 1: summarise the main user problems.
pub fn summarize(generator: &dyn TextGenerator, dataset: &Dataset, top_n: usize) -> CallOutcome {
    let prompt = prompts::summary_prompt(&dataset.topics, &dataset.trending, top_n);
    timed_call(generator, &prompt)
}

/// Step 2: recommendations for a summary produced by step 1.
pub fn recommend(generator: &dyn TextGenerator, summary: &str) -> CallOutcome {
    timed_call(generator, &prompts::recommendations_prompt(summary))
}

/// Explain one topic for a beginner.
pub fn explain_topic(generator: &dyn TextGenerator, topic: &str) -> CallOutcome {
    timed_call(generator, &prompts::explanation_prompt(topic))
}

/// Both steps of the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub summary: CallOutcome,
    pub recommendations: CallOutcome,
}

/// Summary, then recommendations built from its displayed text.
///
/// `on_summary` runs between the two calls so callers can publish step 1
/// before step 2 returns.
pub fn run_analysis_pipeline(
    generator: &dyn TextGenerator,
    dataset: &Dataset,
    top_n: usize,
    on_summary: impl FnOnce(&CallOutcome),
) -> AnalysisOutcome {
    let summary = summarize(generator, dataset, top_n);
    on_summary(&summary);
    let recommendations = recommend(generator, &summary.display_text());
    AnalysisOutcome {
        summary,
        recommendations,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<String, RemoteCallError>);

    impl TextGenerator for Fixed {
        fn generate(&self, _prompt: &str) -> Result<String, RemoteCallError> {
            self.0.clone()
        }
    }

    #[test]
    fn generator_requires_enabled_and_key() {
        let mut config = AiConfig::default();
        assert_eq!(
            generator_from_config(&config).unwrap_err(),
            RemoteCallError::MissingApiKey
        );

        config.api_key = "secret".to_string();
        assert!(generator_from_config(&config).is_ok());

        config.enabled = false;
        assert_eq!(
            generator_from_config(&config).unwrap_err(),
            RemoteCallError::Disabled
        );
    }

    #[test]
    fn failed_summary_still_requests_recommendations() {
        let generator = Fixed(Err(RemoteCallError::Status { status: 500 }));
        let mut seen = None;
        let outcome = run_analysis_pipeline(&generator, &Dataset::default(), 5, |summary| {
            seen = Some(summary.display_text());
        });
        assert!(!outcome.summary.is_success());
        assert_eq!(
            seen.as_deref(),
            Some("Error: API request failed with status 500")
        );
        assert!(!outcome.recommendations.is_success());
        assert_eq!(
            outcome.recommendations.display_text(),
            "Error: API request failed with status 500"
        );
    }

    #[test]
    fn unavailable_generator_fails_every_call() {
        let generator = Unavailable(RemoteCallError::MissingApiKey);
        let outcome = explain_topic(&generator, "Foo");
        assert!(outcome.display_text().starts_with("Error: no API key"));
    }
}
