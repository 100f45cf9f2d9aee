//! Application state for one dashboard session.
//!
//! All mutable UI state lives in [`AppState`]: the pasted inputs, the parsed
//! dataset, the last error and the AI panels. Event handlers mutate it;
//! [`AppState::view`] is the read-only projection the front ends render.
//!
//! The state never performs remote calls itself. The caller marks a call
//! as pending, runs it without holding any lock, then reports the result.

use serde::Serialize;

use crate::analysis::{self, Dashboard, Dataset, RawInputs};
use crate::error::InputError;

/// The explanation modal: open for one topic, text arrives later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub topic: String,
    /// `None` while the request is pending.
    pub text: Option<String>,
}

/// Why an analysis generation could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationBlocked {
    NotAnalyzed,
    AlreadyRunning,
}

impl std::fmt::Display for GenerationBlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnalyzed => write!(f, "no analysed data yet; run an analysis first"),
            Self::AlreadyRunning => write!(f, "an analysis is already being generated"),
        }
    }
}

/// Identifies one generation run. Results carrying an older id are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationId(u64);

#[derive(Debug, Clone, Default)]
pub struct AppState {
    inputs: RawInputs,
    /// `Some` once an analyze action succeeded: the results view is active.
    dataset: Option<Dataset>,
    error: Option<String>,
    summary: String,
    recommendations: String,
    is_generating: bool,
    generation: GenerationId,
    explanation: Option<Explanation>,
}

/// Serializable snapshot of [`AppState`].
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    pub inputs: RawInputs,
    pub analyzed: bool,
    pub dashboard: Option<Dashboard>,
    pub error: Option<String>,
    pub summary: String,
    pub recommendations: String,
    pub is_generating: bool,
    pub explanation: Option<Explanation>,
}

impl AppState {
    // -----------------------------------------------------------------------
    // Input view
    // -----------------------------------------------------------------------

    pub fn set_inputs(&mut self, inputs: RawInputs) {
        self.inputs = inputs;
    }

    pub fn inputs(&self) -> &RawInputs {
        &self.inputs
    }

    /// Parse the current inputs and switch to the results view.
    ///
    /// On [`InputError`] the error message is recorded and the state stays
    /// in (or returns to) the input view.
    pub fn analyze(&mut self) -> Result<&Dataset, InputError> {
        self.error = None;
        match analysis::analyze(&self.inputs) {
            Ok(dataset) => Ok(&*self.dataset.insert(dataset)),
            Err(e) => {
                self.error = Some(e.to_string());
                self.dataset = None;
                Err(e)
            }
        }
    }

    /// "Start over": back to an empty input view.
    ///
    /// An open explanation modal is left alone; it is closed separately.
    /// A generation still in flight is abandoned and its results discarded.
    pub fn reset(&mut self) {
        self.inputs = RawInputs::default();
        self.dataset = None;
        self.error = None;
        self.summary.clear();
        self.recommendations.clear();
        self.is_generating = false;
        self.generation = GenerationId(self.generation.0 + 1);
    }

    // -----------------------------------------------------------------------
    // Results view
    // -----------------------------------------------------------------------

    pub fn is_analyzed(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn dashboard(&self) -> Option<Dashboard> {
        self.dataset.as_ref().map(Dashboard::build)
    }

    // -----------------------------------------------------------------------
    // AI analysis panel
    // -----------------------------------------------------------------------

    /// Mark generation as running and hand back its id and the data to send.
    ///
    /// Clears the previous summary and recommendations.
    pub fn begin_generation(&mut self) -> Result<(GenerationId, Dataset), GenerationBlocked> {
        if self.is_generating {
            return Err(GenerationBlocked::AlreadyRunning);
        }
        let dataset = self.dataset.clone().ok_or(GenerationBlocked::NotAnalyzed)?;
        self.is_generating = true;
        self.generation = GenerationId(self.generation.0 + 1);
        self.summary.clear();
        self.recommendations.clear();
        Ok((self.generation, dataset))
    }

    /// Step 1 finished; generation stays pending until step 2 reports.
    pub fn finish_summary(&mut self, id: GenerationId, text: String) {
        if id == self.generation && self.is_generating {
            self.summary = text;
        }
    }

    pub fn finish_generation(&mut self, id: GenerationId, recommendations: String) {
        if id == self.generation && self.is_generating {
            self.recommendations = recommendations;
            self.is_generating = false;
        }
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn recommendations(&self) -> &str {
        &self.recommendations
    }

    // -----------------------------------------------------------------------
    // Explanation modal
    // -----------------------------------------------------------------------

    pub fn open_explanation(&mut self, topic: &str) {
        self.explanation = Some(Explanation {
            topic: topic.to_string(),
            text: None,
        });
    }

    /// Record an explanation; ignored if the modal was closed or switched
    /// to another topic meanwhile.
    pub fn finish_explanation(&mut self, topic: &str, text: String) {
        if let Some(explanation) = self.explanation.as_mut()
            && explanation.topic == topic
        {
            explanation.text = Some(text);
        }
    }

    pub fn close_explanation(&mut self) {
        self.explanation = None;
    }

    pub fn explanation(&self) -> Option<&Explanation> {
        self.explanation.as_ref()
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> StateView {
        StateView {
            inputs: self.inputs.clone(),
            analyzed: self.is_analyzed(),
            dashboard: self.dashboard(),
            error: self.error.clone(),
            summary: self.summary.clone(),
            recommendations: self.recommendations.clone(),
            is_generating: self.is_generating,
            explanation: self.explanation.clone(),
        }
    }
}
