use thiserror::Error;

/// Raised by an analyze action when no input produced any data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(
        "No data provided or data is in an incorrect format. Please paste tab-separated data and try again."
    )]
    NoData,
}

/// Failure of a single round trip to the generative-language API.
///
/// None of these are retried; they are shown to the user in place of the
/// generated text via [`RemoteCallError::display_text`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteCallError {
    #[error("AI features are disabled (set ai.enabled = true)")]
    Disabled,

    #[error("no API key configured (set SUPPORTLENS_API_KEY or ai.api_key)")]
    MissingApiKey,

    #[error("API request failed with status {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Transport(String),

    #[error("Unexpected response format from the API.")]
    UnexpectedFormat,
}

impl RemoteCallError {
    /// Text shown in place of the content the call was supposed to produce.
    pub fn display_text(&self) -> String {
        format!("Error: {self}")
    }
}
