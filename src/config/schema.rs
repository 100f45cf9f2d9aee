/// Configuration schema and defaults for supportlens.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[server]`, `[ai]` and `[logging]`.
///
/// Every field has a built-in default; config files only need the values
/// they want to change.
use serde::{Deserialize, Serialize};

/// Default listen address for the web dashboard.
pub const DEFAULT_ADDR: &str = "127.0.0.1:9747";

/// Default base URL of the generative-language API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level supportlens configuration.
///
/// Maps to `~/.supportlens/config.toml` and `.supportlens.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportlensConfig {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Web dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (`host:port`).
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [ai]
// ---------------------------------------------------------------------------

/// Generative-language API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether AI summary, recommendations and explanations are offered.
    pub enabled: bool,
    /// API base URL, without a trailing `/models/...` path.
    pub api_base: String,
    /// Model used for every request.
    pub model: String,
    /// API key sent as the `key` query parameter. Prefer the
    /// `SUPPORTLENS_API_KEY` environment variable over storing it here.
    pub api_key: String,
    /// How many topics and search terms feed the summary prompt.
    pub summary_top_n: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            summary_top_n: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Activity log and console output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append events to `~/.supportlens/activity-log.jsonl`.
    pub enabled: bool,
    /// Print one line per HTTP request while serving.
    pub access_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            access_log: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl SupportlensConfig {
    /// The annotated config file written by `supportlens config init`.
    pub fn default_toml() -> String {
        r#"# supportlens configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SUPPORTLENS_*)
#   2. Project config (.supportlens.toml in current directory)
#   3. User global config (~/.supportlens/config.toml)
#   4. Built-in defaults

[server]
addr = "127.0.0.1:9747"
open_browser = true

[ai]
enabled = true
api_base = "https://generativelanguage.googleapis.com/v1beta"
model = "gemini-2.0-flash"
api_key = ""          # Or set SUPPORTLENS_API_KEY / GEMINI_API_KEY
summary_top_n = 5     # Topics and search terms quoted in the summary prompt

[logging]
enabled = true        # Metadata-only activity log (~/.supportlens/activity-log.jsonl)
access_log = true     # One console line per dashboard request
"#
        .to_string()
    }

    /// Whether a usable API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.ai.api_key.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
