/// Configuration system for supportlens.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::SupportlensConfig::default()`]
/// 2. **User global config**: `~/.supportlens/config.toml`
/// 3. **Project local config**: `.supportlens.toml` in the current directory
/// 4. **Environment variables**: `SUPPORTLENS_*` overrides (highest precedence)
///
/// Layers are merged key by key: a file that only sets `ai.model` leaves
/// every other value from the previous layer in place.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::SupportlensConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Malformed or unreadable files are skipped so a bad config never stops the
/// dashboard from starting.
pub fn load() -> SupportlensConfig {
    let mut merged = toml::Value::try_from(SupportlensConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::map::Map::new()));

    for path in [global_config_path(), project_config_path()] {
        if let Some(layer) = load_toml_file(path) {
            merge_values(&mut merged, layer);
        }
    }

    let mut config: SupportlensConfig = merged.try_into().unwrap_or_default();
    apply_env_overrides(&mut config);
    config
}

/// Read a TOML file as a raw value tree.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`; tables merge, everything else
/// replaces.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.supportlens/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".supportlens").join("config.toml"))
}

/// Path to the project local config: `.supportlens.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".supportlens.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SUPPORTLENS_ADDR`: dashboard listen address
/// - `SUPPORTLENS_AI`: AI features on/off (`1`/`true`/`yes`/`on`)
/// - `SUPPORTLENS_API_KEY`: API key (falls back to `GEMINI_API_KEY`)
/// - `SUPPORTLENS_API_BASE`: API base URL
/// - `SUPPORTLENS_MODEL`: model name
/// - `SUPPORTLENS_LOGGING`: activity log on/off
fn apply_env_overrides(config: &mut SupportlensConfig) {
    if let Ok(val) = std::env::var("SUPPORTLENS_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Ok(val) = std::env::var("SUPPORTLENS_AI") {
        config.ai.enabled = is_truthy(&val);
    }

    let api_key = std::env::var("SUPPORTLENS_API_KEY")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty()));
    if let Some(key) = api_key {
        config.ai.api_key = key;
    }

    if let Ok(val) = std::env::var("SUPPORTLENS_API_BASE")
        && !val.is_empty()
    {
        config.ai.api_base = val;
    }
    if let Ok(val) = std::env::var("SUPPORTLENS_MODEL")
        && !val.is_empty()
    {
        config.ai.model = val;
    }
    if let Ok(val) = std::env::var("SUPPORTLENS_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.supportlens/config.toml`.
///
/// Returns an error if the file already exists and `force` is false.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.supportlens/ directory")?;
    }

    fs::write(&path, SupportlensConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single dotted key (e.g. `ai.model`) in the global config file.
///
/// Starts from the existing file, or from the defaults when there is none.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let toml_str = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SupportlensConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&toml_str).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Refuse to write something `load()` would silently discard.
    let _: SupportlensConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value is typed after the existing one; the key must already
/// exist in its section.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (section_path, leaf) = match key.rsplit_once('.') {
        Some((section, leaf)) => (Some(section), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        anyhow::bail!("empty config key");
    }

    let mut current = root;
    if let Some(section_path) = section_path {
        for part in section_path.split('.') {
            current = current
                .get_mut(part)
                .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
        }
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{}'", section_path.unwrap_or("")))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("config key '{key}' cannot be set from the command line"),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML, with the API key masked.
pub fn show_effective_config() -> Result<String> {
    let mut config = load();
    if config.has_api_key() {
        config.ai.api_key = "********".to_string();
    }
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
