//! CLI command implementations for supportlens.
//!
//! Provides subcommand handlers for:
//! - `supportlens report`: analyse TSV files and print the dashboard
//! - `supportlens explain "topic"`: AI explanation of one topic
//! - `supportlens activity`: summary of the activity log
//! - `supportlens health`: check AI configuration, config file, activity log
//! - `supportlens config show|init|set|reset`: configuration management

use std::fs;
use std::io::Read;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::activity::logger::{self, ActivityEvent, RowCounts};
use crate::activity::reporter::{self, ActivitySummary};
use crate::analysis::{self, Dashboard, RawInputs, chart, format_number};
use crate::config::{self, SupportlensConfig};
use crate::llm::{self, AnalysisOutcome, CallOutcome, TextGenerator, Unavailable};

/// Rows shown per ranked list in the terminal report.
const REPORT_LIST_LIMIT: usize = 10;
const BAR_WIDTH: usize = 24;

/// Output format for report and activity commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// supportlens report
// ---------------------------------------------------------------------------

/// Where each of the three tables is read from. `None` means "not supplied",
/// `"-"` means stdin.
#[derive(Debug, Clone, Default)]
pub struct ReportSources {
    pub keywords: Option<String>,
    pub trending: Option<String>,
    pub topics: Option<String>,
}

/// Analyse the given files and print the dashboard.
pub fn run_report(sources: &ReportSources, format: OutputFormat, with_ai: bool) -> Result<()> {
    let config = config::load();
    let inputs = read_inputs(sources)?;

    let result = analysis::analyze(&inputs);
    if config.logging.enabled {
        logger::log_analysis(result.as_ref().map(RowCounts::of));
    }
    let dataset = result?;
    let dashboard = Dashboard::build(&dataset);

    let ai = with_ai.then(|| run_pipeline(&config, &dataset));

    match format {
        OutputFormat::Json => print_report_json(&dashboard, ai.as_ref())?,
        OutputFormat::Table => {
            print_report_table(&dashboard);
            if let Some(outcome) = &ai {
                print_ai_section(outcome);
            }
        }
    }

    Ok(())
}

fn read_inputs(sources: &ReportSources) -> Result<RawInputs> {
    let stdin_count = [&sources.keywords, &sources.trending, &sources.topics]
        .iter()
        .filter(|s| s.as_deref() == Some("-"))
        .count();
    if stdin_count > 1 {
        anyhow::bail!("only one input can be read from stdin");
    }

    Ok(RawInputs {
        keywords: read_source(sources.keywords.as_deref())?,
        trending: read_source(sources.trending.as_deref())?,
        topics: read_source(sources.topics.as_deref())?,
    })
}

fn read_source(source: Option<&str>) -> Result<String> {
    match source {
        None => Ok(String::new()),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {path}")),
    }
}

/// Run summary → recommendations, logging each call.
fn run_pipeline(config: &SupportlensConfig, dataset: &analysis::Dataset) -> AnalysisOutcome {
    let client = llm::generator_from_config(&config.ai);
    let unavailable;
    let generator: &dyn TextGenerator = match &client {
        Ok(client) => client,
        Err(e) => {
            unavailable = Unavailable(e.clone());
            &unavailable
        }
    };
    let log = config.logging.enabled && client.is_ok();

    let outcome = llm::run_analysis_pipeline(generator, dataset, config.ai.summary_top_n, |summary| {
        if log {
            logger::log_remote_call(ActivityEvent::Summary, summary);
        }
    });
    if log {
        logger::log_remote_call(ActivityEvent::Recommendations, &outcome.recommendations);
    }

    outcome
}

fn print_report_table(dashboard: &Dashboard) {
    let agg = &dashboard.aggregates;

    println!("{}", "User Support & Activity Dashboard".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();
    println!("  {} {}", "#1 Problem Category:".bold(), agg.top_category);
    println!(
        "  {} {}",
        "Total Topic Views:  ".bold(),
        format_number(agg.total_topic_views)
    );
    println!(
        "  {} {}",
        "Total Searches:     ".bold(),
        format_number(agg.total_searches)
    );
    println!();

    if !dashboard.category_slices.is_empty() {
        println!("{}", "Problem Category Breakdown".bold().cyan());
        for slice in &dashboard.category_slices {
            println!(
                "  {:<28} {:>5} {:>8}  {}",
                truncate(&slice.name, 28),
                slice.value,
                slice.percent_label(),
                bar(slice.percent / 100.0, BAR_WIDTH).magenta()
            );
        }
        println!();
    }

    if !dashboard.topics.is_empty() {
        println!("{}", "Top Viewed Topics".bold().cyan());
        let bars = chart::topic_bars(&dashboard.topics, REPORT_LIST_LIMIT);
        for (i, b) in bars.iter().enumerate() {
            let line = format!(
                "  {:>2}. {:<40} {:>8}  {}",
                i + 1,
                truncate(&b.label, 40),
                format_number(b.value),
                bar(b.ratio, BAR_WIDTH)
            );
            if i % 2 == 0 {
                println!("{}", line);
            } else {
                println!("{}", line.dimmed());
            }
        }
        println!();
    }

    if !dashboard.trending.is_empty() {
        println!("{}", "Trending Searches".bold().cyan());
        println!("  {:<32} {:>9} {:>8}", "Term", "Searches", "CTR");
        println!("  {}", "-".repeat(51));
        let bars = chart::search_bars(&dashboard.trending, REPORT_LIST_LIMIT);
        for (b, t) in bars.iter().zip(&dashboard.trending) {
            println!(
                "  {:<32} {:>9} {:>7.2}%  {}",
                truncate(&b.label, 32),
                format_number(b.value),
                t.ctr,
                bar(b.ratio, BAR_WIDTH).blue()
            );
        }
        println!();
    }
}

fn print_ai_section(outcome: &AnalysisOutcome) {
    println!("{}", "Analysis Summary".bold().cyan());
    print_ai_text(&outcome.summary);
    println!();

    println!("{}", "Recommendations".bold().green());
    print_ai_text(&outcome.recommendations);
    println!();
}

fn print_ai_text(outcome: &CallOutcome) {
    let text = outcome.display_text();
    if outcome.is_success() {
        println!("{text}");
    } else {
        println!("{}", text.red());
    }
}

fn print_report_json(dashboard: &Dashboard, ai: Option<&AnalysisOutcome>) -> Result<()> {
    let mut value = serde_json::json!({ "dashboard": dashboard });
    if let Some(outcome) = ai {
        value["ai"] = serde_json::json!({
            "summary": outcome.summary.display_text(),
            "summary_ok": outcome.summary.is_success(),
            "recommendations": outcome.recommendations.display_text(),
            "recommendations_ok": outcome.recommendations.is_success(),
        });
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// supportlens explain
// ---------------------------------------------------------------------------

/// Print an AI explanation of one topic.
pub fn run_explain(topic: &str) -> Result<()> {
    let config = config::load();
    let outcome = match llm::generator_from_config(&config.ai) {
        Ok(client) => {
            let outcome = llm::explain_topic(&client, topic);
            if config.logging.enabled {
                logger::log_remote_call(ActivityEvent::Explain, &outcome);
            }
            outcome
        }
        Err(e) => llm::explain_topic(&Unavailable(e), topic),
    };

    let text = outcome.result?;
    println!("{}", topic.bold().cyan());
    println!("{}", "=".repeat(topic.chars().count().clamp(10, 60)));
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// supportlens activity
// ---------------------------------------------------------------------------

/// Summarise the activity log.
pub fn run_activity(days: Option<u32>, format: OutputFormat) -> Result<()> {
    let summary = reporter::compute_summary(days);

    if summary.total_events == 0 {
        println!(
            "{}",
            "No activity yet. Analyse some data to start the log.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => print_activity_table(&summary, days),
    }

    Ok(())
}

fn print_activity_table(summary: &ActivitySummary, days: Option<u32>) {
    let title = match days {
        Some(d) => format!("supportlens Activity, last {d} days"),
        None => "supportlens Activity".to_string(),
    };
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(50));
    println!("  {} {}", "Total events:".bold(), summary.total_events);
    println!();

    println!(
        "  {:<16} {:>6} {:>9} {:>12}",
        "Event", "Count", "Success", "Avg latency"
    );
    println!("  {}", "-".repeat(46));
    for stat in &summary.events {
        let latency = stat
            .avg_latency_ms
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<16} {:>6} {:>8.1}% {:>12}",
            stat.event.to_string(),
            stat.count,
            stat.success_pct(),
            latency
        );
    }
    println!();

    println!("{}", "By Day".bold().cyan());
    println!(
        "  {:<12} {:>9} {:>9} {:>9}",
        "Date", "Analyses", "AI calls", "Failures"
    );
    println!("  {}", "-".repeat(42));
    for day in &summary.daily {
        let line = format!(
            "  {:<12} {:>9} {:>9} {:>9}",
            day.date, day.analyses, day.ai_calls, day.failures
        );
        if day.failures > 0 {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }
}

// ---------------------------------------------------------------------------
// supportlens health
// ---------------------------------------------------------------------------

/// Check AI configuration, config files and the activity log.
pub fn run_health() -> Result<()> {
    println!("{}", "supportlens Health Check".bold().cyan());
    println!("{}", "=".repeat(50));

    let config = config::load();

    // 1. Config file
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Config file",
        config_exists,
        if config_exists {
            "~/.supportlens/config.toml"
        } else {
            "not found (using defaults)"
        },
    );

    // 2. AI backend
    match llm::generator_from_config(&config.ai) {
        Ok(client) => {
            print_health_item("AI backend", true, client.endpoint());
        }
        Err(e) => print_health_item("AI backend", false, &e.to_string()),
    }
    print_health_item("Model", config.ai.enabled, &config.ai.model);

    // 3. Activity log
    let log_exists = logger::activity_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let detail = if !config.logging.enabled {
        "disabled".to_string()
    } else if log_exists {
        format!("{} entries", logger::read_all_entries().len())
    } else {
        "no log file yet".to_string()
    };
    print_health_item("Activity log", log_exists, &detail);

    // 4. Server address
    print_health_item("Dashboard address", true, &config.server.addr);

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// supportlens config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective supportlens Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.supportlens/config.toml", global_exists);
    print_source(".supportlens.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SUPPORTLENS_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(label: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), label.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.supportlens/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    println!(
        "  {}",
        "Set SUPPORTLENS_API_KEY to enable AI features.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    let shown = if key == "ai.api_key" { "********" } else { value };
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), shown);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// A block bar `width` cells wide, filled to `ratio`.
fn bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(filled)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
