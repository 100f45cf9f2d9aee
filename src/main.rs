use anyhow::Result;
use clap::{Parser, Subcommand};

use supportlens::cli::{self, OutputFormat, ReportSources};
use supportlens::{config, web};

#[derive(Debug, Parser)]
#[command(name = "supportlens")]
#[command(about = "Support analytics dashboard with AI-generated insights")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web dashboard
    Serve {
        /// Address to listen on (overrides server.addr)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open the dashboard in a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Analyse tab-separated files and print the dashboard
    Report {
        /// Keyword categories table (Category, Keyword); `-` reads stdin
        #[arg(long)]
        keywords: Option<String>,
        /// Trending searches table (Term, Searches, CTR); `-` reads stdin
        #[arg(long)]
        trending: Option<String>,
        /// Top topics table (Topic, Views); `-` reads stdin
        #[arg(long)]
        topics: Option<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Append an AI summary and recommendations
        #[arg(long)]
        ai: bool,
    },
    /// Explain a support topic with AI
    Explain {
        /// The topic or error message to explain
        #[arg(trailing_var_arg = true, required = true)]
        topic: Vec<String>,
    },
    /// Summarise the activity log
    Activity {
        /// Only include the last N days
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check AI configuration, config file and activity log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.supportlens/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value by dotted key, e.g. `ai.model gemini-2.0-flash`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_browser } => {
            let mut config = config::load();
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            let open = config.server.open_browser && !no_browser;
            web::serve(&config, open)
        }
        Commands::Report {
            keywords,
            trending,
            topics,
            format,
            ai,
        } => {
            let sources = ReportSources {
                keywords,
                trending,
                topics,
            };
            cli::run_report(&sources, OutputFormat::from_str_opt(Some(&format)), ai)
        }
        Commands::Explain { topic } => cli::run_explain(&topic.join(" ")),
        Commands::Activity { days, format } => {
            cli::run_activity(days, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
