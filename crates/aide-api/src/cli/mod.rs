//! CLI command definitions and shared setup for the `aide` binary.
//!
//! `aide` with no subcommand starts an interactive chat session.

pub mod ask;
pub mod chat;
pub mod check;

use std::path::{Path, PathBuf};
use std::time::Duration;

use aide_infra::config::{apply_env_overrides, load_config, load_config_file, resolve_data_dir};
use aide_infra::secret::env_lookup;
use aide_types::config::AideConfig;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// A proactive personal assistant for the terminal.
#[derive(Debug, Parser)]
#[command(name = "aide", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of the data directory.
    #[arg(long, global = true, env = "AIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Start an interactive session with proactive triggers (default).
    Chat,

    /// Ask a single question and print the answer. Triggers do not run.
    Ask {
        /// The question. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Skip the context providers for this question.
        #[arg(long)]
        no_context: bool,
    },

    /// Validate configuration, credentials, providers and triggers.
    Check {
        /// Also send a test exchange to the responder.
        #[arg(long)]
        ping: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// File configuration (explicit path, else the data directory) plus
/// `AIDE_*` environment overrides.
///
/// A missing or malformed file in the data directory falls back to defaults;
/// an explicit `--config` path must load.
pub async fn load_settings(config_path: Option<&Path>) -> anyhow::Result<AideConfig> {
    let mut config = match config_path {
        Some(path) => load_config_file(path).await?,
        None => load_config(&resolve_data_dir(env_lookup)).await,
    };
    apply_env_overrides(&mut config, env_lookup)?;
    Ok(config)
}

/// Spinner shown while waiting on the orchestrator. Hidden when stderr is
/// not a terminal.
pub fn thinking_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
