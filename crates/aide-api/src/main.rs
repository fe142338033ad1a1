//! `aide` entry point.
//!
//! Parses CLI arguments, sets up tracing, loads configuration and dispatches
//! to the chosen command. With no subcommand an interactive chat starts.

mod cli;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    aide_observe::init_tracing(
        cli.otel,
        aide_observe::filter_for_verbosity(cli.quiet, cli.verbose),
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let command = cli.command.clone().unwrap_or(Commands::Chat);

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(shell, &mut cmd, "aide", &mut std::io::stdout());
        return Ok(());
    }

    let config = cli::load_settings(cli.config.as_deref()).await?;

    let result = match command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(config).await,
        Commands::Ask { text, no_context } => {
            cli::ask::ask(&config, &text.join(" "), !no_context, cli.json).await
        }
        Commands::Check { ping } => cli::check::check(&config, ping, cli.json).await,
        Commands::Completions { .. } => Ok(()),
    };

    aide_observe::shutdown_tracing();
    result
}
