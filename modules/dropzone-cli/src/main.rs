mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dropzone_analysis::export::to_pretty_json;
use dropzone_analysis::{export_match_analysis, export_player_stats, Analyzer};
use pubg_client::PubgClient;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "dropzone", about = "PUBG match telemetry analysis")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one match for the given players
    Analyze {
        /// Match id (GUID)
        match_id: String,
        /// In-game names to analyze
        #[arg(required = true)]
        players: Vec<String>,
        /// Write the JSON report to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Career stats over a player's recent matches
    Player {
        name: String,
        /// Print the flat match history instead of aggregate stats
        #[arg(long)]
        history: bool,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Compare career stats of two or more players
    Compare {
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dropzone=info,pubg_client=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "Report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = Config::from_env()?;
    let client = PubgClient::with_options(
        &config.pubg_api_key,
        &config.shard,
        &config.base_url,
        config.http_timeout,
    )
    .context("Failed to build PUBG API client")?;
    let analyzer = Analyzer::new(Arc::new(client));

    match cli.command {
        Command::Analyze {
            match_id,
            players,
            output,
        } => {
            let analysis = analyzer.analyze_match(&match_id, &players).await?;
            emit(&export_match_analysis(&analysis)?, output.as_deref())?;
        }
        Command::Player {
            name,
            history,
            output,
        } => {
            let json = if history {
                to_pretty_json(&analyzer.player_history(&name).await?)?
            } else {
                export_player_stats(&analyzer.player_stats(&name).await?)?
            };
            emit(&json, output.as_deref())?;
        }
        Command::Compare { names, output } => {
            let compared = analyzer.compare_players(&names).await?;
            emit(&to_pretty_json(&compared)?, output.as_deref())?;
        }
    }

    Ok(())
}
