//! Playlens CLI - Command-line interface for the profiling engine
//!
//! Commands:
//! - summary: Fetch and print library summary + achievement breakdown
//! - profile: Run the full pipeline and print the four-axis profile report
//!
//! Requires `STEAM_API_KEY` in the environment.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use playlens::{
    classify, Aggregator, AggregatorConfig, GatewayConfig, ProfileReport, RemoteServiceError,
    SteamGateway, PLAYLENS_VERSION,
};

/// Playlens - Play-behavior profiling engine for Steam library statistics
#[derive(Parser)]
#[command(name = "playlens")]
#[command(version = PLAYLENS_VERSION)]
#[command(about = "Profile a player's Steam library", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Worker pool width for achievement lookups
    #[arg(long, default_value = "4", global = true)]
    workers: usize,

    /// Per-worker delay between achievement lookups, in milliseconds
    #[arg(long, default_value = "300", global = true)]
    delay_ms: u64,

    /// Pretty-print JSON output (defaults to on when stdout is a terminal)
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch library summary and achievement breakdown
    Summary {
        /// 64-bit Steam id of the player
        #[arg(long)]
        player_id: String,
    },

    /// Compute the full four-axis behavioral profile
    Profile {
        /// 64-bit Steam id of the player
        #[arg(long)]
        player_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("playlens=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), RemoteServiceError> {
    let gateway = SteamGateway::new(GatewayConfig::from_env()?)?;
    let config = AggregatorConfig::default()
        .with_workers(cli.workers)
        .with_per_call_delay(Duration::from_millis(cli.delay_ms));
    let aggregator = Aggregator::with_config(Arc::new(gateway), config);

    let pretty = cli.pretty || atty::is(atty::Stream::Stdout);

    match cli.command {
        Commands::Summary { player_id } => {
            let (summary, breakdown) = aggregator.aggregate(&player_id).await?;
            let output = serde_json::json!({
                "summary": summary,
                "breakdown": breakdown,
            });
            print_json(&output, pretty);
        }

        Commands::Profile { player_id } => {
            let (summary, breakdown) = aggregator.aggregate(&player_id).await?;
            let profile = classify(&summary, &breakdown);
            let report = ProfileReport {
                computed_at: chrono::Utc::now(),
                player_id,
                summary,
                breakdown,
                profile,
            };
            let output = serde_json::to_value(&report).unwrap_or_default();
            print_json(&output, pretty);
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: failed to render output: {e}"),
    }
}
