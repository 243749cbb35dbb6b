/// Marquee - playlist playback engine from the command line
use clap::Parser;
use marquee_cli::{open_gateway, run, CliConfig, Command};
use marquee_playback::PlaybackEngine;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Manage playlists and drive playback", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./marquee.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "Loaded configuration");

    let gateway = open_gateway(&config).await?;
    let mut engine = PlaybackEngine::open(gateway, config.engine.clone()).await;

    let mut stdout = std::io::stdout().lock();
    run(&mut engine, cli.command, &mut stdout).await?;

    Ok(())
}
