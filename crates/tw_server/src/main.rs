//! Tank Wars - Dedicated Server

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tw_core::grid::World;
use tw_server::{Result, ServerConfig, ServerError};

#[derive(Parser)]
#[command(name = "tw-server")]
#[command(about = "Dedicated Tank Wars server")]
#[command(version)]
struct Cli {
    /// RON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map file (JSON)
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Players needed to start (default: players on the map)
    #[arg(long)]
    max_players: Option<u8>,

    /// Ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Seed of the random source
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(map) = self.map {
            config.map = Some(map);
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.max_players.is_some() {
            config.max_players = self.max_players;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate = tick_rate;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    let map = config
        .map
        .clone()
        .ok_or_else(|| ServerError::InvalidConfig("no map given".to_string()))?;
    let world = World::from_map_file(&map)?;
    tracing::info!(map = %map.display(), players = world.player_count(), "map loaded");

    tw_server::server::serve(&config, world).await
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Tank Wars Dedicated Server");

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Server failed: {e}");
        std::process::exit(1);
    }
}
