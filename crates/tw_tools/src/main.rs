//! Tank Wars - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tw_core::censor::censorship;
use tw_core::grid::World;
use tw_core::map::MapDocument;
use tw_tools::render::{render, LEGEND};
use tw_tools::simulate::simulate;
use tw_tools::validate::{new_map, validate_map_file};
use tw_tools::ToolError;

#[derive(Parser)]
#[command(name = "tw-tools")]
#[command(about = "Development tools for Tank Wars")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a map file
    Validate {
        /// Path to the map (JSON)
        map: PathBuf,
    },
    /// Create a blank map
    NewMap {
        /// Width in tiles
        #[arg(long, default_value_t = 15)]
        width: usize,
        /// Height in tiles
        #[arg(long, default_value_t = 8)]
        height: usize,
        /// Seed for cosmetic variants
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Run a map headless and print a JSON summary
    Simulate {
        /// Path to the map (JSON)
        map: PathBuf,
        /// Ticks to run
        #[arg(short, long, default_value_t = 3000)]
        ticks: u64,
        /// Seed of the random source
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },
    /// Print a map as ASCII
    Render {
        /// Path to the map (JSON)
        map: PathBuf,
        /// Show only what this player sees
        #[arg(short, long)]
        player: Option<u8>,
    },
}

fn run(command: Commands) -> Result<(), ToolError> {
    match command {
        Commands::Validate { map } => {
            tracing::info!("Validating map: {}", map.display());
            let summary = validate_map_file(&map)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::NewMap {
            width,
            height,
            seed,
            out,
        } => {
            new_map(width, height, seed)?.save(&out)?;
            tracing::info!("Wrote {width}x{height} map to {}", out.display());
        }
        Commands::Simulate { map, ticks, seed } => {
            let world = World::from_map_file(&map)?;
            let summary = simulate(world, ticks, seed);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Render { map, player } => {
            let mut world = MapDocument::load(&map)?.to_world()?;
            if let Some(player) = player {
                // a single tick computes what the player can see
                let mut engine = tw_core::engine::Engine::with_seed(world, 0);
                engine.tick();
                world = censorship(engine.world(), player);
            }
            print!("{}", render(&world));
            println!("{LEGEND}");
        }
    }
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        tracing::error!("Failed: {e}");
        std::process::exit(1);
    }
}
