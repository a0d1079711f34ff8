//! Hex Galaxy Companion - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use galaxy_core::player::PlayerColor;
use galaxy_core::random::RngSource;
use galaxy_tools::preview::{layout_report, sample_sectors};
use galaxy_tools::validate::{validate_data_directory, validate_standard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "galaxy-tools")]
#[command(about = "Development tools for the hex galaxy companion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate catalog data files
    Validate {
        /// Directory holding parts.ron, techs.ron, blueprints.ron and
        /// discoveries.ron. Checks the built-in catalog when omitted.
        path: Option<PathBuf>,
    },
    /// Print the starting board for a set of players
    Layout {
        /// Player colors in seating order
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        players: Vec<PlayerColor>,
        /// Seed for the research tray draw
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Print RON instead of JSON
        #[arg(long)]
        ron: bool,
    },
    /// Generate sample sectors for one ring
    ExploreSample {
        /// Ring distance from the center
        #[arg(long)]
        ring: u32,
        /// Generator seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Number of sectors
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            let result = match &path {
                Some(path) => {
                    tracing::info!("Validating data files in: {}", path.display());
                    validate_data_directory(path)
                }
                None => {
                    tracing::info!("Validating built-in catalog");
                    validate_standard()
                }
            };
            match result {
                Ok(_) => tracing::info!("Validation passed"),
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Layout { players, seed, ron } => {
            let output = layout_report(&players, seed).and_then(|report| {
                if ron {
                    report.to_ron()
                } else {
                    report.to_json()
                }
            });
            match output {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    tracing::error!("Layout failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::ExploreSample { ring, seed, count } => {
            let mut rng = RngSource::seeded(seed);
            for summary in sample_sectors(ring, count, &mut rng) {
                println!("{summary}");
            }
        }
    }
}
