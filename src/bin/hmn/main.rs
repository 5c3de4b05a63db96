//! hmn CLI tool
//!
//! Command-line interface for inspecting and maintaining human-machine network snapshots.
//!
//! ## Commands
//!
//! - `summary <snapshot>`: Vertex and edge counts, clock and relationship types
//! - `check <snapshot>`: Bookkeeping audit, exits non-zero when the network is inconsistent
//! - `init <out>`: Write an empty network snapshot, optionally seeded from a config file
//! - `advance <snapshot> <seconds>`: Move the simulated clock and rewrite the snapshot
//!
//! The snapshot format (JSON or TOML) follows the file extension.

use clap::{Parser, Subcommand};
use hmn_core::{
    config::{NetworkConfigProvider, TomlConfigProvider},
    network::Network,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hmn")]
#[command(author, version, about = "A tool for inspecting human-machine network snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print vertex and edge counts, the clock and all relationship types
    Summary {
        /// Path to a .json or .toml snapshot
        snapshot: PathBuf,
    },

    /// Audit the bookkeeping between vertex edge sets and the master edge list
    Check {
        /// Path to a .json or .toml snapshot
        snapshot: PathBuf,
    },

    /// Write a new, empty network snapshot
    Init {
        /// Where to write the snapshot; the extension selects the format
        out: PathBuf,

        /// Network configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Network name, overrides the name from the config file
        #[arg(long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Advance the simulated clock of a snapshot
    Advance {
        /// Path to a .json or .toml snapshot
        snapshot: PathBuf,

        /// Seconds to move the clock by (may be negative)
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { snapshot } => {
            let network = Network::load(&snapshot)?;
            println!("{network}");
            println!("  agents:    {}", network.agents().len());
            println!("  artefacts: {}", network.artefacts().len());
            println!("  edges:     {}", network.edges().len());
            match network.current_time() {
                Some(time) => println!("  clock:     {}", time.to_rfc3339()),
                None => println!("  clock:     unset"),
            }
            let relations = network.relation_types();
            if relations.is_empty() {
                println!("  relations: none");
            } else {
                println!(
                    "  relations: {}",
                    relations.into_iter().collect::<Vec<_>>().join(", ")
                );
            }
        }

        Commands::Check { snapshot } => {
            let network = Network::load(&snapshot)?;
            let report = network.consistency_report();
            if report.is_empty() {
                println!("{network} is consistent");
            } else {
                println!("{network} has {} inconsistencies:", report.len());
                for error in report.iter() {
                    println!("  - {error}");
                }
                std::process::exit(1);
            }
        }

        Commands::Init {
            out,
            config,
            name,
            force,
        } => {
            if out.exists() && !force {
                eprintln!(
                    "Error: {} already exists, use --force to overwrite",
                    out.display()
                );
                std::process::exit(1);
            }
            let mut network_config = match config {
                Some(path) => TomlConfigProvider::new(path).get_config()?,
                None => Default::default(),
            };
            if let Some(name) = name {
                network_config.name = Some(name);
            }
            let network = Network::from_config(&network_config);
            network.save(&out)?;
            tracing::info!("Wrote {network} to {}", out.display());
        }

        Commands::Advance { snapshot, seconds } => {
            let mut network = Network::load(&snapshot)?;
            let time = network.advance_clock(seconds)?;
            network.save(&snapshot)?;
            println!("{}", time.to_rfc3339());
        }
    }

    Ok(())
}
