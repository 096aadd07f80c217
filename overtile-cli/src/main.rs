//! overtile CLI - inspect vector tile sources from the command line.

mod commands;
mod error;
mod runner;
mod source;

use clap::{Parser, Subcommand};
use error::CliError;
use runner::CliRunner;
use source::SourceArgs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "overtile", version = overtile::VERSION)]
#[command(about = "Resolve and inspect vector tiles, overzooming past the source's max zoom")]
struct Cli {
    /// Config file (default: ~/.overtile/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a tile through the engine and print it
    Tile {
        x: u32,
        y: u32,
        z: u8,
        #[command(flatten)]
        source: SourceArgs,
        /// Print the decoded tile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the tile source's metadata
    Info {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        json: bool,
    },

    /// Print the tile containing a coordinate
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        zoom: u8,
    },

    /// Copy one raw tile payload to a file
    Extract {
        x: u32,
        y: u32,
        z: u8,
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Locate is pure projection math and needs neither config nor logging.
    let command = match cli.command {
        Commands::Locate { lat, lon, zoom } => {
            commands::locate::run(lat, lon, zoom);
            return Ok(());
        }
        command => command,
    };

    let runner = CliRunner::new(cli.config.as_deref())?;

    match command {
        Commands::Tile {
            x,
            y,
            z,
            source,
            json,
        } => {
            let args = commands::tile::TileArgs {
                x,
                y,
                zoom: z,
                source,
                json,
            };
            commands::tile::run(&runner, args).await
        }
        Commands::Info { source, json } => commands::info::run(&runner, source, json),
        Commands::Extract {
            x,
            y,
            z,
            output,
            source,
        } => {
            let args = commands::extract::ExtractArgs {
                x,
                y,
                zoom: z,
                output,
                source,
            };
            commands::extract::run(&runner, args).await
        }
        Commands::Locate { .. } => Ok(()),
    }
}
