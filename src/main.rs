use clap::{Parser, Subcommand};
use pgn_dataset::pipeline::{build_dataset, BuildDatasetCommand};
use std::error::Error;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds a rating-bucketed CSV of positions and played moves from a PGN archive
    BuildDataset(BuildDatasetCommand),
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    match args.command {
        Commands::BuildDataset(cmd) => build_dataset(cmd),
    }
}
