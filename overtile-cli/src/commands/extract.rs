//! Extract command - copy one raw tile payload to a file.

use crate::error::CliError;
use crate::runner::CliRunner;
use crate::source::SourceArgs;
use overtile::coord::TileAddress;
use overtile::error::TileError;
use std::path::PathBuf;

pub struct ExtractArgs {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
    pub output: PathBuf,
    pub source: SourceArgs,
}

pub async fn run(runner: &CliRunner, args: ExtractArgs) -> Result<(), CliError> {
    runner.log_startup("extract");
    let storage = runner.open_storage(args.source)?;

    let address = TileAddress::new(args.x, args.y, args.zoom);
    address
        .validate()
        .map_err(|e| CliError::Tile(TileError::InvalidAddress(e)))?;

    let found = storage.extract_tile(&address, &args.output).await?;

    if !found {
        return Err(CliError::Tile(TileError::NotFound(address)));
    }

    println!("Wrote tile {} to {}", address, args.output.display());
    Ok(())
}
