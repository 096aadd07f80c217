//! Shared setup for command handlers: config, logging and the tile engine.

use crate::error::CliError;
use crate::source::{Source, SourceArgs, SourceLocation};
use overtile::config::ConfigFile;
use overtile::engine::TileEngine;
use overtile::log::TracingLogger;
use overtile::logging::{init_logging, LoggingGuard};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct CliRunner {
    _logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Loads the config (from `config_path` or the default location) and
    /// starts logging as configured.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!("overtile v{}: {} command", overtile::VERSION, command);
    }

    /// Opens the tile source named on the command line, else by the config.
    pub fn open_storage(&self, args: SourceArgs) -> Result<Source, CliError> {
        let location = source_location(args, &self.config)?;
        let storage = Source::open(&location, &self.config.source.template)?;
        info!(source = %location, "Opened tile source");
        Ok(storage)
    }

    pub fn create_engine(&self, storage: Source) -> TileEngine<Source> {
        TileEngine::new(
            storage,
            self.config.engine_config(),
            Arc::new(TracingLogger),
        )
    }
}

/// Flags win over the config; within each, an MBTiles archive wins over a
/// directory.
fn source_location(args: SourceArgs, config: &ConfigFile) -> Result<SourceLocation, CliError> {
    if let Some(path) = args.mbtiles {
        return Ok(SourceLocation::MbTiles(path));
    }
    if let Some(root) = args.source {
        return Ok(SourceLocation::Directory(root));
    }
    if let Some(path) = &config.source.mbtiles {
        return Ok(SourceLocation::MbTiles(path.clone()));
    }
    config
        .source
        .directory
        .clone()
        .map(SourceLocation::Directory)
        .ok_or(CliError::NoSource)
}
