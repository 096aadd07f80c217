//! User configuration stored in `~/.overtile/config.ini`.
//!
//! [`ConfigFile`] holds one settings struct per INI section. Parsing lives in
//! `parser`, serialization in `writer`.

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
pub use settings::{
    CacheSettings, LoggingSettings, SourceSettings, DEFAULT_CACHE_CAPACITY,
};
