//! `Ini` to [`ConfigFile`] conversion.
//!
//! The one place where INI key names map to struct fields. Starts from the
//! defaults and overlays whatever the file sets; blank values keep defaults.

use ini::{Ini, Properties};
use std::path::PathBuf;

use super::file::{ConfigFile, ConfigFileError};
use crate::coord::MAX_ZOOM;
use crate::overzoom::OverzoomPolicy;

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = non_empty(section, "directory") {
            config.source.directory = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section, "mbtiles") {
            if config.source.directory.is_some() {
                return Err(invalid(
                    "source",
                    "mbtiles",
                    v,
                    "set either directory or mbtiles, not both",
                ));
            }
            config.source.mbtiles = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section, "template") {
            if !["{x}", "{y}", "{z}"].iter().all(|p| v.contains(p)) {
                return Err(invalid(
                    "source",
                    "template",
                    v,
                    "must contain {x}, {y} and {z}",
                ));
            }
            config.source.template = v.to_string();
        }
        if let Some(v) = non_empty(section, "max_zoom") {
            let zoom: u8 = v.parse().map_err(|_| {
                invalid("source", "max_zoom", v, "must be an integer from 0 to 30")
            })?;
            if zoom > MAX_ZOOM {
                return Err(invalid(
                    "source",
                    "max_zoom",
                    v,
                    "must be an integer from 0 to 30",
                ));
            }
            config.source.max_zoom = Some(zoom);
        }
        if let Some(v) = non_empty(section, "unknown_max_zoom") {
            config.source.unknown_max_zoom = v.parse::<OverzoomPolicy>().map_err(|_| {
                invalid(
                    "source",
                    "unknown_max_zoom",
                    v,
                    "must be 'passthrough' or 'fail'",
                )
            })?;
        }
    }

    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = non_empty(section, "capacity") {
            config.cache.capacity = v.parse().map_err(|_| {
                invalid(
                    "cache",
                    "capacity",
                    v,
                    "must be a non-negative integer (0 = unbounded)",
                )
            })?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expands a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
