//! Source metadata parsed from key/value string pairs.

use super::StorageError;
use crate::coord::{CoordinatePair, GeoExtent};
use serde::Serialize;

/// Descriptive metadata a tile source may advertise.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SourceMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Format version string
    pub version: Option<String>,
    pub bounds: Option<GeoExtent>,
    pub center: Option<CoordinatePair>,
    pub min_zoom: Option<u8>,
    pub max_zoom: Option<u8>,
}

impl SourceMetadata {
    /// Builds metadata from `(key, value)` pairs as stored in tile archives.
    ///
    /// Keys are matched case-insensitively; unrecognised keys are ignored.
    /// `bounds` is `west,south,east,north` and `center` is `lon,lat[,zoom]`.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, StorageError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut metadata = SourceMetadata::default();

        for (key, value) in pairs {
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "bounds" => {
                    let v = parse_floats(key, value, 4)?;
                    if v[0] >= v[2] || v[1] >= v[3] {
                        return Err(invalid(key, value, "expected west < east and south < north"));
                    }
                    metadata.bounds = Some(GeoExtent {
                        west: v[0],
                        south: v[1],
                        east: v[2],
                        north: v[3],
                    });
                }
                "center" => {
                    let parts: Vec<&str> = value.split(',').collect();
                    if parts.len() < 2 {
                        return Err(invalid(key, value, "expected 'lon,lat' or 'lon,lat,zoom'"));
                    }
                    let v = parse_floats(key, &parts[..2].join(","), 2)?;
                    metadata.center = Some(CoordinatePair::new(v[0], v[1]));
                }
                "minzoom" => metadata.min_zoom = Some(parse_zoom(key, value)?),
                "maxzoom" => metadata.max_zoom = Some(parse_zoom(key, value)?),
                "name" => metadata.name = Some(value.to_string()),
                "description" => metadata.description = Some(value.to_string()),
                "version" => metadata.version = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(metadata)
    }

    /// Sets the maximum zoom.
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = Some(max_zoom);
        self
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> StorageError {
    StorageError::Metadata {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_floats(key: &str, value: &str, expected: usize) -> Result<Vec<f64>, StorageError> {
    let values = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(key, value, &e.to_string()))?;

    if values.len() != expected {
        return Err(invalid(
            key,
            value,
            &format!("expected {} comma-separated numbers", expected),
        ));
    }
    Ok(values)
}

fn parse_zoom(key: &str, value: &str) -> Result<u8, StorageError> {
    value
        .parse::<u8>()
        .map_err(|e| invalid(key, value, &e.to_string()))
}
