//! Binary vector tile decoding.
//!
//! Turns a raw Mapbox Vector Tile payload, optionally gzip-wrapped, into a
//! [`VectorTile`] whose coordinates are normalized to the unit square by each
//! layer's declared extent.
//!
//! Compression is detected from the gzip magic bytes, never from a declared
//! content type. Decoding is pure, so results can be memoized by address.
//!
//! # Example
//!
//! ```
//! use overtile::decode::decode;
//!
//! // An empty protobuf message is a valid tile without layers.
//! let tile = decode(&[]).unwrap();
//! assert!(tile.layers.is_empty());
//! assert!(!tile.is_over_zoomed());
//! ```

mod collector;
mod types;

pub use types::{
    AttributeValue, GeometryKind, Point, VectorTile, VectorTileFeature, VectorTileLayer,
};

use flate2::read::GzDecoder;
use geozero::mvt::tile::{self, GeomType};
use geozero::mvt::{Message, Tile};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use thiserror::Error;
use tracing::debug;

/// Leading bytes of a gzip stream using deflate.
const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Errors raised when a payload is not a valid tile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Gzip signature present but the stream did not inflate
    #[error("Failed to decompress gzip payload: {0}")]
    Decompress(String),

    /// Payload is not a valid protobuf tile message
    #[error("Malformed tile protobuf: {0}")]
    Protobuf(String),

    /// Two layers share a name
    #[error("Duplicate layer name '{0}'")]
    DuplicateLayer(String),

    /// Layer declares a zero coordinate extent
    #[error("Layer '{0}' declares an extent of 0")]
    InvalidExtent(String),

    /// Feature tag list is odd-sized or points past the key/value tables
    #[error("Invalid attribute tags in layer '{layer}': {reason}")]
    InvalidTags { layer: String, reason: String },

    /// Geometry command stream is malformed
    #[error("Malformed geometry: {0}")]
    Geometry(String),
}

/// Returns true if the buffer starts with the gzip signature.
#[inline]
pub fn is_gzipped(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Decodes a raw tile payload.
///
/// # Errors
///
/// Returns [`DecodeError`] when the bytes are not a structurally valid tile.
pub fn decode(data: &[u8]) -> Result<VectorTile, DecodeError> {
    if is_gzipped(data) {
        let inflated = gunzip(data)?;
        decode_protobuf(&inflated)
    } else {
        decode_protobuf(data)
    }
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 4);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::Decompress(e.to_string()))?;
    Ok(out)
}

fn decode_protobuf(data: &[u8]) -> Result<VectorTile, DecodeError> {
    let raw = Tile::decode(data).map_err(|e| DecodeError::Protobuf(e.to_string()))?;

    let mut seen = HashSet::with_capacity(raw.layers.len());
    let mut layers = Vec::with_capacity(raw.layers.len());

    for layer in &raw.layers {
        if !seen.insert(layer.name.as_str()) {
            return Err(DecodeError::DuplicateLayer(layer.name.clone()));
        }
        layers.push(decode_layer(layer)?);
    }

    Ok(VectorTile::new(layers))
}

fn decode_layer(layer: &tile::Layer) -> Result<VectorTileLayer, DecodeError> {
    let extent = layer.extent();
    if extent == 0 {
        return Err(DecodeError::InvalidExtent(layer.name.clone()));
    }

    let mut features = Vec::with_capacity(layer.features.len());
    for feature in &layer.features {
        let kind = geometry_kind(feature.r#type());
        let rings = collector::feature_rings(feature, extent)?;

        if rings.is_empty() && kind != GeometryKind::Unknown {
            debug!(
                layer = %layer.name,
                id = ?feature.id,
                kind = kind.as_str(),
                "Skipping feature without geometry"
            );
            continue;
        }

        features.push(VectorTileFeature {
            id: feature.id,
            kind,
            geometry: rings,
            attributes: decode_attributes(layer, &feature.tags)?,
        });
    }

    Ok(VectorTileLayer {
        name: layer.name.clone(),
        extent,
        features,
    })
}

fn geometry_kind(geom_type: GeomType) -> GeometryKind {
    match geom_type {
        GeomType::Point => GeometryKind::Point,
        GeomType::Linestring => GeometryKind::LineString,
        GeomType::Polygon => GeometryKind::Polygon,
        GeomType::Unknown => GeometryKind::Unknown,
    }
}

fn decode_attributes(
    layer: &tile::Layer,
    tags: &[u32],
) -> Result<BTreeMap<String, AttributeValue>, DecodeError> {
    if tags.len() % 2 != 0 {
        return Err(DecodeError::InvalidTags {
            layer: layer.name.clone(),
            reason: format!("odd tag count {}", tags.len()),
        });
    }

    let mut attributes = BTreeMap::new();
    for pair in tags.chunks_exact(2) {
        let key = layer.keys.get(pair[0] as usize).ok_or_else(|| DecodeError::InvalidTags {
            layer: layer.name.clone(),
            reason: format!("key index {} out of range", pair[0]),
        })?;
        let value = layer
            .values
            .get(pair[1] as usize)
            .ok_or_else(|| DecodeError::InvalidTags {
                layer: layer.name.clone(),
                reason: format!("value index {} out of range", pair[1]),
            })?;

        if let Some(value) = attribute_value(value) {
            attributes.insert(key.clone(), value);
        }
    }
    Ok(attributes)
}

fn attribute_value(value: &tile::Value) -> Option<AttributeValue> {
    if let Some(s) = &value.string_value {
        Some(AttributeValue::String(s.clone()))
    } else if let Some(v) = value.int_value {
        Some(AttributeValue::Int(v))
    } else if let Some(v) = value.sint_value {
        Some(AttributeValue::Int(v))
    } else if let Some(v) = value.uint_value {
        Some(AttributeValue::UInt(v))
    } else if let Some(v) = value.double_value {
        Some(AttributeValue::Float(v))
    } else if let Some(v) = value.float_value {
        Some(AttributeValue::Float(f64::from(v)))
    } else {
        value.bool_value.map(AttributeValue::Bool)
    }
}
