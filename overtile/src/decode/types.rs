//! Decoded vector tile model.

use crate::coord::{convert_range, CoordError, NormalizedRect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point in normalized tile units. `(0, 0)` is the north-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry kind declared by a feature.
///
/// Tags the wire format does not define map to `Unknown` so renderers can
/// match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    Unknown,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Unknown => "Unknown",
        }
    }
}

/// Scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of any number variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::UInt(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// One feature: kind, rings of normalized points, attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorTileFeature {
    pub id: Option<u64>,
    pub kind: GeometryKind,
    /// Ordered rings; polygons keep exterior and holes, multi-part lines keep
    /// every part.
    pub geometry: Vec<Vec<Point>>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl VectorTileFeature {
    /// Total number of points across all rings.
    pub fn point_count(&self) -> usize {
        self.geometry.iter().map(Vec::len).sum()
    }

    fn map_points<F>(&self, mut f: F) -> Result<VectorTileFeature, CoordError>
    where
        F: FnMut(Point) -> Result<Point, CoordError>,
    {
        let geometry = self
            .geometry
            .iter()
            .map(|ring| ring.iter().map(|p| f(*p)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VectorTileFeature {
            id: self.id,
            kind: self.kind,
            geometry,
            attributes: self.attributes.clone(),
        })
    }
}

/// A named layer of features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorTileLayer {
    pub name: String,
    /// Coordinate resolution the layer was encoded with (informational;
    /// geometry is already normalized).
    pub extent: u32,
    pub features: Vec<VectorTileFeature>,
}

/// A decoded tile.
///
/// Produced once per resolved address by the decoder and shared immutably
/// afterwards; the over-zoomed flag is only ever set on a derived copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorTile {
    pub layers: Vec<VectorTileLayer>,
    #[serde(rename = "is_over_zoomed")]
    over_zoomed: bool,
}

impl VectorTile {
    /// Creates a tile that is not over-zoomed.
    pub fn new(layers: Vec<VectorTileLayer>) -> Self {
        Self {
            layers,
            over_zoomed: false,
        }
    }

    /// True if this tile was derived from an ancestor at a shallower zoom.
    pub fn is_over_zoomed(&self) -> bool {
        self.over_zoomed
    }

    pub(crate) fn set_over_zoomed(&mut self, over_zoomed: bool) {
        self.over_zoomed = over_zoomed;
    }

    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&VectorTileLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.name.as_str())
    }

    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.features.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_count() == 0
    }

    /// Derives a copy whose geometry is remapped from the `extent` window
    /// into the full unit square.
    ///
    /// Points falling outside the window end up outside `[0, 1]` and are kept;
    /// clipping belongs to the renderer. `self` is not modified.
    pub fn apply_extent(&self, extent: &NormalizedRect) -> Result<VectorTile, CoordError> {
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                let features = layer
                    .features
                    .iter()
                    .map(|feature| {
                        feature.map_points(|p| {
                            Ok(Point {
                                x: convert_range(p.x, extent.left, extent.right, 0.0, 1.0)?,
                                y: convert_range(p.y, extent.top, extent.bottom, 0.0, 1.0)?,
                            })
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(VectorTileLayer {
                    name: layer.name.clone(),
                    extent: layer.extent,
                    features,
                })
            })
            .collect::<Result<Vec<_>, CoordError>>()?;

        Ok(VectorTile {
            layers,
            over_zoomed: self.over_zoomed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_point_tile(x: f64, y: f64) -> VectorTile {
        VectorTile::new(vec![VectorTileLayer {
            name: "poi".to_string(),
            extent: 4096,
            features: vec![VectorTileFeature {
                id: Some(1),
                kind: GeometryKind::Point,
                geometry: vec![vec![Point::new(x, y)]],
                attributes: BTreeMap::from([(
                    "name".to_string(),
                    AttributeValue::String("cafe".to_string()),
                )]),
            }],
        }])
    }

    #[test]
    fn test_apply_extent_quadrant() {
        let tile = single_point_tile(0.5, 0.5);
        let derived = tile
            .apply_extent(&NormalizedRect::new(0.0, 0.0, 0.5, 0.5))
            .unwrap();

        assert_eq!(derived.layers[0].features[0].geometry[0][0], Point::new(1.0, 1.0));
    }

    #[test]
    fn test_apply_extent_leaves_original_untouched() {
        let tile = single_point_tile(0.25, 0.75);
        let before = tile.clone();

        let _ = tile
            .apply_extent(&NormalizedRect::new(0.0, 0.5, 0.5, 1.0))
            .unwrap();

        assert_eq!(tile, before);
    }

    #[test]
    fn test_apply_extent_keeps_points_outside_window() {
        let tile = single_point_tile(0.9, 0.1);
        let derived = tile
            .apply_extent(&NormalizedRect::new(0.0, 0.5, 0.5, 1.0))
            .unwrap();

        let p = derived.layers[0].features[0].geometry[0][0];
        assert!((p.x - 1.8).abs() < 1e-12);
        assert!((p.y - -0.8).abs() < 1e-12);
    }

    #[test]
    fn test_apply_full_extent_is_identity() {
        let tile = single_point_tile(0.3, 0.6);
        let derived = tile.apply_extent(&NormalizedRect::FULL).unwrap();
        assert_eq!(derived, tile);
    }

    #[test]
    fn test_apply_degenerate_extent_fails() {
        let tile = single_point_tile(0.3, 0.6);
        let result = tile.apply_extent(&NormalizedRect::new(0.5, 0.0, 0.5, 1.0));
        assert_eq!(result, Err(CoordError::DegenerateRange(0.5)));
    }

    #[test]
    fn test_apply_extent_preserves_attributes_and_flag() {
        let mut tile = single_point_tile(0.5, 0.5);
        tile.set_over_zoomed(true);

        let derived = tile
            .apply_extent(&NormalizedRect::new(0.25, 0.25, 0.75, 0.75))
            .unwrap();

        assert!(derived.is_over_zoomed());
        assert_eq!(
            derived.layers[0].features[0].attributes["name"].as_str(),
            Some("cafe")
        );
    }

    #[test]
    fn test_layer_lookup_and_counts() {
        let tile = single_point_tile(0.5, 0.5);
        assert!(tile.layer("poi").is_some());
        assert!(tile.layer("roads").is_none());
        assert_eq!(tile.feature_count(), 1);
        assert_eq!(tile.layer_names().collect::<Vec<_>>(), vec!["poi"]);
        assert!(!tile.is_over_zoomed());
    }

    #[test]
    fn test_attribute_numeric_view() {
        assert_eq!(AttributeValue::Int(-3).as_f64(), Some(-3.0));
        assert_eq!(AttributeValue::UInt(7).as_f64(), Some(7.0));
        assert_eq!(AttributeValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_serializes_over_zoomed_flag() {
        let json = serde_json::to_value(single_point_tile(0.5, 0.5)).unwrap();
        assert_eq!(json["is_over_zoomed"], serde_json::Value::Bool(false));
        assert_eq!(json["layers"][0]["features"][0]["kind"], "Point");
    }
}
