//! Drawing surface contract and geometry dispatch.
//!
//! Renderers implement [`Canvas`]; [`draw_tile`] walks a decoded tile and
//! hands every feature to the primitive for its geometry kind, scaled from
//! normalized coordinates to the surface size. Styling, label placement and
//! rasterization are the canvas's business.

use crate::decode::{AttributeValue, GeometryKind, Point, VectorTile};
use std::collections::BTreeMap;
use std::io::Read;

static NO_ATTRIBUTES: BTreeMap<String, AttributeValue> = BTreeMap::new();

/// Style handle for one draw call: the layer and attributes of the feature
/// being drawn. Canvases look up their own styling from it.
#[derive(Debug, Clone, Copy)]
pub struct Brush<'a> {
    pub layer: &'a str,
    pub attributes: &'a BTreeMap<String, AttributeValue>,
}

impl<'a> Brush<'a> {
    pub fn new(layer: &'a str, attributes: &'a BTreeMap<String, AttributeValue>) -> Self {
        Self { layer, attributes }
    }

    /// Brush for the tile background: no layer, no attributes.
    pub fn background() -> Brush<'static> {
        Brush {
            layer: "",
            attributes: &NO_ATTRIBUTES,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&'a AttributeValue> {
        self.attributes.get(key)
    }
}

/// A drawing surface. Coordinates are in surface units, origin top-left.
pub trait Canvas {
    /// Whether geometry lying entirely outside the surface should be dropped.
    fn clip_overflow(&self) -> bool {
        false
    }

    fn start_drawing(&mut self, width: f64, height: f64);

    fn draw_background(&mut self, brush: &Brush<'_>);

    fn draw_line_string(&mut self, geometry: &[Point], brush: &Brush<'_>);

    fn draw_polygon(&mut self, geometry: &[Point], brush: &Brush<'_>);

    fn draw_point(&mut self, geometry: Point, brush: &Brush<'_>);

    fn draw_text(&mut self, _geometry: Point, _brush: &Brush<'_>) {}

    fn draw_text_on_path(&mut self, _geometry: &[Point], _brush: &Brush<'_>) {}

    fn draw_image(&mut self, _image: &mut dyn Read, _brush: &Brush<'_>) {}

    /// Geometry of an unrecognized kind, rings as decoded.
    fn draw_unknown(&mut self, _geometry: &[Vec<Point>], _brush: &Brush<'_>) {}

    /// Ends the frame and returns the encoded output.
    fn finish_drawing(&mut self) -> Vec<u8>;
}

/// Draws `tile` onto a `width` x `height` surface and returns the canvas output.
pub fn draw_tile(tile: &VectorTile, canvas: &mut dyn Canvas, width: f64, height: f64) -> Vec<u8> {
    canvas.start_drawing(width, height);
    canvas.draw_background(&Brush::background());

    let clip = canvas.clip_overflow();
    let scale = |p: &Point| Point::new(p.x * width, p.y * height);

    for layer in &tile.layers {
        for feature in &layer.features {
            let brush = Brush::new(&layer.name, &feature.attributes);

            match feature.kind {
                GeometryKind::Point => {
                    for point in feature.geometry.iter().flatten() {
                        if clip && !inside_unit_square(point) {
                            continue;
                        }
                        canvas.draw_point(scale(point), &brush);
                    }
                }
                GeometryKind::LineString => {
                    for ring in &feature.geometry {
                        if clip && !ring.iter().any(inside_unit_square) {
                            continue;
                        }
                        let scaled: Vec<Point> = ring.iter().map(scale).collect();
                        canvas.draw_line_string(&scaled, &brush);
                    }
                }
                GeometryKind::Polygon => {
                    for ring in &feature.geometry {
                        if clip && !ring.iter().any(inside_unit_square) {
                            continue;
                        }
                        let scaled: Vec<Point> = ring.iter().map(scale).collect();
                        canvas.draw_polygon(&scaled, &brush);
                    }
                }
                GeometryKind::Unknown => {
                    let scaled: Vec<Vec<Point>> = feature
                        .geometry
                        .iter()
                        .map(|ring| ring.iter().map(scale).collect())
                        .collect();
                    canvas.draw_unknown(&scaled, &brush);
                }
            }
        }
    }

    canvas.finish_drawing()
}

fn inside_unit_square(p: &Point) -> bool {
    (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{VectorTileFeature, VectorTileLayer};

    #[derive(Debug, PartialEq)]
    enum Call {
        Start(f64, f64),
        Background,
        Line(String, Vec<Point>),
        Polygon(String, Vec<Point>),
        Point(String, Point),
        Unknown(usize),
        Finish,
    }

    #[derive(Default)]
    struct RecordingCanvas {
        clip: bool,
        calls: Vec<Call>,
    }

    impl Canvas for RecordingCanvas {
        fn clip_overflow(&self) -> bool {
            self.clip
        }

        fn start_drawing(&mut self, width: f64, height: f64) {
            self.calls.push(Call::Start(width, height));
        }

        fn draw_background(&mut self, brush: &Brush<'_>) {
            assert!(brush.layer.is_empty());
            self.calls.push(Call::Background);
        }

        fn draw_line_string(&mut self, geometry: &[Point], brush: &Brush<'_>) {
            self.calls
                .push(Call::Line(brush.layer.to_string(), geometry.to_vec()));
        }

        fn draw_polygon(&mut self, geometry: &[Point], brush: &Brush<'_>) {
            self.calls
                .push(Call::Polygon(brush.layer.to_string(), geometry.to_vec()));
        }

        fn draw_point(&mut self, geometry: Point, brush: &Brush<'_>) {
            self.calls.push(Call::Point(brush.layer.to_string(), geometry));
        }

        fn draw_unknown(&mut self, geometry: &[Vec<Point>], _brush: &Brush<'_>) {
            self.calls.push(Call::Unknown(geometry.len()));
        }

        fn finish_drawing(&mut self) -> Vec<u8> {
            self.calls.push(Call::Finish);
            vec![self.calls.len() as u8]
        }
    }

    fn feature(kind: GeometryKind, geometry: Vec<Vec<Point>>) -> VectorTileFeature {
        VectorTileFeature {
            id: None,
            kind,
            geometry,
            attributes: BTreeMap::from([(
                "class".to_string(),
                AttributeValue::String("primary".to_string()),
            )]),
        }
    }

    fn layer(name: &str, features: Vec<VectorTileFeature>) -> VectorTileLayer {
        VectorTileLayer {
            name: name.to_string(),
            extent: 4096,
            features,
        }
    }

    #[test]
    fn test_dispatch_by_kind_and_scale() {
        let tile = VectorTile::new(vec![
            layer(
                "roads",
                vec![feature(
                    GeometryKind::LineString,
                    vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 0.5)]],
                )],
            ),
            layer(
                "water",
                vec![feature(
                    GeometryKind::Polygon,
                    vec![vec![
                        Point::new(0.0, 0.0),
                        Point::new(0.5, 0.0),
                        Point::new(0.5, 0.5),
                        Point::new(0.0, 0.0),
                    ]],
                )],
            ),
            layer(
                "poi",
                vec![feature(
                    GeometryKind::Point,
                    vec![vec![Point::new(0.25, 0.75)], vec![Point::new(0.5, 0.5)]],
                )],
            ),
        ]);

        let mut canvas = RecordingCanvas::default();
        let output = draw_tile(&tile, &mut canvas, 256.0, 512.0);

        assert_eq!(
            canvas.calls,
            vec![
                Call::Start(256.0, 512.0),
                Call::Background,
                Call::Line(
                    "roads".to_string(),
                    vec![Point::new(0.0, 0.0), Point::new(256.0, 256.0)]
                ),
                Call::Polygon(
                    "water".to_string(),
                    vec![
                        Point::new(0.0, 0.0),
                        Point::new(128.0, 0.0),
                        Point::new(128.0, 256.0),
                        Point::new(0.0, 0.0),
                    ]
                ),
                Call::Point("poi".to_string(), Point::new(64.0, 384.0)),
                Call::Point("poi".to_string(), Point::new(128.0, 256.0)),
                Call::Finish,
            ]
        );
        assert_eq!(output, vec![7]);
    }

    #[test]
    fn test_unknown_geometry_goes_to_draw_unknown() {
        let tile = VectorTile::new(vec![layer(
            "misc",
            vec![feature(
                GeometryKind::Unknown,
                vec![vec![Point::new(0.1, 0.1)], vec![Point::new(0.2, 0.2)]],
            )],
        )]);

        let mut canvas = RecordingCanvas::default();
        draw_tile(&tile, &mut canvas, 1.0, 1.0);
        assert!(canvas.calls.contains(&Call::Unknown(2)));
    }

    #[test]
    fn test_clip_overflow_drops_outside_geometry() {
        let tile = VectorTile::new(vec![layer(
            "poi",
            vec![
                feature(
                    GeometryKind::Point,
                    vec![vec![Point::new(1.5, 0.5)], vec![Point::new(0.5, 0.5)]],
                ),
                feature(
                    GeometryKind::LineString,
                    vec![vec![Point::new(-1.0, -1.0), Point::new(-0.5, -0.2)]],
                ),
            ],
        )]);

        let mut clipped = RecordingCanvas {
            clip: true,
            ..Default::default()
        };
        draw_tile(&tile, &mut clipped, 10.0, 10.0);
        let drawn = clipped
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Point(..) | Call::Line(..)))
            .count();
        assert_eq!(drawn, 1);

        let mut unclipped = RecordingCanvas::default();
        draw_tile(&tile, &mut unclipped, 10.0, 10.0);
        let drawn = unclipped
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Point(..) | Call::Line(..)))
            .count();
        assert_eq!(drawn, 3);
    }

    #[test]
    fn test_brush_attribute_lookup() {
        let f = feature(GeometryKind::Point, vec![]);
        let brush = Brush::new("roads", &f.attributes);
        assert_eq!(
            brush.attribute("class").and_then(AttributeValue::as_str),
            Some("primary")
        );
        assert!(Brush::background().attribute("class").is_none());
    }
}
