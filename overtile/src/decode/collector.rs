//! Feature geometry collection.
//!
//! geozero walks the MVT command stream and reports absolute layer-local
//! coordinates; [`RingCollector`] turns those callbacks into rings of points
//! normalized by the layer extent. Every moved-to point of a point feature is
//! its own single-point ring. Polygon rings arrive closed, first point repeated.

use super::types::Point;
use super::DecodeError;
use geozero::error::Result as GeozeroResult;
use geozero::mvt::tile::{self, GeomType};
use geozero::{GeomProcessor, GeozeroGeometry};

const MOVE_TO: u32 = 1;
const LINE_TO: u32 = 2;
const CLOSE_PATH: u32 = 7;

/// Decodes the geometry of `feature` into rings normalized by `extent`.
///
/// Features of unknown type yield no rings.
pub(crate) fn feature_rings(
    feature: &tile::Feature,
    extent: u32,
) -> Result<Vec<Vec<Point>>, DecodeError> {
    if feature.geometry.is_empty() {
        return Ok(Vec::new());
    }
    // geozero indexes the stream without bounds checks.
    check_shape(feature.r#type(), &feature.geometry)?;

    let mut collector = RingCollector::new(extent);
    feature
        .process_geom(&mut collector)
        .map_err(|e| DecodeError::Geometry(e.to_string()))?;
    Ok(collector.rings)
}

struct RingCollector {
    scale: f64,
    rings: Vec<Vec<Point>>,
    point_per_ring: bool,
}

impl RingCollector {
    fn new(extent: u32) -> Self {
        Self {
            scale: f64::from(extent),
            rings: Vec::new(),
            point_per_ring: false,
        }
    }
}

impl GeomProcessor for RingCollector {
    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> GeozeroResult<()> {
        let point = Point::new(x / self.scale, y / self.scale);
        match self.rings.last_mut() {
            Some(ring) if !self.point_per_ring => ring.push(point),
            _ => self.rings.push(vec![point]),
        }
        Ok(())
    }

    fn point_begin(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.point_per_ring = true;
        Ok(())
    }

    fn point_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.point_per_ring = false;
        Ok(())
    }

    fn multipoint_begin(&mut self, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.rings.reserve(size);
        self.point_per_ring = true;
        Ok(())
    }

    fn multipoint_end(&mut self, _idx: usize) -> GeozeroResult<()> {
        self.point_per_ring = false;
        Ok(())
    }

    fn linestring_begin(&mut self, _tagged: bool, size: usize, _idx: usize) -> GeozeroResult<()> {
        self.rings.push(Vec::with_capacity(size));
        Ok(())
    }
}

fn command_id(command: u32) -> u32 {
    command & 0x7
}

fn command_count(command: u32) -> usize {
    (command >> 3) as usize
}

fn single(id: u32) -> u32 {
    id | (1 << 3)
}

fn malformed(reason: impl Into<String>) -> DecodeError {
    DecodeError::Geometry(reason.into())
}

/// Checks that the command layout matches the geometry type before geozero
/// reads it: points are one `MoveTo(n)`, lines repeat `MoveTo(1) LineTo(n)`,
/// and polygon rings repeat `MoveTo(1) LineTo(n) ClosePath(1)`.
fn check_shape(kind: GeomType, commands: &[u32]) -> Result<(), DecodeError> {
    match kind {
        GeomType::Point => {
            let first = commands[0];
            let count = command_count(first);
            if command_id(first) != MOVE_TO || count == 0 {
                return Err(malformed("point geometry must start with MoveTo"));
            }
            if commands.len() != 1 + 2 * count {
                return Err(malformed(format!(
                    "MoveTo({}) expects {} parameters, found {}",
                    count,
                    2 * count,
                    commands.len() - 1
                )));
            }
            Ok(())
        }
        GeomType::Linestring => check_paths(commands, false),
        GeomType::Polygon => check_paths(commands, true),
        GeomType::Unknown => Ok(()),
    }
}

fn check_paths(mut commands: &[u32], closed: bool) -> Result<(), DecodeError> {
    while !commands.is_empty() {
        if commands[0] != single(MOVE_TO) {
            return Err(malformed("path must start with MoveTo(1)"));
        }
        if commands.len() < 4 || command_id(commands[3]) != LINE_TO {
            return Err(malformed("MoveTo must be followed by LineTo"));
        }

        let mut size = 4 + 2 * command_count(commands[3]);
        if closed {
            size += 1;
        }
        if commands.len() < size {
            return Err(malformed(format!(
                "path needs {} integers, {} remain",
                size,
                commands.len()
            )));
        }
        if closed && commands[size - 1] != single(CLOSE_PATH) {
            return Err(malformed("polygon ring must end with ClosePath"));
        }
        commands = &commands[size..];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(id: u32, count: u32) -> u32 {
        (id & 0x7) | (count << 3)
    }

    fn zz(v: i32) -> u32 {
        ((v << 1) ^ (v >> 31)) as u32
    }

    fn feature(kind: GeomType, geometry: Vec<u32>) -> tile::Feature {
        tile::Feature {
            id: None,
            tags: vec![],
            r#type: Some(kind as i32),
            geometry,
        }
    }

    #[test]
    fn test_single_point() {
        let f = feature(GeomType::Point, vec![cmd(1, 1), zz(2048), zz(4096)]);
        let rings = feature_rings(&f, 4096).unwrap();
        assert_eq!(rings, vec![vec![Point::new(0.5, 1.0)]]);
    }

    #[test]
    fn test_multi_point_splits_rings() {
        let f = feature(GeomType::Point, vec![cmd(1, 2), zz(5), zz(7), zz(3), zz(2)]);
        let rings = feature_rings(&f, 10).unwrap();
        assert_eq!(
            rings,
            vec![vec![Point::new(0.5, 0.7)], vec![Point::new(0.8, 0.9)]]
        );
    }

    #[test]
    fn test_line_string_deltas() {
        let f = feature(
            GeomType::Linestring,
            vec![cmd(1, 1), zz(2), zz(2), cmd(2, 2), zz(0), zz(8), zz(8), zz(0)],
        );
        let rings = feature_rings(&f, 10).unwrap();
        assert_eq!(
            rings,
            vec![vec![
                Point::new(0.2, 0.2),
                Point::new(0.2, 1.0),
                Point::new(1.0, 1.0)
            ]]
        );
    }

    #[test]
    fn test_multi_line_string_keeps_cursor() {
        let f = feature(
            GeomType::Linestring,
            vec![
                cmd(1, 1), zz(1), zz(1), cmd(2, 1), zz(2), zz(0),
                cmd(1, 1), zz(0), zz(4), cmd(2, 1), zz(-3), zz(0),
            ],
        );
        let rings = feature_rings(&f, 10).unwrap();
        assert_eq!(
            rings,
            vec![
                vec![Point::new(0.1, 0.1), Point::new(0.3, 0.1)],
                vec![Point::new(0.3, 0.5), Point::new(0.0, 0.5)],
            ]
        );
    }

    #[test]
    fn test_polygon_with_hole_keeps_both_rings() {
        let f = feature(
            GeomType::Polygon,
            vec![
                // exterior, clockwise in screen coordinates
                cmd(1, 1), zz(0), zz(0),
                cmd(2, 3), zz(10), zz(0), zz(0), zz(10), zz(-10), zz(0),
                cmd(7, 1),
                // hole, cursor continues from (0, 10)
                cmd(1, 1), zz(2), zz(-8),
                cmd(2, 3), zz(0), zz(4), zz(4), zz(0), zz(0), zz(-4),
                cmd(7, 1),
            ],
        );
        let rings = feature_rings(&f, 10).unwrap();

        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0].first(), rings[0].last());
        assert_eq!(rings[0][2], Point::new(1.0, 1.0));
        assert_eq!(rings[1][0], Point::new(0.2, 0.2));
        assert_eq!(rings[1].len(), 5);
        assert_eq!(rings[1].first(), rings[1].last());
    }

    #[test]
    fn test_polygon_starting_with_hole_rejected() {
        // counter-clockwise first ring cannot open a polygon
        let f = feature(
            GeomType::Polygon,
            vec![
                cmd(1, 1), zz(0), zz(0),
                cmd(2, 3), zz(0), zz(10), zz(10), zz(0), zz(0), zz(-10),
                cmd(7, 1),
            ],
        );
        assert!(matches!(
            feature_rings(&f, 10),
            Err(DecodeError::Geometry(_))
        ));
    }

    #[test]
    fn test_truncated_parameters() {
        let f = feature(GeomType::Point, vec![cmd(1, 1), zz(1)]);
        assert!(matches!(feature_rings(&f, 4096), Err(DecodeError::Geometry(_))));

        let f = feature(GeomType::Linestring, vec![cmd(1, 1), zz(1), zz(1), cmd(2, 2), zz(1)]);
        assert!(matches!(feature_rings(&f, 4096), Err(DecodeError::Geometry(_))));
    }

    #[test]
    fn test_line_to_without_move_to() {
        let f = feature(GeomType::Linestring, vec![cmd(2, 1), zz(1), zz(1)]);
        assert!(matches!(feature_rings(&f, 4096), Err(DecodeError::Geometry(_))));
    }

    #[test]
    fn test_unknown_command() {
        let f = feature(GeomType::Point, vec![cmd(4, 1), zz(1), zz(1)]);
        assert!(matches!(feature_rings(&f, 4096), Err(DecodeError::Geometry(_))));
    }

    #[test]
    fn test_unclosed_polygon_ring() {
        let f = feature(
            GeomType::Polygon,
            vec![cmd(1, 1), zz(0), zz(0), cmd(2, 2), zz(5), zz(0), zz(0), zz(5), cmd(2, 1)],
        );
        assert!(matches!(feature_rings(&f, 10), Err(DecodeError::Geometry(_))));
    }

    #[test]
    fn test_empty_stream() {
        let f = feature(GeomType::Polygon, vec![]);
        assert!(feature_rings(&f, 4096).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_type_yields_no_rings() {
        let f = feature(GeomType::Unknown, vec![cmd(1, 1), zz(1), zz(1)]);
        assert!(feature_rings(&f, 4096).unwrap().is_empty());
    }
}
