//! Tile command - resolve one tile and summarize or dump it.

use crate::error::CliError;
use crate::runner::CliRunner;
use crate::source::SourceArgs;
use overtile::coord::TileAddress;
use overtile::decode::{GeometryKind, VectorTile};
use std::collections::BTreeMap;

pub struct TileArgs {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
    pub source: SourceArgs,
    pub json: bool,
}

pub async fn run(runner: &CliRunner, args: TileArgs) -> Result<(), CliError> {
    runner.log_startup("tile");
    let engine = runner.create_engine(runner.open_storage(args.source)?);

    let requested = TileAddress::new(args.x, args.y, args.zoom);
    let resolution = engine.resolve(&requested)?;
    let tile = engine.get_tile(&requested).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*tile)?);
        return Ok(());
    }

    println!("Tile {}", requested);
    if resolution.over_zoomed {
        println!(
            "  Over-zoomed from {} (window {:.4}, {:.4} .. {:.4}, {:.4})",
            resolution.effective,
            resolution.extent.left,
            resolution.extent.top,
            resolution.extent.right,
            resolution.extent.bottom
        );
    }
    print!("{}", summarize(&tile));
    Ok(())
}

/// One line per layer with feature counts by geometry kind.
pub fn summarize(tile: &VectorTile) -> String {
    let mut out = format!(
        "  {} layers, {} features\n",
        tile.layers.len(),
        tile.feature_count()
    );

    for layer in &tile.layers {
        let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
        for feature in &layer.features {
            *kinds.entry(kind_label(feature.kind)).or_default() += 1;
        }
        let counts = kinds
            .iter()
            .map(|(kind, n)| format!("{} {}", n, kind))
            .collect::<Vec<_>>()
            .join(", ");

        out.push_str(&format!(
            "  {:<20} extent {:<6} {}\n",
            layer.name, layer.extent, counts
        ));
    }
    out
}

fn kind_label(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Point => "points",
        GeometryKind::LineString => "lines",
        GeometryKind::Polygon => "polygons",
        GeometryKind::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overtile::decode::{Point, VectorTileFeature, VectorTileLayer};

    fn feature(kind: GeometryKind) -> VectorTileFeature {
        VectorTileFeature {
            id: None,
            kind,
            geometry: vec![vec![Point::new(0.0, 0.0)]],
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn test_summary_counts_by_kind() {
        let tile = VectorTile::new(vec![VectorTileLayer {
            name: "roads".to_string(),
            extent: 4096,
            features: vec![
                feature(GeometryKind::LineString),
                feature(GeometryKind::LineString),
                feature(GeometryKind::Point),
            ],
        }]);

        let summary = summarize(&tile);
        assert!(summary.starts_with("  1 layers, 3 features\n"));
        assert!(summary.contains("roads"));
        assert!(summary.contains("2 lines, 1 points"));
    }

    #[test]
    fn test_summary_of_empty_tile() {
        assert_eq!(summarize(&VectorTile::default()), "  0 layers, 0 features\n");
    }
}
