//! Info command - print what the tile source advertises.

use crate::error::CliError;
use crate::runner::CliRunner;
use crate::source::SourceArgs;
use overtile::storage::{SourceMetadata, TileStorage};

pub fn run(runner: &CliRunner, source: SourceArgs, json: bool) -> Result<(), CliError> {
    runner.log_startup("info");
    let storage = runner.open_storage(source)?;
    let metadata = storage.metadata();

    if json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
        return Ok(());
    }

    println!("Source: {}", storage.location());
    print!("{}", describe(metadata));

    let engine = runner.create_engine(storage);
    match engine.max_zoom() {
        Some(zoom) => println!("  Serving up to zoom {} directly, deeper by overzoom", zoom),
        None => println!(
            "  No maximum zoom known (policy: {})",
            engine.config().unknown_max_zoom
        ),
    }
    Ok(())
}

pub fn describe(metadata: &SourceMetadata) -> String {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let zoom = |v: Option<u8>| v.map_or_else(|| "-".to_string(), |z| z.to_string());

    let mut out = String::new();
    out.push_str(&format!("  Name:        {}\n", or_dash(&metadata.name)));
    out.push_str(&format!("  Description: {}\n", or_dash(&metadata.description)));
    out.push_str(&format!("  Version:     {}\n", or_dash(&metadata.version)));
    out.push_str(&format!(
        "  Zoom:        {} .. {}\n",
        zoom(metadata.min_zoom),
        zoom(metadata.max_zoom)
    ));
    if let Some(b) = &metadata.bounds {
        out.push_str(&format!(
            "  Bounds:      {:.4}, {:.4}, {:.4}, {:.4}\n",
            b.west, b.south, b.east, b.north
        ));
    }
    if let Some(c) = &metadata.center {
        out.push_str(&format!("  Center:      {:.4}, {:.4}\n", c.x, c.y));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults() {
        let text = describe(&SourceMetadata::default());
        assert!(text.contains("Name:        -"));
        assert!(text.contains("Zoom:        - .. -"));
        assert!(!text.contains("Bounds"));
    }

    #[test]
    fn test_describe_populated() {
        let metadata = SourceMetadata::from_pairs([
            ("name", "coastline"),
            ("minzoom", "0"),
            ("maxzoom", "14"),
            ("bounds", "-10,40,5,55"),
        ])
        .unwrap();

        let text = describe(&metadata);
        assert!(text.contains("coastline"));
        assert!(text.contains("0 .. 14"));
        assert!(text.contains("-10.0000, 40.0000, 5.0000, 55.0000"));
    }
}
