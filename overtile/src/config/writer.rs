//! [`ConfigFile`] to commented INI text.

use std::path::Path;

use super::file::ConfigFile;

pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let directory = config
        .source
        .directory
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();
    let mbtiles = config
        .source
        .mbtiles
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();
    let max_zoom = config
        .source
        .max_zoom
        .map(|z| z.to_string())
        .unwrap_or_default();

    format!(
        r#"[source]
; Root directory of the tile source. Tiles are read from <directory>/<template>
; and source metadata from <directory>/metadata.ini
directory = {}
; MBTiles archive to read instead of a directory
mbtiles = {}
; Path template with {{x}}, {{y}} and {{z}} placeholders
template = {}
; Deepest zoom stored by the source. Deeper requests are cut from ancestors.
; Leave empty to use the source's metadata.
max_zoom = {}
; When no maximum zoom is known:
;   passthrough - request every tile directly
;   fail        - reject requests
unknown_max_zoom = {}

[cache]
; Decoded tiles kept in memory (0 = unbounded)
capacity = {}

[logging]
directory = {}
file = {}
"#,
        directory,
        mbtiles,
        config.source.template,
        max_zoom,
        config.source.unknown_max_zoom.as_str(),
        config.cache.capacity,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Renders paths under the home directory as `~/...`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
