use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::feature::Feature;

use super::{geojson, shapefile};

/// On-disk feature formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Collection,     // GeoJSON FeatureCollection
    Lines,          // One GeoJSON Feature per line
    Shapefile,      // ESRI shapefile with .dbf attributes, input only
}

impl Format {
    /// Pick a format from the file extension, defaulting to a FeatureCollection.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("shp") => Format::Shapefile,
            Some("geojsonl" | "geojsons" | "ndjson" | "jsonl") => Format::Lines,
            _ => Format::Collection,
        }
    }
}

/// Read all features from `path`, choosing the reader by extension.
pub fn read_features(path: &Path) -> Result<Vec<Feature>> {
    match Format::from_path(path) {
        Format::Shapefile => shapefile::read_shapefile(path),
        Format::Lines => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            geojson::read_lines(&text).with_context(|| format!("Failed to parse {}", path.display()))
        }
        Format::Collection => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            geojson::read_collection(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
        }
    }
}

/// Write features to `path`. The file is replaced atomically: readers see
/// either the previous contents or the complete new output.
pub fn write_features(path: &Path, features: &[Feature], keep_source: bool) -> Result<()> {
    let bytes = match Format::from_path(path) {
        Format::Lines => geojson::write_lines(features, keep_source)?,
        Format::Collection => geojson::write_collection(features, keep_source)?,
        Format::Shapefile => anyhow::bail!("Writing shapefiles is not supported: {}", path.display()),
    };
    write_atomic(path, &bytes)
}

/// Write `bytes` to a temporary file beside `path`, then rename it into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("Failed to write {}", file.path().display()))?;
    file.as_file().sync_all()?;
    file.persist(path)
        .with_context(|| format!("Failed to move output into place at {}", path.display()))?;
    Ok(())
}
