mod fs;
mod geojson;
mod properties;
mod shapefile;

pub use fs::{read_features, write_atomic, write_features, Format};
pub use geojson::{read_collection, read_lines, write_collection, write_lines};
