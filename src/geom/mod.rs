mod bbox;
mod label;
mod precision;

pub(crate) use bbox::{build_rtree, BoundingBox};
pub use label::{generate_labels, label_point, DegenerateGeometry, LabelBatch, LabelPlacement};
pub(crate) use precision::round_multipolygon;
pub use precision::round_shape;
