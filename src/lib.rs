#![doc = "districtmap public API"]
mod feature;
mod geom;
mod graph;
mod identity;
mod io;
mod pipeline;
mod temporal;

#[doc(inline)]
pub use feature::{CongressSpan, DistrictNumber, EntityType, Feature, FeatureKind, Identity, Metadata, Properties, Shape, Validity};

#[doc(inline)]
pub use identity::{ordinal, resolve, resolve_all, CodeTable, IdentityError, IdentityScheme, Jurisdiction, Resolution, ResolveOutcome};

#[doc(inline)]
pub use temporal::{select_active, select_for_date, Congress, OverlapPolicy, Selection, TemporalError};

#[doc(inline)]
pub use graph::{build_graph, color_graph, is_adjacent, AdjacencyGraph, AdjacencyOptions, Coloring, ColoringError, DEFAULT_PALETTE};

#[doc(inline)]
pub use geom::{generate_labels, label_point, round_shape, DegenerateGeometry, LabelBatch, LabelPlacement};

#[doc(inline)]
pub use io::{read_collection, read_features, read_lines, write_atomic, write_collection, write_features, write_lines, Format};

#[doc(inline)]
pub use pipeline::{Dataset, Output, Pipeline, PipelineConfig, PipelineError, RunReport, Stage, StageFault};
