mod adjacency;
mod color;
mod graph;

pub use adjacency::{build_graph, is_adjacent, AdjacencyOptions};
pub use color::{color_graph, Coloring, ColoringError, DEFAULT_PALETTE};
pub use graph::AdjacencyGraph;
