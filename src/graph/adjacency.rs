use std::collections::BTreeSet;

use geo::{MultiPolygon, Relate};
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::debug;

use crate::feature::{Feature, Identity};
use crate::geom::{build_rtree, round_multipolygon, BoundingBox};

use super::AdjacencyGraph;

/// Options for adjacency detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyOptions {
    /// Snap coordinates to this many decimals before testing contact, so
    /// shared edges that differ by floating-point noise still match.
    pub snap_decimals: Option<u32>,
    pub parallel: bool,
}

impl Default for AdjacencyOptions {
    fn default() -> Self {
        Self { snap_decimals: Some(7), parallel: true }
    }
}

/// Two areas are adjacent when they share a boundary segment of positive
/// length, or when their interiors overlap. Contact at isolated points is
/// not adjacency.
pub fn is_adjacent(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    let im = a.relate(b);
    // In the 9-char DE-9IM string, index 0 is Interior/Interior and index 4 is Boundary/Boundary.
    im.matches("2********").unwrap_or(false) || im.matches("****1****").unwrap_or(false)
}

/// Build the adjacency graph of every boundary in `features`.
///
/// Each distinct identity is one node; parts sharing an identity are merged.
/// Boundaries without geometry still get a node, with no edges. Label
/// features are ignored. The result does not depend on input order.
pub fn build_graph(features: &[Feature], options: AdjacencyOptions) -> AdjacencyGraph {
    let boundaries = features.iter()
        .filter(|f| f.is_boundary())
        .filter_map(|f| f.identity().map(|id| (id, f.area())))
        .collect::<Vec<_>>();

    let nodes = boundaries.iter()
        .map(|(id, _)| (*id).clone())
        .collect::<BTreeSet<Identity>>()
        .into_iter()
        .collect::<Vec<_>>();
    let node_of = |id: &Identity| nodes.binary_search(id).map(|i| i as u32).ok();

    let mut owners = Vec::new();
    let mut shapes = Vec::new();
    for (id, area) in &boundaries {
        let (Some(node), Some(area)) = (node_of(*id), *area) else { continue };
        if area.0.is_empty() { continue }
        owners.push(node);
        shapes.push(match options.snap_decimals {
            Some(decimals) => round_multipolygon(area, decimals),
            None => area.clone(),
        });
    }

    let rtree = build_rtree(&shapes);
    let pad = options.snap_decimals.map_or(0.0, |d| 10f64.powi(-(d as i32)));

    let contacts = |entry: &BoundingBox| -> SmallVec<[(u32, u32); 8]> {
        let i = entry.idx();
        rtree.locate_in_envelope_intersecting(&entry.search_envelope(pad))
            .map(|candidate| candidate.idx())
            .filter(|&j| j > i && owners[i] != owners[j])
            .filter(|&j| is_adjacent(&shapes[i], &shapes[j]))
            .map(|j| (owners[i], owners[j]))
            .collect()
    };

    let mut entries = rtree.iter().collect::<Vec<_>>();
    entries.sort_unstable_by_key(|entry| entry.idx());

    let pairs: Vec<(u32, u32)> = if options.parallel {
        entries.par_iter().flat_map_iter(|entry| contacts(*entry)).collect()
    } else {
        entries.iter().flat_map(|entry| contacts(*entry)).collect()
    };

    let graph = AdjacencyGraph::new(nodes, &pairs);
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "built adjacency graph");
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Properties;
    use geo::polygon;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0),
        ]])
    }

    fn boundary(key: &str, shape: Option<MultiPolygon<f64>>) -> Feature {
        let mut f = Feature::boundary(None, shape, Properties::new());
        f.metadata.identity = Some(Identity::state(key));
        f
    }

    fn sequential() -> AdjacencyOptions {
        AdjacencyOptions { parallel: false, ..Default::default() }
    }

    #[test]
    fn shared_edge_is_adjacent() {
        assert!(is_adjacent(&rect(0.0, 0.0, 1.0, 1.0), &rect(1.0, 0.0, 2.0, 1.0)));
    }

    #[test]
    fn corner_contact_is_not_adjacent() {
        assert!(!is_adjacent(&rect(0.0, 0.0, 1.0, 1.0), &rect(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn overlap_is_adjacent() {
        assert!(is_adjacent(&rect(0.0, 0.0, 2.0, 2.0), &rect(1.0, 1.0, 3.0, 3.0)));
    }

    #[test]
    fn disjoint_is_not_adjacent() {
        assert!(!is_adjacent(&rect(0.0, 0.0, 1.0, 1.0), &rect(3.0, 0.0, 4.0, 1.0)));
    }

    #[test]
    fn grid_of_four() {
        let features = vec![
            boundary("nw", Some(rect(0.0, 1.0, 1.0, 2.0))),
            boundary("ne", Some(rect(1.0, 1.0, 2.0, 2.0))),
            boundary("sw", Some(rect(0.0, 0.0, 1.0, 1.0))),
            boundary("se", Some(rect(1.0, 0.0, 2.0, 1.0))),
        ];
        let graph = build_graph(&features, sequential());
        let id = Identity::state;

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.contains_edge(&id("nw"), &id("ne")));
        assert!(graph.contains_edge(&id("sw"), &id("se")));
        assert!(graph.contains_edge(&id("nw"), &id("sw")));
        assert!(!graph.contains_edge(&id("nw"), &id("se")));
        assert!(!graph.contains_edge(&id("ne"), &id("sw")));
    }

    #[test]
    fn parts_of_one_identity_collapse_to_one_node() {
        let features = vec![
            boundary("mi", Some(rect(0.0, 0.0, 1.0, 1.0))),
            boundary("mi", Some(rect(0.0, 2.0, 1.0, 3.0))),
            boundary("wi", Some(rect(1.0, 0.0, 2.0, 3.0))),
        ];
        let graph = build_graph(&features, sequential());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn null_geometry_is_an_isolated_node() {
        let features = vec![boundary("dc", None), boundary("md", Some(rect(0.0, 0.0, 1.0, 1.0)))];
        let graph = build_graph(&features, sequential());
        assert_eq!(graph.node_count(), 2);
        let dc = graph.index_of(&Identity::state("dc")).unwrap();
        assert_eq!(graph.degree(dc), 0);
    }

    #[test]
    fn snapping_absorbs_coordinate_noise() {
        let features = vec![
            boundary("a", Some(rect(0.0, 0.0, 1.000000001, 1.0))),
            boundary("b", Some(rect(0.999999999, 0.0, 2.0, 1.0))),
        ];
        let graph = build_graph(&features, sequential());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let features = (0..6)
            .flat_map(|x| (0..6).map(move |y| (x, y)))
            .map(|(x, y)| boundary(&format!("c{x}{y}"), Some(rect(x as f64, y as f64, x as f64 + 1.0, y as f64 + 1.0))))
            .collect::<Vec<_>>();
        let a = build_graph(&features, sequential());
        let b = build_graph(&features, AdjacencyOptions::default());

        assert_eq!(a.edge_count(), 60);
        assert_eq!(a.nodes(), b.nodes());
        for n in 0..a.node_count() {
            assert_eq!(a.neighbors(n).collect::<Vec<_>>(), b.neighbors(n).collect::<Vec<_>>());
        }
    }
}
