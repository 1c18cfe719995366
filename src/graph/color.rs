use std::cmp::Reverse;
use std::collections::VecDeque;

use tracing::debug;

use crate::feature::Identity;

use super::AdjacencyGraph;

/// Number of color classes available to the renderer.
pub const DEFAULT_PALETTE: u8 = 5;

const UNCOLORED: u8 = u8::MAX;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColoringError {
    #[error("palette must have at least one color")]
    EmptyPalette,

    #[error("{identity} cannot be colored: its {degree} neighbors use all {palette} colors (adjacency graph is not planar)")]
    Infeasible { identity: String, degree: usize, palette: u8 },
}

/// A color class in `0..palette` for every node of an `AdjacencyGraph`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coloring {
    classes: Vec<u8>,
}

impl Coloring {
    #[inline] pub fn get(&self, node: usize) -> u8 { self.classes[node] }

    #[inline] pub fn classes(&self) -> &[u8] { &self.classes }

    pub fn class_of(&self, graph: &AdjacencyGraph, identity: &Identity) -> Option<u8> {
        graph.index_of(identity).map(|node| self.classes[node])
    }

    /// Number of distinct classes in use.
    pub fn colors_used(&self) -> usize {
        let mut seen = self.classes.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Adjacent node pairs that share a class. Empty for a proper coloring.
    pub fn conflicts(&self, graph: &AdjacencyGraph) -> Vec<(usize, usize)> {
        (0..graph.node_count())
            .flat_map(|a| graph.neighbors(a).filter(move |&b| a < b).map(move |b| (a, b)))
            .filter(|&(a, b)| self.classes[a] == self.classes[b])
            .collect()
    }
}

/// Color `graph` with at most `palette` classes so that no two adjacent
/// nodes share one.
///
/// Nodes are visited by descending degree, ties broken by identity, and each
/// takes the smallest class unused by its colored neighbors. When every class
/// is taken, a two-colored Kempe chain swap is tried to free one. The result
/// is a function of the graph alone.
pub fn color_graph(graph: &AdjacencyGraph, palette: u8) -> Result<Coloring, ColoringError> {
    if palette == 0 {
        return Err(ColoringError::EmptyPalette);
    }

    // Stable sort keeps identity order among equal degrees.
    let mut order = (0..graph.node_count()).collect::<Vec<_>>();
    order.sort_by_key(|&node| Reverse(graph.degree(node)));

    let mut classes = vec![UNCOLORED; graph.node_count()];
    let mut used = vec![false; palette as usize];
    for node in order {
        used.fill(false);
        for neighbor in graph.neighbors(node) {
            if classes[neighbor] != UNCOLORED {
                used[classes[neighbor] as usize] = true;
            }
        }

        let class = match used.iter().position(|&u| !u) {
            Some(class) => class as u8,
            None => {
                let freed = swap_kempe_chain(graph, &mut classes, node, palette).ok_or_else(|| {
                    ColoringError::Infeasible {
                        identity: graph.node(node).to_string(),
                        degree: graph.degree(node),
                        palette,
                    }
                })?;
                debug!(identity = %graph.node(node), class = freed, "freed a color by chain swap");
                freed
            }
        };
        classes[node] = class;
    }

    Ok(Coloring { classes })
}

/// Look for classes `a`, `b` such that the `a`/`b` component reachable from
/// the `a`-colored neighbors of `node` touches none of its `b`-colored
/// neighbors. Swapping `a` and `b` in that component frees `a`.
fn swap_kempe_chain(graph: &AdjacencyGraph, classes: &mut [u8], node: usize, palette: u8) -> Option<u8> {
    let mut seen = vec![false; graph.node_count()];
    for a in 0..palette {
        for b in (0..palette).filter(|&b| b != a) {
            seen.fill(false);
            let mut queue = graph.neighbors(node)
                .filter(|&m| classes[m] == a)
                .collect::<VecDeque<_>>();
            for &m in &queue { seen[m] = true }

            while let Some(m) = queue.pop_front() {
                for k in graph.neighbors(m) {
                    if !seen[k] && (classes[k] == a || classes[k] == b) {
                        seen[k] = true;
                        queue.push_back(k);
                    }
                }
            }

            if graph.neighbors(node).any(|m| classes[m] == b && seen[m]) {
                continue;
            }
            for (m, class) in classes.iter_mut().enumerate() {
                if seen[m] {
                    *class = if *class == a { b } else { a };
                }
            }
            return Some(a);
        }
    }
    None
}
