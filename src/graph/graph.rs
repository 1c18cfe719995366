use ahash::AHashMap;

use crate::feature::Identity;

/// An undirected adjacency graph over boundary identities, in compressed
/// sparse row format. Nodes are kept sorted by identity; every neighbor
/// list is sorted and free of duplicates and self-loops.
#[derive(Debug, Default, Clone)]
pub struct AdjacencyGraph {
    nodes: Vec<Identity>,
    index: AHashMap<Identity, u32>,
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl AdjacencyGraph {
    /// Construct a graph from sorted, distinct nodes and index pairs.
    /// Pairs may repeat and may appear in either orientation.
    pub fn new(nodes: Vec<Identity>, pairs: &[(u32, u32)]) -> Self {
        assert!(nodes.windows(2).all(|w| w[0] < w[1]), "nodes must be sorted and distinct");
        let n = nodes.len();

        let mut adjacency = vec![Vec::new(); n];
        for &(a, b) in pairs {
            assert!((a as usize) < n && (b as usize) < n, "edge ({a}, {b}) out of range for {n} nodes");
            if a == b { continue }
            adjacency[a as usize].push(b);
            adjacency[b as usize].push(a);
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            index: nodes.iter().enumerate().map(|(i, id)| (id.clone(), i as u32)).collect(),
            nodes,
            offsets: std::iter::once(0u32).chain(
                adjacency.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: adjacency.into_iter().flatten().collect(),
        }
    }

    /// Construct a graph from identity pairs. Every identity mentioned in
    /// `nodes` or `pairs` becomes a node.
    pub fn from_pairs(
        nodes: impl IntoIterator<Item = Identity>,
        pairs: impl IntoIterator<Item = (Identity, Identity)>,
    ) -> Self {
        let pairs = pairs.into_iter().collect::<Vec<_>>();
        let mut nodes = nodes.into_iter()
            .chain(pairs.iter().flat_map(|(a, b)| [a.clone(), b.clone()]))
            .collect::<Vec<_>>();
        nodes.sort();
        nodes.dedup();

        let position = |id: &Identity| nodes.binary_search(id).map(|i| i as u32);
        let indexed = pairs.iter()
            .filter_map(|(a, b)| Some((position(a).ok()?, position(b).ok()?)))
            .collect::<Vec<_>>();
        Self::new(nodes, &indexed)
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() / 2 }

    #[inline] pub fn nodes(&self) -> &[Identity] { &self.nodes }

    #[inline] pub fn node(&self, node: usize) -> &Identity { &self.nodes[node] }

    /// Position of `identity` among the nodes.
    #[inline]
    pub fn index_of(&self, identity: &Identity) -> Option<usize> {
        self.index.get(identity).map(|&i| i as usize)
    }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    #[inline]
    pub fn max_degree(&self) -> usize {
        (0..self.node_count()).map(|n| self.degree(n)).max().unwrap_or(0)
    }

    /// Get an iterator over the neighbors of a given node, in ascending order.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    pub fn contains_edge(&self, a: &Identity, b: &Identity) -> bool {
        let (Some(a), Some(b)) = (self.index_of(a), self.index_of(b)) else { return false };
        self.edges[self.range(a)].binary_search(&(b as u32)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(key: &str) -> Identity {
        Identity::state(key)
    }

    fn make_test_graph() -> AdjacencyGraph {
        AdjacencyGraph::new(
            vec![id("a"), id("b"), id("c"), id("d")],
            &[(0, 1), (0, 2), (1, 2), (2, 3)],
        )
    }

    #[test]
    fn csr_graph_construction() {
        let graph = make_test_graph();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);

        // Offsets are cumulative neighbor counts, len = nodes + 1
        assert_eq!(graph.offsets, vec![0, 2, 4, 7, 8]);
        assert_eq!(graph.edges, vec![1, 2, 0, 2, 0, 1, 3, 2]);
        assert_eq!(*graph.offsets.last().unwrap() as usize, graph.edges.len());

        for window in graph.offsets.windows(2) { assert!(window[0] <= window[1]) }
    }

    #[test]
    fn degree_matches_offsets() {
        let graph = make_test_graph();

        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.degree(2), 3);
        assert_eq!(graph.degree(3), 1);
        assert_eq!(graph.max_degree(), 3);
    }

    #[test]
    fn duplicate_and_reversed_pairs_collapse() {
        let graph = AdjacencyGraph::new(vec![id("a"), id("b")], &[(0, 1), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.neighbors(1).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn lookup_by_identity() {
        let graph = make_test_graph();
        assert_eq!(graph.index_of(&id("c")), Some(2));
        assert_eq!(graph.index_of(&id("z")), None);
        assert!(graph.contains_edge(&id("c"), &id("d")));
        assert!(graph.contains_edge(&id("d"), &id("c")));
        assert!(!graph.contains_edge(&id("a"), &id("d")));
        assert!(!graph.contains_edge(&id("a"), &id("z")));
    }

    #[test]
    fn from_pairs_sorts_nodes_and_keeps_isolated_ones() {
        let graph = AdjacencyGraph::from_pairs([id("q")], [(id("m"), id("b")), (id("b"), id("m"))]);
        assert_eq!(graph.nodes(), &[id("b"), id("m"), id("q")]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(2), 0);
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = AdjacencyGraph::new(vec![], &[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.offsets, vec![0]);
        assert_eq!(graph.max_degree(), 0);
    }

    #[test]
    #[should_panic(expected = "nodes must be sorted and distinct")]
    fn new_panics_on_unsorted_nodes() {
        AdjacencyGraph::new(vec![id("b"), id("a")], &[]);
    }

    #[test]
    #[should_panic]
    fn degree_panics_for_out_of_bounds_node() {
        let graph = make_test_graph();
        graph.degree(graph.node_count());
    }
}
