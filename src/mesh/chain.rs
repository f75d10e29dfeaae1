use tracing::{debug, trace};

use crate::collections::QuickRemovableSet;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::boundary::Edge;

/// Per-vertex directed adjacency over boundary edges.
///
/// `outgoing[v]` holds the heads of edges leaving `v`; `incoming[v]` the
/// tails of edges entering it. Every edge appears in both lists.
#[derive(Debug, Clone)]
pub struct EdgeGraph {
    incoming: Vec<QuickRemovableSet<usize>>,
    outgoing: Vec<QuickRemovableSet<usize>>,
}

impl EdgeGraph {
    /// Builds the graph for `vertex_count` vertices.
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to a vertex outside `0..vertex_count`.
    #[must_use]
    pub fn new(vertex_count: usize, edges: &[Edge]) -> Self {
        let mut graph = Self {
            incoming: vec![QuickRemovableSet::new(); vertex_count],
            outgoing: vec![QuickRemovableSet::new(); vertex_count],
        };
        for edge in edges {
            graph.insert(*edge);
        }
        graph
    }

    pub fn insert(&mut self, edge: Edge) {
        self.outgoing[edge.from].add(edge.to);
        self.incoming[edge.to].add(edge.from);
    }

    pub fn remove(&mut self, edge: Edge) {
        self.outgoing[edge.from].remove(&edge.to);
        self.incoming[edge.to].remove(&edge.from);
    }

    #[must_use]
    pub fn contains(&self, edge: Edge) -> bool {
        self.outgoing
            .get(edge.from)
            .is_some_and(|heads| heads.contains(&edge.to))
    }

    #[must_use]
    pub fn incoming(&self, vertex: usize) -> &[usize] {
        self.incoming[vertex].as_slice()
    }

    #[must_use]
    pub fn outgoing(&self, vertex: usize) -> &[usize] {
        self.outgoing[vertex].as_slice()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.outgoing.len()
    }

    /// All edges, grouped by tail vertex.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        self.outgoing
            .iter()
            .enumerate()
            .flat_map(|(from, heads)| heads.iter().map(move |&to| Edge::new(from, to)))
            .collect()
    }
}

/// Splices out vertices where a boundary runs straight through.
///
/// At each vertex `v`, an incoming edge `u → v` and an outgoing edge
/// `v → w` whose unit directions differ by less than `epsilon_sq`
/// (squared distance) are replaced by the single edge `u → w`. Junction
/// vertices keep any pair that is not collinear. Returns the simplified
/// edge list.
#[must_use]
pub fn merge_collinear_chains(vertices: &[Point3], edges: &[Edge], epsilon_sq: f64) -> Vec<Edge> {
    let mut graph = EdgeGraph::new(vertices.len(), edges);
    let mut spliced = 0usize;

    for v in 0..vertices.len() {
        while let Some((u, w)) = find_straight_pair(&graph, vertices, v, epsilon_sq) {
            trace!(from = u, through = v, to = w, "splicing collinear pair");
            graph.remove(Edge::new(u, v));
            graph.remove(Edge::new(v, w));
            graph.insert(Edge::new(u, w));
            spliced += 1;
        }
    }

    let merged = graph.edges();
    debug!(
        before = edges.len(),
        after = merged.len(),
        spliced,
        "merged collinear boundary chains"
    );
    merged
}

fn find_straight_pair(
    graph: &EdgeGraph,
    vertices: &[Point3],
    v: usize,
    epsilon_sq: f64,
) -> Option<(usize, usize)> {
    let here = vertices[v];
    for &u in graph.incoming(v) {
        let Some(in_dir) = unit(&(here - vertices[u])) else {
            continue;
        };
        for &w in graph.outgoing(v) {
            if w == u {
                continue;
            }
            let Some(out_dir) = unit(&(vertices[w] - here)) else {
                continue;
            };
            if (in_dir - out_dir).norm_squared() < epsilon_sq {
                return Some((u, w));
            }
        }
    }
    None
}

fn unit(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(TOLERANCE)
}
