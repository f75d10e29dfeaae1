use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::debug;

use crate::collections::UnionFind;
use crate::math::Point3;

use super::NavTriangulation;

/// How coincident vertices are recognised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DedupMode {
    /// Bit-identical positions collapse; the first index seen wins.
    Exact,
    /// Positions closer than `epsilon` collapse, judged among each
    /// vertex's `neighbors` nearest neighbours.
    Clustered { epsilon: f64, neighbors: usize },
}

type IndexedPoint = GeomWithData<[f64; 3], usize>;

/// Collapses duplicate vertices and rewrites triangle indices to
/// canonical ids.
///
/// [`DedupMode::Exact`] keeps the vertex array and only redirects
/// indices. [`DedupMode::Clustered`] also compacts the vertex array so
/// that each cluster keeps one vertex. Returns how many vertices were
/// folded into another.
pub fn deduplicate_vertices(mesh: &mut NavTriangulation, mode: DedupMode) -> usize {
    let before = mesh.vertices.len();
    let collapsed = match mode {
        DedupMode::Exact => dedup_exact(mesh),
        DedupMode::Clustered { epsilon, neighbors } => dedup_clustered(mesh, epsilon, neighbors),
    };
    debug!(?mode, vertices = before, collapsed, "deduplicated vertices");
    collapsed
}

fn dedup_exact(mesh: &mut NavTriangulation) -> usize {
    let mut first_seen: HashMap<[u64; 3], usize> = HashMap::with_capacity(mesh.vertices.len());
    let mut canonical: Vec<usize> = (0..mesh.vertices.len()).collect();

    for (i, v) in mesh.vertices.iter().enumerate() {
        match first_seen.entry(position_key(v)) {
            Entry::Occupied(e) => canonical[i] = *e.get(),
            Entry::Vacant(e) => {
                e.insert(i);
            }
        }
    }

    for index in &mut mesh.indices {
        *index = canonical[*index];
    }

    mesh.vertices.len() - first_seen.len()
}

fn dedup_clustered(mesh: &mut NavTriangulation, epsilon: f64, neighbors: usize) -> usize {
    let n = mesh.vertices.len();
    let tree = RTree::bulk_load(
        mesh.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| IndexedPoint::new([v.x, v.y, v.z], i))
            .collect(),
    );

    let epsilon_sq = epsilon * epsilon;
    let mut forest = UnionFind::new(n);

    for (i, v) in mesh.vertices.iter().enumerate() {
        if forest.find(i) != i {
            continue;
        }
        // Only the k nearest are examined, so a crowded cluster can miss
        // members beyond k.
        for (neighbor, dist_sq) in tree
            .nearest_neighbor_iter_with_distance_2(&[v.x, v.y, v.z])
            .take(neighbors)
        {
            if dist_sq >= epsilon_sq {
                break;
            }
            forest.union(neighbor.data, i);
        }
    }

    // Compact: every root gets the next fresh id.
    let mut new_ids = vec![usize::MAX; n];
    let mut vertices = Vec::new();
    for i in 0..n {
        if forest.find(i) == i {
            new_ids[i] = vertices.len();
            vertices.push(mesh.vertices[i]);
        }
    }

    for index in &mut mesh.indices {
        *index = new_ids[forest.find(*index)];
    }

    let collapsed = n - vertices.len();
    mesh.vertices = vertices;
    collapsed
}

/// Hash key for exact position equality. `-0.0` and `0.0` share a key.
fn position_key(p: &Point3) -> [u64; 3] {
    let bits = |c: f64| if c == 0.0 { 0 } else { c.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}
