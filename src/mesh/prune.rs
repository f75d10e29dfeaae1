use tracing::{debug, trace};

use crate::collections::{QuickRemovableSet, UnionFind};
use crate::math::Point3;
use crate::world::SpatialQuery;

use super::boundary::Edge;

/// Removes boundary regions that no root point can walk to.
///
/// Vertices are grouped into components along `edges`. One
/// representative per component is path-tested against each root; a
/// component is kept once any root is reachable from it, which means the
/// path has at least two corners and ends within `sqrt(cell_size)` of the
/// root. Dropped vertices take their edges with them and both lists are
/// compacted. With no roots nothing is pruned. Returns the number of
/// vertices removed.
pub fn prune_unreachable<Q: SpatialQuery + ?Sized>(
    vertices: &mut Vec<Point3>,
    edges: &mut Vec<Edge>,
    roots: &[Point3],
    query: &Q,
    cell_size: f64,
) -> usize {
    if roots.is_empty() {
        return 0;
    }

    let vertex_count = vertices.len();
    let mut forest = UnionFind::new(vertex_count);
    let root_slots: Vec<usize> = roots.iter().map(|_| forest.push()).collect();
    for pair in root_slots.windows(2) {
        forest.union(pair[0], pair[1]);
    }

    for edge in edges.iter() {
        forest.union(edge.from, edge.to);
    }

    for (i, vertex) in vertices.iter().enumerate() {
        if forest.find(i) != i {
            continue;
        }
        let reachable = roots
            .iter()
            .position(|root| has_path(query, vertex, root, cell_size));
        if let Some(r) = reachable {
            trace!(vertex = i, root = r, "component reaches root");
            forest.union(i, root_slots[r]);
        }
    }

    let kept: QuickRemovableSet<usize> = (0..vertex_count)
        .filter(|&i| forest.find(i) >= vertex_count)
        .collect();

    *edges = edges
        .iter()
        .filter_map(|e| Some(Edge::new(kept.find(&e.from)?, kept.find(&e.to)?)))
        .collect();
    *vertices = kept.iter().map(|&i| vertices[i]).collect();

    let removed = vertex_count - kept.len();
    debug!(
        removed,
        remaining = vertices.len(),
        edges = edges.len(),
        "pruned unreachable regions"
    );
    removed
}

fn has_path<Q: SpatialQuery + ?Sized>(query: &Q, from: &Point3, to: &Point3, cell_size: f64) -> bool {
    query.find_path(from, to).is_some_and(|corners| {
        corners.len() > 1
            && corners
                .last()
                .is_some_and(|last| (to - last).norm_squared() < cell_size)
    })
}
