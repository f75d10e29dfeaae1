use tracing::debug;

use crate::collections::QuickRemovableSet;
use crate::math::up;
use crate::world::SpatialQuery;

use super::NavTriangulation;

/// Drops vertices buried under solid geometry.
///
/// A sphere of `clearance_radius` is placed just above each vertex; if
/// it overlaps a solid, the vertex and every triangle using it are
/// removed. Surviving vertices are compacted in their original order.
/// Returns the number of vertices removed.
pub fn filter_obstructed_vertices<Q: SpatialQuery + ?Sized>(
    mesh: &mut NavTriangulation,
    query: &Q,
    clearance_radius: f64,
) -> usize {
    let lift = up() * (clearance_radius * 1.1);
    let kept: QuickRemovableSet<usize> = mesh
        .vertices
        .iter()
        .enumerate()
        .filter(|(_, v)| !query.check_solid_overlap(&(*v + lift), clearance_radius))
        .map(|(i, _)| i)
        .collect();

    let mut indices = Vec::with_capacity(mesh.indices.len());
    for [a, b, c] in mesh.triangles() {
        if let (Some(na), Some(nb), Some(nc)) = (kept.find(&a), kept.find(&b), kept.find(&c)) {
            indices.extend([na, nb, nc]);
        }
    }

    let removed = mesh.vertices.len() - kept.len();
    mesh.vertices = kept.iter().map(|&i| mesh.vertices[i]).collect();
    mesh.indices = indices;

    debug!(
        removed,
        remaining = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "filtered obstructed vertices"
    );
    removed
}
