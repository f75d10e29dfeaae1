use tracing::{debug, info, info_span, warn};

use crate::config::BakeConfig;
use crate::error::{BakeError, Result};
use crate::link::{generate_along_edge, DropDownGenerator, LinkSpan};
use crate::math::Point3;
use crate::mesh::{
    deduplicate_vertices, extract_boundary, filter_boundary, filter_obstructed_vertices,
    merge_collinear_chains, opposing_overlaps, prune_unreachable, Edge, NavTriangulation,
};
use crate::world::{LinkSink, SpatialQuery};

/// Radius within which a reachability root must snap onto walkable surface.
const ROOT_SNAP_RADIUS: f64 = 0.1;

/// Boundary edges over the deduplicated vertex array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedSurface {
    pub vertices: Vec<Point3>,
    pub edges: Vec<Edge>,
}

/// Counts reported by [`LinkBaker::prepare`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub merged_vertices: usize,
    pub obstructed_vertices: usize,
    pub raw_boundary_edges: usize,
    pub boundary_edges: usize,
    pub non_manifold_edges: usize,
    pub overlapping_edges: usize,
}

/// Counts reported by [`LinkBaker::bake`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeSummary {
    /// Links revoked before regenerating.
    pub revoked: usize,
    pub submitted: usize,
    pub rejected: usize,
}

/// Bakes drop-down links from a walkable triangulation into a sink.
///
/// Owns the prepared boundary, the reachability roots and the sink. Every
/// stateful operation takes `&mut self`, so bakes never overlap.
#[derive(Debug)]
pub struct LinkBaker<S: LinkSink> {
    config: BakeConfig,
    generator: DropDownGenerator,
    surface: Option<PreparedSurface>,
    roots: Vec<Point3>,
    sink: S,
    handles: Vec<S::Handle>,
}

impl<S: LinkSink> LinkBaker<S> {
    /// Creates a baker that submits to `sink`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `config` does not validate.
    pub fn new(config: BakeConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let generator = DropDownGenerator::from_config(&config);
        Ok(Self {
            config,
            generator,
            surface: None,
            roots: Vec::new(),
            sink,
            handles: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &BakeConfig {
        &self.config
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Gives the sink back, dropping the remembered handles.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Handles of the links submitted by the last bake.
    #[must_use]
    pub fn handles(&self) -> &[S::Handle] {
        &self.handles
    }

    #[must_use]
    pub fn surface(&self) -> Option<&PreparedSurface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn roots(&self) -> &[Point3] {
        &self.roots
    }

    /// Runs the mesh stages: vertex deduplication, the optional
    /// obstructed-vertex filter, boundary extraction, collinear chain
    /// merging and a second boundary pass. Replaces any prepared surface.
    ///
    /// # Errors
    ///
    /// Returns a `MeshError` if `mesh` is malformed.
    pub fn prepare<Q: SpatialQuery + ?Sized>(
        &mut self,
        mut mesh: NavTriangulation,
        query: &Q,
    ) -> Result<PrepareSummary> {
        let _span = info_span!("prepare", vertices = mesh.vertices.len()).entered();
        mesh.validate()?;

        let merged_vertices = deduplicate_vertices(&mut mesh, self.config.dedup_mode());
        let obstructed_vertices = if self.config.filter_obstructed_vertices {
            filter_obstructed_vertices(&mut mesh, query, self.config.clearance_radius)
        } else {
            0
        };

        let extraction = extract_boundary(&mesh);
        if extraction.degenerate > 0 {
            debug!(count = extraction.degenerate, "skipped zero-length edges");
        }
        if extraction.non_manifold > 0 {
            warn!(count = extraction.non_manifold, "edges shared by three or more triangles");
        }

        let chained =
            merge_collinear_chains(&mesh.vertices, &extraction.edges, self.config.merge_epsilon);
        let edges = filter_boundary(&chained).edges;

        let overlaps = opposing_overlaps(&mesh.vertices, &edges, self.config.merge_epsilon);
        if !overlaps.is_empty() {
            warn!(
                pairs = overlaps.len(),
                "opposed boundary edges overlap; vertices may be unwelded"
            );
        }

        let summary = PrepareSummary {
            merged_vertices,
            obstructed_vertices,
            raw_boundary_edges: extraction.edges.len(),
            boundary_edges: edges.len(),
            non_manifold_edges: extraction.non_manifold,
            overlapping_edges: overlaps.len(),
        };
        info!(
            raw = summary.raw_boundary_edges,
            merged = summary.boundary_edges,
            "prepared boundary"
        );

        self.surface = Some(PreparedSurface {
            vertices: mesh.vertices,
            edges,
        });
        Ok(summary)
    }

    /// Registers a point reachable regions must connect to, snapped onto
    /// the walkable surface. Returns the snapped point.
    ///
    /// # Errors
    ///
    /// Returns `BakeError::RootOffSurface` if no walkable surface lies
    /// within snapping distance.
    pub fn add_reachability_root<Q: SpatialQuery + ?Sized>(
        &mut self,
        point: &Point3,
        query: &Q,
    ) -> Result<Point3> {
        let root = query
            .sample_walkable_surface(point, ROOT_SNAP_RADIUS)
            .ok_or(BakeError::RootOffSurface {
                x: point.x,
                y: point.y,
                z: point.z,
            })?;
        self.roots.push(root);
        Ok(root)
    }

    pub fn clear_reachability_roots(&mut self) {
        self.roots.clear();
    }

    /// Drops prepared boundary regions that no root can walk to. A no-op
    /// without roots. Returns the number of vertices removed.
    ///
    /// # Errors
    ///
    /// Returns `BakeError::NoPreparedSurface` before [`Self::prepare`].
    pub fn prune_unreachable<Q: SpatialQuery + ?Sized>(&mut self, query: &Q) -> Result<usize> {
        let surface = self.surface.as_mut().ok_or(BakeError::NoPreparedSurface)?;
        Ok(prune_unreachable(
            &mut surface.vertices,
            &mut surface.edges,
            &self.roots,
            query,
            self.config.cell_size,
        ))
    }

    /// Endpoints of the boundary edge at `index`, clamped to the last
    /// edge. `None` when nothing is prepared or no edges remain.
    #[must_use]
    pub fn boundary_edge(&self, index: usize) -> Option<(Point3, Point3)> {
        let (surface, edge) = self.clamped_edge(index)?;
        Some((surface.vertices[edge.from], surface.vertices[edge.to]))
    }

    /// Spans generated along one boundary edge, `index` clamped as in
    /// [`Self::boundary_edge`]. Nothing is submitted.
    pub fn generate_along_edge<Q: SpatialQuery + ?Sized>(
        &self,
        index: usize,
        query: &Q,
    ) -> Vec<LinkSpan> {
        self.clamped_edge(index)
            .map(|(surface, edge)| {
                generate_along_edge(&self.generator, query, &surface.vertices, edge, &self.config)
            })
            .unwrap_or_default()
    }

    /// Spans along every boundary edge, in edge order. Nothing is
    /// submitted.
    ///
    /// # Errors
    ///
    /// Returns `BakeError::NoPreparedSurface` before [`Self::prepare`].
    pub fn generate_links<Q: SpatialQuery + ?Sized>(&self, query: &Q) -> Result<Vec<LinkSpan>> {
        let surface = self.surface.as_ref().ok_or(BakeError::NoPreparedSurface)?;
        Ok(surface
            .edges
            .iter()
            .flat_map(|edge| {
                generate_along_edge(&self.generator, query, &surface.vertices, edge, &self.config)
            })
            .collect())
    }

    /// Revokes every link from the previous bake, then generates and
    /// submits links along every boundary edge.
    ///
    /// Rejected submissions are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `BakeError::NoPreparedSurface` before [`Self::prepare`].
    pub fn bake<Q: SpatialQuery + ?Sized>(&mut self, query: &Q) -> Result<BakeSummary> {
        let _span = info_span!("bake").entered();
        let spans = self.generate_links(query)?;

        let mut summary = BakeSummary {
            revoked: self.revoke_all(),
            ..BakeSummary::default()
        };

        for span in &spans {
            match self.sink.submit(span) {
                Ok(handle) => {
                    self.handles.push(handle);
                    summary.submitted += 1;
                }
                Err(err) => {
                    warn!(%err, width = span.width, "link submission failed");
                    summary.rejected += 1;
                }
            }
        }

        info!(
            edges = self.surface.as_ref().map_or(0, |s| s.edges.len()),
            submitted = summary.submitted,
            rejected = summary.rejected,
            revoked = summary.revoked,
            "bake finished"
        );
        Ok(summary)
    }

    /// Revokes every link this baker submitted. Returns how many the sink
    /// still held.
    pub fn revoke_all(&mut self) -> usize {
        let revoked = self
            .handles
            .drain(..)
            .filter(|&handle| self.sink.revoke(handle))
            .count();
        if revoked > 0 {
            debug!(revoked, "revoked previous links");
        }
        revoked
    }

    fn clamped_edge(&self, index: usize) -> Option<(&PreparedSurface, &Edge)> {
        let surface = self.surface.as_ref()?;
        let last = surface.edges.len().checked_sub(1)?;
        Some((surface, &surface.edges[index.min(last)]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LinkBakeError;
    use crate::world::{MemoryLinkSink, Platform, PlatformWorld};

    fn ledge_over_ground() -> PlatformWorld {
        PlatformWorld::new()
            .with_platform(Platform::new((0.0, 0.0), (4.0, 4.0), 0.0))
            .with_platform(Platform::new((-10.0, -10.0), (14.0, 14.0), -2.0))
    }

    fn baker() -> LinkBaker<MemoryLinkSink> {
        LinkBaker::new(BakeConfig::new(0.5, 0.1), MemoryLinkSink::new()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = LinkBaker::new(BakeConfig::new(-1.0, 0.1), MemoryLinkSink::new());
        assert!(matches!(result, Err(LinkBakeError::Config(_))));
    }

    #[test]
    fn operations_before_prepare() {
        let world = ledge_over_ground();
        let mut baker = baker();
        assert!(baker.boundary_edge(0).is_none());
        assert!(baker.generate_along_edge(3, &world).is_empty());
        assert!(matches!(
            baker.bake(&world),
            Err(LinkBakeError::Bake(BakeError::NoPreparedSurface))
        ));
        assert!(matches!(
            baker.prune_unreachable(&world),
            Err(LinkBakeError::Bake(BakeError::NoPreparedSurface))
        ));
    }

    #[test]
    fn malformed_mesh_is_rejected() {
        let world = ledge_over_ground();
        let mesh = NavTriangulation {
            vertices: vec![Point3::origin()],
            indices: vec![0, 0],
        };
        assert!(matches!(
            baker().prepare(mesh, &world),
            Err(LinkBakeError::Mesh(_))
        ));
    }

    #[test]
    fn prepare_reduces_grid_to_platform_outlines() {
        let world = ledge_over_ground();
        let mut baker = baker();
        let summary = baker.prepare(world.triangulate(4), &world).unwrap();
        assert_eq!(summary.raw_boundary_edges, 32);
        assert_eq!(summary.boundary_edges, 8);
        assert_eq!(summary.non_manifold_edges, 0);
        assert_eq!(summary.overlapping_edges, 0);
    }

    #[test]
    fn edge_index_is_clamped() {
        let world = ledge_over_ground();
        let mut baker = baker();
        baker.prepare(world.triangulate(4), &world).unwrap();
        assert_eq!(baker.boundary_edge(1000), baker.boundary_edge(7));
        assert!(baker.boundary_edge(7).is_some());
    }

    #[test]
    fn roots_must_snap_to_surface() {
        let world = ledge_over_ground();
        let mut baker = baker();
        let root = baker
            .add_reachability_root(&Point3::new(1.0, 0.05, 1.0), &world)
            .unwrap();
        assert_eq!(root, Point3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            baker.add_reachability_root(&Point3::new(1.0, 3.0, 1.0), &world),
            Err(LinkBakeError::Bake(BakeError::RootOffSurface { .. }))
        ));
        assert_eq!(baker.roots().len(), 1);
    }

    #[test]
    fn pruning_keeps_only_rooted_platform() {
        let world = ledge_over_ground();
        let mut baker = baker();
        baker.prepare(world.triangulate(4), &world).unwrap();
        baker
            .add_reachability_root(&Point3::new(1.0, 0.0, 1.0), &world)
            .unwrap();
        assert!(baker.prune_unreachable(&world).unwrap() > 0);
        let surface = baker.surface().unwrap();
        assert_eq!(surface.edges.len(), 4);
        assert!(surface.vertices.iter().all(|v| v.y == 0.0));
    }

    #[test]
    fn rejected_links_do_not_abort_the_bake() {
        let world = ledge_over_ground();
        let sink = MemoryLinkSink::with_min_width(100.0);
        let mut baker = LinkBaker::new(BakeConfig::new(0.5, 0.1), sink).unwrap();
        baker.prepare(world.triangulate(4), &world).unwrap();
        let summary = baker.bake(&world).unwrap();
        assert_eq!(summary.submitted, 0);
        assert_eq!(summary.rejected, 4);
        assert!(baker.handles().is_empty());
    }
}
