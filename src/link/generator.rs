use tracing::trace;

use crate::config::BakeConfig;
use crate::math::{edge_normal, Point3, Vector3};
use crate::mesh::Edge;
use crate::world::SpatialQuery;

use super::merge::merge_candidates;
use super::sampler::sample_edge;
use super::{LinkCandidate, LinkSpan};

/// Strategy that turns sample positions along one edge into candidates.
///
/// Implementors only decide which samples produce a link and where it
/// lands; edge validation, sampling and merging are shared through
/// [`generate_along_edge`].
pub trait LinkGenerator {
    /// Candidates for the given samples, in sample order. Samples that
    /// cannot host a link are skipped.
    fn generate_link_candidates<Q: SpatialQuery + ?Sized>(
        &self,
        query: &Q,
        normal: &Vector3,
        samples: &[Point3],
    ) -> Vec<LinkCandidate>;
}

/// Runs `generator` along one boundary edge.
///
/// Returns nothing for degenerate or vertical edges and for edges that
/// fail validation. With span merging enabled, adjacent candidates are
/// merged; otherwise each candidate becomes its own world-frame span.
///
/// # Panics
///
/// Panics if either edge endpoint is out of range for `vertices`.
pub fn generate_along_edge<G, Q>(
    generator: &G,
    query: &Q,
    vertices: &[Point3],
    edge: &Edge,
    config: &BakeConfig,
) -> Vec<LinkSpan>
where
    G: LinkGenerator + ?Sized,
    Q: SpatialQuery + ?Sized,
{
    let (start, end) = (&vertices[edge.from], &vertices[edge.to]);
    let Some(normal) = edge_normal(start, end) else {
        trace!(from = edge.from, to = edge.to, "edge has no horizontal extent");
        return Vec::new();
    };
    let Some(samples) = sample_edge(query, start, end, &normal, config) else {
        return Vec::new();
    };

    let candidates = generator.generate_link_candidates(query, &samples.normal, &samples.positions);
    trace!(
        from = edge.from,
        to = edge.to,
        samples = samples.positions.len(),
        candidates = candidates.len(),
        "generated candidates"
    );

    if config.merge_spans {
        merge_candidates(&candidates, config.sample_step(), config.merge_epsilon)
    } else {
        candidates.iter().map(LinkSpan::from_candidate).collect()
    }
}
