use tracing::trace;

use crate::config::BakeConfig;
use crate::math::{midpoint, Point3, Vector3};
use crate::world::SpatialQuery;

/// An edge that passed validation, snapped onto the walkable surface.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSamples {
    pub start: Point3,
    pub end: Point3,
    pub normal: Vector3,
    /// Evenly spaced positions along the snapped edge.
    pub positions: Vec<Point3>,
}

/// Cheap whole-edge rejection before per-sample probing.
///
/// The edge midpoint, nudged a tenth of a cell outward, must snap onto
/// the walkable surface; a checkpoint half an agent radius further out
/// must not. On success the edge endpoints are shifted by the same
/// correction the midpoint needed, so samples start on the surface.
pub fn validate_edge<Q: SpatialQuery + ?Sized>(
    query: &Q,
    start: &Point3,
    end: &Point3,
    normal: &Vector3,
    config: &BakeConfig,
) -> Option<(Point3, Point3)> {
    let mid = midpoint(start, end) + normal * config.edge_nudge();
    let checkpoint = mid + normal * (config.agent_radius * 0.5);
    let check_radius = config.check_radius();

    let Some(hit) = query.sample_walkable_surface(&mid, check_radius) else {
        trace!(?mid, "edge midpoint is off the walkable surface");
        return None;
    };
    if query
        .sample_walkable_surface(&checkpoint, check_radius)
        .is_some()
    {
        trace!(?checkpoint, "surface continues past the edge");
        return None;
    }

    let correction = hit - mid;
    Some((start + correction, end + correction))
}

/// `2 * floor(half_length / step) + 1` positions centred on the midpoint
/// of `start → end`, `step` apart.
///
/// A zero-length edge or a non-positive step yields just the midpoint.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn sample_positions(start: &Point3, end: &Point3, step: f64) -> Vec<Point3> {
    let mid = midpoint(start, end);
    let half = end - mid;
    let half_length = half.norm();
    if step <= 0.0 || half_length <= 0.0 {
        return vec![mid];
    }

    let per_side = (half_length / step).floor() as usize;
    let delta = half / half_length * step;
    let first = mid - delta * per_side as f64;

    (0..=2 * per_side)
        .map(|k| first + delta * k as f64)
        .collect()
}

/// Validates an edge and lays out its sample positions.
pub fn sample_edge<Q: SpatialQuery + ?Sized>(
    query: &Q,
    start: &Point3,
    end: &Point3,
    normal: &Vector3,
    config: &BakeConfig,
) -> Option<EdgeSamples> {
    let (start, end) = validate_edge(query, start, end, normal, config)?;
    let positions = sample_positions(&start, &end, config.sample_step());
    Some(EdgeSamples {
        start,
        end,
        normal: *normal,
        positions,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::world::{Platform, PlatformWorld};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn sample_count_matches_formula() {
        for (length, step, expected) in [(4.0, 1.0, 5), (4.5, 1.0, 5), (1.9, 1.0, 1), (7.0, 0.5, 15)] {
            let samples = sample_positions(&p(0.0, 0.0, 0.0), &p(length, 0.0, 0.0), step);
            assert_eq!(samples.len(), expected, "length {length} step {step}");
        }
    }

    #[test]
    fn samples_are_symmetric_about_midpoint() {
        let start = p(1.0, 2.0, 3.0);
        let end = p(1.0, 2.0, 8.5);
        let samples = sample_positions(&start, &end, 1.0);
        let mid = midpoint(&start, &end);
        let n = samples.len();
        assert_relative_eq!(samples[n / 2], mid, epsilon = 1e-12);
        for k in 0..n {
            let mirrored = mid + (mid - samples[k]);
            assert_relative_eq!(samples[n - 1 - k], mirrored, epsilon = 1e-12);
        }
        assert_relative_eq!((samples[1] - samples[0]).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_length_edge_samples_midpoint() {
        let samples = sample_positions(&p(1.0, 0.0, 1.0), &p(1.0, 0.0, 1.0), 1.0);
        assert_eq!(samples, vec![p(1.0, 0.0, 1.0)]);
    }

    fn ledge() -> PlatformWorld {
        PlatformWorld::new().with_platform(Platform::new((0.0, 0.0), (4.0, 4.0), 0.0))
    }

    #[test]
    fn outward_edge_is_accepted_and_snapped_inward() {
        let config = BakeConfig::new(0.5, 0.1);
        let normal = Vector3::new(1.0, 0.0, 0.0);
        let (start, end) = validate_edge(
            &ledge(),
            &p(4.0, 0.0, 4.0),
            &p(4.0, 0.0, 0.0),
            &normal,
            &config,
        )
        .unwrap();
        assert_relative_eq!(start, p(4.0 - 0.01, 0.0, 4.0), epsilon = 1e-12);
        assert_relative_eq!(end, p(4.0 - 0.01, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn inward_facing_edge_is_rejected() {
        let config = BakeConfig::new(0.5, 0.1);
        let normal = Vector3::new(-1.0, 0.0, 0.0);
        assert!(validate_edge(&ledge(), &p(4.0, 0.0, 0.0), &p(4.0, 0.0, 4.0), &normal, &config)
            .is_none());
    }

    #[test]
    fn edge_off_the_surface_is_rejected() {
        let config = BakeConfig::new(0.5, 0.1);
        let normal = Vector3::new(1.0, 0.0, 0.0);
        assert!(validate_edge(&ledge(), &p(9.0, 0.0, 4.0), &p(9.0, 0.0, 0.0), &normal, &config)
            .is_none());
    }
}
