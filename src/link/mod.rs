pub mod drop_down;
pub mod generator;
pub mod merge;
pub mod sampler;

pub use drop_down::DropDownGenerator;
pub use generator::{generate_along_edge, LinkGenerator};
pub use merge::merge_candidates;
pub use sampler::{sample_edge, sample_positions, validate_edge, EdgeSamples};

use crate::math::{Point3, Rotation};

/// A single validated link at one sample position, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkCandidate {
    /// Take-off point on the walkable surface.
    pub start: Point3,
    /// Landing point on a walkable surface.
    pub end: Point3,
    /// Lateral extent; one sample step until merged.
    pub width: f64,
}

/// Where a span sits and how it is oriented.
///
/// Span points are offsets from `origin`. The rotation orients the span
/// along its edge and does not apply to those offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementFrame {
    pub origin: Point3,
    pub rotation: Rotation,
}

impl PlacementFrame {
    /// Frame at the world origin with no rotation.
    #[must_use]
    pub fn world() -> Self {
        Self {
            origin: Point3::origin(),
            rotation: Rotation::identity(),
        }
    }

    /// Maps an origin-relative point to world coordinates.
    #[must_use]
    pub fn to_world(&self, local: &Point3) -> Point3 {
        self.origin + local.coords
    }
}

impl Default for PlacementFrame {
    fn default() -> Self {
        Self::world()
    }
}

/// Finalized link descriptor handed to a link sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkSpan {
    /// Start point, relative to `frame.origin`.
    pub start: Point3,
    /// End point, relative to `frame.origin`.
    pub end: Point3,
    pub width: f64,
    pub frame: PlacementFrame,
}

impl LinkSpan {
    /// An unmerged candidate as a span in the world frame.
    #[must_use]
    pub fn from_candidate(candidate: &LinkCandidate) -> Self {
        Self {
            start: candidate.start,
            end: candidate.end,
            width: candidate.width,
            frame: PlacementFrame::world(),
        }
    }

    #[must_use]
    pub fn world_start(&self) -> Point3 {
        self.frame.to_world(&self.start)
    }

    #[must_use]
    pub fn world_end(&self) -> Point3 {
        self.frame.to_world(&self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    #[test]
    fn world_frame_is_identity() {
        let candidate = LinkCandidate {
            start: Point3::new(1.0, 2.0, 3.0),
            end: Point3::new(1.0, -1.0, 5.0),
            width: 1.0,
        };
        let span = LinkSpan::from_candidate(&candidate);
        assert_relative_eq!(span.world_start(), candidate.start);
        assert_relative_eq!(span.world_end(), candidate.end);
    }

    #[test]
    fn frame_translates_without_rotating_offsets() {
        let frame = PlacementFrame {
            origin: Point3::new(10.0, 0.0, 0.0),
            rotation: Rotation::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2),
        };
        let world = frame.to_world(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(world, Point3::new(11.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
