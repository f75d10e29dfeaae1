pub mod platform;
pub mod sink;

pub use platform::{Platform, PlatformWorld, SolidBox};
pub use sink::{LinkHandle, MemoryLinkSink};

use crate::error::SinkError;
use crate::link::LinkSpan;
use crate::math::Point3;

/// Read-only queries against the surrounding world.
///
/// Walkability, physics and path queries all go through here.
/// [`PlatformWorld`] is a self-contained implementation.
pub trait SpatialQuery {
    /// Nearest point on a walkable surface within `max_radius` of `point`.
    fn sample_walkable_surface(&self, point: &Point3, max_radius: f64) -> Option<Point3>;

    /// Whether a sphere at `point` overlaps solid geometry.
    fn check_solid_overlap(&self, point: &Point3, radius: f64) -> bool;

    /// First solid hit straight below `point`, at most `max_distance` away.
    fn raycast_down(&self, point: &Point3, max_distance: f64) -> Option<Point3>;

    /// Path corners from `from` to `to` across walkable surface.
    fn find_path(&self, from: &Point3, to: &Point3) -> Option<Vec<Point3>>;
}

/// Destination for finalized links. See [`MemoryLinkSink`].
pub trait LinkSink {
    /// Token identifying a submitted link until it is revoked.
    type Handle: Copy + std::fmt::Debug;

    /// Commits a link.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Rejected` if the world refuses the link.
    fn submit(&mut self, span: &LinkSpan) -> Result<Self::Handle, SinkError>;

    /// Removes a previously submitted link. Returns `false` if the handle
    /// was already revoked or never issued by this sink.
    fn revoke(&mut self, handle: Self::Handle) -> bool;
}
