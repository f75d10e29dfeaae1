pub mod segment;

pub use segment::Segment;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for placement frames.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// World up axis. The walkable surface is expressed Y-up.
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}

/// Drops the vertical component of a vector.
#[must_use]
pub fn horizontal(v: &Vector3) -> Vector3 {
    Vector3::new(v.x, 0.0, v.z)
}

/// Horizontal unit normal of the directed edge `start → end`.
///
/// For a horizontal edge direction `(dx, 0, dz)` the normal is
/// `(-dz, 0, dx)`, i.e. the edge direction rotated a quarter turn about
/// the up axis. Returns `None` for edges that are vertical or degenerate.
#[must_use]
pub fn edge_normal(start: &Point3, end: &Point3) -> Option<Vector3> {
    let d = horizontal(&(end - start));
    Vector3::new(-d.z, 0.0, d.x).try_normalize(TOLERANCE)
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn edge_normal_is_quarter_turn_of_direction() {
        let n = edge_normal(&Point3::new(0.0, 0.0, 0.0), &Point3::new(2.0, 0.0, 0.0))
            .unwrap_or_else(Vector3::zeros);
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn edge_normal_ignores_slope() {
        let n = edge_normal(&Point3::new(0.0, 0.0, 0.0), &Point3::new(0.0, 3.0, -4.0))
            .unwrap_or_else(Vector3::zeros);
        assert_relative_eq!(n, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn vertical_edge_has_no_normal() {
        assert!(edge_normal(&Point3::origin(), &Point3::new(0.0, 1.0, 0.0)).is_none());
    }
}
