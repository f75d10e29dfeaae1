use std::collections::VecDeque;

use crate::math::{Point3, TOLERANCE};
use crate::mesh::NavTriangulation;

use super::SpatialQuery;

/// Depth of the solid slab under each platform's walkable top.
const PLATFORM_THICKNESS: f64 = 0.5;

/// Height difference under which two platforms count as one floor.
const LEVEL_TOL: f64 = 1e-6;

/// Axis-aligned solid box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBox {
    pub min: Point3,
    pub max: Point3,
}

impl SolidBox {
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    fn contains_xz(&self, p: &Point3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    fn overlaps_sphere(&self, center: &Point3, radius: f64) -> bool {
        let closest = Point3::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
            center.z.clamp(self.min.z, self.max.z),
        );
        (closest - center).norm_squared() < radius * radius
    }
}

/// Walkable horizontal rectangle at a fixed height, resting on a thin slab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub min_x: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_z: f64,
    pub height: f64,
}

impl Platform {
    #[must_use]
    pub fn new(min: (f64, f64), max: (f64, f64), height: f64) -> Self {
        Self {
            min_x: min.0,
            min_z: min.1,
            max_x: max.0,
            max_z: max.1,
            height,
        }
    }

    /// Closest point on the walkable top.
    #[must_use]
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        Point3::new(
            p.x.clamp(self.min_x, self.max_x),
            self.height,
            p.z.clamp(self.min_z, self.max_z),
        )
    }

    fn slab(&self) -> SolidBox {
        SolidBox::new(
            Point3::new(self.min_x, self.height - PLATFORM_THICKNESS, self.min_z),
            Point3::new(self.max_x, self.height, self.max_z),
        )
    }

    fn is_on_top(&self, p: &Point3) -> bool {
        (p.y - self.height).abs() < LEVEL_TOL && self.slab().contains_xz(p)
    }

    fn touches(&self, other: &Platform) -> bool {
        (self.height - other.height).abs() < LEVEL_TOL
            && self.min_x <= other.max_x + LEVEL_TOL
            && other.min_x <= self.max_x + LEVEL_TOL
            && self.min_z <= other.max_z + LEVEL_TOL
            && other.min_z <= self.max_z + LEVEL_TOL
    }
}

/// Analytic world of walkable platforms and solid boxes.
///
/// Platforms are both walkable and solid; boxes are solid only. Paths
/// exist between points on platforms that touch at the same height.
#[derive(Debug, Clone, Default)]
pub struct PlatformWorld {
    platforms: Vec<Platform>,
    solids: Vec<SolidBox>,
}

impl PlatformWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platforms.push(platform);
        self
    }

    #[must_use]
    pub fn with_solid(mut self, solid: SolidBox) -> Self {
        self.solids.push(solid);
        self
    }

    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Triangulates every platform top as a grid of `cells × cells`
    /// quads. Each triangle gets its own vertex copies, the way engine
    /// triangulation exports usually look.
    #[must_use]
    pub fn triangulate(&self, cells: usize) -> NavTriangulation {
        let cells = cells.max(1);
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        #[allow(clippy::cast_precision_loss)]
        let n = cells as f64;
        for platform in &self.platforms {
            let dx = (platform.max_x - platform.min_x) / n;
            let dz = (platform.max_z - platform.min_z) / n;
            for i in 0..cells {
                for j in 0..cells {
                    #[allow(clippy::cast_precision_loss)]
                    let (x0, z0) = (
                        platform.min_x + dx * i as f64,
                        platform.min_z + dz * j as f64,
                    );
                    let (x1, z1) = (x0 + dx, z0 + dz);
                    let y = platform.height;
                    let a = Point3::new(x0, y, z0);
                    let b = Point3::new(x1, y, z0);
                    let c = Point3::new(x1, y, z1);
                    let d = Point3::new(x0, y, z1);
                    // Winding keeps boundary normals (-dz, 0, dx) outward.
                    for tri in [[b, a, d], [b, d, c]] {
                        for v in tri {
                            indices.push(vertices.len());
                            vertices.push(v);
                        }
                    }
                }
            }
        }

        NavTriangulation { vertices, indices }
    }

    fn platform_under(&self, p: &Point3) -> Option<usize> {
        self.platforms.iter().position(|pl| pl.is_on_top(p))
    }

    fn connected(&self, from: usize, to: usize) -> bool {
        let mut visited = vec![false; self.platforms.len()];
        let mut queue = VecDeque::from([from]);
        visited[from] = true;
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            for (next, platform) in self.platforms.iter().enumerate() {
                if !visited[next] && self.platforms[current].touches(platform) {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

impl SpatialQuery for PlatformWorld {
    fn sample_walkable_surface(&self, point: &Point3, max_radius: f64) -> Option<Point3> {
        self.platforms
            .iter()
            .map(|pl| pl.closest_point(point))
            .map(|q| ((q - point).norm_squared(), q))
            .filter(|(d, _)| *d <= max_radius * max_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, q)| q)
    }

    fn check_solid_overlap(&self, point: &Point3, radius: f64) -> bool {
        self.platforms
            .iter()
            .map(Platform::slab)
            .chain(self.solids.iter().copied())
            .any(|b| b.overlaps_sphere(point, radius))
    }

    fn raycast_down(&self, point: &Point3, max_distance: f64) -> Option<Point3> {
        self.platforms
            .iter()
            .map(Platform::slab)
            .chain(self.solids.iter().copied())
            .filter(|b| b.contains_xz(point))
            .map(|b| b.max.y)
            .filter(|&top| top <= point.y + TOLERANCE && point.y - top <= max_distance)
            .max_by(f64::total_cmp)
            .map(|top| Point3::new(point.x, top, point.z))
    }

    fn find_path(&self, from: &Point3, to: &Point3) -> Option<Vec<Point3>> {
        let start = self.platform_under(from)?;
        let goal = self.platform_under(to)?;
        self.connected(start, goal).then(|| vec![*from, *to])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ledge() -> PlatformWorld {
        PlatformWorld::new()
            .with_platform(Platform::new((0.0, 0.0), (4.0, 4.0), 0.0))
            .with_platform(Platform::new((-10.0, -10.0), (14.0, 14.0), -2.0))
    }

    #[test]
    fn sample_snaps_to_nearest_top() {
        let world = ledge();
        let hit = world
            .sample_walkable_surface(&Point3::new(4.05, 0.0, 2.0), 0.1)
            .unwrap();
        assert_relative_eq!(hit, Point3::new(4.0, 0.0, 2.0));
        assert!(world
            .sample_walkable_surface(&Point3::new(4.5, 0.0, 2.0), 0.1)
            .is_none());
    }

    #[test]
    fn raycast_finds_highest_top_below() {
        let world = ledge();
        let hit = world.raycast_down(&Point3::new(5.0, 0.0, 2.0), 4.0).unwrap();
        assert_relative_eq!(hit, Point3::new(5.0, -2.0, 2.0));
        let on_ledge = world.raycast_down(&Point3::new(2.0, 0.5, 2.0), 4.0).unwrap();
        assert_relative_eq!(on_ledge.y, 0.0);
        assert!(world.raycast_down(&Point3::new(5.0, 0.0, 2.0), 1.0).is_none());
    }

    #[test]
    fn overlap_sees_slabs_and_boxes() {
        let world = ledge().with_solid(SolidBox::new(
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ));
        assert!(world.check_solid_overlap(&Point3::new(2.0, 0.1, 2.0), 0.2));
        assert!(world.check_solid_overlap(&Point3::new(1.5, 1.0, 2.5), 0.6));
        assert!(!world.check_solid_overlap(&Point3::new(3.0, 0.5, 3.0), 0.2));
    }

    #[test]
    fn paths_stay_on_connected_floors() {
        let world = ledge().with_platform(Platform::new((4.0, 0.0), (6.0, 4.0), 0.0));
        let a = Point3::new(1.0, 0.0, 1.0);
        let b = Point3::new(5.0, 0.0, 1.0);
        let below = Point3::new(8.0, -2.0, 8.0);
        assert_eq!(world.find_path(&a, &b), Some(vec![a, b]));
        assert!(world.find_path(&a, &below).is_none());
    }

    #[test]
    fn triangulation_duplicates_shared_vertices() {
        let world = PlatformWorld::new().with_platform(Platform::new((0.0, 0.0), (2.0, 2.0), 0.0));
        let mesh = world.triangulate(2);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.vertices.len(), 24);
        assert!(mesh.validate().is_ok());
    }
}
