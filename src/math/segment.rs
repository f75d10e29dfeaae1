use std::cmp::Ordering;

use super::{Point3, Vector3};

/// Dot products smaller than this are treated as perpendicular.
const DIRECTION_TOL: f64 = 1e-5;

/// A directed line segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Displacement from `start` to `end`.
    #[must_use]
    pub fn vector(&self) -> Vector3 {
        self.end - self.start
    }

    /// Squared length of the segment.
    #[must_use]
    pub fn length_squared(&self) -> f64 {
        self.vector().norm_squared()
    }

    /// The same segment traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Projects `self` onto the line through `target`.
    ///
    /// The result lies on `target`'s line and covers the extent of `self`
    /// measured along `target`'s direction. Projecting onto a degenerate
    /// target collapses to `target.start`.
    #[must_use]
    pub fn project_onto(&self, target: &Segment) -> Segment {
        let Some(axis) = target.vector().try_normalize(0.0) else {
            return Segment::new(target.start, target.start);
        };
        let along = axis.dot(&self.vector()) * axis;
        let offset = axis.dot(&(self.start - target.start)) * axis;

        let start = target.start + offset;
        Segment::new(start, start + along)
    }

    /// Returns true when two collinear segments overlap with positive length.
    ///
    /// The segments are treated as 1-D intervals: `other` is first flipped
    /// to agree with `self`'s direction, then each segment's far end must
    /// lie strictly ahead of the other's near end. Segments that merely
    /// touch at an endpoint do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Segment) -> bool {
        if self.length_squared() <= DIRECTION_TOL || other.length_squared() <= DIRECTION_TOL {
            return false;
        }

        let dir = self.vector();
        let other = if direction_sign(&dir, &other.vector()) < 0 {
            other.reversed()
        } else {
            *other
        };

        let a = direction_sign(&(self.end - other.start), &dir);
        let b = direction_sign(&(other.end - self.start), &dir);
        a + b == 2
    }

    /// Overlap of two collinear segments, oriented along `self`.
    ///
    /// The four endpoints are ordered by their position along `self` and
    /// the two middle ones bound the overlap. Returns `None` when the
    /// segments do not [`intersect`](Self::intersects).
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> Option<Segment> {
        if !self.intersects(other) {
            return None;
        }

        let dir = self.vector();
        let mut points = [self.start, self.end, other.start, other.end];
        points.sort_by(|p, q| {
            let tp = dir.dot(&(p - self.start));
            let tq = dir.dot(&(q - self.start));
            tp.partial_cmp(&tq).unwrap_or(Ordering::Equal)
        });

        Some(Segment::new(points[1], points[2]))
    }
}

/// Sign of the dot product, with a dead band around zero.
fn direction_sign(a: &Vector3, b: &Vector3) -> i32 {
    let dot = a.dot(b);
    if dot.abs() < DIRECTION_TOL {
        0
    } else if dot < 0.0 {
        -1
    } else {
        1
    }
}
