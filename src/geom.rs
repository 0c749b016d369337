//! Planar geometry value types
//!
//! Everything here is a plain value with no knowledge of the sweep. Points
//! are `glam::DVec2` so the whole crate works in double precision.

use std::cmp::Ordering;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D position in double precision
pub type Point = DVec2;

/// Distance below which two points of one diagram are the same point, as a
/// fraction of the bounds' half-perimeter
const RELATIVE_EPSILON: f64 = 1e-9;

/// Compare two points by y first, then by x
///
/// This is the one ordering used throughout construction: site order, event
/// order and edge orientation all go through it. NaN coordinates compare as
/// equal rather than panicking.
pub fn compare_by_y_then_x(a: Point, b: Point) -> Ordering {
    if a.y < b.y {
        Ordering::Less
    } else if a.y > b.y {
        Ordering::Greater
    } else if a.x < b.x {
        Ordering::Less
    } else if a.x > b.x {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Whether two points lie within `epsilon` of each other
#[inline]
pub fn close_enough(a: Point, b: Point, epsilon: f64) -> bool {
    a.distance(b) <= epsilon
}

/// Axis-aligned rectangle given by its minimum corner and extents
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Minimum x
    pub x: f64,
    /// Minimum y
    pub y: f64,
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
}

impl Rectangle {
    /// Create a rectangle from its minimum corner and extents
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest rectangle containing every point, or the empty rectangle at
    /// the origin when there are none
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Self {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        let mut any = false;
        for p in points {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }

        if !any {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Minimum corner
    #[inline]
    pub fn min(&self) -> Point {
        DVec2::new(self.min_x(), self.min_y())
    }

    /// Maximum corner
    #[inline]
    pub fn max(&self) -> Point {
        DVec2::new(self.max_x(), self.max_y())
    }

    pub fn center(&self) -> Point {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    /// Whether the point lies inside the rectangle or on its boundary
    pub fn contains(&self, p: Point) -> bool {
        !(p.x < self.min_x() || p.x > self.max_x() || p.y < self.min_y() || p.y > self.max_y())
    }

    /// Move a point onto the rectangle if it lies outside
    #[inline]
    pub fn clamp(&self, p: Point) -> Point {
        DVec2::new(
            p.x.clamp(self.min_x(), self.max_x()),
            p.y.clamp(self.min_y(), self.max_y()),
        )
    }

    /// Distance below which two points inside this rectangle are merged
    #[inline]
    pub fn tolerance(&self) -> f64 {
        RELATIVE_EPSILON * (self.width + self.height)
    }

    /// Clamp a point onto the rectangle, then move it onto any side it lies
    /// within `tolerance` of
    pub fn snap(&self, p: Point, tolerance: f64) -> Point {
        let snap = |v: f64, lo: f64, hi: f64| {
            if v - lo <= tolerance {
                lo
            } else if hi - v <= tolerance {
                hi
            } else {
                v
            }
        };
        let p = self.clamp(p);
        DVec2::new(
            snap(p.x, self.min_x(), self.max_x()),
            snap(p.y, self.min_y(), self.max_y()),
        )
    }

    /// The four corners in counter-clockwise order starting at the minimum
    /// corner
    pub fn corners(&self) -> [Point; 4] {
        [
            DVec2::new(self.min_x(), self.min_y()),
            DVec2::new(self.max_x(), self.min_y()),
            DVec2::new(self.max_x(), self.max_y()),
            DVec2::new(self.min_x(), self.max_y()),
        ]
    }

    /// Distance travelled counter-clockwise along the boundary from the
    /// minimum corner to `p`, or `None` if `p` is not on the boundary
    ///
    /// Membership is exact: points produced by clipping are clamped onto the
    /// boundary so no tolerance is needed.
    pub fn perimeter_position(&self, p: Point) -> Option<f64> {
        let sides = BoundsCheck::of(p, self);
        if sides.contains(BoundsCheck::MIN_Y) {
            Some(p.x - self.min_x())
        } else if sides.contains(BoundsCheck::MAX_X) {
            Some(self.width + (p.y - self.min_y()))
        } else if sides.contains(BoundsCheck::MAX_Y) {
            Some(self.width + self.height + (self.max_x() - p.x))
        } else if sides.contains(BoundsCheck::MIN_X) {
            Some(2.0 * self.width + self.height + (self.max_y() - p.y))
        } else {
            None
        }
    }

    /// Corners strictly between two perimeter positions, in walking order
    pub fn corners_between(&self, from: f64, to: f64, counter_clockwise: bool) -> Vec<Point> {
        let perimeter = self.perimeter();
        if !(perimeter > 0.0) {
            return Vec::new();
        }

        let corner_positions = [
            0.0,
            self.width,
            self.width + self.height,
            2.0 * self.width + self.height,
        ];
        let corners = self.corners();

        let offset = |t: f64| {
            if counter_clockwise {
                (t - from).rem_euclid(perimeter)
            } else {
                (from - t).rem_euclid(perimeter)
            }
        };
        let span = offset(to);

        let mut passed: Vec<(f64, Point)> = corner_positions
            .iter()
            .zip(corners)
            .map(|(&t, corner)| (offset(t), corner))
            .filter(|&(d, _)| d > 0.0 && d < span)
            .collect();
        passed.sort_by(|a, b| a.0.total_cmp(&b.0));
        passed.into_iter().map(|(_, corner)| corner).collect()
    }
}

/// Which sides of a rectangle a point lies on, as a bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct BoundsCheck(u8);

impl BoundsCheck {
    pub const MIN_X: u8 = 1;
    pub const MAX_X: u8 = 2;
    pub const MIN_Y: u8 = 4;
    pub const MAX_Y: u8 = 8;

    pub fn of(p: Point, bounds: &Rectangle) -> Self {
        let mut value = 0;

        if p.x == bounds.min_x() {
            value |= Self::MIN_X;
        } else if p.x == bounds.max_x() {
            value |= Self::MAX_X;
        }

        if p.y == bounds.min_y() {
            value |= Self::MIN_Y;
        } else if p.y == bounds.max_y() {
            value |= Self::MAX_Y;
        }

        Self(value)
    }

    #[inline]
    pub fn contains(self, side: u8) -> bool {
        self.0 & side != 0
    }
}

/// A straight segment between two points
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p0: Point,
    pub p1: Point,
}

impl LineSegment {
    pub const fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }
}

/// A circle, used for the per-site inscribed circles
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// Rotational direction of a polygon's vertex sequence
///
/// Counter-clockwise means positive signed area with the x axis pointing
/// right and the y axis pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
    None,
}

/// Read-only view of a closed polygon
#[derive(Debug, Clone, Copy)]
pub struct Polygon<'a> {
    vertices: &'a [Point],
}

impl<'a> Polygon<'a> {
    pub fn new(vertices: &'a [Point]) -> Self {
        Self { vertices }
    }

    /// Twice the signed area (shoelace sum)
    pub fn signed_double_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut sum = 0.0;
        for i in 0..n {
            let p = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            sum += p.x * next.y - next.x * p.y;
        }
        sum
    }

    pub fn area(&self) -> f64 {
        (self.signed_double_area() * 0.5).abs()
    }

    pub fn winding(&self) -> Winding {
        let signed = self.signed_double_area();
        if signed < 0.0 {
            Winding::Clockwise
        } else if signed > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_by_y_then_x() {
        let a = Point::new(5.0, 1.0);
        let b = Point::new(1.0, 2.0);
        let c = Point::new(3.0, 2.0);

        assert_eq!(compare_by_y_then_x(a, b), Ordering::Less);
        assert_eq!(compare_by_y_then_x(c, b), Ordering::Greater);
        assert_eq!(compare_by_y_then_x(b, b), Ordering::Equal);
    }

    #[test]
    fn test_rectangle_bounding() {
        let rect = Rectangle::bounding([
            Point::new(2.0, -1.0),
            Point::new(-3.0, 4.0),
            Point::new(1.0, 1.0),
        ]);
        assert_eq!(rect, Rectangle::new(-3.0, -1.0, 5.0, 5.0));

        let empty = Rectangle::bounding(std::iter::empty());
        assert_eq!(empty.area(), 0.0);
    }

    #[test]
    fn test_perimeter_position() {
        let rect = Rectangle::new(0.0, 0.0, 100.0, 50.0);

        assert_eq!(rect.perimeter_position(Point::new(0.0, 0.0)), Some(0.0));
        assert_eq!(rect.perimeter_position(Point::new(40.0, 0.0)), Some(40.0));
        assert_eq!(rect.perimeter_position(Point::new(100.0, 10.0)), Some(110.0));
        assert_eq!(rect.perimeter_position(Point::new(100.0, 50.0)), Some(150.0));
        assert_eq!(rect.perimeter_position(Point::new(30.0, 50.0)), Some(220.0));
        assert_eq!(rect.perimeter_position(Point::new(0.0, 20.0)), Some(280.0));
        assert_eq!(rect.perimeter_position(Point::new(30.0, 20.0)), None);
    }

    #[test]
    fn test_snap_onto_sides() {
        let rect = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        let tolerance = rect.tolerance();

        assert_eq!(rect.snap(Point::new(1e-12, 40.0), tolerance), Point::new(0.0, 40.0));
        assert_eq!(rect.snap(Point::new(60.0, 100.0 - 1e-12), tolerance), Point::new(60.0, 100.0));
        assert_eq!(rect.snap(Point::new(-3.0, 1e-13), tolerance), Point::new(0.0, 0.0));
        assert_eq!(rect.snap(Point::new(0.5, 40.0), tolerance), Point::new(0.5, 40.0));
        assert!(rect.perimeter_position(rect.snap(Point::new(99.9999999999, 7.0), tolerance)).is_some());
    }

    #[test]
    fn test_corners_between() {
        let rect = Rectangle::new(0.0, 0.0, 100.0, 100.0);

        // bottom side to top side, counter-clockwise passes the two right corners
        let ccw = rect.corners_between(50.0, 250.0, true);
        assert_eq!(ccw, vec![Point::new(100.0, 0.0), Point::new(100.0, 100.0)]);

        // same endpoints clockwise passes the two left corners
        let cw = rect.corners_between(50.0, 250.0, false);
        assert_eq!(cw, vec![Point::new(0.0, 0.0), Point::new(0.0, 100.0)]);

        // wrapping past the origin
        let wrap = rect.corners_between(350.0, 50.0, true);
        assert_eq!(wrap, vec![Point::new(0.0, 0.0)]);

        // a corner endpoint is never inserted again
        let from_corner = rect.corners_between(100.0, 150.0, true);
        assert!(from_corner.is_empty());
    }

    #[test]
    fn test_polygon_winding() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert_eq!(Polygon::new(&square).winding(), Winding::CounterClockwise);
        assert_eq!(Polygon::new(&square).area(), 1.0);

        let mut reversed = square;
        reversed.reverse();
        assert_eq!(Polygon::new(&reversed).winding(), Winding::Clockwise);
        assert_eq!(Polygon::new(&[]).winding(), Winding::None);
    }

    #[test]
    fn test_bounds_check() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let corner = BoundsCheck::of(Point::new(10.0, 0.0), &rect);
        assert!(corner.contains(BoundsCheck::MAX_X));
        assert!(corner.contains(BoundsCheck::MIN_Y));
        assert!(!corner.contains(BoundsCheck::MIN_X));
        assert_eq!(BoundsCheck::of(Point::new(5.0, 5.0), &rect), BoundsCheck::default());
    }
}
