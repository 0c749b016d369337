use crate::geom::{compare_by_y_then_x, Point};

use super::edge::Edge;
use super::halfedge::{Boundary, Halfedge};
use super::site::SiteList;
use super::{Side, VertexId};

/// Determinants closer to zero than this are treated as parallel lines
const PARALLEL_EPSILON: f64 = 1.0e-10;

/// A Voronoi vertex: a point equidistant from three or more sites
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    index: VertexId,
    position: Point,
}

impl Vertex {
    pub(crate) fn new(index: VertexId, position: Point) -> Self {
        Self { index, position }
    }

    /// Order in which the vertex was finalized by the sweep
    #[inline]
    pub fn index(&self) -> VertexId {
        self.index
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }
}

/// Outcome of intersecting the bisectors under two neighbouring half-edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Intersection {
    /// The breakpoints converge at this point
    Finite(Point),
    /// The lines are numerically parallel but not rejected by the
    /// determinant test
    AtInfinity,
    /// The breakpoints diverge, or an argument has no edge
    None,
}

/// Where the breakpoints of two adjacent half-edges will meet, if ever
pub(crate) fn intersect(
    halfedge0: &Halfedge,
    halfedge1: &Halfedge,
    edges: &[Edge],
    sites: &SiteList,
) -> Intersection {
    let (Boundary::Active { edge: e0, .. }, Boundary::Active { edge: e1, .. }) =
        (halfedge0.boundary, halfedge1.boundary)
    else {
        return Intersection::None;
    };
    let edge0 = &edges[e0];
    let edge1 = &edges[e1];

    if edge0.right_site() == edge1.right_site() {
        return Intersection::None;
    }

    let l0 = edge0.line();
    let l1 = edge1.line();
    let determinant = l0.a * l1.b - l0.b * l1.a;
    if -PARALLEL_EPSILON < determinant && determinant < PARALLEL_EPSILON {
        return Intersection::None;
    }

    let x = (l0.c * l1.b - l1.c * l0.b) / determinant;
    let y = (l1.c * l0.a - l0.c * l1.a) / determinant;
    if x.is_nan() || y.is_nan() {
        return Intersection::AtInfinity;
    }

    // the half-edge whose edge has the lower right site decides the side test
    let (halfedge, edge) = if compare_by_y_then_x(
        sites[edge0.right_site()].position(),
        sites[edge1.right_site()].position(),
    )
    .is_lt()
    {
        (halfedge0, edge0)
    } else {
        (halfedge1, edge1)
    };

    let Boundary::Active { side, .. } = halfedge.boundary else {
        return Intersection::None;
    };
    let right_of_site = x >= sites[edge.right_site()].x();
    if (right_of_site && side == Side::Left) || (!right_of_site && side == Side::Right) {
        return Intersection::None;
    }

    Intersection::Finite(Point::new(x, y))
}
