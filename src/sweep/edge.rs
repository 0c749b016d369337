//! Bisector edges
//!
//! The segment joining an edge's two sites belongs to the Delaunay graph; the
//! segment joining its two vertices belongs to the Voronoi diagram.

use glam::DVec2;

use crate::geom::{Point, Rectangle};

use super::site::SiteList;
use super::vertex::Vertex;
use super::{EdgeId, Side, SiteId, VertexId};

/// Line equation `a*x + b*y = c`
///
/// Whichever of `a` and `b` has the larger magnitude before normalization is
/// exactly `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineEquation {
    /// Perpendicular bisector of the segment `p0`-`p1`
    pub fn bisecting(p0: Point, p1: Point) -> Self {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;

        let c = p0.x * dx + p0.y * dy + (dx * dx + dy * dy) * 0.5;

        if dx.abs() > dy.abs() {
            Self {
                a: 1.0,
                b: dy / dx,
                c: c / dx,
            }
        } else {
            Self {
                a: dx / dy,
                b: 1.0,
                c: c / dy,
            }
        }
    }

    /// False for the bisector of two coincident points
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

/// A bisector between exactly two sites
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    index: EdgeId,
    line: LineEquation,
    sites: [SiteId; 2],
    vertices: [Option<VertexId>; 2],
    clipped: Option<[Point; 2]>,
}

impl Edge {
    #[inline]
    pub fn index(&self) -> EdgeId {
        self.index
    }

    #[inline]
    pub fn line(&self) -> LineEquation {
        self.line
    }

    #[inline]
    pub fn left_site(&self) -> SiteId {
        self.sites[Side::Left.index()]
    }

    #[inline]
    pub fn right_site(&self) -> SiteId {
        self.sites[Side::Right.index()]
    }

    #[inline]
    pub fn site(&self, side: Side) -> SiteId {
        self.sites[side.index()]
    }

    #[inline]
    pub fn left_vertex(&self) -> Option<VertexId> {
        self.vertices[Side::Left.index()]
    }

    #[inline]
    pub fn right_vertex(&self) -> Option<VertexId> {
        self.vertices[Side::Right.index()]
    }

    /// Vertex at the given end; `None` means the edge is unbounded there
    #[inline]
    pub fn vertex(&self, side: Side) -> Option<VertexId> {
        self.vertices[side.index()]
    }

    /// Attach a finalized vertex to one end
    ///
    /// # Panics
    ///
    /// Panics if that end already has a vertex. Ends are written exactly
    /// once during the sweep; a second write means the beach line is corrupt.
    pub(crate) fn set_vertex(&mut self, side: Side, vertex: VertexId) {
        let slot = &mut self.vertices[side.index()];
        assert!(
            slot.is_none(),
            "edge {} already has a {:?} vertex ({:?}); refusing to overwrite with {}",
            self.index,
            side,
            slot,
            vertex
        );
        *slot = Some(vertex);
    }

    /// True if at least one end is unbounded
    pub fn is_part_of_convex_hull(&self) -> bool {
        self.vertices.iter().any(Option::is_none)
    }

    /// True for a bisector between coincident sites
    pub fn is_degenerate(&self) -> bool {
        !self.line.is_finite()
    }

    /// Whether any part of the edge lies inside the bounds
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.clipped.is_some()
    }

    /// Clipped ends indexed by [`Side`], if visible
    #[inline]
    pub fn clipped_ends(&self) -> Option<[Point; 2]> {
        self.clipped
    }

    #[inline]
    pub fn clipped_end(&self, side: Side) -> Option<Point> {
        self.clipped.map(|ends| ends[side.index()])
    }

    /// Distance between the two defining sites
    pub(crate) fn sites_distance(&self, sites: &SiteList) -> f64 {
        sites[self.left_site()]
            .position()
            .distance(sites[self.right_site()].position())
    }

    /// Set the clipped ends to the part of the edge inside `bounds`, or clear
    /// them if no part of it is
    ///
    /// A missing vertex extends the edge to the bounds in that direction.
    pub(crate) fn clip_vertices(&mut self, bounds: &Rectangle, vertices: &[Vertex]) {
        self.clipped = None;
        if self.is_degenerate() {
            return;
        }

        let xmin = bounds.min_x();
        let ymin = bounds.min_y();
        let xmax = bounds.max_x();
        let ymax = bounds.max_y();
        let LineEquation { a, b, c } = self.line;

        // The end treated as "0" is the one lower along the dominant axis.
        let first = if a == 1.0 && b >= 0.0 {
            Side::Right
        } else {
            Side::Left
        };
        let vertex0 = self.vertex(first).map(|v| vertices[v].position());
        let vertex1 = self.vertex(first.other()).map(|v| vertices[v].position());

        let (mut x0, mut y0, mut x1, mut y1);

        if a == 1.0 {
            y0 = ymin;
            if let Some(v) = vertex0 {
                if v.y > ymin {
                    y0 = v.y;
                }
            }
            if y0 > ymax {
                return;
            }
            x0 = c - b * y0;

            y1 = ymax;
            if let Some(v) = vertex1 {
                if v.y < ymax {
                    y1 = v.y;
                }
            }
            if y1 < ymin {
                return;
            }
            x1 = c - b * y1;

            if (x0 > xmax && x1 > xmax) || (x0 < xmin && x1 < xmin) {
                return;
            }

            if x0 > xmax {
                x0 = xmax;
                y0 = (c - x0) / b;
            } else if x0 < xmin {
                x0 = xmin;
                y0 = (c - x0) / b;
            }

            if x1 > xmax {
                x1 = xmax;
                y1 = (c - x1) / b;
            } else if x1 < xmin {
                x1 = xmin;
                y1 = (c - x1) / b;
            }
        } else {
            x0 = xmin;
            if let Some(v) = vertex0 {
                if v.x > xmin {
                    x0 = v.x;
                }
            }
            if x0 > xmax {
                return;
            }
            y0 = c - a * x0;

            x1 = xmax;
            if let Some(v) = vertex1 {
                if v.x < xmax {
                    x1 = v.x;
                }
            }
            if x1 < xmin {
                return;
            }
            y1 = c - a * x1;

            if (y0 > ymax && y1 > ymax) || (y0 < ymin && y1 < ymin) {
                return;
            }

            if y0 > ymax {
                y0 = ymax;
                x0 = (c - y0) / a;
            } else if y0 < ymin {
                y0 = ymin;
                x0 = (c - y0) / a;
            }

            if y1 > ymax {
                y1 = ymax;
                x1 = (c - y1) / a;
            } else if y1 < ymin {
                y1 = ymin;
                x1 = (c - y1) / a;
            }
        }

        // snap rounding residue so boundary tests downstream are exact
        let tolerance = bounds.tolerance();
        let p0 = bounds.snap(DVec2::new(x0, y0), tolerance);
        let p1 = bounds.snap(DVec2::new(x1, y1), tolerance);

        let mut ends = [p0; 2];
        ends[first.other().index()] = p1;
        self.clipped = Some(ends);
    }
}

/// Create the bisector of two sites and register it on both
///
/// `site0` becomes the edge's left site and `site1` its right site. Both
/// vertex ends start out unbounded.
pub(crate) fn create_bisecting_edge(
    sites: &mut SiteList,
    edges: &mut Vec<Edge>,
    site0: SiteId,
    site1: SiteId,
) -> EdgeId {
    let index = edges.len();
    let line = LineEquation::bisecting(sites[site0].position(), sites[site1].position());

    edges.push(Edge {
        index,
        line,
        sites: [site0, site1],
        vertices: [None, None],
        clipped: None,
    });
    sites.get_mut(site0).add_edge(index);
    sites.get_mut(site1).add_edge(index);

    index
}
