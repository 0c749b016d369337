//! Half-edge nodes shared by the beach line and the event queue
//!
//! Nodes live in one arena per sweep and link to each other by index. A node
//! is owned by the arena for the whole sweep; unlinking it from the beach
//! line only marks it retired.

use std::ops::{Index, IndexMut};

use crate::geom::Point;

use super::edge::{Edge, LineEquation};
use super::site::SiteList;
use super::{EdgeId, Side};

/// Index of a half-edge node in its arena
pub(crate) type HalfedgeId = usize;

/// What a half-edge node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// One of the two beach line end markers
    Sentinel,
    /// One side of a bisector currently on the beach line
    Active { edge: EdgeId, side: Side },
    /// Removed from the beach line; stale hash entries are dropped lazily
    Retired,
}

/// One side of a bisector as it appears on the beach line
#[derive(Debug, Clone)]
pub(crate) struct Halfedge {
    pub boundary: Boundary,
    pub left: Option<HalfedgeId>,
    pub right: Option<HalfedgeId>,
    pub next_in_queue: Option<HalfedgeId>,
    /// Pending circle event position; `Some` exactly while queued
    pub vertex: Option<Point>,
    /// Sweep coordinate at which the pending event fires
    pub ystar: f64,
}

impl Halfedge {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            left: None,
            right: None,
            next_in_queue: None,
            vertex: None,
            ystar: 0.0,
        }
    }

    /// Whether `p` lies left of the breakpoint this half-edge traces
    ///
    /// Fortune's parabola test: a cheap sign test settles most cases and the
    /// full comparison only runs near the breakpoint. Non-active nodes are
    /// never left of anything; the beach line checks sentinels itself.
    pub fn is_left_of(&self, p: Point, edges: &[Edge], sites: &SiteList) -> bool {
        let Boundary::Active { edge, side } = self.boundary else {
            return false;
        };
        let edge = &edges[edge];

        let top_site = sites[edge.right_site()].position();
        let right_of_site = p.x > top_site.x;
        if right_of_site && side == Side::Left {
            return true;
        }
        if !right_of_site && side == Side::Right {
            return false;
        }

        let LineEquation { a, b, c } = edge.line();
        let above;

        if a == 1.0 {
            let dyp = p.y - top_site.y;
            let dxp = p.x - top_site.x;
            let mut fast = false;
            let mut is_above;

            if (!right_of_site && b < 0.0) || (right_of_site && b >= 0.0) {
                is_above = dyp >= b * dxp;
                fast = is_above;
            } else {
                is_above = p.x + p.y * b > c;
                if b < 0.0 {
                    is_above = !is_above;
                }
                if !is_above {
                    fast = true;
                }
            }

            if !fast {
                let dxs = top_site.x - sites[edge.left_site()].x();
                is_above = b * (dxp * dxp - dyp * dyp)
                    < dxs * dyp * (1.0 + 2.0 * dxp / dxs + b * b);
                if b < 0.0 {
                    is_above = !is_above;
                }
            }
            above = is_above;
        } else {
            let yl = c - a * p.x;
            let t1 = p.y - yl;
            let t2 = p.x - top_site.x;
            let t3 = yl - top_site.y;
            above = t1 * t1 > t2 * t2 + t3 * t3;
        }

        match side {
            Side::Left => above,
            Side::Right => !above,
        }
    }
}

/// Arena owning every half-edge node of one sweep
#[derive(Debug, Default)]
pub(crate) struct Halfedges {
    nodes: Vec<Halfedge>,
}

impl Halfedges {
    pub fn push(&mut self, boundary: Boundary) -> HalfedgeId {
        let id = self.nodes.len();
        self.nodes.push(Halfedge::new(boundary));
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Index<HalfedgeId> for Halfedges {
    type Output = Halfedge;

    #[inline]
    fn index(&self, id: HalfedgeId) -> &Halfedge {
        &self.nodes[id]
    }
}

impl IndexMut<HalfedgeId> for Halfedges {
    #[inline]
    fn index_mut(&mut self, id: HalfedgeId) -> &mut Halfedge {
        &mut self.nodes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::edge::create_bisecting_edge;

    #[test]
    fn test_is_left_of_vertical_bisector() {
        // sites (30,50) and (70,50): bisector x = 50
        let mut sites = SiteList::with_capacity(2);
        sites.add(Point::new(30.0, 50.0), 0);
        sites.add(Point::new(70.0, 50.0), 1);
        sites.sort();
        let mut edges = Vec::new();
        let e = create_bisecting_edge(&mut sites, &mut edges, 0, 1);

        let left = Halfedge::new(Boundary::Active { edge: e, side: Side::Left });
        let right = Halfedge::new(Boundary::Active { edge: e, side: Side::Right });

        let far_right = Point::new(90.0, 80.0);
        assert!(left.is_left_of(far_right, &edges, &sites));
        let far_left = Point::new(10.0, 80.0);
        assert!(!right.is_left_of(far_left, &edges, &sites));
    }

    #[test]
    fn test_sentinel_is_never_left_of() {
        let sites = SiteList::default();
        let sentinel = Halfedge::new(Boundary::Sentinel);
        assert!(!sentinel.is_left_of(Point::ZERO, &[], &sites));
    }

    #[test]
    fn test_arena_indexing() {
        let mut arena = Halfedges::default();
        let a = arena.push(Boundary::Sentinel);
        let b = arena.push(Boundary::Sentinel);
        arena[a].right = Some(b);
        arena[b].left = Some(a);

        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a].right, Some(b));
        assert_eq!(arena[b].left, Some(a));
        assert!(arena[a].vertex.is_none());
    }
}
