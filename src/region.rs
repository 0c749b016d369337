//! Per-site regions
//!
//! A site's edges come out of the sweep in creation order. Reordering links
//! them into a chain where consecutive edges share an endpoint; stitching
//! then walks that chain, emits the clipped endpoints and closes the polygon
//! along the bounds with whatever rectangle corners lie inside the region.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::CornerRule;
use crate::geom::{close_enough, BoundsCheck, Point, Polygon, Rectangle, Winding};
use crate::sweep::edge::Edge;
use crate::sweep::{EdgeId, Side};

/// What consecutive edges of a chain must share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderCriterion {
    /// Share a Voronoi vertex; used for site regions
    ByVertex,
    /// Share a site; used for walking the convex hull
    BySite,
}

/// Edges linked end to end, each with the side that comes first along the
/// chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeChain {
    links: Vec<(EdgeId, Side)>,
}

impl EdgeChain {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// `(edge, orientation)` pairs in chain order
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, Side)> + '_ {
        self.links.iter().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.links.iter().map(|&(edge, _)| edge)
    }
}

/// Link `edge_ids` into a chain where consecutive edges share an endpoint
///
/// The first edge keeps orientation [`Side::Left`]; every other edge is
/// attached at whichever end of the growing chain matches and is oriented so
/// its leading side touches the previous edge. With [`ReorderCriterion::ByVertex`]
/// two unbounded ends count as matching each other.
///
/// Returns `None` when a pass over the remaining edges attaches nothing, or
/// when a vertex-linked chain contains a degenerate edge.
pub fn reorder_edges(
    edge_ids: &[EdgeId],
    edges: &[Edge],
    criterion: ReorderCriterion,
) -> Option<EdgeChain> {
    let Some((&first_id, _)) = edge_ids.split_first() else {
        return Some(EdgeChain::default());
    };

    let unusable = |edge: &Edge| criterion == ReorderCriterion::ByVertex && edge.is_degenerate();
    let key = |edge: &Edge, side: Side| match criterion {
        ReorderCriterion::ByVertex => edge.vertex(side),
        ReorderCriterion::BySite => Some(edge.site(side)),
    };

    let first_edge = &edges[first_id];
    if unusable(first_edge) {
        return None;
    }

    let mut chain = VecDeque::with_capacity(edge_ids.len());
    chain.push_back((first_id, Side::Left));
    let mut first_point = key(first_edge, Side::Left);
    let mut last_point = key(first_edge, Side::Right);

    let mut done = vec![false; edge_ids.len()];
    done[0] = true;
    let mut n_done = 1;

    while n_done < edge_ids.len() {
        let before = n_done;

        for (i, &id) in edge_ids.iter().enumerate().skip(1) {
            if done[i] {
                continue;
            }
            let edge = &edges[id];
            if unusable(edge) {
                return None;
            }

            let left_point = key(edge, Side::Left);
            let right_point = key(edge, Side::Right);
            if left_point == last_point {
                last_point = right_point;
                chain.push_back((id, Side::Left));
            } else if right_point == first_point {
                first_point = left_point;
                chain.push_front((id, Side::Left));
            } else if left_point == first_point {
                first_point = right_point;
                chain.push_front((id, Side::Right));
            } else if right_point == last_point {
                last_point = left_point;
                chain.push_back((id, Side::Right));
            } else {
                continue;
            }

            done[i] = true;
            n_done += 1;
        }

        if n_done == before {
            return None;
        }
    }

    Some(EdgeChain {
        links: chain.into(),
    })
}

/// Close the polygon of one site from its vertex-linked edge chain
///
/// Visible edges shorter than the merge tolerance are skipped. Returns an
/// empty vector when no edge of the chain is left; the caller decides
/// whether such a site covers the whole bounds.
pub(crate) fn stitch_region(
    site: Point,
    chain: &EdgeChain,
    edges: &[Edge],
    bounds: &Rectangle,
    rule: CornerRule,
) -> Vec<Point> {
    let tolerance = bounds.tolerance();
    let links: Vec<Link> = chain
        .iter()
        .filter_map(|(id, side)| {
            let edge = &edges[id];
            let ends = edge.clipped_ends()?;
            if close_enough(ends[0], ends[1], tolerance) {
                return None;
            }
            Some(Link {
                ends,
                side,
                bounded: edge.left_vertex().is_some() || edge.right_vertex().is_some(),
            })
        })
        .collect();

    if links.is_empty() {
        return Vec::new();
    }

    let stitcher = Stitcher::new(site, &links, bounds, rule, tolerance);
    let mut points = stitcher.stitch();

    if Polygon::new(&points).winding() == Winding::Clockwise {
        points.reverse();
    }
    points
}

/// Clipped part of one chain edge, oriented along the chain
#[derive(Debug, Clone, Copy)]
struct Link {
    ends: [Point; 2],
    side: Side,
    /// False for an edge with no vertex at all, whose orientation in the
    /// chain is arbitrary
    bounded: bool,
}

impl Link {
    #[inline]
    fn start(&self) -> Point {
        self.ends[self.side.index()]
    }

    #[inline]
    fn end(&self) -> Point {
        self.ends[self.side.other().index()]
    }

    fn flipped(self) -> Self {
        Self {
            side: self.side.other(),
            ..self
        }
    }
}

struct Stitcher<'a> {
    links: &'a [Link],
    bounds: &'a Rectangle,
    rule: CornerRule,
    tolerance: f64,
    /// Walking direction around the bounds; `None` falls back to the
    /// half-perimeter rule
    counter_clockwise: Option<bool>,
}

impl<'a> Stitcher<'a> {
    fn new(
        site: Point,
        links: &'a [Link],
        bounds: &'a Rectangle,
        rule: CornerRule,
        tolerance: f64,
    ) -> Self {
        // The site lies on the inner side of every link, so all trusted
        // links agree on the sign; the largest cross product is the one
        // rounding cannot flip. An unbounded link may still be flipped while
        // stitching, so only the first one is trusted.
        let counter_clockwise = match rule {
            CornerRule::BoundaryWalk => links
                .iter()
                .enumerate()
                .filter(|(j, link)| *j == 0 || link.bounded)
                .map(|(_, link)| (link.start() - site).perp_dot(link.end() - site))
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                .filter(|&cross| cross != 0.0)
                .map(|cross| cross > 0.0),
            CornerRule::HalfPerimeter => None,
        };

        Self {
            links,
            bounds,
            rule,
            tolerance,
            counter_clockwise,
        }
    }

    fn stitch(&self) -> Vec<Point> {
        let first = self.links[0];
        let mut points = vec![first.start(), first.end()];

        let mut closed = false;
        for &link in &self.links[1..] {
            closed = self.connect(&mut points, link);
        }

        // close up the polygon along the bounds unless the last link already
        // ended where the first one starts
        let (first_point, last_point) = (points[0], points[points.len() - 1]);
        if !closed && !close_enough(last_point, first_point, self.tolerance) {
            points.extend(self.corners(last_point, first_point));
        }

        points
    }

    /// Append one link; returns whether its far end is the polygon's start
    fn connect(&self, points: &mut Vec<Point>, mut link: Link) -> bool {
        let last_point = points[points.len() - 1];

        // an edge crossing the whole bounds: attach the nearer end first
        if !link.bounded && last_point.distance(link.end()) < last_point.distance(link.start()) {
            link = link.flipped();
        }

        let start = link.start();
        if !close_enough(last_point, start, self.tolerance) {
            points.extend(self.corners(last_point, start));
            if !close_enough(points[0], start, self.tolerance) {
                points.push(start);
            }
        }

        let end = link.end();
        if close_enough(points[0], end, self.tolerance) {
            return true;
        }
        if !close_enough(points[points.len() - 1], end, self.tolerance) {
            points.push(end);
        }
        false
    }

    /// Rectangle corners to insert between two consecutive polygon points
    fn corners(&self, from: Point, to: Point) -> Vec<Point> {
        match (self.rule, self.counter_clockwise) {
            (CornerRule::BoundaryWalk, Some(ccw)) => {
                match (
                    self.bounds.perimeter_position(from),
                    self.bounds.perimeter_position(to),
                ) {
                    (Some(a), Some(b)) => self.bounds.corners_between(a, b, ccw),
                    _ => Vec::new(),
                }
            }
            _ => {
                if from.x != to.x && from.y != to.y {
                    half_perimeter_corners(from, to, self.bounds)
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// Corner choice that keeps the detour along the bounds short
///
/// Looks only at which sides the two points touch and, for opposite sides,
/// at whether the combined distance to one end of the rectangle is under
/// half of the other extent. Cells reaching round more than half of the
/// rectangle get the wrong corners.
fn half_perimeter_corners(from: Point, to: Point, bounds: &Rectangle) -> Vec<Point> {
    let last = BoundsCheck::of(from, bounds);
    let new = BoundsCheck::of(to, bounds);
    let (xmin, xmax, ymin, ymax) = (
        bounds.min_x(),
        bounds.max_x(),
        bounds.min_y(),
        bounds.max_y(),
    );

    let mut corners = Vec::new();

    if last.contains(BoundsCheck::MAX_X) {
        if new.contains(BoundsCheck::MAX_Y) {
            corners.push(Point::new(xmax, ymax));
        } else if new.contains(BoundsCheck::MIN_Y) {
            corners.push(Point::new(xmax, ymin));
        } else if new.contains(BoundsCheck::MIN_X) {
            if from.y - ymin + to.y - ymin < bounds.height {
                corners.push(Point::new(xmax, ymin));
                corners.push(Point::new(xmin, ymin));
            } else {
                corners.push(Point::new(xmax, ymax));
                corners.push(Point::new(xmin, ymax));
            }
        }
    } else if last.contains(BoundsCheck::MIN_X) {
        if new.contains(BoundsCheck::MAX_Y) {
            corners.push(Point::new(xmin, ymax));
        } else if new.contains(BoundsCheck::MIN_Y) {
            corners.push(Point::new(xmin, ymin));
        } else if new.contains(BoundsCheck::MAX_X) {
            if from.y - ymin + to.y - ymin < bounds.height {
                corners.push(Point::new(xmin, ymin));
                corners.push(Point::new(xmax, ymin));
            } else {
                corners.push(Point::new(xmin, ymax));
                corners.push(Point::new(xmax, ymax));
            }
        }
    } else if last.contains(BoundsCheck::MIN_Y) {
        if new.contains(BoundsCheck::MAX_X) {
            corners.push(Point::new(xmax, ymin));
        } else if new.contains(BoundsCheck::MIN_X) {
            corners.push(Point::new(xmin, ymin));
        } else if new.contains(BoundsCheck::MAX_Y) {
            if from.x - xmin + to.x - xmin < bounds.width {
                corners.push(Point::new(xmin, ymin));
                corners.push(Point::new(xmin, ymax));
            } else {
                corners.push(Point::new(xmax, ymin));
                corners.push(Point::new(xmax, ymax));
            }
        }
    } else if last.contains(BoundsCheck::MAX_Y) {
        if new.contains(BoundsCheck::MAX_X) {
            corners.push(Point::new(xmax, ymax));
        } else if new.contains(BoundsCheck::MIN_X) {
            corners.push(Point::new(xmin, ymax));
        } else if new.contains(BoundsCheck::MIN_Y) {
            if from.x - xmin + to.x - xmin < bounds.width {
                corners.push(Point::new(xmin, ymax));
                corners.push(Point::new(xmin, ymin));
            } else {
                corners.push(Point::new(xmax, ymax));
                corners.push(Point::new(xmax, ymin));
            }
        }
    }

    if corners.is_empty() {
        trace!(?from, ?to, "no corner rule matched");
    }
    corners
}
