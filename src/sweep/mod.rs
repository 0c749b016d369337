//! Fortune's sweepline
//!
//! Sites are consumed bottom to top (by y, then x). The beach line holds the
//! active bisectors, and every pair of neighbouring bisectors that converges
//! schedules a circle event; when one fires the two breakpoints merge into a
//! Voronoi vertex. Everything produced is addressed by plain indices:
//! [`SiteId`] into the site registry, [`EdgeId`] and [`VertexId`] into the
//! vectors returned by [`fortunes_algorithm`].

mod beach_line;
pub(crate) mod edge;
mod event_queue;
mod halfedge;
pub(crate) mod site;
pub(crate) mod vertex;

use std::time::Instant;

use tracing::{debug, trace};

use crate::config::DiagramOptions;
use crate::error::Result;
use crate::geom::{compare_by_y_then_x, Point};

use beach_line::BeachLine;
use edge::{create_bisecting_edge, Edge};
use event_queue::EventQueue;
use halfedge::{Boundary, HalfedgeId, Halfedges};
use site::SiteList;
use vertex::{intersect, Intersection, Vertex};

/// Index of a site in sweep order
pub type SiteId = usize;
/// Index of an edge in creation order
pub type EdgeId = usize;
/// Index of a vertex in creation order
pub type VertexId = usize;

/// Which end of an edge, or which of its two sites
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Everything the sweep produces
#[derive(Debug, Default)]
pub(crate) struct SweepOutput {
    pub edges: Vec<Edge>,
    pub vertices: Vec<Vertex>,
}

/// Run the sweep over every site in the registry
///
/// The registry is sorted first, so site ids afterwards are positions in
/// sweep order. Edges come back unclipped.
pub(crate) fn fortunes_algorithm(
    sites: &mut SiteList,
    options: &DiagramOptions,
) -> Result<SweepOutput> {
    let start = Instant::now();

    sites.sort();
    let Some(bottom_most) = sites.next()? else {
        return Ok(SweepOutput::default());
    };

    let data_bounds = sites.sites_bounds();
    let k = options.effective_bucket_count(sites.len());

    let mut arena = Halfedges::default();
    let beach = BeachLine::new(&mut arena, data_bounds.min_x(), data_bounds.width, 2 * k);
    let queue = EventQueue::new(data_bounds.min_y(), data_bounds.height, 4 * k);

    let mut sweep = Sweep {
        sites,
        arena,
        beach,
        queue,
        bottom_most,
        edges: Vec::new(),
        vertices: Vec::new(),
    };

    let mut new_site = sweep.sites.next()?;
    let mut site_events = 1usize;
    let mut circle_events = 0usize;

    loop {
        let next_event = sweep.queue.min(&sweep.arena);
        let site_first = match (new_site, next_event) {
            (Some(site), Some(event)) => {
                compare_by_y_then_x(sweep.sites[site].position(), event).is_lt()
            }
            (Some(_), None) => true,
            (None, _) => false,
        };

        if site_first {
            if let Some(site) = new_site {
                sweep.handle_site_event(site);
                site_events += 1;
            }
            new_site = sweep.sites.next()?;
        } else if let Some(lbnd) = sweep.queue.extract_min(&mut sweep.arena) {
            sweep.handle_circle_event(lbnd);
            circle_events += 1;
        } else {
            break;
        }
    }

    debug!(
        sites = sweep.sites.len(),
        site_events,
        circle_events,
        edges = sweep.edges.len(),
        vertices = sweep.vertices.len(),
        halfedges = sweep.arena.len(),
        elapsed = ?start.elapsed(),
        "sweep complete"
    );

    Ok(SweepOutput {
        edges: sweep.edges,
        vertices: sweep.vertices,
    })
}

/// Mutable state of one sweep
struct Sweep<'a> {
    sites: &'a mut SiteList,
    arena: Halfedges,
    beach: BeachLine,
    queue: EventQueue,
    bottom_most: SiteId,
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
}

impl Sweep<'_> {
    fn handle_site_event(&mut self, site: SiteId) {
        let position = self.sites[site].position();

        // the arc directly above the new site, between lbnd and rbnd
        let lbnd = self
            .beach
            .left_neighbor(&self.arena, position, &self.edges, self.sites);
        let rbnd = self.right_of(lbnd);
        let bottom_site = self.right_region(lbnd);

        let edge = create_bisecting_edge(self.sites, &mut self.edges, bottom_site, site);

        let bisector = self.arena.push(Boundary::Active {
            edge,
            side: Side::Left,
        });
        self.beach.insert(&mut self.arena, lbnd, bisector);

        if let Some(vertex) = self.converge(lbnd, bisector) {
            self.queue.remove(&mut self.arena, lbnd);
            self.schedule(lbnd, vertex, site);
        }

        let lbnd = bisector;
        let bisector = self.arena.push(Boundary::Active {
            edge,
            side: Side::Right,
        });
        self.beach.insert(&mut self.arena, lbnd, bisector);

        if let Some(vertex) = self.converge(bisector, rbnd) {
            self.schedule(bisector, vertex, site);
        }
    }

    fn handle_circle_event(&mut self, lbnd: HalfedgeId) {
        let llbnd = self.left_of(lbnd);
        let rbnd = self.right_of(lbnd);
        let rrbnd = self.right_of(rbnd);
        let mut bottom_site = self.left_region(lbnd);
        let mut top_site = self.right_region(rbnd);

        let position = self.arena[lbnd]
            .vertex
            .take()
            .expect("queued half-edge carries its circle event vertex");
        let vertex = self.vertices.len();
        self.vertices.push(Vertex::new(vertex, position));

        self.set_edge_vertex(lbnd, vertex);
        self.set_edge_vertex(rbnd, vertex);
        self.beach.remove(&mut self.arena, lbnd);
        self.queue.remove(&mut self.arena, rbnd);
        self.beach.remove(&mut self.arena, rbnd);

        let mut side = Side::Left;
        if compare_by_y_then_x(
            self.sites[bottom_site].position(),
            self.sites[top_site].position(),
        )
        .is_gt()
        {
            std::mem::swap(&mut bottom_site, &mut top_site);
            side = Side::Right;
        }

        let edge = create_bisecting_edge(self.sites, &mut self.edges, bottom_site, top_site);
        let bisector = self.arena.push(Boundary::Active { edge, side });
        self.beach.insert(&mut self.arena, llbnd, bisector);
        self.edges[edge].set_vertex(side.other(), vertex);

        if let Some(position) = self.converge(llbnd, bisector) {
            self.queue.remove(&mut self.arena, llbnd);
            self.schedule(llbnd, position, bottom_site);
        }
        if let Some(position) = self.converge(bisector, rrbnd) {
            self.schedule(bisector, position, bottom_site);
        }
    }

    /// Where two neighbouring breakpoints will meet, if they do
    fn converge(&self, h0: HalfedgeId, h1: HalfedgeId) -> Option<Point> {
        match intersect(&self.arena[h0], &self.arena[h1], &self.edges, self.sites) {
            Intersection::Finite(p) => Some(p),
            Intersection::AtInfinity => {
                trace!(h0, h1, "breakpoints meet at infinity; no event scheduled");
                None
            }
            Intersection::None => None,
        }
    }

    /// Queue a circle event at `vertex`, firing once the sweep reaches the
    /// top of the circle through `vertex` and `site`
    fn schedule(&mut self, he: HalfedgeId, vertex: Point, site: SiteId) {
        let node = &mut self.arena[he];
        node.vertex = Some(vertex);
        node.ystar = vertex.y + self.sites[site].position().distance(vertex);
        self.queue.insert(&mut self.arena, he);
    }

    fn set_edge_vertex(&mut self, he: HalfedgeId, vertex: VertexId) {
        if let Boundary::Active { edge, side } = self.arena[he].boundary {
            self.edges[edge].set_vertex(side, vertex);
        }
    }

    /// Site of the arc left of this half-edge; the bottom-most site for a
    /// sentinel
    fn left_region(&self, he: HalfedgeId) -> SiteId {
        match self.arena[he].boundary {
            Boundary::Active { edge, side } => self.edges[edge].site(side),
            _ => self.bottom_most,
        }
    }

    /// Site of the arc right of this half-edge; the bottom-most site for a
    /// sentinel
    fn right_region(&self, he: HalfedgeId) -> SiteId {
        match self.arena[he].boundary {
            Boundary::Active { edge, side } => self.edges[edge].site(side.other()),
            _ => self.bottom_most,
        }
    }

    fn left_of(&self, he: HalfedgeId) -> HalfedgeId {
        self.arena[he]
            .left
            .expect("circle events never fire on the left sentinel")
    }

    fn right_of(&self, he: HalfedgeId) -> HalfedgeId {
        self.arena[he]
            .right
            .expect("only the right sentinel has no right neighbour")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(points: &[(f64, f64)]) -> (SiteList, SweepOutput) {
        let mut sites = SiteList::with_capacity(points.len());
        for (i, &(x, y)) in points.iter().enumerate() {
            sites.add(Point::new(x, y), i);
        }
        let output = fortunes_algorithm(&mut sites, &DiagramOptions::default()).unwrap();
        (sites, output)
    }

    #[test]
    fn test_no_sites() {
        let (_, output) = run(&[]);
        assert!(output.edges.is_empty());
        assert!(output.vertices.is_empty());
    }

    #[test]
    fn test_single_site_has_no_edges() {
        let (sites, output) = run(&[(5.0, 5.0)]);
        assert!(output.edges.is_empty());
        assert!(sites[0].edges().is_empty());
    }

    #[test]
    fn test_two_sites_one_unbounded_edge() {
        let (sites, output) = run(&[(30.0, 50.0), (70.0, 50.0)]);
        assert_eq!(output.edges.len(), 1);
        assert!(output.vertices.is_empty());

        let edge = &output.edges[0];
        assert!(edge.is_part_of_convex_hull());
        assert_ne!(edge.left_site(), edge.right_site());
        assert_eq!(sites[0].edges(), &[0]);
        assert_eq!(sites[1].edges(), &[0]);
    }

    #[test]
    fn test_triangle_has_one_vertex_at_circumcenter() {
        let (sites, output) = run(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        assert_eq!(output.vertices.len(), 1);
        assert_eq!(output.edges.len(), 3);

        let v = output.vertices[0].position();
        assert!((v.x - 5.0).abs() < 1e-9);
        assert!((v.y - 3.75).abs() < 1e-9);
        for site in sites.as_slice() {
            assert!((site.position().distance(v) - 6.25).abs() < 1e-9);
        }

        // every edge is unbounded on exactly one side
        for edge in &output.edges {
            let bounded = [edge.left_vertex(), edge.right_vertex()]
                .iter()
                .filter(|v| v.is_some())
                .count();
            assert_eq!(bounded, 1);
        }
    }

    #[test]
    fn test_vertices_are_equidistant_from_their_sites() {
        let points: Vec<(f64, f64)> = (0..40)
            .map(|i| {
                let t = i as f64;
                ((t * 37.0) % 101.0, (t * 61.0) % 97.0)
            })
            .collect();
        let (sites, output) = run(&points);

        for edge in &output.edges {
            assert_ne!(edge.left_site(), edge.right_site());
            let a = sites[edge.left_site()].position();
            let b = sites[edge.right_site()].position();
            for v in [edge.left_vertex(), edge.right_vertex()].into_iter().flatten() {
                let p = output.vertices[v].position();
                assert!(
                    (p.distance(a) - p.distance(b)).abs() < 1e-6,
                    "vertex {} not on bisector of edge {}",
                    v,
                    edge.index()
                );
            }
        }
    }

    #[test]
    fn test_bucket_count_does_not_change_result() {
        let points: Vec<Point> = crate::generation::generate_random_points(200, 100.0, 100.0, 9);

        let mut counts = Vec::new();
        for bucket_count in [Some(1), Some(3), None, Some(64)] {
            let mut sites = SiteList::with_capacity(points.len());
            for (i, &p) in points.iter().enumerate() {
                sites.add(p, i);
            }
            let options = DiagramOptions {
                bucket_count,
                ..Default::default()
            };
            let output = fortunes_algorithm(&mut sites, &options).unwrap();
            counts.push((output.edges.len(), output.vertices.len()));
        }
        assert!(counts.windows(2).all(|w| w[0] == w[1]), "{:?}", counts);
    }
}
