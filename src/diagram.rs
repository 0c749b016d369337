//! VoronoiDiagram main structure

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, trace};

use crate::config::{DiagramConfig, DiagramOptions};
use crate::error::{Result, VoronoiError};
use crate::generation::generate_random_points;
use crate::geom::{Circle, LineSegment, Point, Rectangle};
use crate::region::{reorder_edges, stitch_region, EdgeChain, ReorderCriterion};
use crate::sweep::edge::Edge;
use crate::sweep::site::{Site, SiteList};
use crate::sweep::vertex::Vertex;
use crate::sweep::{fortunes_algorithm, EdgeId, SiteId};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Exact-coordinate key for site lookup; `-0.0` and `0.0` map to the same key
type PositionKey = (u64, u64);

fn position_key(p: Point) -> PositionKey {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// A Voronoi diagram clipped to a rectangle, with its Delaunay dual
///
/// Construction runs the whole sweep and clips every edge. Per-site regions
/// are stitched on first request and cached, so the diagram can be shared
/// between threads and queried concurrently.
///
/// # Examples
///
/// ```
/// use rust_fortune_voronoi::*;
///
/// let points = [
///     Point::new(10.0, 10.0),
///     Point::new(90.0, 10.0),
///     Point::new(10.0, 90.0),
///     Point::new(90.0, 90.0),
/// ];
/// let bounds = Rectangle::new(0.0, 0.0, 100.0, 100.0);
/// let diagram = VoronoiDiagram::from_points(&points, bounds).unwrap();
///
/// let region = diagram.region(Point::new(10.0, 10.0));
/// assert_eq!(region.len(), 4);
/// assert!((Polygon::new(region).area() - 2500.0).abs() < 1e-9);
/// ```
#[derive(Clone)]
pub struct VoronoiDiagram {
    /// Clipping rectangle
    bounds: Rectangle,

    /// Tunables the diagram was built with
    options: DiagramOptions,

    /// All sites, in sweep order (indexed by site ID)
    sites: SiteList,

    /// All edges, in creation order (indexed by edge ID)
    edges: Vec<Edge>,

    /// All finalized vertices, in creation order
    vertices: Vec<Vertex>,

    /// Site ID for each input position
    input_order: Vec<SiteId>,

    /// Site ID by exact coordinates
    positions: HashMap<PositionKey, SiteId>,

    /// Nearest-site lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl VoronoiDiagram {
    /// Build the diagram of `points` clipped to `bounds` with default options
    ///
    /// The rectangle does not have to contain the points; sites outside it
    /// still take part in the sweep and simply end up with clipped or empty
    /// regions.
    ///
    /// # Errors
    ///
    /// - `InvalidBounds` if the rectangle has a non-finite origin or a
    ///   negative or non-finite extent
    /// - `NonFiniteSite` if any point has a NaN or infinite coordinate
    pub fn from_points(points: &[Point], bounds: Rectangle) -> Result<Self> {
        Self::from_points_with_options(points, bounds, DiagramOptions::default())
    }

    /// Build the diagram with explicit construction tunables
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fortune_voronoi::*;
    ///
    /// let options = DiagramOptions {
    ///     bucket_count: Some(4),
    ///     corner_rule: CornerRule::HalfPerimeter,
    /// };
    /// let points = generation::generate_random_points(50, 100.0, 100.0, 3);
    /// let bounds = Rectangle::new(0.0, 0.0, 100.0, 100.0);
    /// let diagram = VoronoiDiagram::from_points_with_options(&points, bounds, options).unwrap();
    /// assert_eq!(diagram.site_count(), 50);
    /// ```
    pub fn from_points_with_options(
        points: &[Point],
        bounds: Rectangle,
        options: DiagramOptions,
    ) -> Result<Self> {
        let start = Instant::now();
        validate_bounds(&bounds)?;

        let mut sites = SiteList::with_capacity(points.len());
        for (index, &p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(VoronoiError::NonFiniteSite {
                    index,
                    x: p.x,
                    y: p.y,
                });
            }
            sites.add(p, index);
        }

        let output = fortunes_algorithm(&mut sites, &options)?;
        let mut edges = output.edges;
        let vertices = output.vertices;

        for edge in &mut edges {
            edge.clip_vertices(&bounds, &vertices);
        }

        let mut input_order = vec![0; sites.len()];
        let mut positions = HashMap::with_capacity(sites.len());
        for site in sites.as_slice() {
            input_order[site.input_index()] = site.index();
            positions
                .entry(position_key(site.position()))
                .or_insert(site.index());
        }

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(&sites.site_coords());

        debug!(
            sites = sites.len(),
            edges = edges.len(),
            visible = edges.iter().filter(|e| e.is_visible()).count(),
            vertices = vertices.len(),
            elapsed = ?start.elapsed(),
            "diagram built"
        );

        Ok(Self {
            bounds,
            options,
            sites,
            edges,
            vertices,
            input_order,
            positions,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Build the diagram clipped to the bounding box of the points
    pub fn fitted(points: &[Point]) -> Result<Self> {
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(VoronoiError::NonFiniteSite {
                index,
                x: p.x,
                y: p.y,
            });
        }
        Self::from_points(points, Rectangle::bounding(points.iter().copied()))
    }

    /// Build the diagram of `count` seeded random sites in
    /// `[0, max_width) x [0, max_height)`, clipped to that rectangle
    ///
    /// The same arguments always produce the same diagram.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fortune_voronoi::*;
    ///
    /// let a = VoronoiDiagram::random(200, 640.0, 480.0, 7).unwrap();
    /// let b = VoronoiDiagram::random(200, 640.0, 480.0, 7).unwrap();
    /// assert_eq!(a.site_coords(), b.site_coords());
    /// assert_eq!(a.edges(), b.edges());
    /// ```
    pub fn random(count: usize, max_width: f64, max_height: f64, seed: u64) -> Result<Self> {
        let points = generate_random_points(count, max_width, max_height, seed);
        Self::from_points(&points, Rectangle::new(0.0, 0.0, max_width, max_height))
    }

    /// Build a random diagram from a configuration
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fortune_voronoi::*;
    ///
    /// let config = DiagramConfigBuilder::new()
    ///     .seed(42)
    ///     .site_count(300)
    ///     .build()
    ///     .unwrap();
    ///
    /// let diagram = VoronoiDiagram::generate(config).unwrap();
    /// assert_eq!(diagram.site_count(), 300);
    /// ```
    pub fn generate(config: DiagramConfig) -> Result<Self> {
        let points =
            generate_random_points(config.site_count, config.width, config.height, config.seed);
        Self::from_points_with_options(
            &points,
            Rectangle::new(0.0, 0.0, config.width, config.height),
            config.options,
        )
    }

    /// Build several independent diagrams concurrently
    ///
    /// Each construction is sequential; only separate diagrams run in
    /// parallel. Results are in the order of `configs`.
    #[cfg(feature = "parallel")]
    pub fn generate_batch(configs: &[DiagramConfig]) -> Vec<Result<Self>> {
        use rayon::prelude::*;

        configs.par_iter().map(|&config| Self::generate(config)).collect()
    }

    /// The clipping rectangle
    #[inline]
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Tunables the diagram was built with
    #[inline]
    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// All sites in sweep order; a site's [`Site::index`] is its position here
    #[inline]
    pub fn sites(&self) -> &[Site] {
        self.sites.as_slice()
    }

    /// Site by ID
    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.as_slice().get(id)
    }

    /// The site at exactly this position
    pub fn site_at(&self, point: Point) -> Option<&Site> {
        self.positions
            .get(&position_key(point))
            .map(|&id| &self.sites[id])
    }

    /// All edges, visible or not
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// All finalized Voronoi vertices
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Site positions in input order
    pub fn site_coords(&self) -> Vec<Point> {
        self.input_order
            .iter()
            .map(|&id| self.sites[id].position())
            .collect()
    }

    /// The site's edges linked end to end by shared vertex, or `None` if they
    /// do not form a single chain
    pub fn edge_chain(&self, id: SiteId) -> Option<&EdgeChain> {
        self.sites[id]
            .chain
            .get_or_init(|| {
                reorder_edges(self.sites[id].edges(), &self.edges, ReorderCriterion::ByVertex)
            })
            .as_ref()
    }

    /// Counter-clockwise polygon of the site's region within the bounds
    ///
    /// Empty when the region misses the bounds or is degenerate.
    pub fn site_region(&self, id: SiteId) -> &[Point] {
        self.sites[id].region.get_or_init(|| self.build_region(id))
    }

    /// Region of the site at exactly `point`; empty if there is none
    pub fn region(&self, point: Point) -> &[Point] {
        match self.site_at(point) {
            Some(site) => self.site_region(site.index()),
            None => &[],
        }
    }

    /// One region per site, in input order
    pub fn regions(&self) -> Vec<&[Point]> {
        self.input_order
            .iter()
            .map(|&id| self.site_region(id))
            .collect()
    }

    /// Positions of every site sharing an edge with the site at `point`
    ///
    /// Follows the site's edge chain when it has one, otherwise the order
    /// the edges were created in.
    pub fn neighbor_sites_for_site(&self, point: Point) -> Vec<Point> {
        let Some(site) = self.site_at(point) else {
            return Vec::new();
        };

        let neighbor = |edge: EdgeId| {
            site.neighbor_site(&self.edges[edge])
                .map(|n| self.sites[n].position())
        };
        match self.edge_chain(site.index()) {
            Some(chain) => chain.edges().filter_map(neighbor).collect(),
            None => site.edges().iter().filter_map(|&e| neighbor(e)).collect(),
        }
    }

    /// Visible clipped edges of the site at `point`
    pub fn voronoi_boundary_for_site(&self, point: Point) -> Vec<LineSegment> {
        let Some(site) = self.site_at(point) else {
            return Vec::new();
        };
        site.edges()
            .iter()
            .filter_map(|&e| self.edges[e].clipped_ends())
            .map(|[p0, p1]| LineSegment::new(p0, p1))
            .collect()
    }

    /// Delaunay segments from the site at `point` to each of its neighbours
    pub fn delaunay_lines_for_site(&self, point: Point) -> Vec<LineSegment> {
        let Some(site) = self.site_at(point) else {
            return Vec::new();
        };
        site.edges()
            .iter()
            .map(|&e| self.delaunay_line(&self.edges[e]))
            .collect()
    }

    /// Every visible clipped edge
    pub fn voronoi_diagram(&self) -> Vec<LineSegment> {
        self.edges
            .iter()
            .filter_map(Edge::clipped_ends)
            .map(|[p0, p1]| LineSegment::new(p0, p1))
            .collect()
    }

    /// Delaunay segments along the convex hull of the sites
    pub fn hull(&self) -> Vec<LineSegment> {
        self.edges
            .iter()
            .filter(|e| e.is_part_of_convex_hull())
            .map(|e| self.delaunay_line(e))
            .collect()
    }

    /// Sites on the convex hull, in order around it
    ///
    /// Empty if the hull edges do not link into a single chain.
    pub fn hull_points_in_order(&self) -> Vec<Point> {
        let hull_edges: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| e.is_part_of_convex_hull())
            .map(Edge::index)
            .collect();

        let Some(chain) = reorder_edges(&hull_edges, &self.edges, ReorderCriterion::BySite) else {
            return Vec::new();
        };
        chain
            .iter()
            .map(|(e, side)| self.sites[self.edges[e].site(side)].position())
            .collect()
    }

    /// Per site, in sweep order, the circle around it reaching halfway to
    /// its nearest neighbour
    pub fn circles(&self) -> Vec<Circle> {
        self.sites.circles(&self.edges)
    }

    /// The site whose region contains `point`
    #[cfg(feature = "spatial-index")]
    pub fn nearest_site(&self, point: Point) -> Option<&Site> {
        let index = self.spatial_index.as_ref()?;
        Some(&self.sites[index.find_nearest(point)])
    }

    fn delaunay_line(&self, edge: &Edge) -> LineSegment {
        LineSegment::new(
            self.sites[edge.left_site()].position(),
            self.sites[edge.right_site()].position(),
        )
    }

    fn build_region(&self, id: SiteId) -> Vec<Point> {
        let site = &self.sites[id];

        let Some(chain) = self.edge_chain(id) else {
            trace!(
                site = id,
                edges = site.edges().len(),
                "edge chain could not be reordered; region is degenerate"
            );
            return Vec::new();
        };

        let points = stitch_region(
            site.position(),
            chain,
            &self.edges,
            &self.bounds,
            self.options.corner_rule,
        );
        if !points.is_empty() {
            return points;
        }

        // No edge crosses the bounds: the region either covers all of it or
        // none of it, and only the site nearest the centre can cover it.
        if self.owns_bounds_center(id) {
            self.bounds.corners().to_vec()
        } else {
            Vec::new()
        }
    }

    /// Whether `id` is the site nearest the centre of the bounds, ties going
    /// to the lower ID
    fn owns_bounds_center(&self, id: SiteId) -> bool {
        let center = self.bounds.center();
        let distance = self.sites[id].position().distance_squared(center);

        self.sites.as_slice().iter().all(|other| {
            let d = other.position().distance_squared(center);
            d > distance || (d == distance && other.index() >= id)
        })
    }
}

fn validate_bounds(bounds: &Rectangle) -> Result<()> {
    let origin_ok = bounds.x.is_finite() && bounds.y.is_finite();
    let extent_ok = bounds.width.is_finite()
        && bounds.height.is_finite()
        && bounds.width >= 0.0
        && bounds.height >= 0.0;

    if !(origin_ok && extent_ok) {
        return Err(VoronoiError::InvalidBounds(format!(
            "origin ({}, {}) size {} x {}",
            bounds.x, bounds.y, bounds.width, bounds.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Polygon, Winding};

    fn unit_box() -> Rectangle {
        Rectangle::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_empty_input() {
        let diagram = VoronoiDiagram::from_points(&[], unit_box()).unwrap();
        assert_eq!(diagram.site_count(), 0);
        assert!(diagram.edges().is_empty());
        assert!(diagram.vertices().is_empty());
        assert!(diagram.regions().is_empty());
        assert!(diagram.region(Point::new(1.0, 1.0)).is_empty());
        assert!(diagram.hull_points_in_order().is_empty());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        for bounds in [
            Rectangle::new(0.0, 0.0, -1.0, 10.0),
            Rectangle::new(0.0, 0.0, 10.0, f64::NAN),
            Rectangle::new(f64::INFINITY, 0.0, 10.0, 10.0),
        ] {
            let result = VoronoiDiagram::from_points(&[Point::new(1.0, 1.0)], bounds);
            assert!(matches!(result, Err(VoronoiError::InvalidBounds(_))));
        }
    }

    #[test]
    fn test_non_finite_site_rejected() {
        let points = [Point::new(1.0, 1.0), Point::new(f64::NAN, 2.0)];
        match VoronoiDiagram::from_points(&points, unit_box()) {
            Err(VoronoiError::NonFiniteSite { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected NonFiniteSite, got {:?}", other.err()),
        }
        assert!(VoronoiDiagram::fitted(&points).is_err());
    }

    #[test]
    fn test_site_lookup_and_input_order() {
        let points = [Point::new(70.0, 80.0), Point::new(20.0, 10.0), Point::new(50.0, 40.0)];
        let diagram = VoronoiDiagram::from_points(&points, unit_box()).unwrap();

        assert_eq!(diagram.site_coords(), points.to_vec());
        for (i, &p) in points.iter().enumerate() {
            let site = diagram.site_at(p).unwrap();
            assert_eq!(site.input_index(), i);
            assert_eq!(diagram.site(site.index()).unwrap().position(), p);
        }
        assert!(diagram.site_at(Point::new(70.0, 80.000001)).is_none());
        assert!(diagram.site_at(Point::new(-0.0, 0.0)).is_none());

        // sweep order is by y
        let ys: Vec<f64> = diagram.sites().iter().map(Site::y).collect();
        assert_eq!(ys, vec![10.0, 40.0, 80.0]);
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let diagram = VoronoiDiagram::from_points(&[Point::new(0.0, 5.0)], unit_box()).unwrap();
        assert!(diagram.site_at(Point::new(-0.0, 5.0)).is_some());
    }

    #[test]
    fn test_single_site_owns_bounds() {
        let diagram = VoronoiDiagram::from_points(&[Point::new(50.0, 50.0)], unit_box()).unwrap();
        let region = diagram.region(Point::new(50.0, 50.0));
        assert_eq!(region, &unit_box().corners()[..]);
    }

    #[test]
    fn test_sites_outside_bounds() {
        // both bisectors miss the box; only the site nearest its centre keeps it
        let points = [Point::new(50.0, 50.0), Point::new(500.0, 50.0), Point::new(500.0, 500.0)];
        let diagram = VoronoiDiagram::from_points(&points, Rectangle::new(40.0, 40.0, 20.0, 20.0))
            .unwrap();

        assert!(diagram.edges().iter().all(|e| !e.is_visible()));
        assert_eq!(diagram.region(points[0]).len(), 4);
        assert!(diagram.region(points[1]).is_empty());
        assert!(diagram.region(points[2]).is_empty());
    }

    #[test]
    fn test_half_planes() {
        let points = [Point::new(30.0, 50.0), Point::new(70.0, 50.0)];
        let diagram = VoronoiDiagram::from_points(&points, unit_box()).unwrap();

        assert_eq!(diagram.edges().len(), 1);
        assert_eq!(
            diagram.voronoi_diagram(),
            vec![LineSegment::new(Point::new(50.0, 100.0), Point::new(50.0, 0.0))]
        );

        for p in points {
            let region = diagram.region(p);
            assert_eq!(region.len(), 4);
            assert!((Polygon::new(region).area() - 5000.0).abs() < 1e-9);
            assert_eq!(Polygon::new(region).winding(), Winding::CounterClockwise);
        }
        assert_eq!(diagram.neighbor_sites_for_site(points[0]), vec![points[1]]);
    }

    #[test]
    fn test_region_is_cached() {
        let diagram = VoronoiDiagram::random(40, 100.0, 100.0, 5).unwrap();
        let p = diagram.site_coords()[3];
        let first = diagram.region(p).as_ptr();
        let again = diagram.region(p).as_ptr();
        assert_eq!(first, again);
    }

    #[test]
    fn test_hull_of_square() {
        let points = [
            Point::new(10.0, 10.0),
            Point::new(90.0, 10.0),
            Point::new(10.0, 90.0),
            Point::new(90.0, 90.0),
            Point::new(50.0, 45.0),
        ];
        let diagram = VoronoiDiagram::from_points(&points, unit_box()).unwrap();

        assert_eq!(diagram.hull().len(), 4);
        let hull = diagram.hull_points_in_order();
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&points[4]));
        for corner in &points[..4] {
            assert!(hull.contains(corner));
        }
    }

    #[test]
    fn test_circles() {
        let points = [
            Point::new(10.0, 10.0),
            Point::new(90.0, 10.0),
            Point::new(50.0, 90.0),
            Point::new(50.0, 40.0),
        ];
        let diagram = VoronoiDiagram::from_points(&points, unit_box()).unwrap();
        let circles = diagram.circles();
        assert_eq!(circles.len(), 4);

        // every site's nearest neighbour is the enclosed site, 50 away
        for c in &circles {
            assert!((c.radius - 25.0).abs() < 1e-9, "{:?}", c);
        }

        // with only two sites the one edge is unbounded
        let pair = VoronoiDiagram::from_points(&points[..2], unit_box()).unwrap();
        assert!(pair.circles().iter().all(|c| c.radius == 0.0));
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_nearest_site() {
        let diagram = VoronoiDiagram::random(300, 200.0, 200.0, 11).unwrap();
        for probe in [Point::new(3.0, 4.0), Point::new(150.0, 20.0), Point::new(99.5, 180.25)] {
            let site = diagram.nearest_site(probe).unwrap();
            let best = diagram
                .sites()
                .iter()
                .map(|s| s.position().distance_squared(probe))
                .fold(f64::INFINITY, f64::min);
            assert_eq!(site.position().distance_squared(probe), best);
        }

        let empty = VoronoiDiagram::from_points(&[], unit_box()).unwrap();
        assert!(empty.nearest_site(Point::ZERO).is_none());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_generate_batch_matches_sequential() {
        use crate::config::DiagramConfigBuilder;

        let configs: Vec<DiagramConfig> = (0..4)
            .map(|seed| {
                DiagramConfigBuilder::new()
                    .seed(seed)
                    .site_count(100)
                    .build()
                    .unwrap()
            })
            .collect();

        let batch = VoronoiDiagram::generate_batch(&configs);
        for (config, result) in configs.iter().zip(batch) {
            let parallel = result.unwrap();
            let sequential = VoronoiDiagram::generate(*config).unwrap();
            assert_eq!(parallel.edges(), sequential.edges());
        }
    }
}
