//! Site registry
//!
//! Holds the input sites, sorts them into sweep order and hands them out one
//! at a time to the sweep.

use std::ops::Index;
use std::sync::OnceLock;

use crate::error::{Result, VoronoiError};
use crate::geom::{compare_by_y_then_x, Circle, Point, Rectangle};
use crate::region::EdgeChain;

use super::edge::Edge;
use super::{EdgeId, SiteId};

/// One input point of the diagram
///
/// After sorting, `index` is the site's position in sweep order (y, then x)
/// and doubles as its [`SiteId`]. `input_index` remembers where the point
/// appeared in the caller's input.
#[derive(Debug, Clone)]
pub struct Site {
    position: Point,
    index: SiteId,
    input_index: usize,
    edges: Vec<EdgeId>,
    pub(crate) chain: OnceLock<Option<EdgeChain>>,
    pub(crate) region: OnceLock<Vec<Point>>,
}

impl Site {
    fn new(position: Point, input_index: usize) -> Self {
        Self {
            position,
            index: input_index,
            input_index,
            edges: Vec::new(),
            chain: OnceLock::new(),
            region: OnceLock::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Position in sweep order
    #[inline]
    pub fn index(&self) -> SiteId {
        self.index
    }

    /// Position in the caller's input
    #[inline]
    pub fn input_index(&self) -> usize {
        self.input_index
    }

    /// Edges for which this site is one of the two defining sites, in
    /// creation order
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub(crate) fn add_edge(&mut self, edge: EdgeId) {
        self.edges.push(edge);
    }

    /// The edge whose other site is nearest to this one
    pub(crate) fn nearest_edge<'a>(&self, edges: &'a [Edge], sites: &SiteList) -> Option<&'a Edge> {
        self.edges
            .iter()
            .map(|&e| &edges[e])
            .min_by(|a, b| a.sites_distance(sites).total_cmp(&b.sites_distance(sites)))
    }

    /// The other site of `edge`, if this site defines it
    pub fn neighbor_site(&self, edge: &Edge) -> Option<SiteId> {
        if edge.left_site() == self.index {
            Some(edge.right_site())
        } else if edge.right_site() == self.index {
            Some(edge.left_site())
        } else {
            None
        }
    }
}

/// Registry of all sites of one construction
#[derive(Debug, Clone, Default)]
pub(crate) struct SiteList {
    sites: Vec<Site>,
    current: usize,
    sorted: bool,
}

impl SiteList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sites: Vec::with_capacity(capacity),
            current: 0,
            sorted: false,
        }
    }

    /// Register a site; returns the new site count
    pub fn add(&mut self, position: Point, input_index: usize) -> usize {
        self.sorted = false;
        self.sites.push(Site::new(position, input_index));
        self.sites.len()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn as_slice(&self) -> &[Site] {
        &self.sites
    }

    pub fn get_mut(&mut self, id: SiteId) -> &mut Site {
        &mut self.sites[id]
    }

    /// Sort into sweep order and renumber so each site's index matches its
    /// new position; also rewinds the cursor
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }

        self.sites
            .sort_by(|a, b| compare_by_y_then_x(a.position, b.position));
        for (index, site) in self.sites.iter_mut().enumerate() {
            site.index = index;
        }
        self.current = 0;
        self.sorted = true;
    }

    /// Next site in sweep order, or `None` once all have been consumed
    ///
    /// # Errors
    ///
    /// Returns `SitesNotSorted` if called before [`SiteList::sort`].
    pub fn next(&mut self) -> Result<Option<SiteId>> {
        if !self.sorted {
            return Err(VoronoiError::SitesNotSorted);
        }

        if self.current < self.sites.len() {
            let id = self.current;
            self.current += 1;
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }

    /// Bounding box of all sites
    ///
    /// The y range is read off the first and last site, so this assumes the
    /// list is sorted.
    pub fn sites_bounds(&self) -> Rectangle {
        let (Some(first), Some(last)) = (self.sites.first(), self.sites.last()) else {
            return Rectangle::new(0.0, 0.0, 0.0, 0.0);
        };

        let mut xmin = f64::INFINITY;
        let mut xmax = f64::NEG_INFINITY;
        for site in &self.sites {
            xmin = xmin.min(site.x());
            xmax = xmax.max(site.x());
        }

        let ymin = first.y();
        let ymax = last.y();
        Rectangle::new(xmin, ymin, xmax - xmin, ymax - ymin)
    }

    /// Site positions in registry order
    pub fn site_coords(&self) -> Vec<Point> {
        self.sites.iter().map(Site::position).collect()
    }

    /// The largest circle centred at each site that fits in its region
    ///
    /// The radius is half the distance to the nearest neighbouring site, or
    /// zero when the edge to that neighbour is unbounded (the region is
    /// infinite before clipping).
    pub fn circles(&self, edges: &[Edge]) -> Vec<Circle> {
        self.sites
            .iter()
            .map(|site| {
                let radius = match site.nearest_edge(edges, self) {
                    Some(edge) if !edge.is_part_of_convex_hull() => edge.sites_distance(self) * 0.5,
                    _ => 0.0,
                };
                Circle {
                    center: site.position(),
                    radius,
                }
            })
            .collect()
    }
}

impl Index<SiteId> for SiteList {
    type Output = Site;

    #[inline]
    fn index(&self, id: SiteId) -> &Site {
        &self.sites[id]
    }
}
