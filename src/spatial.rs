//! Spatial indexing for fast position-to-site lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geom::Point;

/// Wrapper around a KD-tree over site positions
///
/// Answers "which site is closest to this point", which is the same question
/// as "which region contains this point".
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

impl SpatialIndex {
    /// Build the index; the item stored for each position is its index in
    /// `positions`
    ///
    /// Returns `None` for an empty slice.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fortune_voronoi::*;
    ///
    /// let positions = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)];
    /// let index = SpatialIndex::new(&positions).unwrap();
    /// assert_eq!(index.find_nearest(Point::new(6.0, 7.0)), 2);
    /// ```
    pub fn new(positions: &[Point]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }

        let points: Vec<[f64; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();
        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        })
    }

    /// Index of the position nearest to `position`
    pub fn find_nearest(&self, position: Point) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}
