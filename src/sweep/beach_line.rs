//! The beach line: active half-edges ordered left to right
//!
//! A doubly linked list between two sentinels, with a coarse hash over x so
//! that locating the arc above a new site does not scan the whole line.

use crate::geom::Point;

use super::edge::Edge;
use super::halfedge::{Boundary, HalfedgeId, Halfedges};
use super::site::SiteList;

#[derive(Debug)]
pub(crate) struct BeachLine {
    hash: Vec<Option<HalfedgeId>>,
    xmin: f64,
    deltax: f64,
    left_end: HalfedgeId,
    right_end: HalfedgeId,
}

impl BeachLine {
    /// Empty beach line over `[xmin, xmin + deltax]` with `bucket_count`
    /// buckets; the two sentinels are allocated in `arena`
    pub fn new(arena: &mut Halfedges, xmin: f64, deltax: f64, bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(2);

        let left_end = arena.push(Boundary::Sentinel);
        let right_end = arena.push(Boundary::Sentinel);
        arena[left_end].right = Some(right_end);
        arena[right_end].left = Some(left_end);

        let mut hash = vec![None; bucket_count];
        hash[0] = Some(left_end);
        hash[bucket_count - 1] = Some(right_end);

        Self {
            hash,
            xmin,
            deltax,
            left_end,
            right_end,
        }
    }

    /// Link `new` immediately to the right of `lb`
    pub fn insert(&mut self, arena: &mut Halfedges, lb: HalfedgeId, new: HalfedgeId) {
        let right = arena[lb].right;
        arena[new].left = Some(lb);
        arena[new].right = right;
        if let Some(right) = right {
            arena[right].left = Some(new);
        }
        arena[lb].right = Some(new);
    }

    /// Unlink `he` and mark it retired
    pub fn remove(&mut self, arena: &mut Halfedges, he: HalfedgeId) {
        let (left, right) = (arena[he].left, arena[he].right);
        if let Some(left) = left {
            arena[left].right = right;
        }
        if let Some(right) = right {
            arena[right].left = left;
        }

        let node = &mut arena[he];
        node.boundary = Boundary::Retired;
        node.left = None;
        node.right = None;
    }

    /// The rightmost half-edge that lies left of `p`
    ///
    /// Starts from the nearest live hash entry and walks the list; the
    /// result is cached back into the bucket for `p`.
    pub fn left_neighbor(
        &mut self,
        arena: &Halfedges,
        p: Point,
        edges: &[Edge],
        sites: &SiteList,
    ) -> HalfedgeId {
        let len = self.hash.len() as isize;
        let bucket = (((p.x - self.xmin) / self.deltax * len as f64) as isize).clamp(0, len - 1);

        let mut he = match self.get_hash(arena, bucket) {
            Some(he) => he,
            None => {
                // bucket 0 and the last bucket always hold a sentinel
                let mut i = 1;
                loop {
                    if let Some(he) = self.get_hash(arena, bucket - i) {
                        break he;
                    }
                    if let Some(he) = self.get_hash(arena, bucket + i) {
                        break he;
                    }
                    i += 1;
                }
            }
        };

        if he == self.left_end || (he != self.right_end && arena[he].is_left_of(p, edges, sites)) {
            loop {
                he = self.step_right(arena, he);
                if he == self.right_end || !arena[he].is_left_of(p, edges, sites) {
                    break;
                }
            }
            he = self.step_left(arena, he);
        } else {
            loop {
                he = self.step_left(arena, he);
                if he == self.left_end || arena[he].is_left_of(p, edges, sites) {
                    break;
                }
            }
        }

        if bucket > 0 && bucket < len - 1 {
            self.hash[bucket as usize] = Some(he);
        }
        he
    }

    /// Live half-edge cached in bucket `b`, dropping a stale entry
    fn get_hash(&mut self, arena: &Halfedges, b: isize) -> Option<HalfedgeId> {
        if b < 0 || b >= self.hash.len() as isize {
            return None;
        }

        let slot = &mut self.hash[b as usize];
        let he = (*slot)?;
        if arena[he].boundary == Boundary::Retired {
            *slot = None;
            return None;
        }
        Some(he)
    }

    #[inline]
    fn step_right(&self, arena: &Halfedges, he: HalfedgeId) -> HalfedgeId {
        arena[he]
            .right
            .expect("beach line nodes left of the right sentinel are linked rightwards")
    }

    #[inline]
    fn step_left(&self, arena: &Halfedges, he: HalfedgeId) -> HalfedgeId {
        arena[he]
            .left
            .expect("beach line nodes right of the left sentinel are linked leftwards")
    }
}
