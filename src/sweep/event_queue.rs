//! Pending circle events, bucketed by the sweep coordinate they fire at

use crate::geom::Point;

use super::halfedge::{HalfedgeId, Halfedges};

/// Priority queue of half-edges carrying a circle event
///
/// Each bucket is a singly linked list kept sorted by `(ystar, vertex.x)`.
/// The minimum is found by scanning forward from the lowest bucket that may
/// be non-empty.
#[derive(Debug)]
pub(crate) struct EventQueue {
    hash: Vec<Option<HalfedgeId>>,
    count: usize,
    min_bucket: usize,
    ymin: f64,
    deltay: f64,
}

impl EventQueue {
    pub fn new(ymin: f64, deltay: f64, bucket_count: usize) -> Self {
        Self {
            hash: vec![None; bucket_count.max(1)],
            count: 0,
            min_bucket: 0,
            ymin,
            deltay,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue `he`, whose `vertex` and `ystar` must already be set
    pub fn insert(&mut self, arena: &mut Halfedges, he: HalfedgeId) {
        let ystar = arena[he].ystar;
        let x = event_x(arena, he);

        let bucket = self.bucket(ystar);
        if bucket < self.min_bucket {
            self.min_bucket = bucket;
        }

        let mut previous = None;
        let mut next = self.hash[bucket];
        while let Some(candidate) = next {
            let node = &arena[candidate];
            if ystar > node.ystar || (ystar == node.ystar && x > event_x(arena, candidate)) {
                previous = Some(candidate);
                next = node.next_in_queue;
            } else {
                break;
            }
        }

        arena[he].next_in_queue = next;
        match previous {
            Some(previous) => arena[previous].next_in_queue = Some(he),
            None => self.hash[bucket] = Some(he),
        }
        self.count += 1;
    }

    /// Drop the pending event of `he`, if it has one
    pub fn remove(&mut self, arena: &mut Halfedges, he: HalfedgeId) {
        if arena[he].vertex.is_none() {
            return;
        }

        let bucket = self.bucket(arena[he].ystar);
        let next = arena[he].next_in_queue;

        let mut found = false;
        if self.hash[bucket] == Some(he) {
            self.hash[bucket] = next;
            found = true;
        } else {
            let mut cursor = self.hash[bucket];
            while let Some(candidate) = cursor {
                if arena[candidate].next_in_queue == Some(he) {
                    arena[candidate].next_in_queue = next;
                    found = true;
                    break;
                }
                cursor = arena[candidate].next_in_queue;
            }
        }
        debug_assert!(found, "half-edge {} carries a vertex but is not queued", he);

        if found {
            self.count -= 1;
        }
        let node = &mut arena[he];
        node.vertex = None;
        node.next_in_queue = None;
    }

    /// Position of the earliest event as `(vertex.x, ystar)`
    pub fn min(&mut self, arena: &Halfedges) -> Option<Point> {
        let head = self.head()?;
        let node = &arena[head];
        Some(Point::new(event_x(arena, head), node.ystar))
    }

    /// Unlink and return the earliest event; its `vertex` is left in place
    /// for the caller to take
    pub fn extract_min(&mut self, arena: &mut Halfedges) -> Option<HalfedgeId> {
        let head = self.head()?;
        self.hash[self.min_bucket] = arena[head].next_in_queue;
        arena[head].next_in_queue = None;
        self.count -= 1;
        Some(head)
    }

    fn head(&mut self) -> Option<HalfedgeId> {
        if self.is_empty() {
            return None;
        }
        while self.min_bucket < self.hash.len() - 1 && self.hash[self.min_bucket].is_none() {
            self.min_bucket += 1;
        }
        self.hash[self.min_bucket]
    }

    fn bucket(&self, ystar: f64) -> usize {
        let len = self.hash.len() as isize;
        let bucket = ((ystar - self.ymin) / self.deltay * len as f64) as isize;
        bucket.clamp(0, len - 1) as usize
    }
}

#[inline]
fn event_x(arena: &Halfedges, he: HalfedgeId) -> f64 {
    arena[he].vertex.map_or(f64::NAN, |v| v.x)
}
