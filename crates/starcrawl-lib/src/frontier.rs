use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::point::{Coordinate, Point};

/// A point waiting on the search frontier together with the hop count it
/// was discovered at.
#[derive(Debug, Clone)]
pub struct SearchStop {
    pub point: Arc<Point>,
    pub hops: usize,
}

/// Min-ordered queue of [`SearchStop`]s keyed by straight-line distance to a
/// fixed destination.
///
/// Only the heuristic distance is considered; cost already travelled plays no
/// part in the ordering. Equal keys pop in insertion order.
#[derive(Debug)]
pub struct Frontier {
    destination: Coordinate,
    heap: BinaryHeap<FrontierEntry>,
    sequence: u64,
}

impl Frontier {
    pub fn new(destination: Coordinate) -> Self {
        Self {
            destination,
            heap: BinaryHeap::new(),
            sequence: 0,
        }
    }

    pub fn push(&mut self, stop: SearchStop) {
        let key = stop.point.coordinate.distance_to(&self.destination);
        self.heap.push(FrontierEntry {
            key: FloatOrd(key),
            sequence: self.sequence,
            stop,
        });
        self.sequence += 1;
    }

    /// Remove the entry closest to the destination.
    pub fn pop(&mut self) -> Option<SearchStop> {
        self.heap.pop().map(|entry| entry.stop)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug)]
struct FrontierEntry {
    key: FloatOrd,
    sequence: u64,
    stop: SearchStop,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by key.
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
