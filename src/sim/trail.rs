//! Fading path behind a moving object

use std::collections::VecDeque;

use glam::DVec2;

use crate::consts::{DEFAULT_TRAIL_LENGTH, MAX_TRAIL_LENGTH, MIN_TRAIL_LENGTH};

/// Bounded FIFO of past positions (oldest first)
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<DVec2>,
    capacity: usize,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_LENGTH)
    }
}

impl Trail {
    /// Capacity is clamped to the supported trail lengths
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(MIN_TRAIL_LENGTH, MAX_TRAIL_LENGTH);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, point: DVec2) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<DVec2> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DVec2> + ExactSizeIterator {
        self.points.iter()
    }
}
