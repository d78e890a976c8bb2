use nalgebra::Point2;
use std::collections::VecDeque;

pub const DEFAULT_TRAIL_LEN: usize = 32;

/// Bounded history of object centers, newest first.
///
/// Frames without a detection are recorded as `None`, which breaks the
/// drawn path instead of bridging the gap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trail {
    points: VecDeque<Option<Point2<i32>>>,
    capacity: usize,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_LEN)
    }
}

impl Trail {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, center: Option<Point2<i32>>) {
        self.points.push_front(center);
        self.points.truncate(self.capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Most recent entry, if it holds a center.
    pub fn latest(&self) -> Option<Point2<i32>> {
        self.points.front().copied().flatten()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = Option<Point2<i32>>> + '_ {
        self.points.iter().copied()
    }

    /// Line segments between consecutive entries that both hold a center,
    /// newer end first.
    pub fn segments(&self) -> impl Iterator<Item = (Point2<i32>, Point2<i32>)> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
    }
}
