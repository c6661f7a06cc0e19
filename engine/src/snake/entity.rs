use std::collections::{HashMap, VecDeque};

use super::types::Point;

/// Snake body, head first. `occupancy` counts segments per cell because big
/// food appends a duplicate of the tail, so one cell can hold two segments.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    occupancy: HashMap<Point, usize>,
}

impl Snake {
    pub fn new(start_pos: Point) -> Self {
        Self::from_segments([start_pos])
    }

    /// Builds a body from head to tail. Panics on an empty iterator.
    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            occupancy: HashMap::new(),
        };
        for segment in segments {
            snake.push_back(segment);
        }
        assert!(!snake.body.is_empty(), "Snake body should never be empty");
        snake
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.occupancy.contains_key(point)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn push_front(&mut self, point: Point) {
        self.body.push_front(point);
        *self.occupancy.entry(point).or_insert(0) += 1;
    }

    pub fn push_back(&mut self, point: Point) {
        self.body.push_back(point);
        *self.occupancy.entry(point).or_insert(0) += 1;
    }

    /// Drops the tail, never the last remaining segment.
    pub fn pop_back(&mut self) {
        if self.body.len() <= 1 {
            return;
        }
        if let Some(tail) = self.body.pop_back() {
            self.release(tail);
        }
    }

    /// Shortens the body to `len` segments; never lengthens it.
    pub fn truncate(&mut self, len: usize) {
        while self.body.len() > len.max(1) {
            self.pop_back();
        }
    }

    fn release(&mut self, point: Point) {
        if let Some(count) = self.occupancy.get_mut(&point) {
            *count -= 1;
            if *count == 0 {
                self.occupancy.remove(&point);
            }
        }
    }
}
