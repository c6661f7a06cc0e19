use crate::SessionRng;
use super::types::Point;

/// Square playfield of `size * size` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Grid {
    pub fn new(size: u32) -> Self {
        Self { size: size as i32 }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2, self.size / 2)
    }

    pub fn contains(&self, point: Point) -> bool {
        (0..self.size).contains(&point.x) && (0..self.size).contains(&point.y)
    }

    /// Toroidal wrap; works for any offset, not just one cell past the edge.
    pub fn wrap(&self, point: Point) -> Point {
        Point::new(point.x.rem_euclid(self.size), point.y.rem_euclid(self.size))
    }

    pub fn random_position(&self, rng: &mut SessionRng) -> Point {
        Point::new(rng.random_range(0..self.size), rng.random_range(0..self.size))
    }

    /// Draws up to `attempts` random cells and returns the first one for which
    /// `is_blocked` is false. When every draw is blocked the last draw is
    /// returned anyway, so the search always terminates with a position.
    pub fn find_free_position<F>(&self, rng: &mut SessionRng, attempts: u32, is_blocked: F) -> Point
    where
        F: Fn(&Point) -> bool,
    {
        let mut candidate = self.random_position(rng);
        let mut tries = 1;
        while tries < attempts && is_blocked(&candidate) {
            candidate = self.random_position(rng);
            tries += 1;
        }
        candidate
    }
}
