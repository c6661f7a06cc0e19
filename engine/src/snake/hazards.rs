use crate::{log, SessionRng};
use super::settings::SnakeSessionSettings;
use super::types::Point;

/// One-shot hazard walls. Empty and disabled until the snake first reaches
/// `wall_spawn_length`; after that the set never changes.
#[derive(Clone, Debug, Default)]
pub struct HazardWalls {
    enabled: bool,
    walls: Vec<Point>,
}

impl HazardWalls {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_walls(walls: Vec<Point>) -> Self {
        Self {
            enabled: true,
            walls,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn walls(&self) -> &[Point] {
        &self.walls
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.walls.contains(point)
    }

    /// Enables walls and places `wall_count` of them the first time
    /// `snake_len` reaches the threshold. Returns the placed walls on that
    /// call only.
    pub fn check_activation<F>(
        &mut self,
        snake_len: usize,
        settings: &SnakeSessionSettings,
        rng: &mut SessionRng,
        is_blocked: F,
    ) -> Option<Vec<Point>>
    where
        F: Fn(&Point) -> bool,
    {
        if self.enabled || snake_len < settings.wall_spawn_length {
            return None;
        }

        let mut placed: Vec<Point> = Vec::with_capacity(settings.wall_count);
        for _ in 0..settings.wall_count {
            let wall = settings.grid.find_free_position(rng, settings.spawn_attempts, |p| {
                is_blocked(p) || placed.contains(p)
            });
            placed.push(wall);
        }

        self.enabled = true;
        self.walls = placed.clone();
        log!("Hazard walls activated at length {}: {:?}", snake_len, placed);
        Some(placed)
    }
}
