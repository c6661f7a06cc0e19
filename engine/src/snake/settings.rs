use std::time::Duration;

use crate::config::{BonusOdds, ItemScores, SnakeConfig};
use super::grid::Grid;
use super::items::ItemType;

/// Runtime form of [`SnakeConfig`]: durations instead of milliseconds and
/// lengths as `usize`.
#[derive(Clone, Debug)]
pub struct SnakeSessionSettings {
    pub grid: Grid,
    pub initial_tick_interval: Duration,
    pub speed_step: Duration,
    pub min_tick_interval: Duration,
    pub speed_up_every: u32,
    pub wall_spawn_length: usize,
    pub wall_count: usize,
    pub starting_lives: u32,
    pub bomb_min_length: usize,
    pub spawn_attempts: u32,
    pub bonus_spawn_probability: f64,
    pub bonus: BonusOdds,
    pub scores: ItemScores,
    food_lifetime: Duration,
    big_food_lifetime: Duration,
    bomb_lifetime: Duration,
    heart_lifetime: Duration,
}

impl SnakeSessionSettings {
    pub fn lifetime(&self, item_type: ItemType) -> Duration {
        match item_type {
            ItemType::Food => self.food_lifetime,
            ItemType::BigFood => self.big_food_lifetime,
            ItemType::Bomb => self.bomb_lifetime,
            ItemType::Heart => self.heart_lifetime,
        }
    }
}

impl From<&SnakeConfig> for SnakeSessionSettings {
    fn from(config: &SnakeConfig) -> Self {
        Self {
            grid: Grid::new(config.grid_size),
            initial_tick_interval: Duration::from_millis(config.initial_tick_interval_ms as u64),
            speed_step: Duration::from_millis(config.speed_step_ms as u64),
            min_tick_interval: Duration::from_millis(config.min_tick_interval_ms as u64),
            speed_up_every: config.speed_up_every.max(1),
            wall_spawn_length: config.wall_spawn_length as usize,
            wall_count: config.wall_count as usize,
            starting_lives: config.starting_lives.max(1),
            bomb_min_length: config.bomb_min_length as usize,
            spawn_attempts: config.spawn_attempts.max(1),
            bonus_spawn_probability: config.bonus_spawn_probability.clamp(0.0, 1.0),
            bonus: config.bonus.clone(),
            scores: config.scores.clone(),
            food_lifetime: Duration::from_millis(config.lifetimes.food_ms),
            big_food_lifetime: Duration::from_millis(config.lifetimes.big_food_ms),
            bomb_lifetime: Duration::from_millis(config.lifetimes.bomb_ms),
            heart_lifetime: Duration::from_millis(config.lifetimes.heart_ms),
        }
    }
}

impl Default for SnakeSessionSettings {
    fn default() -> Self {
        Self::from(&SnakeConfig::default())
    }
}
