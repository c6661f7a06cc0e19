use serde::{Deserialize, Serialize};

use super::Validate;

/// Every gameplay tunable. Missing YAML keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub grid_size: u32,
    pub initial_tick_interval_ms: u32,
    pub speed_step_ms: u32,
    pub min_tick_interval_ms: u32,
    /// The interval shrinks whenever food brings the score to a multiple of this.
    pub speed_up_every: u32,
    pub wall_spawn_length: u32,
    pub wall_count: u32,
    pub starting_lives: u32,
    pub bomb_min_length: u32,
    pub spawn_attempts: u32,
    pub bonus_spawn_probability: f64,
    pub bonus: BonusOdds,
    pub lifetimes: ItemLifetimes,
    pub scores: ItemScores,
}

/// Conditional odds inside the bonus branch. Whatever is left over spawns nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusOdds {
    pub heart: f64,
    pub bomb: f64,
    pub big_food: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemLifetimes {
    pub food_ms: u64,
    pub big_food_ms: u64,
    pub bomb_ms: u64,
    pub heart_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemScores {
    pub food: u32,
    pub big_food: u32,
    pub heart: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_tick_interval_ms: 150,
            speed_step_ms: 10,
            min_tick_interval_ms: 50,
            speed_up_every: 5,
            wall_spawn_length: 10,
            wall_count: 5,
            starting_lives: 1,
            bomb_min_length: 3,
            spawn_attempts: 100,
            bonus_spawn_probability: 0.30,
            bonus: BonusOdds::default(),
            lifetimes: ItemLifetimes::default(),
            scores: ItemScores::default(),
        }
    }
}

impl Default for BonusOdds {
    fn default() -> Self {
        Self {
            heart: 0.02,
            bomb: 0.13,
            big_food: 0.20,
        }
    }
}

impl Default for ItemLifetimes {
    fn default() -> Self {
        Self {
            food_ms: 30_000,
            big_food_ms: 12_000,
            bomb_ms: 8_000,
            heart_ms: 10_000,
        }
    }
}

impl Default for ItemScores {
    fn default() -> Self {
        Self {
            food: 1,
            big_food: 3,
            heart: 5,
        }
    }
}

impl Validate for SnakeConfig {
    fn validate(&self) -> Result<(), String> {
        if !(5..=100).contains(&self.grid_size) {
            return Err("grid_size must be between 5 and 100".to_string());
        }
        if self.min_tick_interval_ms < 10 {
            return Err("min_tick_interval_ms must be at least 10".to_string());
        }
        if self.initial_tick_interval_ms < self.min_tick_interval_ms {
            return Err("initial_tick_interval_ms must not be below min_tick_interval_ms".to_string());
        }
        if self.initial_tick_interval_ms > 5000 {
            return Err("initial_tick_interval_ms must not exceed 5000".to_string());
        }
        if self.speed_up_every == 0 {
            return Err("speed_up_every must be at least 1".to_string());
        }
        if self.wall_spawn_length < 2 {
            return Err("wall_spawn_length must be at least 2".to_string());
        }
        if self.wall_count >= self.grid_size * self.grid_size / 2 {
            return Err("wall_count must cover less than half of the grid".to_string());
        }
        if self.starting_lives == 0 {
            return Err("starting_lives must be at least 1".to_string());
        }
        if self.bomb_min_length == 0 {
            return Err("bomb_min_length must be at least 1".to_string());
        }
        if self.spawn_attempts == 0 {
            return Err("spawn_attempts must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.bonus_spawn_probability) {
            return Err("bonus_spawn_probability must be between 0.0 and 1.0".to_string());
        }
        self.bonus.validate()?;
        self.lifetimes.validate()?;
        Ok(())
    }
}

impl Validate for BonusOdds {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [("heart", self.heart), ("bomb", self.bomb), ("big_food", self.big_food)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("bonus.{} must be between 0.0 and 1.0", name));
            }
        }
        if self.heart + self.bomb + self.big_food > 1.0 {
            return Err("bonus odds must not sum above 1.0".to_string());
        }
        Ok(())
    }
}

impl Validate for ItemLifetimes {
    fn validate(&self) -> Result<(), String> {
        if self.food_ms == 0 || self.big_food_ms == 0 || self.bomb_ms == 0 || self.heart_ms == 0 {
            return Err("item lifetimes must be greater than 0".to_string());
        }
        Ok(())
    }
}
