use std::time::Duration;

use super::entity::Snake;
use super::items::ItemType;
use super::settings::SnakeSessionSettings;
use super::types::Point;

/// Result of eating an item on a safe cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumption {
    Applied { speed_changed: Option<Duration> },
    /// Bomb on the last life. Nothing was mutated.
    Fatal,
}

/// Owns score, lives and the tick interval, and applies item effects to
/// the snake body.
#[derive(Clone, Debug)]
pub struct Governor {
    score: u32,
    lives: u32,
    speed: Duration,
}

impl Governor {
    pub fn new(settings: &SnakeSessionSettings) -> Self {
        Self {
            score: 0,
            lives: settings.starting_lives,
            speed: settings.initial_tick_interval,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Plain move: head in, tail out.
    pub fn advance(snake: &mut Snake, head: Point) {
        snake.push_front(head);
        snake.pop_back();
    }

    pub fn consume(
        &mut self,
        item_type: ItemType,
        snake: &mut Snake,
        head: Point,
        settings: &SnakeSessionSettings,
    ) -> Consumption {
        let mut speed_changed = None;

        match item_type {
            ItemType::Food => {
                Self::advance(snake, head);
                self.score += settings.scores.food;
                if self.score % settings.speed_up_every == 0 {
                    speed_changed = self.speed_up(settings);
                }
            }
            ItemType::BigFood => {
                let tail = snake.tail();
                snake.push_front(head);
                snake.push_back(tail);
                self.score += settings.scores.big_food;
            }
            ItemType::Bomb => {
                if self.lives <= 1 {
                    return Consumption::Fatal;
                }
                let old_len = snake.len();
                self.lives -= 1;
                Self::advance(snake, head);
                // Below the minimum the snake keeps its length.
                snake.truncate(settings.bomb_min_length.max(old_len / 2));
            }
            ItemType::Heart => {
                Self::advance(snake, head);
                self.lives += 1;
                self.score += settings.scores.heart;
            }
        }

        Consumption::Applied { speed_changed }
    }

    /// One step faster, never past the floor. `None` once the floor is hit.
    fn speed_up(&mut self, settings: &SnakeSessionSettings) -> Option<Duration> {
        if self.speed <= settings.min_tick_interval {
            return None;
        }
        self.speed = self
            .speed
            .saturating_sub(settings.speed_step)
            .max(settings.min_tick_interval);
        Some(self.speed)
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    #[cfg(test)]
    pub(crate) fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    #[cfg(test)]
    pub(crate) fn set_speed(&mut self, speed: Duration) {
        self.speed = speed;
    }
}
