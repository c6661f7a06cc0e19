use std::time::Duration;

use serde::Serialize;

use super::items::{Item, ItemType};
use super::types::{Direction, GameOverReason, GamePhase, Point};

/// Read-only view of a session, taken between ticks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub grid_size: i32,
    /// Head first.
    pub snake: Vec<Point>,
    pub direction: Direction,
    pub queued_direction: Direction,
    pub items: Vec<Item>,
    pub walls: Vec<Point>,
    pub walls_enabled: bool,
    pub score: u32,
    pub lives: u32,
    pub speed: Duration,
    pub clock: Duration,
    pub phase: GamePhase,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameOverSummary {
    pub final_score: u32,
    pub reason: GameOverReason,
    pub length: usize,
    pub lives: u32,
    pub ticks: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GameEvent {
    /// Only emitted when the score actually moved.
    ScoreChanged(u32),
    ItemConsumed(ItemType),
    LifeLost { lives: u32 },
    SpeedChanged(Duration),
    WallsActivated { walls: Vec<Point> },
    /// Emitted once per session.
    GameOver(GameOverSummary),
}
