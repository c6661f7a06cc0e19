mod bot_controller;
mod broadcaster;
mod collision;
mod direction_queue;
mod entity;
mod events;
mod game_state;
mod governor;
mod grid;
mod hazards;
mod items;
mod session;
mod settings;
mod types;

pub use bot_controller::{BotController, BotType};
pub use broadcaster::GameBroadcaster;
pub use collision::{resolve_move, MoveOutcome};
pub use direction_queue::DirectionQueue;
pub use entity::Snake;
pub use events::{GameEvent, GameOverSummary, GameSnapshot};
pub use game_state::{SnakeGameState, START_DIRECTION};
pub use governor::{Consumption, Governor};
pub use grid::Grid;
pub use hazards::HazardWalls;
pub use items::{Item, ItemEconomy, ItemType};
pub use session::{SessionCommand, SessionOutcome, SnakeSession};
pub use settings::SnakeSessionSettings;
pub use types::{Direction, GameOverReason, GamePhase, Point};
