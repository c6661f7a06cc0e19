use std::time::Duration;

use crate::{log, SessionRng};
use super::collision::{resolve_move, MoveOutcome};
use super::direction_queue::DirectionQueue;
use super::entity::Snake;
use super::events::{GameEvent, GameOverSummary, GameSnapshot};
use super::governor::{Consumption, Governor};
use super::hazards::HazardWalls;
use super::items::{ItemEconomy, ItemType};
use super::settings::SnakeSessionSettings;
use super::types::{Direction, GameOverReason, GamePhase};

pub const START_DIRECTION: Direction = Direction::Right;

/// One live session. All mutation happens in [`SnakeGameState::update`] or
/// through the command methods, never in between.
#[derive(Clone, Debug)]
pub struct SnakeGameState {
    settings: SnakeSessionSettings,
    snake: Snake,
    directions: DirectionQueue,
    items: ItemEconomy,
    hazards: HazardWalls,
    governor: Governor,
    phase: GamePhase,
    clock: Duration,
    tick: u64,
    game_over: Option<GameOverSummary>,
}

impl SnakeGameState {
    pub fn new(settings: SnakeSessionSettings, rng: &mut SessionRng) -> Self {
        let mut state = Self {
            snake: Snake::new(settings.grid.center()),
            directions: DirectionQueue::new(START_DIRECTION),
            items: ItemEconomy::new(),
            hazards: HazardWalls::new(),
            governor: Governor::new(&settings),
            phase: GamePhase::Running,
            clock: Duration::ZERO,
            tick: 0,
            game_over: None,
            settings,
        };
        state.replenish_food(rng);
        state
    }

    /// Throws the current session away and starts a fresh one with the same
    /// settings.
    pub fn reset(&mut self, rng: &mut SessionRng) {
        *self = Self::new(self.settings.clone(), rng);
    }

    pub fn settings(&self) -> &SnakeSessionSettings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.governor.score()
    }

    pub fn lives(&self) -> u32 {
        self.governor.lives()
    }

    pub fn speed(&self) -> Duration {
        self.governor.speed()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn game_over(&self) -> Option<&GameOverSummary> {
        self.game_over.as_ref()
    }

    /// Queues a turn for the next tick. Reversals and commands after game
    /// over are ignored.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.directions.submit(direction)
    }

    /// Running <-> Paused. Returns the new phase, or `None` after game over.
    pub fn toggle_pause(&mut self) -> Option<GamePhase> {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::GameOver => return None,
        };
        log!("Session {:?} at tick {}", self.phase, self.tick);
        Some(self.phase)
    }

    /// Advances the simulation by one tick. Does nothing unless running.
    ///
    /// Order: commit direction, resolve collision, apply the item under the
    /// new head, sweep expired items, roll a bonus spawn, replenish food,
    /// check hazard activation.
    pub fn update(&mut self, rng: &mut SessionRng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Running {
            return events;
        }

        let score_before = self.governor.score();
        self.tick += 1;
        self.clock += self.governor.speed();

        let direction = self.directions.commit();
        let head = match resolve_move(&self.snake, direction, &self.hazards, &self.settings.grid) {
            MoveOutcome::Safe(head) => head,
            MoveOutcome::BoundaryDeath => return self.finish(GameOverReason::BoundaryCollision, events),
            MoveOutcome::WallDeath => return self.finish(GameOverReason::WallCollision, events),
            MoveOutcome::SelfDeath => return self.finish(GameOverReason::SelfCollision, events),
        };

        match self.items.item_at(head).map(|item| item.item_type) {
            None => Governor::advance(&mut self.snake, head),
            Some(item_type) => {
                let consumption =
                    self.governor
                        .consume(item_type, &mut self.snake, head, &self.settings);
                let Consumption::Applied { speed_changed } = consumption else {
                    return self.finish(GameOverReason::Bomb, events);
                };

                self.items.take_at(head);
                events.push(GameEvent::ItemConsumed(item_type));

                if item_type == ItemType::Bomb {
                    events.push(GameEvent::LifeLost {
                        lives: self.governor.lives(),
                    });
                }
                if let Some(speed) = speed_changed {
                    log!("Tick interval now {}ms", speed.as_millis());
                    events.push(GameEvent::SpeedChanged(speed));
                }
                if item_type == ItemType::Food {
                    self.spawn_item(ItemType::Food, rng);
                }
            }
        }

        if self.governor.score() != score_before {
            events.push(GameEvent::ScoreChanged(self.governor.score()));
        }

        self.items.sweep_expired(self.clock);

        if let Some(bonus) = ItemEconomy::roll_bonus(&self.settings, rng) {
            self.spawn_item(bonus, rng);
        }

        self.replenish_food(rng);

        let Self {
            hazards,
            snake,
            items,
            settings,
            ..
        } = self;
        if let Some(walls) = hazards.check_activation(snake.len(), settings, rng, |p| {
            snake.contains(p) || items.item_at(*p).is_some()
        }) {
            events.push(GameEvent::WallsActivated { walls });
        }

        events
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tick: self.tick,
            grid_size: self.settings.grid.size(),
            snake: self.snake.segments().copied().collect(),
            direction: self.directions.current(),
            queued_direction: self.directions.queued(),
            items: self.items.items().to_vec(),
            walls: self.hazards.walls().to_vec(),
            walls_enabled: self.hazards.is_enabled(),
            score: self.governor.score(),
            lives: self.governor.lives(),
            speed: self.governor.speed(),
            clock: self.clock,
            phase: self.phase,
        }
    }

    fn finish(&mut self, reason: GameOverReason, mut events: Vec<GameEvent>) -> Vec<GameEvent> {
        self.phase = GamePhase::GameOver;
        let summary = GameOverSummary {
            final_score: self.governor.score(),
            reason,
            length: self.snake.len(),
            lives: self.governor.lives(),
            ticks: self.tick,
        };
        log!(
            "Game over ({:?}) at tick {}. Final score: {}",
            reason,
            self.tick,
            summary.final_score
        );
        self.game_over = Some(summary.clone());
        events.push(GameEvent::GameOver(summary));
        events
    }

    fn spawn_item(&mut self, item_type: ItemType, rng: &mut SessionRng) {
        let Self {
            items,
            snake,
            hazards,
            settings,
            clock,
            ..
        } = self;
        items.spawn(item_type, settings, rng, *clock, |p| {
            snake.contains(p) || hazards.contains(p)
        });
    }

    #[cfg(test)]
    pub(crate) fn governor_mut(&mut self) -> &mut Governor {
        &mut self.governor
    }

    #[cfg(test)]
    pub(crate) fn items_mut(&mut self) -> &mut ItemEconomy {
        &mut self.items
    }

    fn replenish_food(&mut self, rng: &mut SessionRng) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let Self {
            items,
            snake,
            hazards,
            settings,
            clock,
            ..
        } = self;
        items.replenish(settings, rng, *clock, |p| {
            snake.contains(p) || hazards.contains(p)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BonusOdds, SnakeConfig};
    use crate::snake::items::Item;
    use crate::snake::types::Point;
    use proptest::prelude::*;

    /// Default rules without bonus spawns, so only the items a test places
    /// (plus replacement food) are on the board.
    fn quiet_settings() -> SnakeSessionSettings {
        SnakeSessionSettings::from(&SnakeConfig {
            bonus_spawn_probability: 0.0,
            ..SnakeConfig::default()
        })
    }

    fn create_state(settings: SnakeSessionSettings) -> (SnakeGameState, SessionRng) {
        let mut rng = SessionRng::new(42);
        let state = SnakeGameState::new(settings, &mut rng);
        (state, rng)
    }

    /// Horizontal snake with its head at `head`, body trailing to the left,
    /// heading right.
    fn set_line(state: &mut SnakeGameState, head: Point, len: i32) {
        state.snake = Snake::from_segments((0..len).map(|i| Point::new(head.x - i, head.y)));
        state.directions = DirectionQueue::new(Direction::Right);
    }

    fn place(state: &mut SnakeGameState, x: i32, y: i32, item_type: ItemType) {
        state.items.insert(Item {
            position: Point::new(x, y),
            item_type,
            expires_at: Duration::from_secs(60),
        });
    }

    fn clear_items(state: &mut SnakeGameState) {
        state.items = ItemEconomy::new();
    }

    fn game_over_events(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count()
    }

    #[test]
    fn test_new_session_defaults() {
        let (state, _) = create_state(SnakeSessionSettings::default());
        let snapshot = state.snapshot();

        assert_eq!(snapshot.snake, vec![Point::new(10, 10)]);
        assert_eq!(snapshot.direction, Direction::Right);
        assert_eq!(snapshot.phase, GamePhase::Running);
        assert_eq!(snapshot.lives, 1);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.speed, Duration::from_millis(150));
        assert!(!snapshot.walls_enabled);
        assert!(snapshot.walls.is_empty());
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].item_type, ItemType::Food);
        assert_ne!(snapshot.items[0].position, Point::new(10, 10));
    }

    #[test]
    fn test_starting_lives_from_config() {
        let settings = SnakeSessionSettings::from(&SnakeConfig {
            starting_lives: 3,
            ..SnakeConfig::default()
        });
        let (state, _) = create_state(settings);
        assert_eq!(state.lives(), 3);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let (mut state, mut rng) = create_state(quiet_settings());
        set_line(&mut state, Point::new(5, 5), 4);
        clear_items(&mut state);
        place(&mut state, 15, 15, ItemType::Food);

        let events = state.update(&mut rng);
        assert!(events.is_empty());
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.head(), Point::new(6, 5));
        assert_eq!(state.snake.tail(), Point::new(3, 5));
    }

    #[test]
    fn test_eating_food_from_start_position() {
        let (mut state, mut rng) = create_state(quiet_settings());
        clear_items(&mut state);
        place(&mut state, 11, 10, ItemType::Food);

        let events = state.update(&mut rng);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.snake, vec![Point::new(11, 10)]);
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].item_type, ItemType::Food);
        assert_ne!(snapshot.items[0].position, Point::new(11, 10));
        assert_eq!(
            events,
            vec![
                GameEvent::ItemConsumed(ItemType::Food),
                GameEvent::ScoreChanged(1)
            ]
        );
    }

    #[test]
    fn test_eating_food_with_longer_snake() {
        let (mut state, mut rng) = create_state(quiet_settings());
        set_line(&mut state, Point::new(5, 5), 3);
        clear_items(&mut state);
        place(&mut state, 6, 5, ItemType::Food);
        place(&mut state, 15, 15, ItemType::Food);

        state.update(&mut rng);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.items.len(), 2);
        assert!(state.items.items().iter().all(|i| i.item_type == ItemType::Food));
    }

    #[test]
    fn test_big_food_scores_three_and_grows_two() {
        let (mut state, mut rng) = create_state(quiet_settings());
        set_line(&mut state, Point::new(5, 5), 3);
        clear_items(&mut state);
        place(&mut state, 6, 5, ItemType::BigFood);

        let events = state.update(&mut rng);
        assert_eq!(state.score(), 3);
        assert_eq!(state.snake.len(), 5);
        assert!(events.contains(&GameEvent::ScoreChanged(3)));
        // The board was emptied by eating the only item, so food comes back.
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items.items()[0].item_type, ItemType::Food);
    }

    #[test]
    fn test_bomb_with_spare_life_shrinks() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.governor.set_lives(2);
        set_line(&mut state, Point::new(15, 5), 12);
        clear_items(&mut state);
        place(&mut state, 16, 5, ItemType::Bomb);

        let events = state.update(&mut rng);
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.lives(), 1);
        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.score(), 0);
        assert!(events.contains(&GameEvent::LifeLost { lives: 1 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreChanged(_))));
    }

    #[test]
    fn test_bomb_on_last_life_ends_game() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.governor.set_score(7);
        set_line(&mut state, Point::new(5, 5), 4);
        clear_items(&mut state);
        place(&mut state, 6, 5, ItemType::Bomb);
        let before = state.snake.segments().copied().collect::<Vec<_>>();

        let events = state.update(&mut rng);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(game_over_events(&events), 1);
        let summary = state.game_over().unwrap();
        assert_eq!(summary.final_score, 7);
        assert_eq!(summary.reason, GameOverReason::Bomb);
        assert_eq!(state.snake.segments().copied().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_heart_adds_life_and_score() {
        let (mut state, mut rng) = create_state(quiet_settings());
        set_line(&mut state, Point::new(5, 5), 3);
        place(&mut state, 6, 5, ItemType::Heart);

        state.update(&mut rng);
        assert_eq!(state.lives(), 2);
        assert_eq!(state.score(), 5);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_fifth_food_speeds_up() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.governor.set_score(4);
        clear_items(&mut state);
        place(&mut state, 11, 10, ItemType::Food);

        let events = state.update(&mut rng);
        assert_eq!(state.speed(), Duration::from_millis(140));
        assert!(events.contains(&GameEvent::SpeedChanged(Duration::from_millis(140))));
    }

    #[test]
    fn test_boundary_death_beats_wraparound_once_walls_enabled() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.hazards = HazardWalls::with_walls(vec![Point::new(0, 0)]);
        set_line(&mut state, Point::new(19, 5), 3);

        let events = state.update(&mut rng);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(
            state.game_over().map(|s| s.reason),
            Some(GameOverReason::BoundaryCollision)
        );
        assert_eq!(game_over_events(&events), 1);
        assert_eq!(state.snake.head(), Point::new(19, 5));
    }

    #[test]
    fn test_wall_beats_item_on_same_cell() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.hazards = HazardWalls::with_walls(vec![Point::new(6, 5)]);
        set_line(&mut state, Point::new(5, 5), 3);
        place(&mut state, 6, 5, ItemType::Heart);

        state.update(&mut rng);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(
            state.game_over().map(|s| s.reason),
            Some(GameOverReason::WallCollision)
        );
        assert_eq!(state.score(), 0);
        assert_eq!(state.lives(), 1);
    }

    #[test]
    fn test_body_beats_item_on_same_cell() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.snake = Snake::from_segments([
            Point::new(5, 5),
            Point::new(5, 6),
            Point::new(6, 6),
            Point::new(6, 5),
        ]);
        state.directions = DirectionQueue::new(Direction::Up);
        state.set_direction(Direction::Right);
        place(&mut state, 6, 5, ItemType::BigFood);

        state.update(&mut rng);
        assert_eq!(
            state.game_over().map(|s| s.reason),
            Some(GameOverReason::SelfCollision)
        );
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_no_updates_after_game_over() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.hazards = HazardWalls::with_walls(vec![]);
        set_line(&mut state, Point::new(19, 5), 1);
        state.update(&mut rng);
        let frozen = state.snapshot();

        for _ in 0..5 {
            assert!(state.update(&mut rng).is_empty());
        }
        assert_eq!(state.snapshot(), frozen);
        assert!(!state.set_direction(Direction::Up));
        assert_eq!(state.toggle_pause(), None);
    }

    #[test]
    fn test_reversal_never_committed() {
        let (mut state, mut rng) = create_state(quiet_settings());
        assert!(!state.set_direction(Direction::Left));
        state.update(&mut rng);
        assert_eq!(state.snapshot().direction, Direction::Right);
        assert_eq!(state.snake.head(), Point::new(11, 10));
    }

    #[test]
    fn test_walls_activate_on_reaching_length_ten() {
        let (mut state, mut rng) = create_state(quiet_settings());
        set_line(&mut state, Point::new(10, 5), 8);
        clear_items(&mut state);
        place(&mut state, 11, 5, ItemType::BigFood);

        let events = state.update(&mut rng);
        assert_eq!(state.snake.len(), 10);
        assert!(state.hazards.is_enabled());

        let walls = state.hazards.walls().to_vec();
        assert_eq!(walls.len(), 5);
        for wall in &walls {
            assert!(!state.snake.contains(wall));
        }
        assert!(events.contains(&GameEvent::WallsActivated { walls: walls.clone() }));

        // Later ticks never move or add walls.
        place(&mut state, 12, 5, ItemType::BigFood);
        state.update(&mut rng);
        assert_eq!(state.hazards.walls(), walls.as_slice());
    }

    #[test]
    fn test_expired_items_are_swept() {
        let (mut state, mut rng) = create_state(quiet_settings());
        clear_items(&mut state);
        state.items.insert(Item {
            position: Point::new(0, 0),
            item_type: ItemType::Bomb,
            expires_at: Duration::from_millis(300),
        });
        place(&mut state, 3, 3, ItemType::Food);

        state.update(&mut rng);
        assert!(state.items.item_at(Point::new(0, 0)).is_some());
        state.update(&mut rng);
        assert!(state.items.item_at(Point::new(0, 0)).is_none());
        assert!(state.items.item_at(Point::new(3, 3)).is_some());
    }

    #[test]
    fn test_empty_board_gets_food() {
        let (mut state, mut rng) = create_state(quiet_settings());
        clear_items(&mut state);

        state.update(&mut rng);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items.items()[0].item_type, ItemType::Food);
    }

    #[test]
    fn test_bonus_spawns_at_most_one_per_tick() {
        let settings = SnakeSessionSettings::from(&SnakeConfig {
            bonus_spawn_probability: 1.0,
            ..SnakeConfig::default()
        });
        let (mut state, mut rng) = create_state(settings);

        for _ in 0..5 {
            let before = state.items.len();
            state.update(&mut rng);
            assert!(state.items.len() <= before + 1);
        }
    }

    #[test]
    fn test_bonus_rolls_on_the_tick_food_is_eaten() {
        let settings = SnakeSessionSettings::from(&SnakeConfig {
            bonus_spawn_probability: 1.0,
            bonus: BonusOdds {
                heart: 0.0,
                bomb: 0.0,
                big_food: 1.0,
            },
            ..SnakeConfig::default()
        });
        let (mut state, mut rng) = create_state(settings);
        clear_items(&mut state);
        place(&mut state, 11, 10, ItemType::Food);

        let events = state.update(&mut rng);
        assert!(events.contains(&GameEvent::ItemConsumed(ItemType::Food)));

        let kinds: Vec<ItemType> = state.items.items().iter().map(|i| i.item_type).collect();
        assert_eq!(kinds, vec![ItemType::Food, ItemType::BigFood]);
        assert!(state.items.item_at(Point::new(11, 10)).is_none());
    }

    #[test]
    fn test_pause_freezes_state() {
        let (mut state, mut rng) = create_state(SnakeSessionSettings::default());
        state.update(&mut rng);

        assert_eq!(state.toggle_pause(), Some(GamePhase::Paused));
        let frozen = serde_yaml_ng::to_string(&state.snapshot()).unwrap();
        for _ in 0..50 {
            assert!(state.update(&mut rng).is_empty());
        }
        assert_eq!(serde_yaml_ng::to_string(&state.snapshot()).unwrap(), frozen);

        assert_eq!(state.toggle_pause(), Some(GamePhase::Running));
        state.update(&mut rng);
        assert_eq!(state.tick(), 2);
    }

    #[test]
    fn test_reset_restores_fresh_session() {
        let (mut state, mut rng) = create_state(quiet_settings());
        state.governor.set_score(12);
        state.hazards = HazardWalls::with_walls(vec![Point::new(1, 1)]);
        state.update(&mut rng);

        state.reset(&mut rng);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.snake, vec![Point::new(10, 10)]);
        assert!(!snapshot.walls_enabled);
        assert_eq!(snapshot.items.len(), 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let settings = SnakeSessionSettings::default();
        let play = || {
            let mut rng = SessionRng::new(77);
            let mut state = SnakeGameState::new(settings.clone(), &mut rng);
            let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
            for i in 0..200 {
                state.set_direction(turns[(i / 7) % turns.len()]);
                state.update(&mut rng);
            }
            state.snapshot()
        };
        assert_eq!(play(), play());
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_wraparound_keeps_head_on_grid(
            seed in any::<u64>(),
            moves in prop::collection::vec(direction_strategy(), 1..200),
        ) {
            let mut rng = SessionRng::new(seed);
            let mut state = SnakeGameState::new(quiet_settings(), &mut rng);
            let grid = state.settings().grid;

            for direction in moves {
                state.set_direction(direction);
                state.update(&mut rng);
                prop_assert!(!state.hazards.is_enabled());
                prop_assert_eq!(state.phase(), GamePhase::Running);
                prop_assert!(grid.contains(state.snake.head()));
            }
        }
    }
}
