use crate::SessionRng;
use super::events::GameSnapshot;
use super::items::ItemType;
use super::types::{Direction, GamePhase, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotType {
    /// Greedy: steps toward the nearest edible item along a safe cell.
    Efficient,
    Random,
}

/// Picks a direction from a snapshot. Used to drive sessions without a
/// human at the keyboard.
pub struct BotController;

impl BotController {
    pub fn calculate_move(
        bot_type: BotType,
        snapshot: &GameSnapshot,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        if snapshot.phase != GamePhase::Running {
            return None;
        }
        match bot_type {
            BotType::Efficient => Self::efficient_pathfinding(snapshot, rng),
            BotType::Random => Self::random_valid_move(snapshot, rng),
        }
    }

    fn efficient_pathfinding(snapshot: &GameSnapshot, rng: &mut SessionRng) -> Option<Direction> {
        let head = snapshot.head()?;
        let Some(target) = Self::find_nearest_edible(head, snapshot) else {
            return Self::random_valid_move(snapshot, rng);
        };

        let mut best_dir = None;
        let mut best_distance = i32::MAX;

        for dir in Self::get_valid_directions(snapshot.direction) {
            if let Some(next_pos) = Self::calculate_next_position(head, dir, snapshot)
                && Self::is_safe_position(next_pos, snapshot)
            {
                let distance = Self::manhattan_distance(next_pos, target, snapshot);
                if distance < best_distance {
                    best_distance = distance;
                    best_dir = Some(dir);
                }
            }
        }

        best_dir.or_else(|| Self::random_valid_move(snapshot, rng))
    }

    fn random_valid_move(snapshot: &GameSnapshot, rng: &mut SessionRng) -> Option<Direction> {
        let head = snapshot.head()?;
        let safe_directions: Vec<Direction> = Self::get_valid_directions(snapshot.direction)
            .into_iter()
            .filter(|&dir| {
                Self::calculate_next_position(head, dir, snapshot)
                    .is_some_and(|next_pos| Self::is_safe_position(next_pos, snapshot))
            })
            .collect();

        if safe_directions.is_empty() {
            Some(snapshot.direction)
        } else {
            let idx = rng.random_range(0..safe_directions.len());
            Some(safe_directions[idx])
        }
    }

    fn get_valid_directions(current: Direction) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(&current))
            .collect()
    }

    fn find_nearest_edible(from: Point, snapshot: &GameSnapshot) -> Option<Point> {
        snapshot
            .items
            .iter()
            .filter(|item| item.item_type != ItemType::Bomb)
            .map(|item| item.position)
            .min_by_key(|&position| Self::manhattan_distance(from, position, snapshot))
    }

    fn manhattan_distance(a: Point, b: Point, snapshot: &GameSnapshot) -> i32 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();

        if snapshot.walls_enabled {
            dx + dy
        } else {
            let size = snapshot.grid_size;
            dx.min(size - dx) + dy.min(size - dy)
        }
    }

    fn calculate_next_position(from: Point, direction: Direction, snapshot: &GameSnapshot) -> Option<Point> {
        let next = from.step(direction);
        let size = snapshot.grid_size;
        if snapshot.walls_enabled {
            let on_grid = (0..size).contains(&next.x) && (0..size).contains(&next.y);
            on_grid.then_some(next)
        } else {
            Some(Point::new(next.x.rem_euclid(size), next.y.rem_euclid(size)))
        }
    }

    fn is_safe_position(pos: Point, snapshot: &GameSnapshot) -> bool {
        !snapshot.snake.contains(&pos)
            && !snapshot.walls.contains(&pos)
            && !snapshot
                .items
                .iter()
                .any(|item| item.position == pos && item.item_type == ItemType::Bomb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::snake::items::Item;

    fn snapshot(snake: Vec<Point>, direction: Direction, items: Vec<Item>) -> GameSnapshot {
        GameSnapshot {
            tick: 0,
            grid_size: 20,
            snake,
            direction,
            queued_direction: direction,
            items,
            walls: vec![],
            walls_enabled: false,
            score: 0,
            lives: 1,
            speed: Duration::from_millis(150),
            clock: Duration::ZERO,
            phase: GamePhase::Running,
        }
    }

    fn item(x: i32, y: i32, item_type: ItemType) -> Item {
        Item {
            position: Point::new(x, y),
            item_type,
            expires_at: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_efficient_heads_for_food() {
        let state = snapshot(
            vec![Point::new(10, 10)],
            Direction::Right,
            vec![item(10, 4, ItemType::Food)],
        );
        let mut rng = SessionRng::new(1);
        assert_eq!(
            BotController::calculate_move(BotType::Efficient, &state, &mut rng),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_efficient_uses_wraparound_distance() {
        let state = snapshot(
            vec![Point::new(1, 10)],
            Direction::Up,
            vec![item(18, 10, ItemType::Food)],
        );
        let mut rng = SessionRng::new(1);
        assert_eq!(
            BotController::calculate_move(BotType::Efficient, &state, &mut rng),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_bombs_are_avoided() {
        let state = snapshot(
            vec![Point::new(10, 10)],
            Direction::Right,
            vec![item(11, 10, ItemType::Bomb), item(15, 10, ItemType::Food)],
        );
        let mut rng = SessionRng::new(1);
        let dir = BotController::calculate_move(BotType::Efficient, &state, &mut rng).unwrap();
        assert_ne!(dir, Direction::Right);
    }

    #[test]
    fn test_random_never_reverses_or_hits_body() {
        let state = snapshot(
            vec![Point::new(10, 10), Point::new(9, 10), Point::new(9, 11), Point::new(10, 11)],
            Direction::Right,
            vec![],
        );
        let mut rng = SessionRng::new(5);
        for _ in 0..100 {
            let dir = BotController::calculate_move(BotType::Random, &state, &mut rng).unwrap();
            assert!(dir == Direction::Right || dir == Direction::Up);
        }
    }

    #[test]
    fn test_no_move_when_not_running() {
        let mut state = snapshot(vec![Point::new(10, 10)], Direction::Right, vec![]);
        state.phase = GamePhase::Paused;
        let mut rng = SessionRng::new(1);
        assert_eq!(BotController::calculate_move(BotType::Efficient, &state, &mut rng), None);
    }
}
