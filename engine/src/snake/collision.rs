use super::entity::Snake;
use super::grid::Grid;
use super::hazards::HazardWalls;
use super::types::{Direction, GameOverReason, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Safe(Point),
    BoundaryDeath,
    WallDeath,
    SelfDeath,
}

impl MoveOutcome {
    pub fn death_reason(&self) -> Option<GameOverReason> {
        match self {
            MoveOutcome::Safe(_) => None,
            MoveOutcome::BoundaryDeath => Some(GameOverReason::BoundaryCollision),
            MoveOutcome::WallDeath => Some(GameOverReason::WallCollision),
            MoveOutcome::SelfDeath => Some(GameOverReason::SelfCollision),
        }
    }
}

/// Resolves one head step. Checks run in a fixed order and the first match
/// wins: wrap (walls off) or boundary then wall (walls on), then the body.
/// Items are never consulted here, so a deadly cell stays deadly even when
/// an item sits on it.
pub fn resolve_move(snake: &Snake, direction: Direction, hazards: &HazardWalls, grid: &Grid) -> MoveOutcome {
    let candidate = snake.head().step(direction);

    let next_head = if hazards.is_enabled() {
        if !grid.contains(candidate) {
            return MoveOutcome::BoundaryDeath;
        }
        if hazards.contains(&candidate) {
            return MoveOutcome::WallDeath;
        }
        candidate
    } else {
        grid.wrap(candidate)
    };

    // Checked against the body before the move, tail included.
    if snake.contains(&next_head) {
        return MoveOutcome::SelfDeath;
    }

    MoveOutcome::Safe(next_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_when_walls_disabled() {
        let grid = Grid::new(20);
        let hazards = HazardWalls::new();
        let snake = Snake::new(Point::new(19, 0));

        assert_eq!(
            resolve_move(&snake, Direction::Right, &hazards, &grid),
            MoveOutcome::Safe(Point::new(0, 0))
        );
        assert_eq!(
            resolve_move(&snake, Direction::Up, &hazards, &grid),
            MoveOutcome::Safe(Point::new(19, 19))
        );
    }

    #[test]
    fn test_boundary_death_when_walls_enabled() {
        let grid = Grid::new(20);
        let hazards = HazardWalls::with_walls(vec![Point::new(0, 19)]);
        let snake = Snake::new(Point::new(19, 5));

        assert_eq!(
            resolve_move(&snake, Direction::Right, &hazards, &grid),
            MoveOutcome::BoundaryDeath
        );
        assert_eq!(
            resolve_move(&snake, Direction::Down, &hazards, &grid),
            MoveOutcome::Safe(Point::new(19, 6))
        );
    }

    #[test]
    fn test_wall_death() {
        let grid = Grid::new(20);
        let hazards = HazardWalls::with_walls(vec![Point::new(6, 5)]);

        let snake = Snake::new(Point::new(5, 5));
        assert_eq!(
            resolve_move(&snake, Direction::Right, &hazards, &grid),
            MoveOutcome::WallDeath
        );
    }

    #[test]
    fn test_moving_into_tail_is_fatal() {
        let grid = Grid::new(20);
        let hazards = HazardWalls::new();
        // Head (5,5) heading up, body loops round so the tail sits at (6,5).
        let snake = Snake::from_segments([
            Point::new(5, 5),
            Point::new(5, 6),
            Point::new(6, 6),
            Point::new(6, 5),
        ]);

        assert_eq!(
            resolve_move(&snake, Direction::Right, &hazards, &grid),
            MoveOutcome::SelfDeath
        );
        assert_eq!(MoveOutcome::SelfDeath.death_reason(), Some(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_self_collision_across_wrapped_edge() {
        let grid = Grid::new(20);
        let hazards = HazardWalls::new();
        let snake = Snake::from_segments([Point::new(0, 3), Point::new(1, 3), Point::new(19, 3)]);

        assert_eq!(
            resolve_move(&snake, Direction::Left, &hazards, &grid),
            MoveOutcome::SelfDeath
        );
    }
}
