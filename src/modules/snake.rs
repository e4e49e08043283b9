use std::collections::VecDeque;

use rand::Rng;

use crate::modules::cell::{Cell, Occupant, Position};
use crate::modules::direction::Direction;
use crate::modules::sensing::{LocalSensing, random_direction};

pub type SnakeId = u64;

/// Length at which a snake splits in two instead of moving.
pub const DIVIDING_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Stay,
    Reproduce,
    Move(Direction),
    Eat(Direction),
}

impl Action {
    pub const fn label(&self) -> &'static str {
        match self {
            Action::Stay => "stay",
            Action::Reproduce => "reproduce",
            Action::Move(_) => "move",
            Action::Eat(_) => "eat",
        }
    }

    pub const fn direction(&self) -> Option<Direction> {
        match self {
            Action::Move(dir) | Action::Eat(dir) => Some(*dir),
            Action::Stay | Action::Reproduce => None,
        }
    }
}

/// One creature: an ordered chain of body cells, head first.
///
/// Segment positions are authoritative; nothing is re-derived from adjacency.
/// The body is never empty and exactly its first cell carries the head flag.
#[derive(Clone, Debug)]
pub struct Snake {
    id: SnakeId,
    body: VecDeque<Cell>,
}

impl Snake {
    /// Startup layout: head at `(x, y)`, the rest trailing off to the left.
    pub fn new(id: SnakeId, x: i32, y: i32, size: usize) -> Self {
        assert!(size >= 1, "a snake needs at least one segment");
        let body = (0..size)
            .map(|i| Cell::new(Occupant::BodySegment, i == 0, Position::new(x - i as i32, y)))
            .collect();
        Self { id, body }
    }

    /// Builds a snake from already-ordered segments; the first one becomes
    /// the head.
    pub fn from_segments(id: SnakeId, segments: impl IntoIterator<Item = Cell>) -> Self {
        let body: VecDeque<Cell> = segments
            .into_iter()
            .enumerate()
            .map(|(i, mut cell)| {
                cell.set_occupant(Occupant::BodySegment);
                cell.set_head(i == 0);
                cell
            })
            .collect();
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Self { id, body }
    }

    pub fn id(&self) -> SnakeId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.body.iter().map(|c| c.position()).collect()
    }

    pub fn can_reproduce(&self) -> bool {
        self.size() >= DIVIDING_SIZE
    }

    /// Slides one step: a new head is pushed in `direction` and the tail is
    /// dropped. Returns the vacated tail cell, already reset to `Empty`.
    pub fn move_to(&mut self, direction: Direction) -> Cell {
        let vacated = self.tail().position();
        let next = self.head().position().step(direction);

        self.body[0].set_head(false);
        self.body.push_front(Cell::new(Occupant::BodySegment, true, next));
        self.body.truncate(self.body.len() - 1);

        Cell::empty(vacated)
    }

    /// Swallows the food cell, which becomes the new head. No tail is lost.
    pub fn eat(&mut self, food: Cell) {
        debug_assert!(food.holds_food(), "eat called on a non-food cell");
        self.body[0].set_head(false);

        let mut head = food;
        head.set_occupant(Occupant::BodySegment);
        head.set_head(true);
        self.body.push_front(head);
    }

    /// Splits off the tail half (`size / 2` segments) as a new snake whose
    /// head sits where this snake's tail was. The remainder of an odd split
    /// stays with the parent.
    pub fn reproduce(&mut self, child_id: SnakeId) -> Snake {
        assert!(
            self.can_reproduce(),
            "snake {} cannot reproduce at size {} (needs {})",
            self.id,
            self.size(),
            DIVIDING_SIZE
        );

        let half = self.size() / 2;
        let keep = self.size() - half;
        let detached: Vec<Cell> = self.body.drain(keep..).rev().collect();
        Snake::from_segments(child_id, detached)
    }

    pub fn stay(&self) {}

    /// Greedy-then-random policy:
    /// reproduce when big enough, eat adjacent food, step toward the food,
    /// step anywhere free, otherwise stay put.
    pub fn choose_action<R: Rng + ?Sized>(&self, sensing: &LocalSensing, rng: &mut R) -> Action {
        if self.can_reproduce() {
            return Action::Reproduce;
        }

        if let Some(dir) = sensing.food_direction() {
            return Action::Eat(dir);
        }

        let greedy = sensing.greedy_directions();
        if let Some(dir) = random_direction(&greedy, rng) {
            return Action::Move(dir);
        }

        match random_direction(sensing.free_directions(), rng) {
            Some(dir) => Action::Move(dir),
            None => Action::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::modules::food::Food;
    use crate::modules::grid::Grid;

    fn sync(grid: &mut Grid, snake: &Snake) {
        for cell in snake.segments() {
            grid.place(*cell);
        }
    }

    fn assert_well_formed(snake: &Snake) {
        let heads: Vec<_> = snake.segments().filter(|c| c.is_head()).collect();
        assert_eq!(heads.len(), 1, "exactly one head expected");
        assert!(snake.head().is_head());
        assert!(
            snake
                .segments()
                .all(|c| c.occupant() == Occupant::BodySegment)
        );
    }

    #[test]
    fn startup_layout_is_horizontal() {
        let snake = Snake::new(1, 4, 1, 4);
        assert_eq!(
            snake.positions(),
            vec![
                Position::new(4, 1),
                Position::new(3, 1),
                Position::new(2, 1),
                Position::new(1, 1),
            ]
        );
        assert_well_formed(&snake);
    }

    #[test]
    fn move_keeps_length_and_reports_tail() {
        let mut snake = Snake::new(1, 4, 1, 4);
        let vacated = snake.move_to(Direction::Down);

        assert_eq!(snake.size(), 4);
        assert_eq!(snake.head().position(), Position::new(4, 2));
        assert_eq!(vacated.position(), Position::new(1, 1));
        assert!(vacated.is_free());
        assert_eq!(snake.tail().position(), Position::new(2, 1));
        assert_well_formed(&snake);
    }

    #[test]
    fn single_segment_snake_moves() {
        let mut snake = Snake::new(1, 2, 2, 1);
        let vacated = snake.move_to(Direction::Up);
        assert_eq!(snake.positions(), vec![Position::new(2, 1)]);
        assert_eq!(vacated.position(), Position::new(2, 2));
        assert_well_formed(&snake);
    }

    #[test]
    fn eat_grows_by_one_and_takes_food_cell() {
        let mut snake = Snake::new(1, 4, 1, 4);
        snake.eat(Food::new(5, 1).cell());

        assert_eq!(snake.size(), 5);
        assert_eq!(snake.head().position(), Position::new(5, 1));
        assert_eq!(snake.head().occupant(), Occupant::BodySegment);
        assert_eq!(snake.tail().position(), Position::new(1, 1));
        assert_well_formed(&snake);
    }

    #[test]
    fn reproduce_splits_evenly() {
        let mut parent = Snake::new(1, 9, 3, DIVIDING_SIZE);
        let child = parent.reproduce(2);

        assert_eq!(parent.size(), 4);
        assert_eq!(child.size(), 4);
        assert_eq!(parent.head().position(), Position::new(9, 3));
        assert_eq!(child.head().position(), Position::new(2, 3));
        assert_eq!(
            child.positions(),
            vec![
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(4, 3),
                Position::new(5, 3),
            ]
        );
        assert_well_formed(&parent);
        assert_well_formed(&child);
    }

    #[test]
    fn odd_split_leaves_remainder_with_parent() {
        let mut parent = Snake::new(1, 10, 0, 9);
        let child = parent.reproduce(2);

        assert_eq!(parent.size(), 5);
        assert_eq!(child.size(), 4);
        assert_eq!(parent.size() + child.size(), 9);
        assert_eq!(child.head().position(), Position::new(2, 0));
    }

    #[test]
    #[should_panic(expected = "cannot reproduce")]
    fn reproduce_below_threshold_panics() {
        let mut snake = Snake::new(1, 5, 0, DIVIDING_SIZE - 1);
        let _ = snake.reproduce(2);
    }

    #[test]
    fn adjacent_food_is_eaten() {
        let mut grid = Grid::new(25, 25);
        let snake = Snake::new(1, 4, 1, 4);
        sync(&mut grid, &snake);
        let food = Food::new(5, 1);
        grid.place(food.cell());

        let sensing = LocalSensing::observe(&grid, snake.head(), Some(food));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            snake.choose_action(&sensing, &mut rng),
            Action::Eat(Direction::Right)
        );
    }

    #[test]
    fn full_size_snake_always_reproduces() {
        let grid = Grid::new(3, 3);
        let snake = Snake::new(1, 1, 1, DIVIDING_SIZE);
        let sensing = LocalSensing::observe(&grid, snake.head(), Some(Food::new(2, 1)));
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(snake.choose_action(&sensing, &mut rng), Action::Reproduce);
    }

    #[test]
    fn greedy_move_heads_toward_food() {
        let mut grid = Grid::new(25, 25);
        let snake = Snake::new(1, 4, 1, 4);
        sync(&mut grid, &snake);
        let food = Food::new(10, 1);
        grid.place(food.cell());

        let sensing = LocalSensing::observe(&grid, snake.head(), Some(food));
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..16 {
            assert_eq!(
                snake.choose_action(&sensing, &mut rng),
                Action::Move(Direction::Right)
            );
        }
    }

    #[test]
    fn falls_back_to_any_free_direction() {
        let mut grid = Grid::new(10, 10);
        let snake = Snake::new(1, 4, 4, 2);
        sync(&mut grid, &snake);
        // food is to the left, but the body blocks that way
        let food = Food::new(0, 4);
        grid.place(food.cell());

        let sensing = LocalSensing::observe(&grid, snake.head(), Some(food));
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..16 {
            match snake.choose_action(&sensing, &mut rng) {
                Action::Move(dir) => assert!(dir != Direction::Left),
                other => panic!("unexpected action {:?}", other),
            }
        }
    }

    #[test]
    fn boxed_in_snake_stays() {
        let mut grid = Grid::new(1, 2);
        let snake = Snake::from_segments(
            1,
            [
                Cell::new(Occupant::BodySegment, true, Position::new(0, 0)),
                Cell::new(Occupant::BodySegment, false, Position::new(0, 1)),
            ],
        );
        sync(&mut grid, &snake);

        let sensing = LocalSensing::observe(&grid, snake.head(), None);
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(snake.choose_action(&sensing, &mut rng), Action::Stay);
    }

    #[test]
    fn left_edge_never_moves_left() {
        let mut grid = Grid::new(6, 6);
        let snake = Snake::from_segments(
            1,
            [
                Cell::new(Occupant::BodySegment, true, Position::new(0, 3)),
                Cell::new(Occupant::BodySegment, false, Position::new(1, 3)),
            ],
        );
        sync(&mut grid, &snake);

        let sensing = LocalSensing::observe(&grid, snake.head(), Some(Food::new(0, 0)));
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..64 {
            assert_ne!(
                snake.choose_action(&sensing, &mut rng),
                Action::Move(Direction::Left)
            );
        }
    }
}
