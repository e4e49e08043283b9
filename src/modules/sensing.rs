use rand::Rng;
use rand::seq::SliceRandom;

use crate::modules::cell::Cell;
use crate::modules::direction::Direction;
use crate::modules::food::Food;
use crate::modules::grid::Grid;

/// Order in which adjacent food is claimed when several neighbours hold it.
pub const FOOD_PRIORITY: [Direction; 4] = [
    Direction::Down,
    Direction::Up,
    Direction::Right,
    Direction::Left,
];

/// What a snake can see right before it decides: its four neighbours, which
/// of them it can enter, and where the current food is. Built fresh for every
/// decision and dropped afterwards.
#[derive(Clone, Debug)]
pub struct LocalSensing {
    neighbors: [Cell; 4],
    free: Vec<Direction>,
    head: Cell,
    food: Option<Food>,
}

impl LocalSensing {
    pub fn observe(grid: &Grid, head: Cell, food: Option<Food>) -> Self {
        let pos = head.position();
        let neighbors = Direction::ALL.map(|dir| grid.cell_in_direction(pos.x, pos.y, dir));
        let free = Direction::ALL
            .into_iter()
            .filter(|dir| neighbors[dir.index()].is_free())
            .collect();

        Self {
            neighbors,
            free,
            head,
            food,
        }
    }

    pub fn neighbor(&self, direction: Direction) -> Cell {
        self.neighbors[direction.index()]
    }

    pub fn head(&self) -> Cell {
        self.head
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    /// In-bounds neighbours holding `Empty`, in sensing order.
    pub fn free_directions(&self) -> &[Direction] {
        &self.free
    }

    /// First neighbour holding food, checked down, up, right, left.
    pub fn food_direction(&self) -> Option<Direction> {
        FOOD_PRIORITY
            .into_iter()
            .find(|dir| self.neighbor(*dir).holds_food())
    }

    /// Free directions that close the distance to the food on either axis.
    /// Empty when there is no food.
    pub fn greedy_directions(&self) -> Vec<Direction> {
        let Some(food) = self.food else {
            return Vec::new();
        };
        let target = food.position();
        let head = self.head.position();

        let toward = |dir: &Direction| match dir {
            Direction::Right => target.x > head.x,
            Direction::Left => target.x < head.x,
            Direction::Down => target.y > head.y,
            Direction::Up => target.y < head.y,
        };

        self.free.iter().copied().filter(|d| toward(d)).collect()
    }
}

/// Uniform pick among `directions`; `None` when there is nothing to pick.
pub fn random_direction<R: Rng + ?Sized>(
    directions: &[Direction],
    rng: &mut R,
) -> Option<Direction> {
    directions.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::modules::cell::{Occupant, Position};

    fn head_at(x: i32, y: i32) -> Cell {
        Cell::new(Occupant::BodySegment, true, Position::new(x, y))
    }

    #[test]
    fn corner_excludes_outside_directions() {
        let grid = Grid::new(5, 5);
        let sensing = LocalSensing::observe(&grid, head_at(0, 0), None);

        assert_eq!(
            sensing.free_directions(),
            &[Direction::Down, Direction::Right]
        );
        assert!(!sensing.neighbor(Direction::Left).is_inside());
        assert!(!sensing.neighbor(Direction::Up).is_inside());
    }

    #[test]
    fn occupied_neighbours_are_not_free() {
        let mut grid = Grid::new(5, 5);
        grid.place(Cell::new(Occupant::BodySegment, false, Position::new(1, 2)));
        grid.place(Cell::new(Occupant::Food, false, Position::new(3, 2)));

        let sensing = LocalSensing::observe(&grid, head_at(2, 2), None);
        assert_eq!(sensing.free_directions(), &[Direction::Up, Direction::Down]);
    }

    #[test]
    fn food_priority_prefers_down_over_left() {
        let mut grid = Grid::new(5, 5);
        grid.place(Cell::new(Occupant::Food, false, Position::new(2, 3)));
        grid.place(Cell::new(Occupant::Food, false, Position::new(1, 2)));

        let sensing = LocalSensing::observe(&grid, head_at(2, 2), None);
        assert_eq!(sensing.food_direction(), Some(Direction::Down));
    }

    #[test]
    fn food_priority_full_order() {
        let mut grid = Grid::new(5, 5);
        for pos in [
            Position::new(2, 1),
            Position::new(3, 2),
            Position::new(1, 2),
        ] {
            grid.place(Cell::new(Occupant::Food, false, pos));
        }
        let sensing = LocalSensing::observe(&grid, head_at(2, 2), None);
        assert_eq!(sensing.food_direction(), Some(Direction::Up));

        let mut grid = Grid::new(5, 5);
        grid.place(Cell::new(Occupant::Food, false, Position::new(3, 2)));
        grid.place(Cell::new(Occupant::Food, false, Position::new(1, 2)));
        let sensing = LocalSensing::observe(&grid, head_at(2, 2), None);
        assert_eq!(sensing.food_direction(), Some(Direction::Right));
    }

    #[test]
    fn greedy_tracks_food_on_both_axes() {
        let grid = Grid::new(10, 10);
        let food = Food::new(8, 1);
        let sensing = LocalSensing::observe(&grid, head_at(4, 5), Some(food));

        assert_eq!(
            sensing.greedy_directions(),
            vec![Direction::Up, Direction::Right]
        );
    }

    #[test]
    fn greedy_drops_blocked_directions() {
        let mut grid = Grid::new(10, 10);
        grid.place(Cell::new(Occupant::BodySegment, false, Position::new(5, 5)));
        let sensing = LocalSensing::observe(&grid, head_at(4, 5), Some(Food::new(8, 5)));

        assert!(sensing.greedy_directions().is_empty());
        assert_eq!(sensing.free_directions().len(), 3);
    }

    #[test]
    fn greedy_is_empty_without_food() {
        let grid = Grid::new(3, 3);
        let sensing = LocalSensing::observe(&grid, head_at(1, 1), None);
        assert!(sensing.greedy_directions().is_empty());
    }

    #[test]
    fn random_direction_picks_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_direction(&[], &mut rng), None);

        let options = [Direction::Left, Direction::Down];
        for _ in 0..32 {
            let picked = random_direction(&options, &mut rng).unwrap();
            assert!(options.contains(&picked));
        }
    }
}
