use crate::modules::cell::{Cell, Occupant, Position};
use crate::modules::direction::Direction;

/// Dense `width × height` map of cells, the single source of truth for what
/// occupies a coordinate. Stored column-major so index `[x][y]` maps to
/// `x * height + y`.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds an all-empty grid. Dimensions must be positive.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let mut cells = Vec::with_capacity((width as usize) * (height as usize));
        for x in 0..width {
            for y in 0..height {
                cells.push(Cell::empty(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_inside(x, y)
            .then(|| (x as usize) * (self.height as usize) + (y as usize))
    }

    /// The cell at `(x, y)`, or the outside sentinel.
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        match self.index(x, y) {
            Some(idx) => self.cells[idx],
            None => Cell::outside(Position::new(x, y)),
        }
    }

    pub fn cell_in_direction(&self, x: i32, y: i32, direction: Direction) -> Cell {
        let target = Position::new(x, y).step(direction);
        self.cell_at(target.x, target.y)
    }

    /// Writes `cell` at its own position. Out-of-bounds cells are ignored;
    /// returns whether the write happened.
    pub fn place(&mut self, cell: Cell) -> bool {
        let pos = cell.position();
        match self.index(pos.x, pos.y) {
            Some(idx) => {
                self.cells[idx] = Cell::new(cell.occupant(), cell.is_head(), pos);
                true
            }
            None => false,
        }
    }

    /// Resets `(x, y)` back to an empty, non-head cell.
    pub fn vacate(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::empty(Position::new(x, y));
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn count(&self, occupant: Occupant) -> usize {
        self.cells
            .iter()
            .filter(|c| c.occupant() == occupant)
            .count()
    }

    pub fn food_count(&self) -> usize {
        self.count(Occupant::Food)
    }

    /// Positions currently holding `Empty`, in `[x][y]` order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.occupant() == Occupant::Empty)
            .map(|c| c.position())
            .collect()
    }
}
