use crate::modules::cell::{Cell, Occupant, Position};

/// The bait snakes compete for. At most one is live at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    cell: Cell,
}

impl Food {
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            cell: Cell::new(Occupant::Food, false, Position::new(x, y)),
        }
    }

    pub const fn at(position: Position) -> Self {
        Self::new(position.x, position.y)
    }

    pub const fn cell(&self) -> Cell {
        self.cell
    }

    pub const fn position(&self) -> Position {
        self.cell.position()
    }
}
