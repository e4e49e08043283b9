use std::fmt;

use serde::{Deserialize, Serialize};

use crate::modules::direction::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupant {
    Empty,
    BodySegment,
    Food,
}

/// Atomic unit of world state.
///
/// Cells outside the playable area are represented by a sentinel (see
/// [`Cell::outside`]) so lookups never need an `Option`. The sentinel is never
/// free and never holds food, whatever its occupant tag says.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    occupant: Occupant,
    head: bool,
    position: Position,
    inside: bool,
}

impl Cell {
    pub const fn new(occupant: Occupant, head: bool, position: Position) -> Self {
        Self {
            occupant,
            head,
            position,
            inside: true,
        }
    }

    pub const fn empty(position: Position) -> Self {
        Self::new(Occupant::Empty, false, position)
    }

    pub const fn outside(position: Position) -> Self {
        Self {
            occupant: Occupant::Empty,
            head: false,
            position,
            inside: false,
        }
    }

    pub const fn occupant(&self) -> Occupant {
        self.occupant
    }

    pub fn set_occupant(&mut self, occupant: Occupant) {
        self.occupant = occupant;
    }

    pub const fn is_head(&self) -> bool {
        self.head
    }

    pub fn set_head(&mut self, head: bool) {
        self.head = head;
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub const fn is_inside(&self) -> bool {
        self.inside
    }

    /// In bounds and empty: the only cells a snake may step into.
    pub fn is_free(&self) -> bool {
        self.inside && self.occupant == Occupant::Empty
    }

    pub fn holds_food(&self) -> bool {
        self.inside && self.occupant == Occupant::Food
    }
}
