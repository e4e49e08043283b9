use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::modules::cell::{Cell, Position};
use crate::modules::direction::Direction;
use crate::modules::error::{Result, SimError};
use crate::modules::food::Food;
use crate::modules::grid::Grid;
use crate::modules::sensing::LocalSensing;
use crate::modules::snake::{Action, Snake, SnakeId};

/// Random draws tried before falling back to a full scan for an empty cell.
pub const FOOD_SPAWN_ATTEMPTS: usize = 1_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    TickStarted {
        tick: u64,
    },
    TickCompleted {
        tick: u64,
    },
    SnakeSpawned {
        snake_id: SnakeId,
        size: usize,
        head: Position,
    },
    SnakeMoved {
        snake_id: SnakeId,
        direction: Direction,
        from: Position,
        to: Position,
    },
    SnakeAte {
        snake_id: SnakeId,
        at: Position,
        size: usize,
    },
    SnakeReproduced {
        parent_id: SnakeId,
        child_id: SnakeId,
        parent_size: usize,
        child_size: usize,
    },
    SnakeStayed {
        snake_id: SnakeId,
    },
    FoodSpawned {
        position: Position,
    },
    FoodConsumed {
        snake_id: SnakeId,
        position: Position,
    },
    FoodUnavailable,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("snake {snake_id} cannot eat at {target}: no food there")]
    FoodGone { snake_id: SnakeId, target: Position },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRejection {
    pub snake_id: SnakeId,
    pub action: Action,
    pub error: ActionError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    pub tick: u64,
    pub events: Vec<Event>,
    pub rejections: Vec<ActionRejection>,
}

/// Owns the grid, the live snakes and the food, and advances them one tick
/// at a time. Snakes never die; the live list only grows.
#[derive(Debug)]
pub struct Engine {
    tick: u64,
    next_snake_id: SnakeId,
    grid: Grid,
    snakes: Vec<Snake>,
    food: Option<Food>,
    rng: StdRng,
    // events since the start of the last tick; cleared on every tick
    events: Vec<Event>,
}

impl Engine {
    /// A fresh, all-empty world. `seed` makes runs reproducible.
    pub fn new(width: i32, height: i32, seed: Option<u64>) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(SimError::invalid_config(format!(
                "grid must be at least 1x1 (got {}x{})",
                width, height
            )));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            tick: 0,
            next_snake_id: 1,
            grid: Grid::new(width, height),
            snakes: Vec::new(),
            food: None,
            rng,
            events: Vec::new(),
        })
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id() == id)
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    /// Events recorded by the latest tick, plus any setup calls made since.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn total_body_cells(&self) -> usize {
        self.snakes.iter().map(Snake::size).sum()
    }

    pub fn is_inside_grid(&self, x: i32, y: i32) -> bool {
        self.grid.is_inside(x, y)
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.grid.cell_at(x, y)
    }

    pub fn cell_in_direction(&self, x: i32, y: i32, direction: Direction) -> Cell {
        self.grid.cell_in_direction(x, y, direction)
    }

    fn allocate_snake_id(&mut self) -> SnakeId {
        let id = self.next_snake_id;
        self.next_snake_id += 1;
        id
    }

    /// Builds the startup horizontal snake with a fresh id and registers it.
    pub fn spawn_snake(&mut self, x: i32, y: i32, size: usize) -> SnakeId {
        let id = self.allocate_snake_id();
        self.add_snake(Snake::new(id, x, y, size))
    }

    /// Registers a snake. Its segments are written only into cells that are
    /// currently empty; segments outside the grid are ignored.
    pub fn add_snake(&mut self, snake: Snake) -> SnakeId {
        let snake_id = snake.id();
        self.next_snake_id = self.next_snake_id.max(snake_id + 1);

        for cell in snake.segments() {
            let pos = cell.position();
            if self.grid.cell_at(pos.x, pos.y).is_free() {
                self.grid.place(*cell);
            }
        }

        info!(snake_id, size = snake.size(), head = %snake.head().position(), "snake added");
        self.events.push(Event::SnakeSpawned {
            snake_id,
            size: snake.size(),
            head: snake.head().position(),
        });
        self.snakes.push(snake);
        snake_id
    }

    /// Places `food` if its cell is inside the grid and empty, replacing any
    /// previous food. Otherwise the food is dropped and nothing changes.
    pub fn add_food(&mut self, food: Food) -> bool {
        let pos = food.position();
        if !self.grid.cell_at(pos.x, pos.y).is_free() {
            debug!(position = %pos, "food dropped: cell unavailable");
            return false;
        }

        if let Some(previous) = self.food.take() {
            let prev = previous.position();
            if self.grid.cell_at(prev.x, prev.y).holds_food() {
                self.grid.vacate(prev.x, prev.y);
            }
        }

        self.grid.place(food.cell());
        self.food = Some(food);
        self.events.push(Event::FoodSpawned { position: pos });
        true
    }

    /// Drops food on a random empty cell. Returns `None` when the grid is
    /// full; food that is already on the grid then stays where it is.
    pub fn spawn_food(&mut self) -> Option<Position> {
        match self.random_empty_position() {
            Some(pos) => {
                self.add_food(Food::at(pos));
                debug!(position = %pos, "food spawned");
                Some(pos)
            }
            None if self.food.is_some() => {
                debug!(tick = self.tick, "no empty cell; current food kept");
                None
            }
            None => {
                self.events.push(Event::FoodUnavailable);
                warn!(tick = self.tick, "grid is full; no food spawned");
                None
            }
        }
    }

    fn random_empty_position(&mut self) -> Option<Position> {
        let (width, height) = (self.grid.width(), self.grid.height());
        for _ in 0..FOOD_SPAWN_ATTEMPTS {
            let x = self.rng.gen_range(0..width);
            let y = self.rng.gen_range(0..height);
            if self.grid.cell_at(x, y).is_free() {
                return Some(Position::new(x, y));
            }
        }

        let empty = self.grid.empty_positions();
        warn!(
            attempts = FOOD_SPAWN_ATTEMPTS,
            candidates = empty.len(),
            "random food placement exhausted; scanning grid"
        );
        empty.choose(&mut self.rng).copied()
    }

    fn sense(&self, idx: usize) -> LocalSensing {
        LocalSensing::observe(&self.grid, self.snakes[idx].head(), self.food)
    }

    /// Rewrites every in-bounds cell of the snake's body into the grid.
    fn sync_snake(&mut self, idx: usize) {
        for cell in self.snakes[idx].segments() {
            self.grid.place(*cell);
        }
    }

    /// Runs one tick: every snake senses, decides and acts in list order,
    /// each seeing the grid as left by the ones before it. Snakes born during
    /// the pass are appended and act in the same tick.
    pub fn tick(&mut self) -> TickResult {
        let tick = self.tick + 1;
        self.events.clear();
        self.events.push(Event::TickStarted { tick });
        let mut rejections = Vec::new();

        let mut idx = 0;
        while idx < self.snakes.len() {
            let sensing = self.sense(idx);
            trace!(
                snake_id = self.snakes[idx].id(),
                free = ?sensing.free_directions(),
                "sensed"
            );
            let action = self.snakes[idx].choose_action(&sensing, &mut self.rng);

            if let Err(error) = self.apply_action(idx, action) {
                debug!(%error, "action rejected");
                rejections.push(ActionRejection {
                    snake_id: self.snakes[idx].id(),
                    action,
                    error,
                });
            }
            self.sync_snake(idx);
            idx += 1;
        }

        self.events.push(Event::TickCompleted { tick });
        self.tick = tick;

        TickResult {
            tick,
            events: self.events.clone(),
            rejections,
        }
    }

    fn apply_action(&mut self, idx: usize, action: Action) -> std::result::Result<(), ActionError> {
        let snake_id = self.snakes[idx].id();
        debug!(snake_id, action = action.label(), direction = ?action.direction(), "applying");

        match action {
            Action::Stay => {
                self.snakes[idx].stay();
                self.events.push(Event::SnakeStayed { snake_id });
            }
            Action::Reproduce => {
                let child_id = self.allocate_snake_id();
                let child = self.snakes[idx].reproduce(child_id);
                let child_head = child.head().position();
                let child_size = child.size();

                self.events.push(Event::SnakeReproduced {
                    parent_id: snake_id,
                    child_id,
                    parent_size: self.snakes[idx].size(),
                    child_size,
                });
                self.events.push(Event::SnakeSpawned {
                    snake_id: child_id,
                    size: child_size,
                    head: child_head,
                });
                info!(parent = snake_id, child = child_id, head = %child_head, "snake split");

                self.snakes.push(child);
                self.sync_snake(self.snakes.len() - 1);
            }
            Action::Move(direction) => {
                let from = self.snakes[idx].head().position();
                let vacated = self.snakes[idx].move_to(direction).position();
                self.grid.vacate(vacated.x, vacated.y);
                self.events.push(Event::SnakeMoved {
                    snake_id,
                    direction,
                    from,
                    to: self.snakes[idx].head().position(),
                });
            }
            Action::Eat(direction) => {
                let head = self.snakes[idx].head().position();
                let target = self.grid.cell_in_direction(head.x, head.y, direction);
                // The food may have been taken since this snake sensed it.
                if !target.holds_food() {
                    return Err(ActionError::FoodGone {
                        snake_id,
                        target: target.position(),
                    });
                }

                self.snakes[idx].eat(target);
                self.food = None;
                self.events.push(Event::SnakeAte {
                    snake_id,
                    at: target.position(),
                    size: self.snakes[idx].size(),
                });
                self.events.push(Event::FoodConsumed {
                    snake_id,
                    position: target.position(),
                });

                // The new head must be on the grid before a free cell is picked.
                self.sync_snake(idx);
                self.spawn_food();
            }
        }

        Ok(())
    }
}
