pub mod modules;

pub use modules::cell::{Cell, Occupant, Position};
pub use modules::config::{DEFAULT_CONFIG_FILE, RunConfig, SimConfig, SnakeConfig, WorldConfig};
pub use modules::direction::Direction;
pub use modules::engine::{
    ActionError, ActionRejection, Engine, Event, FOOD_SPAWN_ATTEMPTS, TickResult,
};
pub use modules::error::{Result, SimError};
pub use modules::food::Food;
pub use modules::grid::Grid;
pub use modules::sensing::{FOOD_PRIORITY, LocalSensing, random_direction};
pub use modules::snake::{Action, DIVIDING_SIZE, Snake, SnakeId};
pub use modules::stats::{ActionStats, ActionStatsStore, default_stats_path, save_action_stats};
pub use modules::view::{
    Drawable, SnakeSnapshot, Visual, VisualKind, WorldSnapshot, default_output_dir,
    default_snapshot_path, render_ascii, save_world_snapshot,
};
