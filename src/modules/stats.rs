use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::modules::engine::{Event, TickResult};
use crate::modules::error::Result;
use crate::modules::snake::SnakeId;
use crate::modules::view::default_output_dir;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStats {
    pub move_count: u64,
    pub eat_count: u64,
    pub reproduce_count: u64,
    pub stay_count: u64,
}

impl ActionStats {
    pub fn total(&self) -> u64 {
        self.move_count
            .saturating_add(self.eat_count)
            .saturating_add(self.reproduce_count)
            .saturating_add(self.stay_count)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionStatsStore {
    pub per_snake: BTreeMap<SnakeId, ActionStats>,
    pub ticks: u64,
    pub food_spawned: u64,
}

impl ActionStatsStore {
    /// Folds one tick's applied actions into the counters.
    pub fn record_tick(&mut self, tick: &TickResult) {
        self.ticks = self.ticks.saturating_add(1);
        for event in &tick.events {
            match event {
                Event::SnakeMoved { snake_id, .. } => bump(&mut self.entry(*snake_id).move_count),
                Event::SnakeAte { snake_id, .. } => bump(&mut self.entry(*snake_id).eat_count),
                Event::SnakeReproduced { parent_id, .. } => {
                    bump(&mut self.entry(*parent_id).reproduce_count)
                }
                Event::SnakeStayed { snake_id } => bump(&mut self.entry(*snake_id).stay_count),
                Event::FoodSpawned { .. } => bump(&mut self.food_spawned),
                _ => {}
            }
        }
    }

    fn entry(&mut self, snake_id: SnakeId) -> &mut ActionStats {
        self.per_snake.entry(snake_id).or_default()
    }
}

fn bump(counter: &mut u64) {
    *counter = counter.saturating_add(1);
}

pub fn default_stats_path() -> PathBuf {
    default_output_dir().join("action_stats.json")
}

pub fn save_action_stats(path: &Path, store: &ActionStatsStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_vec_pretty(store)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::cell::Position;
    use crate::modules::direction::Direction;

    #[test]
    fn counts_actions_per_snake() {
        let tick = TickResult {
            tick: 1,
            events: vec![
                Event::TickStarted { tick: 1 },
                Event::SnakeReproduced {
                    parent_id: 1,
                    child_id: 2,
                    parent_size: 4,
                    child_size: 4,
                },
                Event::SnakeMoved {
                    snake_id: 2,
                    direction: Direction::Up,
                    from: Position::new(1, 1),
                    to: Position::new(1, 0),
                },
                Event::SnakeAte {
                    snake_id: 2,
                    at: Position::new(1, 0),
                    size: 5,
                },
                Event::FoodSpawned {
                    position: Position::new(3, 3),
                },
                Event::TickCompleted { tick: 1 },
            ],
            rejections: Vec::new(),
        };

        let mut store = ActionStatsStore::default();
        store.record_tick(&tick);

        assert_eq!(store.ticks, 1);
        assert_eq!(store.food_spawned, 1);
        assert_eq!(store.per_snake[&1].reproduce_count, 1);
        assert_eq!(store.per_snake[&2].move_count, 1);
        assert_eq!(store.per_snake[&2].eat_count, 1);
        assert_eq!(store.per_snake[&2].total(), 2);
    }

    #[test]
    fn counters_saturate() {
        let mut store = ActionStatsStore::default();
        store.per_snake.insert(
            7,
            ActionStats {
                stay_count: u64::MAX,
                ..ActionStats::default()
            },
        );
        let tick = TickResult {
            tick: 1,
            events: vec![Event::SnakeStayed { snake_id: 7 }],
            rejections: Vec::new(),
        };

        store.record_tick(&tick);

        assert_eq!(store.per_snake[&7].stay_count, u64::MAX);
        assert_eq!(store.per_snake[&7].total(), u64::MAX);
    }
}
