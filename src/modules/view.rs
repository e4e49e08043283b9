use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::cell::{Cell, Occupant, Position};
use crate::modules::engine::Engine;
use crate::modules::error::Result;
use crate::modules::food::Food;
use crate::modules::snake::{Snake, SnakeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    SnakeHead,
    SnakeBody,
    Food,
}

impl VisualKind {
    pub const fn glyph(self) -> char {
        match self {
            VisualKind::SnakeHead => 'H',
            VisualKind::SnakeBody => 'o',
            VisualKind::Food => '*',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visual {
    pub position: Position,
    pub kind: VisualKind,
}

/// Read-only "what do I look like" capability consumed by renderers.
pub trait Drawable {
    fn visuals(&self) -> Vec<Visual>;
}

impl Drawable for Cell {
    // Body cells are drawn by their snake; a bare cell only shows food.
    fn visuals(&self) -> Vec<Visual> {
        if self.holds_food() {
            vec![Visual {
                position: self.position(),
                kind: VisualKind::Food,
            }]
        } else {
            Vec::new()
        }
    }
}

impl Drawable for Food {
    fn visuals(&self) -> Vec<Visual> {
        self.cell().visuals()
    }
}

impl Drawable for Snake {
    fn visuals(&self) -> Vec<Visual> {
        self.segments()
            .map(|seg| Visual {
                position: seg.position(),
                kind: if seg.is_head() {
                    VisualKind::SnakeHead
                } else {
                    VisualKind::SnakeBody
                },
            })
            .collect()
    }
}

impl Engine {
    /// Everything a renderer needs to draw the current frame.
    pub fn visuals(&self) -> Vec<Visual> {
        let mut out: Vec<Visual> = self.snakes().iter().flat_map(Drawable::visuals).collect();
        if let Some(food) = self.food() {
            out.extend(food.visuals());
        }
        out
    }
}

/// Plain-text frame: `H` head, `o` body, `*` food, `.` empty.
pub fn render_ascii(engine: &Engine) -> String {
    let (width, height) = (engine.width() as usize, engine.height() as usize);
    let mut rows = vec![vec!['.'; width]; height];

    for cell in engine.grid().cells() {
        let pos = cell.position();
        let glyph = match cell.occupant() {
            Occupant::Empty => continue,
            Occupant::Food => VisualKind::Food.glyph(),
            Occupant::BodySegment if cell.is_head() => VisualKind::SnakeHead.glyph(),
            Occupant::BodySegment => VisualKind::SnakeBody.glyph(),
        };
        rows[pos.y as usize][pos.x as usize] = glyph;
    }

    let mut out = String::with_capacity((width + 1) * height);
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    pub id: SnakeId,
    pub size: usize,
    pub head: Position,
    pub body: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub width: i32,
    pub height: i32,
    pub generated_at: DateTime<Utc>,
    pub snakes: Vec<SnakeSnapshot>,
    pub food: Option<Position>,
}

impl Engine {
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut snakes: Vec<SnakeSnapshot> = self
            .snakes()
            .iter()
            .map(|s| SnakeSnapshot {
                id: s.id(),
                size: s.size(),
                head: s.head().position(),
                body: s.positions(),
            })
            .collect();
        snakes.sort_by_key(|s| s.id);

        WorldSnapshot {
            tick: self.tick_count(),
            width: self.width(),
            height: self.height(),
            generated_at: Utc::now(),
            snakes,
            food: self.food().map(|f| f.position()),
        }
    }
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from(".snakesim")
}

pub fn default_snapshot_path() -> PathBuf {
    default_output_dir().join("world_snapshot.json")
}

/// Writes the snapshot as pretty JSON for external viewers.
pub fn save_world_snapshot(path: &Path, snapshot: &WorldSnapshot) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(path.to_path_buf())
}
