use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use snakesim::{
    ActionStatsStore, DEFAULT_CONFIG_FILE, Engine, Event, SimConfig, TickResult,
    default_snapshot_path, default_stats_path, render_ascii, save_action_stats,
    save_world_snapshot,
};
use tracing::{info, warn};

mod config;

use config::{ConfigCommand, run_config};

#[derive(Parser)]
#[command(
    name = "snakesim",
    version,
    about = "Self-playing multi-snake grid simulation",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the simulation
    Run {
        /// Config file (defaults are used when it does not exist)
        #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Grid width in cells
        #[arg(long)]
        width: Option<i32>,
        /// Grid height in cells
        #[arg(long)]
        height: Option<i32>,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Number of ticks to run (omit to run until interrupted)
        #[arg(short = 't', long)]
        ticks: Option<u64>,
        /// Ticks per second; 0 runs as fast as possible
        #[arg(long)]
        tick_rate: Option<f64>,
        /// Head x of the first snake
        #[arg(long)]
        snake_x: Option<i32>,
        /// Head y of the first snake
        #[arg(long)]
        snake_y: Option<i32>,
        /// Length of the first snake
        #[arg(long)]
        snake_size: Option<usize>,
        /// Print an ASCII frame after every tick
        #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
        render: bool,
        /// Suppress the per-tick status line
        #[arg(short = 'q', long, action = ArgAction::SetTrue, default_value_t = false)]
        quiet: bool,
        /// Write a JSON world snapshot after every tick
        /// (default path: .snakesim/world_snapshot.json)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        snapshot: Option<Option<PathBuf>>,
        /// Write per-snake action counters as JSON after every tick
        /// (default path: .snakesim/action_stats.json)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        stats: Option<Option<PathBuf>>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
struct Overrides {
    width: Option<i32>,
    height: Option<i32>,
    seed: Option<u64>,
    ticks: Option<u64>,
    tick_rate: Option<f64>,
    snake_x: Option<i32>,
    snake_y: Option<i32>,
    snake_size: Option<usize>,
}

impl Overrides {
    fn apply(self, config: &mut SimConfig) {
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if self.seed.is_some() {
            config.world.seed = self.seed;
        }
        if self.ticks.is_some() {
            config.run.ticks = self.ticks;
        }
        if let Some(rate) = self.tick_rate {
            config.run.tick_rate = rate;
        }
        if let Some(x) = self.snake_x {
            config.snake.x = x;
        }
        if let Some(y) = self.snake_y {
            config.snake.y = y;
        }
        if let Some(size) = self.snake_size {
            config.snake.size = size;
        }
    }
}

struct Output {
    render: bool,
    quiet: bool,
    snapshot: Option<PathBuf>,
    stats: Option<PathBuf>,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<(), String> {
    match command {
        Command::Run {
            config,
            width,
            height,
            seed,
            ticks,
            tick_rate,
            snake_x,
            snake_y,
            snake_size,
            render,
            quiet,
            snapshot,
            stats,
        } => run_simulation(
            &config,
            Overrides {
                width,
                height,
                seed,
                ticks,
                tick_rate,
                snake_x,
                snake_y,
                snake_size,
            },
            Output {
                render,
                quiet,
                snapshot: snapshot.map(|path| path.unwrap_or_else(default_snapshot_path)),
                stats: stats.map(|path| path.unwrap_or_else(default_stats_path)),
            },
        ),
        Command::Config { command } => run_config(command),
    }
}

fn run_simulation(config_path: &Path, overrides: Overrides, output: Output) -> Result<(), String> {
    let mut config = SimConfig::load(config_path).map_err(|e| e.to_string())?;
    overrides.apply(&mut config);
    config.validate().map_err(|e| e.to_string())?;

    let mut engine = Engine::new(config.world.width, config.world.height, config.world.seed)
        .map_err(|e| e.to_string())?;
    engine.spawn_snake(config.snake.x, config.snake.y, config.snake.size);
    engine.spawn_food();

    info!(
        width = config.world.width,
        height = config.world.height,
        seed = ?config.world.seed,
        ticks = ?config.run.ticks,
        tick_rate = config.run.tick_rate,
        "simulation started"
    );

    if output.render {
        print!("{}", render_ascii(&engine));
        println!();
    }

    let delay = config.run.tick_delay().map_err(|e| e.to_string())?;

    let mut stats = ActionStatsStore::default();
    run_loop(&mut engine, &mut stats, config.run.ticks, delay, &output);

    print_summary(&engine, &stats);
    info!(ticks = engine.tick_count(), snakes = engine.snakes().len(), "simulation finished");
    Ok(())
}

fn run_loop(
    engine: &mut Engine,
    stats: &mut ActionStatsStore,
    ticks: Option<u64>,
    delay: Duration,
    output: &Output,
) {
    let mut remaining = ticks;
    loop {
        if remaining == Some(0) {
            break;
        }

        let tick = engine.tick();
        stats.record_tick(&tick);

        if !output.quiet {
            print_tick(&tick, engine);
        }
        if output.render {
            print!("{}", render_ascii(engine));
            println!();
        }
        persist_outputs(engine, stats, output);

        if let Some(ref mut n) = remaining {
            *n = n.saturating_sub(1);
            if *n == 0 {
                break;
            }
        }

        if delay > Duration::ZERO {
            std::thread::sleep(delay);
        }
    }
}

fn print_tick(tick: &TickResult, engine: &Engine) {
    let food = match engine.food() {
        Some(food) => food.position().to_string(),
        None => "none".into(),
    };
    println!(
        "Tick {}: {} snake(s), {} body cell(s), food {}",
        tick.tick,
        engine.snakes().len(),
        engine.total_body_cells(),
        food
    );

    for event in &tick.events {
        match event {
            Event::SnakeReproduced {
                parent_id,
                child_id,
                parent_size,
                child_size,
            } => println!(
                "  snake {} split: kept {}, child {} got {}",
                parent_id, parent_size, child_id, child_size
            ),
            Event::FoodUnavailable => println!("  grid is full, no food placed"),
            _ => {}
        }
    }
    for rejection in &tick.rejections {
        println!(
            "  rejected {} for snake {}: {}",
            rejection.action.label(),
            rejection.snake_id,
            rejection.error
        );
    }
}

// Export failures are logged and the run goes on.
fn persist_outputs(engine: &Engine, stats: &ActionStatsStore, output: &Output) {
    if let Some(path) = &output.snapshot {
        if let Err(err) = save_world_snapshot(path, &engine.snapshot()) {
            warn!(path = %path.display(), %err, "failed to write world snapshot");
        }
    }
    if let Some(path) = &output.stats {
        if let Err(err) = save_action_stats(path, stats) {
            warn!(path = %path.display(), %err, "failed to write action stats");
        }
    }
}

fn print_summary(engine: &Engine, stats: &ActionStatsStore) {
    println!(
        "Finished after {} tick(s): {} snake(s), {} body cell(s)",
        engine.tick_count(),
        engine.snakes().len(),
        engine.total_body_cells()
    );
    for snake in engine.snakes() {
        let counts = stats.per_snake.get(&snake.id()).cloned().unwrap_or_default();
        println!(
            "  snake {:>3}: size {:>2} head {} | moves {} eats {} splits {} stays {}",
            snake.id(),
            snake.size(),
            snake.head().position(),
            counts.move_count,
            counts.eat_count,
            counts.reproduce_count,
            counts.stay_count
        );
    }
}
