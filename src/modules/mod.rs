pub mod cell;
pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod food;
pub mod grid;
pub mod sensing;
pub mod snake;
pub mod stats;
pub mod view;
