//! First-person raycasting for tile-map mazes.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatter;
pub mod game;
pub mod helpers;
pub mod map;
pub mod systems;
pub mod texture;
