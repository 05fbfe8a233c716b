//! This module defines the maze map and provides functions for building and querying it.

pub mod direction;
pub mod generator;
pub mod grid;
pub mod parser;
pub mod tile;
