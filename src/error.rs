//! Centralized error types for the maze engine.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

/// Main error type for the maze engine.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum MazeError {
    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors related to map ingestion and lookups.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Map has no cells ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Map data has {found} tiles, expected {expected}")]
    DataLength { expected: usize, found: usize },

    #[error("Map source has no tile at ({x}, {y})")]
    MissingTile { x: u32, y: u32 },
}

/// Errors produced while parsing textual input (layouts, note tags).
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Unknown character in layout: {0:?}")]
    UnknownCharacter(char),

    #[error("Layout row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("Layout is empty")]
    EmptyLayout,

    #[error("Invalid decoy strength: {0:?}")]
    InvalidStrength(String),
}

/// Errors related to pixel buffers and sprite sheets.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("Pixel buffer has {found} pixels, expected {expected}")]
    PixelCount { expected: usize, found: usize },

    #[error("Texture has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Failed to write frame: {0}")]
    WriteFailed(String),
}

/// Errors related to the session control surface.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("A maze session is already running")]
    AlreadyRunning,

    #[error("No maze session is running")]
    NotRunning,

    #[error("Spawn tile ({x}, {y}) is not passable")]
    BlockedSpawn { x: i32, y: i32 },

    #[error("{0} is disabled for this session")]
    Disabled(&'static str),

    #[error("Session must be paused to {0}")]
    NotPaused(&'static str),
}

/// Result type for maze operations.
pub type MazeResult<T> = Result<T, MazeError>;
