//! Parsing of ASCII maze layouts into authored maps.

use glam::IVec2;

use crate::constants::{GEN_FLOOR, GEN_TILESET_ID, GEN_WALL};
use crate::error::ParseError;
use crate::map::grid::AuthoredMap;
use crate::map::tile::{Passage, TileId, Tileset};

/// A single cell of an ASCII layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutCell {
    Wall,
    Floor,
    /// Floor where the viewpoint starts.
    Spawn,
    /// Floor holding a goal marker.
    Goal,
}

/// Tiles used when turning a layout into map data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutLegend {
    pub floor: TileId,
    pub wall: TileId,
    pub tileset_id: u32,
}

impl Default for LayoutLegend {
    fn default() -> Self {
        Self {
            floor: GEN_FLOOR,
            wall: GEN_WALL,
            tileset_id: GEN_TILESET_ID,
        }
    }
}

impl LayoutLegend {
    /// A tileset in which the wall tile blocks every direction.
    pub fn tileset(&self) -> Tileset {
        Tileset::new(self.tileset_id).with_flags(self.wall, Passage::all())
    }
}

/// A parsed layout with its special positions extracted.
#[derive(Debug)]
pub struct ParsedLayout {
    pub map: AuthoredMap,
    pub tileset: Tileset,
    /// The last `S` cell, if any.
    pub spawn: Option<IVec2>,
    /// Every `G` cell, in row-major order.
    pub goals: Vec<IVec2>,
}

/// Parser for ASCII maze layouts.
pub struct LayoutParser;

impl LayoutParser {
    /// Converts a layout character into a cell.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnknownCharacter` for anything outside `#`, `.`, `S` and `G`.
    pub fn parse_character(c: char) -> Result<LayoutCell, ParseError> {
        match c {
            '#' => Ok(LayoutCell::Wall),
            '.' => Ok(LayoutCell::Floor),
            'S' => Ok(LayoutCell::Spawn),
            'G' => Ok(LayoutCell::Goal),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses rows of equal width into map data.
    ///
    /// # Errors
    ///
    /// Fails on empty layouts, rows of differing width and unknown characters.
    pub fn parse(rows: &[&str], legend: &LayoutLegend) -> Result<ParsedLayout, ParseError> {
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ParseError::EmptyLayout);
        }

        let mut data = Vec::with_capacity(width * rows.len());
        let mut spawn = None;
        let mut goals = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, c) in row.chars().enumerate() {
                let cell = Self::parse_character(c)?;
                let position = IVec2::new(x as i32, y as i32);
                match cell {
                    LayoutCell::Spawn => spawn = Some(position),
                    LayoutCell::Goal => goals.push(position),
                    _ => {}
                }
                data.push(if cell == LayoutCell::Wall { legend.wall } else { legend.floor });
            }
        }

        let map = AuthoredMap::new(width as u32, rows.len() as u32, legend.tileset_id, data)
            .map_err(|_| ParseError::EmptyLayout)?;

        Ok(ParsedLayout {
            map,
            tileset: legend.tileset(),
            spawn,
            goals,
        })
    }
}
