//! Tile identifiers, passage flags and tilesets.

use std::collections::HashMap;

use bitflags::bitflags;
use strum_macros::{AsRefStr, EnumCount, EnumIter};

/// A tile identifier, as stored in map data.
///
/// Identifiers are split into ranges: plain sheets B, C, D and E occupy `0..1024`, the A5 sheet
/// `1536..2048` and the auto-tile sheets A1 to A4 `2048..8192`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TileId(pub u16);

impl TileId {
    pub const B: u16 = 0;
    pub const C: u16 = 256;
    pub const D: u16 = 512;
    pub const E: u16 = 768;
    pub const A5: u16 = 1536;
    pub const A1: u16 = 2048;
    pub const A2: u16 = 2816;
    pub const A3: u16 = 4352;
    pub const A4: u16 = 5888;
    pub const MAX: u16 = 8192;

    /// Number of shapes each auto-tile kind provides.
    pub const SHAPES_PER_KIND: u16 = 48;

    pub const fn is_auto(self) -> bool {
        self.0 >= Self::A1 && self.0 < Self::MAX
    }

    pub const fn is_a5(self) -> bool {
        self.0 >= Self::A5 && self.0 < Self::A1
    }

    /// Classifies this identifier.
    pub fn kind(self) -> TileKind {
        TileKind::of(self)
    }
}

/// Auto-tile sheets, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumCount)]
pub enum AutoSet {
    A1,
    A2,
    A3,
    A4,
}

impl AutoSet {
    /// Index of the sheet in a tileset's sheet list.
    pub const fn sheet(self) -> usize {
        match self {
            AutoSet::A1 => 0,
            AutoSet::A2 => 1,
            AutoSet::A3 => 2,
            AutoSet::A4 => 3,
        }
    }
}

/// Classification of a tile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// A plain indexed tile, drawn from a single sheet cell.
    Normal { sheet: usize },
    /// An auto-tile, whose drawn cell depends on its neighbours.
    Auto { set: AutoSet, kind: u16, shape: u16 },
}

impl TileKind {
    pub fn of(id: TileId) -> TileKind {
        if id.is_auto() {
            let offset = id.0 - TileId::A1;
            let set = match id.0 {
                n if n < TileId::A2 => AutoSet::A1,
                n if n < TileId::A3 => AutoSet::A2,
                n if n < TileId::A4 => AutoSet::A3,
                _ => AutoSet::A4,
            };
            TileKind::Auto {
                set,
                kind: offset / TileId::SHAPES_PER_KIND,
                shape: offset % TileId::SHAPES_PER_KIND,
            }
        } else if id.is_a5() {
            TileKind::Normal { sheet: 4 }
        } else {
            TileKind::Normal {
                sheet: 5 + (id.0 / 256) as usize,
            }
        }
    }
}

bitflags! {
    /// Directions a tile blocks. A tile blocking all four is not traversable at all.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Passage: u8 {
        const DOWN = 1 << 0;
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
        const UP = 1 << 3;
    }
}

impl Passage {
    pub fn traversable(self) -> bool {
        !self.contains(Passage::all())
    }
}

/// Passage metadata for a set of tiles. Unknown tiles are open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tileset {
    pub id: u32,
    flags: HashMap<TileId, Passage>,
}

impl Tileset {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            flags: HashMap::new(),
        }
    }

    /// Sets the passage flags of a tile, returning the tileset for chaining.
    pub fn with_flags(mut self, tile: TileId, flags: Passage) -> Self {
        self.set_flags(tile, flags);
        self
    }

    pub fn set_flags(&mut self, tile: TileId, flags: Passage) {
        if flags.is_empty() {
            self.flags.remove(&tile);
        } else {
            self.flags.insert(tile, flags);
        }
    }

    pub fn flags(&self, tile: TileId) -> Passage {
        self.flags.get(&tile).copied().unwrap_or_default()
    }
}
