//! Resolution of map tiles to regions of the tile sheets.
//!
//! Plain tiles map to a fixed sheet cell. Auto-tiles map to a block of cells whose layout depends
//! on the sheet, and the cell drawn within the block is picked from the tile's neighbours.

use glam::{IVec2, UVec2};
use tracing::debug;

use crate::map::grid::GridMap;
use crate::map::tile::{AutoSet, TileId, TileKind};

/// Cell offsets within an auto-tile's edge quadrant, indexed by neighbour mask (N=1, E=2, S=4, W=8).
///
/// The quadrant is the bottom 2x2 cells of the block. A tile with no matching neighbour uses the
/// block's preview cell instead.
const AUTOTILE_OFFSETS: [UVec2; 16] = [
    UVec2::new(0, 0), // isolated, replaced by the preview cell
    UVec2::new(0, 1), // N
    UVec2::new(0, 0), // E
    UVec2::new(0, 1), // N E
    UVec2::new(0, 0), // S
    UVec2::new(0, 1), // N S
    UVec2::new(0, 0), // E S
    UVec2::new(0, 1), // N E S
    UVec2::new(1, 0), // W
    UVec2::new(1, 1), // N W
    UVec2::new(0, 0), // E W
    UVec2::new(0, 1), // N E W
    UVec2::new(1, 0), // S W
    UVec2::new(1, 1), // N S W
    UVec2::new(0, 0), // E S W
    UVec2::new(0, 1), // N E S W
];

/// Where a tile's wall texture lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSource {
    /// Index of the sheet: A1 to A4 are 0 to 3, A5 is 4, B to E are 5 to 8.
    pub sheet: usize,
    /// Pixel origin of the cell within the sheet, at animation frame zero.
    pub origin: UVec2,
    /// Animated A1 kinds step down one cell per animation frame, cycling over three.
    pub animated: bool,
}

impl TileSource {
    /// Pixel origin of the cell drawn at `animation_frame`.
    pub fn origin_at(&self, animation_frame: u32, tile_size: UVec2) -> UVec2 {
        if self.animated {
            self.origin + UVec2::new(0, animation_frame % 3 * tile_size.y)
        } else {
            self.origin
        }
    }
}

/// Block origin (in cells) and block height (in cells) of an auto-tile kind.
fn autotile_block(set: AutoSet, kind: u16) -> (UVec2, u32) {
    let (tx, ty) = ((kind % 8) as u32, (kind / 8) as u32);
    match set {
        AutoSet::A1 => {
            let origin = match kind {
                0 => UVec2::new(0, 0),
                1 => UVec2::new(0, 3),
                2 => UVec2::new(6, 0),
                3 => UVec2::new(6, 3),
                _ => UVec2::new(tx / 4 * 8 + 6, ty * 6 + tx / 2 % 2 * 3),
            };
            (origin, 3)
        }
        AutoSet::A2 => (UVec2::new(tx * 2, ty.saturating_sub(2) * 3), 3),
        AutoSet::A3 => (UVec2::new(tx * 2, ty.saturating_sub(6) * 2), 2),
        AutoSet::A4 => {
            let row = ty.saturating_sub(10);
            // Floor blocks are 3 cells tall and wall blocks 2, alternating by row.
            let by = row / 2 * 5 + if row % 2 == 1 { 3 } else { 0 };
            let height = if row % 2 == 1 { 2 } else { 3 };
            (UVec2::new(tx * 2, by), height)
        }
    }
}

/// Resolves a single tile given the mask of its matching neighbours.
pub fn source_for(id: TileId, mask: u8, tile_size: UVec2) -> TileSource {
    match TileKind::of(id) {
        TileKind::Normal { sheet } => {
            let cell = UVec2::new(
                ((id.0 / 128) % 2 * 8 + id.0 % 8) as u32,
                ((id.0 % 256) / 8 % 16) as u32,
            );
            TileSource {
                sheet,
                origin: cell * tile_size,
                animated: false,
            }
        }
        TileKind::Auto { set, kind, .. } => {
            let (block, height) = autotile_block(set, kind);
            let mask = (mask & 0x0F) as usize;
            let cell = if mask == 0 {
                block
            } else {
                block + UVec2::new(0, height - 2) + AUTOTILE_OFFSETS[mask]
            };
            TileSource {
                sheet: set.sheet(),
                origin: cell * tile_size,
                animated: set == AutoSet::A1 && kind >= 4,
            }
        }
    }
}

/// Resolves every tile of `map` in row-major order.
pub fn resolve(map: &GridMap, tile_size: UVec2) -> Vec<TileSource> {
    let size = map.size();
    let sources: Vec<TileSource> = (0..size.y as i32)
        .flat_map(|y| (0..size.x as i32).map(move |x| IVec2::new(x, y)))
        .map(|tile| {
            let id = map.tile_id(tile).unwrap_or_default();
            source_for(id, map.neighbour_mask(tile), tile_size)
        })
        .collect();

    debug!(tiles = sources.len(), "Resolved wall texture sources");
    sources
}
