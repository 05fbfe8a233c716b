//! The immutable tile grid a maze session plays on, and the passability predicate shared by
//! movement and ray termination.

use std::collections::HashSet;

use bevy_ecs::resource::Resource;
use glam::{IVec2, UVec2};
use pathfinding::prelude::bfs_reach;
use tracing::debug;

use crate::error::{MapError, MazeResult};
use crate::map::direction::Direction;
use crate::map::tile::{Passage, TileId, TileKind, Tileset};
use crate::systems::actor::Actor;

/// Anything that can supply a rectangular grid of tile identifiers.
///
/// Both externally authored maps and generated mazes expose this same shape.
pub trait MapSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn tileset_id(&self) -> u32;
    /// Returns the tile at `(x, y)`, or `None` when the source has no data there.
    fn tile_id_at(&self, x: u32, y: u32) -> Option<TileId>;
}

/// A map authored outside the engine: static dimensions and row-major tile data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredMap {
    width: u32,
    height: u32,
    tileset_id: u32,
    data: Vec<TileId>,
}

impl AuthoredMap {
    /// Wraps row-major tile data.
    ///
    /// # Errors
    ///
    /// Returns `MapError::DataLength` when `data` does not hold exactly `width * height` tiles.
    pub fn new(width: u32, height: u32, tileset_id: u32, data: Vec<TileId>) -> Result<Self, MapError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(MapError::DataLength {
                expected,
                found: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            tileset_id,
            data,
        })
    }

    /// Builds map data by evaluating `tile_at` for every cell in row-major order.
    pub fn from_fn(width: u32, height: u32, tileset_id: u32, mut tile_at: impl FnMut(u32, u32) -> TileId) -> Self {
        let data = (0..height).flat_map(|y| (0..width).map(move |x| (x, y))).map(|(x, y)| tile_at(x, y)).collect();
        Self {
            width,
            height,
            tileset_id,
            data,
        }
    }
}

impl MapSource for AuthoredMap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn tileset_id(&self) -> u32 {
        self.tileset_id
    }

    fn tile_id_at(&self, x: u32, y: u32) -> Option<TileId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get((y * self.width + x) as usize).copied()
    }
}

/// A tile-level passability predicate.
pub trait Passability {
    /// Whether the tile at `tile` can be occupied. Out-of-bounds tiles are never passable.
    fn passable(&self, tile: IVec2) -> bool;
}

/// The grid map of a session. Immutable once built.
#[derive(Resource, Debug, Clone)]
pub struct GridMap {
    size: UVec2,
    tileset: Tileset,
    tiles: Vec<TileId>,
}

impl GridMap {
    /// Reads every tile of `source` into a new grid.
    ///
    /// # Errors
    ///
    /// Fails when the source has a zero dimension or is missing any tile.
    pub fn from_source(source: &impl MapSource, tileset: Tileset) -> MazeResult<GridMap> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(MapError::Empty { width, height }.into());
        }

        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let tile = source.tile_id_at(x, y).ok_or(MapError::MissingTile { x, y })?;
                tiles.push(tile);
            }
        }

        if tileset.id != source.tileset_id() {
            debug!(
                source = source.tileset_id(),
                tileset = tileset.id,
                "Tileset identity differs from the map source"
            );
        }

        debug!(width, height, tileset = tileset.id, "Grid map built");
        Ok(GridMap {
            size: UVec2::new(width, height),
            tileset,
            tiles,
        })
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn contains(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.size.x && (tile.y as u32) < self.size.y
    }

    /// Returns the tile at `tile`, or `None` out of bounds.
    pub fn tile_id(&self, tile: IVec2) -> Option<TileId> {
        if !self.contains(tile) {
            return None;
        }
        self.tiles.get((tile.y as u32 * self.size.x + tile.x as u32) as usize).copied()
    }

    /// Passage flags of the tile at `tile`; out-of-bounds tiles block everything.
    pub fn passage(&self, tile: IVec2) -> Passage {
        self.tile_id(tile).map_or(Passage::all(), |id| self.tileset.flags(id))
    }

    /// Every passable tile in row-major order.
    pub fn open_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.size.y as i32)
            .flat_map(move |y| (0..self.size.x as i32).map(move |x| IVec2::new(x, y)))
            .filter(|&tile| self.passable(tile))
    }

    /// All tiles reachable from `start` through orthogonally adjacent passable tiles.
    ///
    /// Empty when `start` itself is not passable.
    pub fn reachable_from(&self, start: IVec2) -> HashSet<IVec2> {
        if !self.passable(start) {
            return HashSet::new();
        }

        bfs_reach(start, |&tile| {
            Direction::DIRECTIONS
                .iter()
                .map(move |dir| tile + dir.as_ivec2())
                .filter(|&next| self.passable(next))
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// Bitmask of orthogonal neighbours sharing this tile's auto-tile kind (N=1, E=2, S=4, W=8).
    ///
    /// Out-of-bounds neighbours count as matching so border walls read as continuous.
    /// Always zero for plain tiles.
    pub fn neighbour_mask(&self, tile: IVec2) -> u8 {
        let Some(TileKind::Auto { set, kind, .. }) = self.tile_id(tile).map(TileKind::of) else {
            return 0;
        };

        [(Direction::Up, 1), (Direction::Right, 2), (Direction::Down, 4), (Direction::Left, 8)]
            .into_iter()
            .filter(|(dir, _)| match self.tile_id(tile + dir.as_ivec2()).map(TileKind::of) {
                None => true,
                Some(TileKind::Auto { set: s, kind: k, .. }) => s == set && k == kind,
                Some(TileKind::Normal { .. }) => false,
            })
            .fold(0, |mask, (_, bit)| mask | bit)
    }
}

impl MapSource for GridMap {
    fn width(&self) -> u32 {
        self.size.x
    }

    fn height(&self) -> u32 {
        self.size.y
    }

    fn tileset_id(&self) -> u32 {
        self.tileset.id
    }

    fn tile_id_at(&self, x: u32, y: u32) -> Option<TileId> {
        self.tile_id(IVec2::new(x as i32, y as i32))
    }
}

impl Passability for GridMap {
    fn passable(&self, tile: IVec2) -> bool {
        self.contains(tile) && self.passage(tile).traversable()
    }
}

/// The map's predicate with non-through actors layered on top. Used for movement only.
pub struct Occupancy<'a> {
    pub map: &'a GridMap,
    pub actors: &'a [Actor],
}

impl Passability for Occupancy<'_> {
    fn passable(&self, tile: IVec2) -> bool {
        self.map.passable(tile) && !self.actors.iter().any(|actor| !actor.through && actor.tile == tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> GridMap {
        let wall = TileId(1);
        let floor = TileId(0);
        let data = vec![floor, floor, wall, floor];
        let source = AuthoredMap::new(4, 1, 1, data).unwrap();
        GridMap::from_source(&source, Tileset::new(1).with_flags(wall, Passage::all())).unwrap()
    }

    #[test]
    fn test_authored_map_rejects_bad_length() {
        let result = AuthoredMap::new(2, 2, 1, vec![TileId(0); 3]);
        assert_eq!(result, Err(MapError::DataLength { expected: 4, found: 3 }));
    }

    #[test]
    fn test_out_of_bounds_is_impassable() {
        let map = corridor();
        assert!(!map.passable(IVec2::new(-1, 0)));
        assert!(!map.passable(IVec2::new(4, 0)));
        assert!(!map.passable(IVec2::new(0, 1)));
        assert_eq!(map.tile_id(IVec2::new(0, -1)), None);
    }

    #[test]
    fn test_reachability_stops_at_walls() {
        let map = corridor();
        let reachable = map.reachable_from(IVec2::ZERO);
        assert_eq!(reachable.len(), 2);
        assert!(!reachable.contains(&IVec2::new(3, 0)));
        assert!(map.reachable_from(IVec2::new(2, 0)).is_empty());
    }

    #[test]
    fn test_open_tiles_row_major() {
        let map = corridor();
        let open: Vec<_> = map.open_tiles().collect();
        assert_eq!(open, vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(3, 0)]);
    }
}
