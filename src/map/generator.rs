//! Perfect maze generation with a randomized depth-first backtracker.
//!
//! Cells of an `N x N` grid are laid out on a doubled `(2N - 1) x (2N - 1)` tile grid: cell `(x, y)`
//! sits on tile `(2x, 2y)` and the gap between two neighbouring cells on the tile between them.
//! The outer ring of cells is never carved, which leaves a walled perimeter around the
//! `(N - 2) x (N - 2)` interior.

use glam::{IVec2, UVec2};
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::constants::{DEFAULT_GOAL_SHEET, MIN_MAZE_SIZE};
use crate::map::direction::Direction;
use crate::map::grid::AuthoredMap;
use crate::map::tile::{Passage, TileId, Tileset};
use crate::systems::actor::{ActorFeed, SpriteRef, TriggerAction};

/// Identifier given to the goal marker of a generated maze.
pub const GOAL_MARKER_ID: u32 = 1;

/// Neighbour visiting order of the backtracker.
const NEIGHBOUR_ORDER: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

/// A generated maze in its doubled representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMaze {
    size: u32,
    visited: Vec<bool>,
    open: Vec<bool>,
    edges: Vec<(UVec2, UVec2)>,
    goal: IVec2,
}

pub struct MazeGenerator;

impl MazeGenerator {
    /// Generates a perfect maze of `size x size` cells.
    ///
    /// Sizes below the minimum are clamped up with a warning. The goal is drawn uniformly from
    /// the open tiles other than the spawn tile.
    pub fn generate<R: Rng>(size: u32, rng: &mut R) -> GeneratedMaze {
        let size = if size < MIN_MAZE_SIZE {
            warn!(requested = size, minimum = MIN_MAZE_SIZE, "Maze size below minimum, clamping");
            MIN_MAZE_SIZE
        } else {
            size
        };

        let side = 2 * size - 1;
        let mut maze = GeneratedMaze {
            size,
            visited: vec![false; (size * size) as usize],
            open: vec![false; (side * side) as usize],
            edges: Vec::new(),
            goal: IVec2::ZERO,
        };

        let spawn = UVec2::splat(size / 2);
        let mut current = spawn;
        let mut stack: Vec<UVec2> = Vec::new();
        maze.mark_visited(current);

        loop {
            let candidates: SmallVec<[UVec2; 4]> = NEIGHBOUR_ORDER
                .iter()
                .map(|dir| current.as_ivec2() + dir.as_ivec2())
                .filter(|&cell| maze.is_interior(cell))
                .map(|cell| cell.as_uvec2())
                .filter(|&cell| !maze.is_visited(cell))
                .collect();

            if candidates.is_empty() {
                match stack.pop() {
                    Some(previous) => current = previous,
                    None => break,
                }
                continue;
            }

            let next = candidates[rng.random_range(0..candidates.len())];
            trace!(from = ?current, to = ?next, "Carving passage");
            stack.push(current);
            maze.carve(current, next);
            maze.mark_visited(next);
            current = next;
        }

        let spawn_tile = maze.spawn_tile();
        let candidates: Vec<IVec2> = maze.open_tiles().filter(|&tile| tile != spawn_tile).collect();
        maze.goal = match candidates.len() {
            0 => spawn_tile,
            n => candidates[rng.random_range(0..n)],
        };

        debug!(size, edges = maze.edges.len(), goal = ?maze.goal, "Maze generated");
        maze
    }
}

impl GeneratedMaze {
    /// Side length in cells, after clamping.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Side length of the doubled tile grid.
    pub fn side(&self) -> u32 {
        2 * self.size - 1
    }

    /// Whether the tile at `tile` in the doubled grid is floor. Out-of-bounds tiles are walls.
    pub fn is_open(&self, tile: IVec2) -> bool {
        self.tile_index(tile).is_some_and(|index| self.open[index])
    }

    /// Whether the backtracker reached `cell`.
    pub fn is_visited(&self, cell: UVec2) -> bool {
        cell.x < self.size && cell.y < self.size && self.visited[(cell.y * self.size + cell.x) as usize]
    }

    /// Carved cell pairs, in carving order.
    pub fn edges(&self) -> &[(UVec2, UVec2)] {
        &self.edges
    }

    pub fn open_edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of cells inside the walled perimeter.
    pub fn interior_cell_count(&self) -> usize {
        ((self.size - 2) * (self.size - 2)) as usize
    }

    /// The spawn cell, at the centre of the cell grid.
    pub fn spawn_cell(&self) -> UVec2 {
        UVec2::splat(self.size / 2)
    }

    /// The spawn cell in doubled tile coordinates.
    pub fn spawn_tile(&self) -> IVec2 {
        (self.spawn_cell() * 2).as_ivec2()
    }

    pub fn goal_tile(&self) -> IVec2 {
        self.goal
    }

    /// Open tiles of the doubled grid in row-major order.
    pub fn open_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        let side = self.side() as i32;
        (0..side)
            .flat_map(move |y| (0..side).map(move |x| IVec2::new(x, y)))
            .filter(|&tile| self.is_open(tile))
    }

    /// Materializes the maze as map data.
    pub fn to_map(&self, floor: TileId, wall: TileId, tileset_id: u32) -> AuthoredMap {
        AuthoredMap::from_fn(self.side(), self.side(), tileset_id, |x, y| {
            if self.is_open(IVec2::new(x as i32, y as i32)) {
                floor
            } else {
                wall
            }
        })
    }

    /// A tileset in which `wall` blocks every direction.
    pub fn tileset(&self, wall: TileId, tileset_id: u32) -> Tileset {
        Tileset::new(tileset_id).with_flags(wall, Passage::all())
    }

    /// The interactive goal marker placed on the goal tile.
    ///
    /// It takes the appearance of `caller` when one is supplied, and a default character otherwise.
    pub fn goal_marker(&self, caller: Option<&ActorFeed>) -> ActorFeed {
        let sprite = match caller {
            Some(caller) => caller.sprite.clone(),
            None => {
                warn!(sheet = DEFAULT_GOAL_SHEET, "No calling actor supplied, using default goal appearance");
                SpriteRef::new(DEFAULT_GOAL_SHEET, 0, 0)
            }
        };

        ActorFeed {
            id: GOAL_MARKER_ID,
            tile: self.goal,
            facing: Direction::Down,
            sprite,
            direction_fixed: true,
            through: false,
            note: "<goal>".to_string(),
            trigger: Some(TriggerAction::Succeed),
        }
    }

    fn is_interior(&self, cell: IVec2) -> bool {
        let limit = self.size as i32 - 1;
        cell.x > 0 && cell.x < limit && cell.y > 0 && cell.y < limit
    }

    fn mark_visited(&mut self, cell: UVec2) {
        let index = (cell.y * self.size + cell.x) as usize;
        self.visited[index] = true;
    }

    fn tile_index(&self, tile: IVec2) -> Option<usize> {
        let side = self.side() as i32;
        (tile.x >= 0 && tile.y >= 0 && tile.x < side && tile.y < side).then(|| (tile.y * side + tile.x) as usize)
    }

    fn set_open(&mut self, tile: IVec2) {
        if let Some(index) = self.tile_index(tile) {
            self.open[index] = true;
        }
    }

    /// Opens both cells and the gap between them.
    fn carve(&mut self, from: UVec2, to: UVec2) {
        let (a, b) = ((from * 2).as_ivec2(), (to * 2).as_ivec2());
        self.set_open(a);
        self.set_open((a + b) / 2);
        self.set_open(b);
        self.edges.push((from, to));
    }
}
