use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::IVec2;
use strum_macros::{AsRefStr, EnumIter};

use crate::helpers::wrap_angle;

/// The four cardinal directions.
///
/// Angles follow screen space: `y` grows downward, so `Down` sits at `π/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four cardinal directions.
    /// This is just a convenience constant for iterating over the directions.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the direction as a unit grid offset.
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    /// Parses a numeric-keypad direction code (2 down, 4 left, 6 right, 8 up).
    pub const fn from_code(code: u8) -> Option<Direction> {
        match code {
            2 => Some(Direction::Down),
            4 => Some(Direction::Left),
            6 => Some(Direction::Right),
            8 => Some(Direction::Up),
            _ => None,
        }
    }

    /// Returns the numeric-keypad direction code.
    pub const fn code(self) -> u8 {
        match self {
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
            Direction::Up => 8,
        }
    }

    /// The cardinal angle of this direction, in radians.
    pub const fn angle(self) -> f32 {
        match self {
            Direction::Right => 0.0,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Up => 3.0 * FRAC_PI_2,
        }
    }

    /// Quantizes a continuous angle into the nearest cardinal direction.
    ///
    /// Bucket edges sit at odd multiples of `π/4`: `(5π/4, 7π/4]` is up, `[3π/4, 5π/4]` is left,
    /// `(π/4, 3π/4)` is down and everything else is right.
    pub fn from_angle(angle: f32) -> Direction {
        let angle = wrap_angle(angle);
        if angle > 5.0 * FRAC_PI_4 && angle <= 7.0 * FRAC_PI_4 {
            Direction::Up
        } else if angle >= 3.0 * FRAC_PI_4 && angle <= 5.0 * FRAC_PI_4 {
            Direction::Left
        } else if angle > FRAC_PI_4 && angle < 3.0 * FRAC_PI_4 {
            Direction::Down
        } else {
            Direction::Right
        }
    }

    /// Row of a character sprite sheet showing this facing.
    pub const fn sprite_row(self) -> usize {
        match self {
            Direction::Down => 0,
            Direction::Left => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}
