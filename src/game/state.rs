//! Session lifecycle states and the values exchanged with the caller.

use glam::IVec2;
use strum_macros::AsRefStr;

use crate::map::direction::Direction;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum Outcome {
    /// A goal trigger was reached, or success was signalled.
    Succeeded,
    /// A fail trigger was reached, or failure was signalled.
    Failed,
    /// The viewer gave up from the pause menu.
    Quit,
    /// The host switched the maze off.
    Stopped,
}

impl Outcome {
    /// The boolean signal handed back to the caller.
    pub const fn cleared(self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    /// Whether the caller is sent back to where it entered the maze.
    pub const fn returns(self) -> bool {
        !matches!(self, Outcome::Stopped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum SessionState {
    #[default]
    Idle,
    Active,
    Paused,
    Finished(Outcome),
}

impl SessionState {
    /// Whether a session currently exists, paused or not.
    pub const fn is_running(self) -> bool {
        matches!(self, SessionState::Active | SessionState::Paused)
    }

    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            SessionState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// The caller's position before it entered the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnPoint {
    pub map_id: u32,
    pub tile: IVec2,
    pub facing: Direction,
}

/// Parameters of a session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOptions {
    pub spawn: IVec2,
    pub facing: Direction,
    pub allow_retry: bool,
    pub allow_quit: bool,
    /// Where the caller goes back to once the session ends, if anywhere.
    pub return_point: Option<ReturnPoint>,
}

impl StartOptions {
    /// Options with retry and quit enabled and no return point.
    pub fn new(spawn: IVec2, facing: Direction) -> Self {
        Self {
            spawn,
            facing,
            allow_retry: true,
            allow_quit: true,
            return_point: None,
        }
    }

    pub fn with_retry(mut self, allow: bool) -> Self {
        self.allow_retry = allow;
        self
    }

    pub fn with_quit(mut self, allow: bool) -> Self {
        self.allow_quit = allow;
        self
    }

    pub fn returning_to(mut self, point: ReturnPoint) -> Self {
        self.return_point = Some(point);
        self
    }
}

/// What the caller receives when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: Outcome,
    /// Where to restore the caller; absent when the maze was merely switched off.
    pub return_point: Option<ReturnPoint>,
    /// Number of ticks the session ran.
    pub ticks: u64,
}

impl SessionReport {
    pub const fn cleared(&self) -> bool {
        self.outcome.cleared()
    }
}

/// Result of a single [`Session::tick`](crate::game::Session::tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// No session is running.
    Idle,
    /// The session is paused and no system ran.
    Paused,
    Running,
    /// The session ended during this tick.
    Finished(SessionReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_success_clears() {
        assert!(Outcome::Succeeded.cleared());
        assert!(!Outcome::Failed.cleared());
        assert!(!Outcome::Quit.cleared());
        assert!(!Outcome::Stopped.cleared());
    }

    #[test]
    fn test_running_states() {
        assert!(SessionState::Active.is_running());
        assert!(SessionState::Paused.is_running());
        assert!(!SessionState::Idle.is_running());
        assert!(!SessionState::Finished(Outcome::Quit).is_running());
    }
}
