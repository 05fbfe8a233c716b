//! The maze session controller: lifecycle, control surface, and the per-tick schedule.

use std::sync::Arc;
use std::time::Instant;

use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule};
use bevy_ecs::world::World;
use rand::Rng;
use tracing::{debug, info, trace, warn};

use crate::config::MazeConfig;
use crate::constants::LOOP_TIME;
use crate::error::{MazeResult, SessionError};
use crate::formatter;
use crate::map::direction::Direction;
use crate::map::generator::{GeneratedMaze, MazeGenerator};
use crate::map::grid::{GridMap, MapSource, Passability};
use crate::map::tile::Tileset;
use crate::systems::actor::{actor_system, ActorFeed, ActorPose, ActorSet, TriggerAction};
use crate::systems::compass::{compass_heading, compass_system, Compass};
use crate::systems::input::{input_system, TickInput};
use crate::systems::quality::{quality_system, QualityController, QualityMode};
use crate::systems::render::{render_system, Raycaster};
use crate::systems::trigger::{trigger_system, SessionSignals};
use crate::systems::viewpoint::Viewpoint;
use crate::texture::frame::FrameBuffer;
use crate::texture::MazeAssets;

pub use self::state::{Outcome, ReturnPoint, SessionReport, SessionState, StartOptions, TickStatus};

pub mod state;

/// Lifecycle callbacks a host can attach to a session.
///
/// Every method has an empty default, so hosts only implement what they observe.
pub trait SessionHooks {
    fn on_enter(&mut self, _view: &SessionView<'_>) {}
    fn on_tick(&mut self, _view: &SessionView<'_>) {}
    fn on_exit(&mut self, _view: &SessionView<'_>, _report: &SessionReport) {}
}

/// Read-only access to a session's state, handed to [`SessionHooks`].
pub struct SessionView<'a> {
    world: &'a World,
    state: SessionState,
    ticks: u64,
}

impl<'a> SessionView<'a> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frame(&self) -> Option<&'a FrameBuffer> {
        self.world.get_resource::<FrameBuffer>()
    }

    pub fn viewpoint(&self) -> Option<&'a Viewpoint> {
        self.world.get_resource::<Viewpoint>()
    }

    pub fn actors(&self) -> Option<&'a ActorSet> {
        self.world.get_resource::<ActorSet>()
    }

    pub fn map(&self) -> Option<&'a GridMap> {
        self.world.get_resource::<GridMap>()
    }

    /// Compass heading relative to the viewer's facing.
    pub fn compass(&self) -> Option<f32> {
        self.world.get_resource::<Compass>().map(|compass| compass.heading)
    }

    pub fn quality(&self) -> Option<&'a QualityController> {
        self.world.get_resource::<QualityController>()
    }
}

/// Values captured at session start, used to rewind on retry.
#[derive(Debug, Clone)]
struct Checkpoint {
    options: StartOptions,
    actors: Vec<ActorFeed>,
}

/// A first-person maze session.
///
/// The session owns a `World` holding the grid map, viewpoint, actors, compass, quality
/// controller and frame buffer, and a schedule that advances them once per [`Session::tick`].
pub struct Session {
    config: MazeConfig,
    assets: Arc<MazeAssets>,
    world: World,
    schedule: Schedule,
    state: SessionState,
    checkpoint: Option<Checkpoint>,
    quality: QualityMode,
    ticks: u64,
    hooks: Vec<Box<dyn SessionHooks>>,
}

impl Session {
    pub fn new(config: MazeConfig, assets: Arc<MazeAssets>) -> Session {
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                input_system,
                actor_system,
                compass_system,
                quality_system,
                render_system,
                trigger_system,
            )
                .chain(),
        );

        Session {
            quality: config.quality,
            config,
            assets,
            world: World::default(),
            schedule,
            state: SessionState::Idle,
            checkpoint: None,
            ticks: 0,
            hooks: Vec::new(),
        }
    }

    pub fn add_hooks(&mut self, hooks: Box<dyn SessionHooks>) {
        self.hooks.push(hooks);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// The quality mode new sessions start with; persists across sessions.
    pub fn quality_mode(&self) -> QualityMode {
        self.quality
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            world: &self.world,
            state: self.state,
            ticks: self.ticks,
        }
    }

    /// Enters a maze built from `source`.
    ///
    /// # Errors
    ///
    /// Fails when a session is already running, the source cannot be ingested, or the spawn
    /// tile is not passable. The session is left untouched in every case.
    pub fn start(
        &mut self,
        source: &impl MapSource,
        tileset: Tileset,
        actors: Vec<ActorFeed>,
        options: StartOptions,
    ) -> MazeResult<()> {
        if self.state.is_running() {
            return Err(SessionError::AlreadyRunning.into());
        }

        let map = GridMap::from_source(source, tileset)?;
        if !map.passable(options.spawn) {
            return Err(SessionError::BlockedSpawn {
                x: options.spawn.x,
                y: options.spawn.y,
            }
            .into());
        }

        let checkpoint = Checkpoint { options, actors };
        let raycaster = Raycaster::new(&map, Arc::clone(&self.assets), self.config.palette);

        self.world.insert_resource(map);
        self.world.insert_resource(raycaster);
        self.world.insert_resource(FrameBuffer::new(self.config.screen_size()));
        self.world.insert_resource(QualityController::new(self.quality));
        self.world.insert_resource(TickInput::default());
        self.rewind(&checkpoint);

        self.checkpoint = Some(checkpoint);
        self.state = SessionState::Active;
        self.ticks = 0;
        let session = formatter::begin_session();

        info!(
            session,
            spawn = ?options.spawn,
            facing = options.facing.as_ref(),
            retry = options.allow_retry,
            quit = options.allow_quit,
            "Maze session started"
        );
        self.notify(|hooks, view| hooks.on_enter(view));
        Ok(())
    }

    /// Generates a perfect maze of `size` cells and enters it.
    ///
    /// The viewer spawns on the maze's spawn cell facing down, regardless of the spawn and facing
    /// in `options`. A goal marker is placed on the goal tile, dressed as `caller` when given.
    pub fn generate<R: Rng>(
        &mut self,
        size: u32,
        rng: &mut R,
        caller: Option<&ActorFeed>,
        options: StartOptions,
    ) -> MazeResult<GeneratedMaze> {
        if self.state.is_running() {
            return Err(SessionError::AlreadyRunning.into());
        }

        let maze = MazeGenerator::generate(size, rng);
        let map = maze.to_map(self.config.gen_floor(), self.config.gen_wall(), self.config.gen_tileset_id);
        let tileset = maze.tileset(self.config.gen_wall(), self.config.gen_tileset_id);
        let options = StartOptions {
            spawn: maze.spawn_tile(),
            facing: Direction::Down,
            ..options
        };

        self.start(&map, tileset, vec![maze.goal_marker(caller)], options)?;
        Ok(maze)
    }

    /// Switches the maze off without restoring the caller.
    pub fn stop(&mut self) -> Result<SessionReport, SessionError> {
        self.finish(Outcome::Stopped)
    }

    pub fn signal_success(&mut self) -> Result<SessionReport, SessionError> {
        self.finish(Outcome::Succeeded)
    }

    pub fn signal_failure(&mut self) -> Result<SessionReport, SessionError> {
        self.finish(Outcome::Failed)
    }

    /// Stops a running session, or starts one when none is running.
    ///
    /// Returns the report of the stopped session, if one was stopped.
    pub fn toggle(
        &mut self,
        source: &impl MapSource,
        tileset: Tileset,
        actors: Vec<ActorFeed>,
        options: StartOptions,
    ) -> MazeResult<Option<SessionReport>> {
        if self.state.is_running() {
            return Ok(Some(self.stop()?));
        }
        self.start(source, tileset, actors, options)?;
        Ok(None)
    }

    /// Freezes the session. Pausing a paused session does nothing.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Active => {
                self.state = SessionState::Paused;
                debug!("Session paused");
                Ok(())
            }
            SessionState::Paused => Ok(()),
            _ => Err(SessionError::NotRunning),
        }
    }

    /// Unfreezes the session. Resuming an active session does nothing.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Paused => {
                self.state = SessionState::Active;
                debug!("Session resumed");
                Ok(())
            }
            SessionState::Active => Ok(()),
            _ => Err(SessionError::NotRunning),
        }
    }

    /// Puts the viewer and every actor back where the session started, then resumes.
    ///
    /// Only available from the pause menu, and only when the session allows it.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        let checkpoint = self.pause_menu_checkpoint("retry", |options| options.allow_retry)?;
        self.rewind(&checkpoint);
        self.state = SessionState::Active;
        info!(ticks = self.ticks, "Session retried");
        Ok(())
    }

    /// Gives up from the pause menu, when the session allows it.
    pub fn quit(&mut self) -> Result<SessionReport, SessionError> {
        self.pause_menu_checkpoint("quit", |options| options.allow_quit)?;
        self.finish(Outcome::Quit)
    }

    /// Advances the quality setting to the next mode and applies it to the running session.
    pub fn cycle_quality(&mut self) -> QualityMode {
        self.quality = self.quality.next();
        if let Some(mut controller) = self.world.get_resource_mut::<QualityController>() {
            controller.set_mode(self.quality);
        }
        info!(mode = self.quality.as_ref(), "Quality mode cycled");
        self.quality
    }

    /// Feeds an actor's movement for the coming tick. Returns `false` if no such actor exists.
    pub fn set_actor_pose(&mut self, id: u32, pose: ActorPose) -> bool {
        let applied = self
            .world
            .get_resource_mut::<ActorSet>()
            .is_some_and(|mut actors| actors.apply_pose(id, pose));
        if !applied {
            trace!(id, "Ignoring pose for unknown actor");
        }
        applied
    }

    /// Runs one frame: input, actor projection, compass, quality, rendering and the completion
    /// check, in that order. Outcomes raised by triggers are applied once the frame completes.
    pub fn tick(&mut self, input: TickInput) -> TickStatus {
        if !self.state.is_running() {
            return TickStatus::Idle;
        }

        if input.pause {
            self.state = match self.state {
                SessionState::Paused => SessionState::Active,
                _ => SessionState::Paused,
            };
            debug!(state = self.state.as_ref(), "Pause toggled");
        }
        if self.state == SessionState::Paused {
            return TickStatus::Paused;
        }

        formatter::advance_tick();
        self.ticks += 1;

        let start = Instant::now();
        self.world.insert_resource(input);
        self.schedule.run(&mut self.world);
        let elapsed = start.elapsed();
        if elapsed > LOOP_TIME {
            trace!(?elapsed, "Frame exceeded loop time");
        }

        self.notify(|hooks, view| hooks.on_tick(view));

        let signal = self
            .world
            .get_resource_mut::<SessionSignals>()
            .and_then(|mut signals| signals.take());
        let outcome = match signal {
            Some(TriggerAction::Succeed) => Outcome::Succeeded,
            Some(TriggerAction::Fail) => Outcome::Failed,
            None => return TickStatus::Running,
        };

        match self.finish(outcome) {
            Ok(report) => TickStatus::Finished(report),
            Err(error) => {
                warn!(%error, "Failed to finish session after trigger");
                TickStatus::Idle
            }
        }
    }

    /// Resets the viewpoint and actor set to the checkpoint, leaving the map untouched.
    fn rewind(&mut self, checkpoint: &Checkpoint) {
        let viewpoint = Viewpoint::new(
            self.config.view_params(),
            checkpoint.options.spawn,
            checkpoint.options.facing,
        );
        let mut actors = ActorSet::from_feeds(&checkpoint.actors);
        actors.update(&viewpoint);
        let compass = Compass {
            heading: compass_heading(&viewpoint, actors.actors()).unwrap_or_default(),
        };

        self.world.insert_resource(viewpoint);
        self.world.insert_resource(actors);
        self.world.insert_resource(compass);
        self.world.insert_resource(SessionSignals::default());
    }

    fn pause_menu_checkpoint(
        &self,
        action: &'static str,
        allowed: impl Fn(&StartOptions) -> bool,
    ) -> Result<Checkpoint, SessionError> {
        match (self.state, &self.checkpoint) {
            (SessionState::Paused, Some(checkpoint)) if allowed(&checkpoint.options) => Ok(checkpoint.clone()),
            (SessionState::Paused, Some(_)) => Err(SessionError::Disabled(action)),
            (SessionState::Active, _) => Err(SessionError::NotPaused(action)),
            _ => Err(SessionError::NotRunning),
        }
    }

    /// Ends the running session with `outcome` and tears it down.
    fn finish(&mut self, outcome: Outcome) -> Result<SessionReport, SessionError> {
        if !self.state.is_running() {
            return Err(SessionError::NotRunning);
        }

        let return_point = self
            .checkpoint
            .as_ref()
            .and_then(|checkpoint| checkpoint.options.return_point)
            .filter(|_| outcome.returns());
        let report = SessionReport {
            outcome,
            return_point,
            ticks: self.ticks,
        };

        self.notify(|hooks, view| hooks.on_exit(view, &report));
        self.teardown();
        self.state = SessionState::Finished(outcome);

        info!(
            outcome = outcome.as_ref(),
            cleared = outcome.cleared(),
            ticks = report.ticks,
            "Maze session ended"
        );
        Ok(report)
    }

    fn teardown(&mut self) {
        self.world.remove_resource::<GridMap>();
        self.world.remove_resource::<Raycaster>();
        self.world.remove_resource::<FrameBuffer>();
        self.world.remove_resource::<QualityController>();
        self.world.remove_resource::<TickInput>();
        self.world.remove_resource::<Viewpoint>();
        self.world.remove_resource::<ActorSet>();
        self.world.remove_resource::<Compass>();
        self.world.remove_resource::<SessionSignals>();
        self.checkpoint = None;
    }

    fn notify(&mut self, mut call: impl FnMut(&mut dyn SessionHooks, &SessionView<'_>)) {
        if self.hooks.is_empty() {
            return;
        }
        let view = SessionView {
            world: &self.world,
            state: self.state,
            ticks: self.ticks,
        };
        for hooks in &mut self.hooks {
            call(hooks.as_mut(), &view);
        }
    }
}
