use std::f32::consts::{PI, TAU};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use circular_buffer::CircularBuffer;
use glam::IVec2;
use pathfinding::prelude::bfs;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use thousands::Separable;
use tracing::{debug, error, info, warn};

use crate::config::MazeConfig;
use crate::constants::{DEFAULT_GOAL_SHEET, LOOP_TIME};
use crate::game::{Session, SessionHooks, SessionReport, SessionView, StartOptions, TickStatus};
use crate::helpers::wrap_angle;
use crate::map::direction::Direction;
use crate::map::grid::{GridMap, Passability};
use crate::map::tile::AutoSet;
use crate::systems::input::TickInput;
use crate::systems::viewpoint::Viewpoint;
use crate::texture::frame::{FrameBuffer, Texture};
use crate::texture::MazeAssets;

/// Number of frame rate samples averaged for the logged figure.
const FPS_WINDOW: usize = 30;

/// Writes the last rendered frame of a session to a PNG file when the session ends.
struct FrameDump {
    path: PathBuf,
}

impl FrameDump {
    fn write(&self, frame: &FrameBuffer) -> Result<()> {
        frame
            .save_png(&self.path)
            .with_context(|| format!("Could not write {}", self.path.display()))
    }
}

impl SessionHooks for FrameDump {
    fn on_exit(&mut self, view: &SessionView<'_>, _report: &SessionReport) {
        let Some(frame) = view.frame() else {
            warn!("Session ended without a frame to dump");
            return;
        };
        match self.write(frame) {
            Ok(()) => info!(path = %self.path.display(), "Wrote last frame"),
            Err(e) => error!("Failed to write last frame: {e:#}"),
        }
    }
}

/// Headless driver: walks a generated maze with an autopilot until the goal is reached or the
/// frame limit runs out.
pub struct App {
    session: Session,
    config: MazeConfig,
    goal: IVec2,
    fps: CircularBuffer<FPS_WINDOW, f32>,
    /// Rate of the last completed frame, fed to the quality controller unsmoothed.
    frame_rate: Option<f32>,
    frames: u64,
    started: Instant,
    last_tick: Instant,
    sleep_time: Duration,
}

impl App {
    pub fn new(config: MazeConfig) -> Result<Self> {
        let assets = demo_assets().context("Could not build demo textures")?;
        let mut session = Session::new(config.clone(), Arc::new(assets));
        if let Some(path) = &config.output {
            session.add_hooks(Box::new(FrameDump { path: path.clone() }));
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = SmallRng::seed_from_u64(seed);
        let options = StartOptions::new(IVec2::ZERO, Direction::Down);
        let maze = session
            .generate(config.maze_size, &mut rng, None, options)
            .context("Could not start generated maze")?;

        info!(
            seed,
            size = maze.size(),
            spawn = ?maze.spawn_tile(),
            goal = ?maze.goal_tile(),
            "Generated maze"
        );

        let now = Instant::now();
        Ok(Self {
            session,
            goal: maze.goal_tile(),
            config,
            fps: CircularBuffer::new(),
            frame_rate: None,
            frames: 0,
            started: now,
            last_tick: now,
            sleep_time: Duration::ZERO,
        })
    }

    /// Runs a single frame. Returns `false` once the session is over.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        let view = self.session.view();
        let mut input = match (view.viewpoint(), view.map()) {
            (Some(viewpoint), Some(map)) => autopilot(viewpoint, map, self.goal),
            _ => TickInput::default(),
        };
        input.fps_sample = self.frame_rate;

        match self.session.tick(input) {
            TickStatus::Finished(report) => {
                info!(
                    outcome = report.outcome.as_ref(),
                    cleared = report.cleared(),
                    ticks = %report.ticks.separate_with_commas(),
                    "Maze finished"
                );
                return false;
            }
            TickStatus::Idle => return false,
            TickStatus::Paused | TickStatus::Running => {}
        }

        self.frames += 1;
        if self.frames % self.config.stats_interval.max(1) == 0 {
            self.log_stats();
        }
        if self.frames >= self.config.frames {
            info!(frames = %self.frames.separate_with_commas(), "Frame limit reached, stopping");
            if let Err(e) = self.session.stop() {
                error!("Failed to stop session: {e}");
            }
            return false;
        }

        if self.config.paced {
            if start.elapsed() < LOOP_TIME {
                let time = LOOP_TIME.saturating_sub(start.elapsed());
                if time != Duration::ZERO {
                    spin_sleep::sleep(time);
                }
                self.sleep_time += time;
            } else {
                debug!("Frame behind schedule by: {:?}", start.elapsed() - LOOP_TIME);
            }
        }

        let dt = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = Instant::now();
        self.record_frame_time(dt);

        true
    }

    fn record_frame_time(&mut self, dt: f32) {
        if dt > 0.0 {
            let rate = 1.0 / dt;
            self.fps.push_back(rate);
            self.frame_rate = Some(rate);
        }
    }

    fn average_fps(&self) -> Option<f32> {
        (!self.fps.is_empty()).then(|| self.fps.iter().sum::<f32>() / self.fps.len() as f32)
    }

    fn log_stats(&self) {
        let view = self.session.view();
        let elapsed = self.started.elapsed().as_secs_f32();
        let fps = self.average_fps().unwrap_or_default();
        let fps = match fps {
            f if f > 100.0 => format!("{} FPS", (f as u32).separate_with_commas()),
            f => format!("{f:.1} FPS"),
        };

        info!(
            frames = %self.frames.separate_with_commas(),
            elapsed = %format!("{elapsed:.1}s"),
            fps = fps.as_str(),
            sleep = ?self.sleep_time,
            scale = ?view.quality().map(|quality| quality.scale()),
            compass = ?view.compass(),
            tile = ?view.viewpoint().map(|viewpoint| viewpoint.tile()),
            "Stats"
        );
    }
}

/// Chooses the input that walks the viewer one step along the shortest path to `goal`,
/// interacting once the goal is directly ahead.
pub fn autopilot(viewpoint: &Viewpoint, map: &GridMap, goal: IVec2) -> TickInput {
    let mut input = TickInput::default();

    let path = bfs(
        &viewpoint.tile(),
        |tile| {
            Direction::DIRECTIONS
                .iter()
                .map(|direction| *tile + direction.as_ivec2())
                .filter(|neighbour| map.passable(*neighbour))
                .collect::<SmallVec<[IVec2; 4]>>()
        },
        |tile| *tile == goal,
    );
    let Some(path) = path else {
        input.right = true;
        return input;
    };
    let Some(&next) = path.get(1) else {
        input.action = true;
        return input;
    };

    let target = (next.as_vec2() + 0.5) * viewpoint.params().block_width;
    let delta = target - viewpoint.position();
    let turn = wrap_angle(delta.y.atan2(delta.x) - viewpoint.facing());
    let tolerance = viewpoint.params().rotation_speed;

    if turn > tolerance && turn < TAU - tolerance {
        if turn < PI {
            input.right = true;
        } else {
            input.left = true;
        }
    } else if next == goal {
        input.action = true;
    } else {
        input.forward = true;
    }
    input
}

/// Procedural stand-ins for the wall sheet and the goal character.
fn demo_assets() -> Result<MazeAssets> {
    let assets = MazeAssets::default();
    let tile = assets.tile_size();

    let wall = Texture::from_fn(tile.x * 16, tile.y * 15, |x, y| {
        let (u, v) = (x % tile.x, y % tile.y);
        let mortar = v % (tile.y / 2) == 0 || (u + (v / (tile.y / 2)) * tile.x / 2) % tile.x == 0;
        if mortar {
            0xFF5A_5048
        } else {
            0xFF9C_6B4E
        }
    })?;

    let (width, height) = (tile.x * 12, tile.y * 8);
    let character = Texture::from_fn(width, height, |x, y| {
        let (u, v) = ((x % tile.x) as f32, (y % tile.y) as f32);
        let centre = tile.as_vec2() / 2.0;
        let inside = (u - centre.x).powi(2) + (v - centre.y).powi(2) < (centre.x * 0.6).powi(2);
        if inside {
            0xFFE8_C040
        } else {
            0x0000_0000
        }
    })?;

    debug!(sheets = 2, "Built demo textures");
    Ok(assets
        .with_tile_sheet(AutoSet::A4.sheet(), wall)
        .with_sprite_sheet(DEFAULT_GOAL_SHEET, character))
}
