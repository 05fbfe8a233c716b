//! Adaptive render quality: the column scale factor reacts to measured frame rate.

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};
use tracing::{debug, trace};

use crate::constants::{DEGRADE_FPS, DEGRADE_STEP, FPS_SMOOTHING, MAX_SCALE, MIN_SCALE, NEUTRAL_FPS, UPGRADE_FPS, UPGRADE_STEP};
use crate::systems::input::TickInput;

/// Render quality setting, as cycled from the pause menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QualityMode {
    Low,
    Medium,
    High,
    #[default]
    Auto,
}

impl QualityMode {
    /// Initial column scale of the mode.
    pub const fn scale(self) -> f32 {
        match self {
            QualityMode::Low => 4.0,
            QualityMode::Medium => 2.0,
            QualityMode::High => 1.0,
            QualityMode::Auto => 2.0,
        }
    }

    /// Whether the scale follows the frame rate.
    pub const fn adaptive(self) -> bool {
        matches!(self, QualityMode::Auto)
    }

    /// The next mode in menu order, wrapping around.
    pub const fn next(self) -> QualityMode {
        match self {
            QualityMode::Low => QualityMode::Medium,
            QualityMode::Medium => QualityMode::High,
            QualityMode::High => QualityMode::Auto,
            QualityMode::Auto => QualityMode::Low,
        }
    }
}

/// Feedback controller for the raycaster's column scale.
///
/// Degrades fast on the instantaneous sample and recovers slowly on the smoothed estimate.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct QualityController {
    mode: QualityMode,
    scale: f32,
    smoothed: Option<f32>,
}

impl Default for QualityController {
    fn default() -> Self {
        Self::new(QualityMode::default())
    }
}

impl QualityController {
    pub fn new(mode: QualityMode) -> Self {
        Self {
            mode,
            scale: mode.scale(),
            smoothed: None,
        }
    }

    pub fn mode(&self) -> QualityMode {
        self.mode
    }

    /// Current column scale, always within `[MIN_SCALE, MAX_SCALE]`.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The smoothed frame rate estimate, once a sample has been seen.
    pub fn smoothed(&self) -> Option<f32> {
        self.smoothed
    }

    /// Switches mode, resetting the scale to the mode's default.
    pub fn set_mode(&mut self, mode: QualityMode) {
        debug!(from = self.mode.as_ref(), to = mode.as_ref(), "Quality mode changed");
        *self = Self::new(mode);
    }

    /// Feeds one frame rate sample. Ignored unless the mode is adaptive.
    pub fn observe(&mut self, sample: f32) {
        if !self.mode.adaptive() {
            return;
        }
        if !sample.is_finite() || sample < 0.0 {
            trace!(sample, "Discarding invalid FPS sample");
            return;
        }

        let smoothed = match self.smoothed {
            Some(previous) => previous * FPS_SMOOTHING + sample * (1.0 - FPS_SMOOTHING),
            None => sample,
        };
        self.smoothed = Some(smoothed);

        if sample < DEGRADE_FPS {
            if self.scale < MAX_SCALE {
                self.scale = (self.scale + DEGRADE_STEP).min(MAX_SCALE);
                trace!(sample, scale = self.scale, "Quality degraded");
            }
        } else if smoothed > UPGRADE_FPS && self.scale > MIN_SCALE {
            self.scale = (self.scale - UPGRADE_STEP).max(MIN_SCALE);
            self.smoothed = Some(NEUTRAL_FPS);
            trace!(smoothed, scale = self.scale, "Quality upgraded");
        }
    }
}

/// Feeds the tick's frame rate sample, if any, into the controller.
pub fn quality_system(input: Res<TickInput>, mut quality: ResMut<QualityController>) {
    if let Some(sample) = input.fps_sample {
        quality.observe(sample);
    }
}
