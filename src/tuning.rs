//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; an override can be stored as JSON in LocalStorage.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bird ===
    pub gravity: f32,
    /// Damping applied on top of `gravity`
    pub gravity_scale: f32,
    pub flap_velocity: f32,
    pub forward_speed: f32,
    pub max_height: f32,
    pub min_height: f32,
    pub bird_radius: f32,

    // === Pipes ===
    pub pipe_spacing: f32,
    pub first_pipe_offset: f32,
    pub pipe_count: usize,
    pub pipe_threshold: usize,
    pub gap_size: f32,
    pub gap_y_max: f32,
    pub min_bottom_clearance: f32,

    // === Collision / scoring ===
    pub pipe_width: f32,
    pub collision_threshold: f32,
    pub pass_threshold: f32,
    pub fade_start_distance: f32,
    pub fade_end_distance: f32,

    // === Cosmetic ===
    pub tilt_factor: f32,
    pub tilt_smoothing: f32,
    pub flap_anim_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            gravity_scale: GRAVITY_SCALE,
            flap_velocity: FLAP_VELOCITY,
            forward_speed: FORWARD_SPEED,
            max_height: MAX_HEIGHT,
            min_height: MIN_HEIGHT,
            bird_radius: BIRD_RADIUS,

            pipe_spacing: PIPE_SPACING,
            first_pipe_offset: FIRST_PIPE_OFFSET,
            pipe_count: PIPE_COUNT,
            pipe_threshold: PIPE_THRESHOLD,
            gap_size: GAP_SIZE,
            gap_y_max: GAP_Y_MAX,
            min_bottom_clearance: MIN_BOTTOM_CLEARANCE,

            pipe_width: PIPE_WIDTH,
            collision_threshold: COLLISION_THRESHOLD,
            pass_threshold: PASS_THRESHOLD,
            fade_start_distance: FADE_START_DISTANCE,
            fade_end_distance: FADE_END_DISTANCE,

            tilt_factor: TILT_FACTOR,
            tilt_smoothing: TILT_SMOOTHING,
            flap_anim_secs: FLAP_ANIM_SECS,
        }
    }
}

impl Tuning {
    /// LocalStorage key for a tuning override
    pub const STORAGE_KEY: &'static str = "flappy3d_tuning";

    /// Effective downward acceleration
    pub fn effective_gravity(&self) -> f32 {
        self.gravity * self.gravity_scale
    }

    /// Lowest allowed gap center: the lower pipe keeps `min_bottom_clearance`
    /// of height above the ground.
    pub fn min_gap_y(&self) -> f32 {
        self.min_height + self.min_bottom_clearance + self.gap_size / 2.0
    }

    /// Half-width of the z band in which a pipe is collision-tested
    pub fn collision_half_width(&self) -> f32 {
        self.pipe_width * self.collision_threshold
    }

    /// Reject balance values the simulation cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.gap_size > 0.0, "gap_size must be positive ({})", self.gap_size);
        ensure!(
            self.max_height > self.min_height,
            "max_height ({}) must be above min_height ({})",
            self.max_height,
            self.min_height
        );
        ensure!(
            self.min_gap_y() < self.gap_y_max,
            "gap range is empty: min {} >= max {}",
            self.min_gap_y(),
            self.gap_y_max
        );
        ensure!(self.pipe_spacing > 0.0, "pipe_spacing must be positive");
        ensure!(self.forward_speed > 0.0, "forward_speed must be positive");
        // One clamped frame must not step across a whole collision band
        ensure!(
            self.forward_speed * MAX_FRAME_DT < 2.0 * self.collision_half_width(),
            "forward_speed ({}) skips the {} unit collision band in one {} s frame",
            self.forward_speed,
            2.0 * self.collision_half_width(),
            MAX_FRAME_DT
        );
        ensure!(
            self.pipe_threshold < self.pipe_count,
            "pipe_threshold ({}) must be below pipe_count ({})",
            self.pipe_threshold,
            self.pipe_count
        );
        ensure!(
            self.fade_end_distance > self.fade_start_distance,
            "fade_end_distance must exceed fade_start_distance"
        );
        ensure!(self.bird_radius >= 0.0, "bird_radius must not be negative");
        Ok(())
    }

    /// Parse and validate a JSON override. Missing fields take defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("malformed tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load the override from a store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning override: {e:#}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default tuning");
                Self::default()
            }
            Err(e) => {
                log::warn!("Tuning store unreadable, using defaults: {e:#}");
                Self::default()
            }
        }
    }
}
