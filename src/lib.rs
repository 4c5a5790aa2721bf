//! Flappy 3D - forward-flying arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (bird kinematics, pipe stream, collisions, session)
//! - `input`: Device events -> debounced flap signal
//! - `view`: Read-only snapshot for the external renderer
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod view;

pub use highscores::{HighScoreStore, HighScores};
pub use input::{InputEvent, InputState};
pub use tuning::Tuning;
pub use view::FrameView;

/// Game configuration constants
pub mod consts {
    /// Nominal frame delta used for the first frame and the native demo
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed to the simulation (tab backgrounding, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Bird kinematics
    pub const GRAVITY: f32 = 9.8;
    pub const GRAVITY_SCALE: f32 = 0.5;
    /// Launch speed set (not added) on each flap
    pub const FLAP_VELOCITY: f32 = 5.0;
    pub const FORWARD_SPEED: f32 = 7.0;
    pub const MAX_HEIGHT: f32 = 15.0;
    /// Ground level - dropping below ends the run
    pub const MIN_HEIGHT: f32 = -4.0;
    pub const BIRD_RADIUS: f32 = 0.7;

    /// Pipe stream
    pub const PIPE_SPACING: f32 = 18.0;
    /// First pipe sits this far ahead of the bird
    pub const FIRST_PIPE_OFFSET: f32 = 20.0;
    pub const PIPE_COUNT: usize = 10;
    /// Refill once this many (or fewer) pipes are left
    pub const PIPE_THRESHOLD: usize = 5;
    pub const GAP_SIZE: f32 = 4.0;
    /// Upper bound (exclusive) for a gap center
    pub const GAP_Y_MAX: f32 = 9.0;
    /// Lower pipe always shows at least this much above the ground
    pub const MIN_BOTTOM_CLEARANCE: f32 = 2.0;

    /// Collisions
    pub const PIPE_WIDTH: f32 = 2.0;
    pub const COLLISION_THRESHOLD: f32 = 0.8;
    pub const PASS_THRESHOLD: f32 = 0.0;
    pub const FADE_START_DISTANCE: f32 = PASS_THRESHOLD;
    pub const FADE_END_DISTANCE: f32 = FADE_START_DISTANCE + 3.0;

    /// Pipe mesh dimensions (cosmetic)
    pub const PIPE_RADIUS: f32 = 1.5;
    pub const PIPE_HEIGHT: f32 = 30.0;

    /// Bird tilt follows velocity * factor, smoothed per frame
    pub const TILT_FACTOR: f32 = 0.05;
    pub const TILT_SMOOTHING: f32 = 0.1;
    /// Length of the wing-flap animation clip (seconds)
    pub const FLAP_ANIM_SECS: f32 = 0.4;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of a world object relative to the bird's local frame.
///
/// Pipes live at fixed negative z; the bird's frame origin sits at
/// `-forward_distance`, so the difference grows as the bird advances.
#[inline]
pub fn relative_z(anchor_z: f32, forward_distance: f32) -> f32 {
    anchor_z - (-forward_distance)
}
