//! Read-only frame snapshot for the renderer
//!
//! Everything here is cosmetic output derived from `GameState`; nothing feeds
//! back into the simulation.

use glam::Vec3;
use serde::Serialize;

use crate::consts::PIPE_HEIGHT;
use crate::sim::{GamePhase, GameState, PipeField};

/// Camera sits above and behind the bird, looking ahead
const CAMERA_HEIGHT: f32 = 3.0;
const CAMERA_DISTANCE: f32 = 10.0;
const CAMERA_LOOK_AHEAD: f32 = 10.0;
/// Pipes fainter than this stop casting/receiving shadows
const SHADOW_MIN_OPACITY: f32 = 0.2;

#[derive(Debug, Clone, Serialize)]
pub struct BirdView {
    /// Always at x = 0, z = 0
    pub position: Vec3,
    /// Pitch hint from vertical velocity
    pub tilt: f32,
    pub flapping: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipeView {
    pub id: u32,
    /// Distance along z in the bird's frame
    pub z: f32,
    pub gap_y: f32,
    /// Center of the upper pipe mesh
    pub top_center: Vec3,
    /// Center of the lower pipe mesh
    pub bottom_center: Vec3,
    pub opacity: f32,
    pub casts_shadow: bool,
}

/// What the presentation layer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub bird: BirdView,
    pub camera: CameraView,
    pub pipes: Vec<PipeView>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let bird = &state.bird;
        let tuning = &state.tuning;

        // Pipes are hidden on the game-over screen
        let pipes = match state.phase() {
            GamePhase::Ended => Vec::new(),
            GamePhase::NotStarted | GamePhase::Running => state
                .pipes
                .active()
                .map(|pipe| {
                    let z = pipe.relative_z(bird.forward_distance);
                    let opacity = if z > 0.0 {
                        PipeField::opacity(z, tuning)
                    } else {
                        1.0
                    };
                    let half = PIPE_HEIGHT / 2.0;
                    PipeView {
                        id: pipe.id,
                        z,
                        gap_y: pipe.gap_y,
                        top_center: Vec3::new(0.0, pipe.gap_top(tuning.gap_size) + half, z),
                        bottom_center: Vec3::new(
                            0.0,
                            pipe.gap_bottom(tuning.gap_size) - half,
                            z,
                        ),
                        opacity,
                        casts_shadow: opacity > SHADOW_MIN_OPACITY,
                    }
                })
                .collect(),
        };

        Self {
            phase: state.phase(),
            score: state.session.score(),
            high_score: state.session.high_score(),
            bird: BirdView {
                position: Vec3::new(0.0, bird.y, 0.0),
                tilt: bird.tilt,
                flapping: bird.is_flapping(state.time),
            },
            camera: CameraView {
                eye: Vec3::new(0.0, bird.y + CAMERA_HEIGHT, CAMERA_DISTANCE),
                target: Vec3::new(0.0, bird.y, -CAMERA_LOOK_AHEAD),
            },
            pipes,
        }
    }

    /// JSON for the JS renderer hook
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}
