//! Bird kinematics
//!
//! The bird only ever moves vertically. Forward motion is a scalar
//! (`forward_distance`) that the pipe field is positioned against, so the bird
//! stays pinned at z = 0 in view space.

use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::tuning::Tuning;

/// Outcome of one kinematics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdStep {
    Airborne,
    /// Dropped below the ground line - ends the run
    Grounded,
}

/// The player body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// World-space height
    pub y: f32,
    /// Vertical velocity (positive = up)
    pub vel_y: f32,
    /// Total distance flown
    pub forward_distance: f32,
    /// Cosmetic pitch, eased toward the velocity
    pub tilt: f32,
    /// Sim time at which the current wing-flap animation ends
    #[serde(default)]
    pub flap_anim_until: Option<f64>,
}

impl Bird {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the launch pose
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by `dt` seconds.
    ///
    /// `flap` is the edge-triggered press; it replaces the velocity rather
    /// than adding to it. The ground check runs after the whole delta has
    /// been integrated.
    pub fn step(&mut self, dt: f32, flap: bool, tuning: &Tuning) -> BirdStep {
        self.vel_y -= tuning.effective_gravity() * dt;

        if flap {
            self.vel_y = tuning.flap_velocity;
        }

        self.forward_distance += tuning.forward_speed * dt;
        self.y += self.vel_y * dt;

        // Bonk the ceiling
        if self.y > tuning.max_height {
            self.y = tuning.max_height;
            self.vel_y = 0.0;
        }

        self.tilt = lerp(self.tilt, self.vel_y * tuning.tilt_factor, tuning.tilt_smoothing);

        if self.y < tuning.min_height {
            BirdStep::Grounded
        } else {
            BirdStep::Airborne
        }
    }

    /// Start the wing-flap animation unless one is already playing.
    /// Returns true when a new animation was started.
    pub fn start_flap_animation(&mut self, now: f64, tuning: &Tuning) -> bool {
        if self.is_flapping(now) {
            return false;
        }
        self.flap_anim_until = Some(now + tuning.flap_anim_secs as f64);
        true
    }

    /// Expire the animation once sim time passes its end
    pub fn update_flap_animation(&mut self, now: f64) {
        if let Some(until) = self.flap_anim_until {
            if now >= until {
                self.flap_anim_until = None;
            }
        }
    }

    pub fn is_flapping(&self, now: f64) -> bool {
        self.flap_anim_until.is_some_and(|until| now < until)
    }
}
