//! Per-frame simulation tick
//!
//! Frame order while running is fixed: kinematics, pipe replenishment,
//! collision and scoring, then compaction. A ground hit or collision ends the
//! run on the spot and the rest of the frame is skipped.

use super::bird::BirdStep;
use super::collision;
use super::session::GamePhase;
use super::state::{GameEvent, GameState};
use crate::consts::{MAX_FRAME_DT, NOMINAL_DT};
use crate::highscores::HighScoreStore;

/// Autopilot clearance kept inside the gap
const AUTOPILOT_MARGIN: f32 = 0.05;
/// Height above the ground where the autopilot always flaps
const AUTOPILOT_GROUND_CLEARANCE: f32 = 0.5;
/// Autopilot ground check horizon (seconds)
const AUTOPILOT_GROUND_LOOKAHEAD: f32 = 0.25;
/// How far below a distant gap the autopilot lets the bird sink
const AUTOPILOT_HOVER_DEPTH: f32 = 1.2;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Edge-triggered flap (also starts/restarts from the menus)
    pub flap: bool,
    /// Start / Play Again button
    pub start: bool,
    /// Demo mode - the autopilot flies
    pub autopilot: bool,
}

/// Turn a wall-clock delta into something safe to integrate.
///
/// Non-finite and non-positive deltas skip the frame; long stalls (tab in the
/// background) are clamped.
pub fn sanitize_dt(dt: f32) -> Option<f32> {
    if !dt.is_finite() || dt <= 0.0 {
        return None;
    }
    Some(dt.min(MAX_FRAME_DT))
}

/// Advance the game by one rendered frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, store: &mut dyn HighScoreStore) {
    let mut flap = input.flap;

    // Menu presses count even on a frame whose delta gets thrown away
    match state.phase() {
        GamePhase::NotStarted | GamePhase::Ended => {
            if !(input.start || input.flap) {
                return;
            }
            state.start();
        }
        GamePhase::Running => {}
    }

    let Some(dt) = sanitize_dt(dt) else {
        log::trace!("Skipping frame with dt {}", dt);
        return;
    };

    if input.autopilot {
        flap = autopilot_flap(state);
    }

    state.frames += 1;
    state.time += dt as f64;
    let now = state.time;

    // 1. Kinematics
    state.bird.update_flap_animation(now);
    if flap {
        state.bird.start_flap_animation(now, &state.tuning);
        state.push_event(GameEvent::Flapped);
    }
    if state.bird.step(dt, flap, &state.tuning) == BirdStep::Grounded {
        state.push_event(GameEvent::HitGround);
        state.end(store);
        return;
    }

    // 2. Keep the window full
    state.pipes.replenish(&state.tuning);

    // 3. Collisions, scoring and fade-out removal
    let eval = collision::evaluate(&mut state.pipes, &state.bird, &state.tuning);
    for pipe_id in eval.scored {
        let score = state.session.add_point();
        state.push_event(GameEvent::Scored { pipe_id, score });
    }
    if let Some(pipe_id) = eval.collided {
        state.push_event(GameEvent::Collided { pipe_id });
        state.end(store);
        return;
    }

    // 4. Reclaim tombstones
    state.pipes.compact(&state.tuning);
}

/// Demo pilot.
///
/// Predicts the bird's ballistic arc through the next pipe's collision band
/// and flaps at the last frame where a flap still threads the gap. Far from
/// any pipe it just hovers around the gap height.
pub fn autopilot_flap(state: &GameState) -> bool {
    let bird = &state.bird;
    let tuning = &state.tuning;
    let accel = tuning.effective_gravity();

    // Rising: nothing to decide until the apex
    if bird.vel_y > 0.0 {
        return false;
    }

    // Don't fall into the ground while waiting for a better moment
    let t = AUTOPILOT_GROUND_LOOKAHEAD;
    let y_soon = bird.y + bird.vel_y * t - 0.5 * accel * t * t;
    if y_soon < tuning.min_height + AUTOPILOT_GROUND_CLEARANCE {
        return true;
    }

    let half_width = tuning.collision_half_width();
    let Some(pipe) = state
        .pipes
        .active()
        .find(|p| p.relative_z(bird.forward_distance) < half_width)
    else {
        return bird.y < tuning.min_gap_y();
    };

    let rel = pipe.relative_z(bird.forward_distance);
    let t_enter = ((-half_width - rel) / tuning.forward_speed).max(0.0);
    let t_exit = (half_width - rel) / tuning.forward_speed;
    let lo = pipe.gap_bottom(tuning.gap_size) + tuning.bird_radius + AUTOPILOT_MARGIN;
    let hi = pipe.gap_top(tuning.gap_size) - tuning.bird_radius - AUTOPILOT_MARGIN;

    // Does the arc starting at (y0, v0) stay inside the gap over [from, to]?
    let fits = |y0: f32, v0: f32, from: f32, to: f32| {
        let at = |t: f32| y0 + v0 * t - 0.5 * accel * t * t;
        let peak_t = if accel > 0.0 {
            (v0 / accel).clamp(from, to)
        } else if v0 > 0.0 {
            to
        } else {
            from
        };
        at(from) > lo && at(to) > lo && at(peak_t) < hi
    };

    if fits(bird.y, bird.vel_y, t_enter, t_exit) {
        return false;
    }

    let flap_v = tuning.flap_velocity;
    if fits(bird.y, flap_v, t_enter, t_exit) {
        // Wait while a flap next frame would still make it
        let dt = NOMINAL_DT;
        let next_y = bird.y + bird.vel_y * dt - 0.5 * accel * dt * dt;
        let from = (t_enter - dt).max(0.0);
        let later = fits(next_y, flap_v, from, (t_exit - dt).max(from));
        return !later;
    }

    // No single flap reaches this gap yet: hover near it
    bird.y < pipe.gap_y - AUTOPILOT_HOVER_DEPTH
}
