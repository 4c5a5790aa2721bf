//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep, sanitized per frame
//! - Pipe RNG owned by the pipe field (seeded by the host)
//! - Stable iteration order (by pipe ID)
//! - No rendering or platform dependencies

pub mod bird;
pub mod collision;
pub mod pipes;
pub mod session;
pub mod state;
pub mod tick;

pub use bird::{Bird, BirdStep};
pub use collision::{Evaluation, GapCheck, check_gap, evaluate, passes_through_gap};
pub use pipes::{Pipe, PipeField};
pub use session::{GamePhase, RunSummary, Session};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, autopilot_flap, sanitize_dt, tick};
