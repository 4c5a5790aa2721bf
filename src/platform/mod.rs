//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Frame timestamps -> simulation deltas
//! - RNG seeding

use crate::consts::NOMINAL_DT;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for the pipe RNG, taken from the clock so every run differs
pub fn clock_seed() -> u64 {
    now_ms() as u64
}

/// Converts `requestAnimationFrame` timestamps into frame deltas (seconds)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame. The first frame after construction or
    /// `reset` gets a nominal delta.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => NOMINAL_DT,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the last timestamp (tab became visible again)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
