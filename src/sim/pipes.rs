//! Pipe stream generation
//!
//! Pipes are stored in an arena of slots ordered by id. A pipe that scrolls
//! past the fade distance is tombstoned (`removed = true`) in place and the
//! arena is compacted only once tombstones outnumber the live window, so a
//! normal frame never reallocates.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::relative_z;
use crate::tuning::Tuning;

/// One gated obstacle (upper + lower pipe around a gap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Fixed world z; more negative = farther ahead
    pub anchor_z: f32,
    /// Vertical center of the gap
    pub gap_y: f32,
    /// Bird overtook this pipe (scored)
    pub passed: bool,
    /// Faded out behind the bird; never revived
    pub removed: bool,
}

impl Pipe {
    /// Top edge of the gap
    pub fn gap_top(&self, gap_size: f32) -> f32 {
        self.gap_y + gap_size / 2.0
    }

    /// Bottom edge of the gap
    pub fn gap_bottom(&self, gap_size: f32) -> f32 {
        self.gap_y - gap_size / 2.0
    }

    /// Position in the bird's local frame
    pub fn relative_z(&self, forward_distance: f32) -> f32 {
        relative_z(self.anchor_z, forward_distance)
    }
}

/// The live window of pipes ahead of (and just behind) the bird
#[derive(Debug, Clone)]
pub struct PipeField {
    /// Slots in ascending id order, tombstones included until compaction
    slots: Vec<Pipe>,
    /// Next pipe id (never reused, also across restarts)
    next_id: u32,
    /// Anchor of the farthest pipe ever generated
    farthest_anchor: Option<f32>,
    rng: Pcg32,
}

impl PipeField {
    pub fn new(seed: u64) -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
            farthest_anchor: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Drop every pipe and lay out a fresh window ahead of the bird
    pub fn fill_initial(&mut self, tuning: &Tuning) {
        self.slots.clear();
        self.farthest_anchor = None;
        self.spawn(tuning.pipe_count, tuning);
        log::debug!(
            "Initial pipe window: ids {}..{}",
            self.next_id - tuning.pipe_count as u32,
            self.next_id
        );
    }

    /// Top the window back up to `pipe_count` once it has thinned to
    /// `pipe_threshold`. Returns how many pipes were generated.
    pub fn replenish(&mut self, tuning: &Tuning) -> usize {
        let active = self.active_count();
        if active > tuning.pipe_threshold {
            return 0;
        }
        let count = tuning.pipe_count.saturating_sub(active);
        self.spawn(count, tuning);
        log::debug!("Replenished {} pipes ({} were left)", count, active);
        count
    }

    /// Random gap center, uniform in `[min_gap_y, gap_y_max)`
    pub fn random_gap_y(&mut self, tuning: &Tuning) -> f32 {
        let min = tuning.min_gap_y();
        let max = tuning.gap_y_max;
        debug_assert!(min < max, "empty gap range {min}..{max}");
        if min < max {
            self.rng.random_range(min..max)
        } else {
            min
        }
    }

    /// Generate `count` pipes beyond the farthest one, `pipe_spacing` apart
    fn spawn(&mut self, count: usize, tuning: &Tuning) {
        debug_assert!(tuning.gap_size > 0.0, "gap size must be positive");
        self.slots.reserve(count);

        for _ in 0..count {
            let anchor_z = match self.farthest_anchor {
                Some(last) => last - tuning.pipe_spacing,
                None => -tuning.first_pipe_offset,
            };
            let gap_y = self.random_gap_y(tuning);
            let id = self.next_id;
            self.next_id += 1;

            debug_assert!(
                self.slots.last().is_none_or(|p| p.id < id),
                "pipe ids must increase"
            );
            self.slots.push(Pipe {
                id,
                anchor_z,
                gap_y,
                passed: false,
                removed: false,
            });
            self.farthest_anchor = Some(anchor_z);
        }
    }

    /// Number of pipes not yet removed
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| !p.removed).count()
    }

    /// Live pipes in ascending id order
    pub fn active(&self) -> impl Iterator<Item = &Pipe> {
        self.slots.iter().filter(|p| !p.removed)
    }

    /// Live pipes in ascending id order, mutable
    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Pipe> {
        self.slots.iter_mut().filter(|p| !p.removed)
    }

    /// Look up a pipe by id (removed pipes included until compaction)
    pub fn get(&self, id: u32) -> Option<&Pipe> {
        self.slots
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.slots[i])
    }

    /// Number of arena slots, tombstones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Next id that will be handed out
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Drop tombstones once they outnumber the window size
    pub fn compact(&mut self, tuning: &Tuning) -> bool {
        let tombstones = self.slots.len() - self.active_count();
        if tombstones <= tuning.pipe_count {
            return false;
        }
        self.slots.retain(|p| !p.removed);
        log::debug!("Compacted {} removed pipes", tombstones);
        true
    }

    /// Cosmetic fade for a pipe behind the bird (1 = opaque, 0 = gone)
    pub fn opacity(relative_z: f32, tuning: &Tuning) -> f32 {
        if relative_z <= tuning.fade_start_distance {
            return 1.0;
        }
        if relative_z >= tuning.fade_end_distance {
            return 0.0;
        }
        1.0 - (relative_z - tuning.fade_start_distance)
            / (tuning.fade_end_distance - tuning.fade_start_distance)
    }
}
