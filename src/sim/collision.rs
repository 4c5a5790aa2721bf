//! Collision and scoring against the pipe window
//!
//! Pipes are tested in the bird's local frame: `relative_z` is negative while
//! a pipe is ahead, crosses zero as the bird overtakes it, and keeps growing
//! while it fades out behind.

use super::bird::Bird;
use super::pipes::{Pipe, PipeField};
use crate::tuning::Tuning;

/// Where the bird stands relative to one pipe's gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapCheck {
    /// Pipe is outside the collision band
    Clear,
    /// Inside the band and fully within the gap
    Threading,
    /// Inside the band and touching a pipe
    Hit,
}

/// Result of evaluating the whole window for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// First pipe (lowest id) the bird hit; evaluation stops there
    pub collided: Option<u32>,
    /// Ids of pipes passed this frame, ascending
    pub scored: Vec<u32>,
    /// Pipes that faded out this frame
    pub removed: usize,
}

/// Bird interval `[y - r, y + r]` strictly inside the gap
pub fn passes_through_gap(bird_y: f32, radius: f32, gap_y: f32, gap_size: f32) -> bool {
    let top = gap_y + gap_size / 2.0;
    let bottom = gap_y - gap_size / 2.0;
    bird_y + radius < top && bird_y - radius > bottom
}

/// The bird overlaps the pipe's thickness along z
pub fn in_collision_band(relative_z: f32, tuning: &Tuning) -> bool {
    relative_z.abs() < tuning.collision_half_width()
}

/// Gap test for a single pipe
pub fn check_gap(bird: &Bird, pipe: &Pipe, tuning: &Tuning) -> GapCheck {
    let rel = pipe.relative_z(bird.forward_distance);
    if !in_collision_band(rel, tuning) {
        return GapCheck::Clear;
    }
    if passes_through_gap(bird.y, tuning.bird_radius, pipe.gap_y, tuning.gap_size) {
        GapCheck::Threading
    } else {
        GapCheck::Hit
    }
}

/// Run the collision, scoring and removal tests over every live pipe in
/// ascending id order.
///
/// A hit stops evaluation immediately: pipes after it are left untouched so
/// nothing mutates once the run is over.
pub fn evaluate(field: &mut PipeField, bird: &Bird, tuning: &Tuning) -> Evaluation {
    let mut result = Evaluation::default();

    for pipe in field.active_mut() {
        let rel = pipe.relative_z(bird.forward_distance);

        if check_gap(bird, pipe, tuning) == GapCheck::Hit {
            result.collided = Some(pipe.id);
            return result;
        }

        if !pipe.passed && rel > tuning.pass_threshold {
            pipe.passed = true;
            result.scored.push(pipe.id);
        }

        if rel >= tuning.fade_end_distance {
            pipe.removed = true;
            result.removed += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe(id: u32, anchor_z: f32, gap_y: f32) -> Pipe {
        Pipe {
            id,
            anchor_z,
            gap_y,
            passed: false,
            removed: false,
        }
    }

    fn bird_at(y: f32, forward_distance: f32) -> Bird {
        Bird {
            y,
            forward_distance,
            ..Default::default()
        }
    }

    #[test]
    fn test_gap_safety_centered_passes() {
        let tuning = Tuning::default();
        let p = pipe(0, -20.0, 5.0);
        // Sweep relative z from +1 down to -1
        for i in 0..=20 {
            let rel = 1.0 - i as f32 * 0.1;
            let bird = bird_at(5.0, rel - p.anchor_z);
            assert_ne!(check_gap(&bird, &p, &tuning), GapCheck::Hit, "rel {rel}");
        }
    }

    #[test]
    fn test_gap_safety_high_collides() {
        let tuning = Tuning::default();
        let p = pipe(0, -20.0, 5.0);
        for i in 0..=20 {
            let rel = 1.0 - i as f32 * 0.1;
            let bird = bird_at(9.0, rel - p.anchor_z);
            assert_eq!(check_gap(&bird, &p, &tuning), GapCheck::Hit, "rel {rel}");
        }
    }

    #[test]
    fn test_radius_counts_against_edges() {
        // Center 6.4 with radius 0.7 reaches 7.1 > top edge 7
        assert!(!passes_through_gap(6.4, 0.7, 5.0, 4.0));
        assert!(passes_through_gap(6.2, 0.7, 5.0, 4.0));
        assert!(!passes_through_gap(3.6, 0.7, 5.0, 4.0));
        assert!(passes_through_gap(3.8, 0.7, 5.0, 4.0));
    }

    #[test]
    fn test_outside_band_never_hits() {
        let tuning = Tuning::default();
        let p = pipe(0, -20.0, 5.0);
        // Band half-width is 2.0 * 0.8 = 1.6
        assert_eq!(check_gap(&bird_at(-3.0, 20.0 - 1.7), &p, &tuning), GapCheck::Clear);
        assert_eq!(check_gap(&bird_at(-3.0, 20.0 + 2.0), &p, &tuning), GapCheck::Clear);
        assert_eq!(check_gap(&bird_at(-3.0, 20.0 - 1.5), &p, &tuning), GapCheck::Hit);
    }

    #[test]
    fn test_score_fires_once() {
        let tuning = Tuning::default();
        let mut field = PipeField::new(7);
        field.fill_initial(&tuning);
        let first = field.active().next().unwrap().clone();

        // Just behind the anchor, threading the gap
        let bird = bird_at(first.gap_y, -first.anchor_z + 0.5);
        let eval = evaluate(&mut field, &bird, &tuning);
        assert_eq!(eval.collided, None);
        assert_eq!(eval.scored, vec![first.id]);

        // Replaying the same frame does not score again
        let eval = evaluate(&mut field, &bird, &tuning);
        assert!(eval.scored.is_empty());
        assert!(field.get(first.id).unwrap().passed);
    }

    #[test]
    fn test_not_scored_at_anchor() {
        let tuning = Tuning::default();
        let mut field = PipeField::new(8);
        field.fill_initial(&tuning);
        let first = field.active().next().unwrap().clone();
        let bird = bird_at(first.gap_y, -first.anchor_z);
        assert!(evaluate(&mut field, &bird, &tuning).scored.is_empty());
    }

    #[test]
    fn test_removal_after_fade_without_rescoring() {
        let tuning = Tuning::default();
        let mut field = PipeField::new(9);
        field.fill_initial(&tuning);
        let first = field.active().next().unwrap().clone();

        let bird = bird_at(first.gap_y, -first.anchor_z + 0.5);
        evaluate(&mut field, &bird, &tuning);

        let bird = bird_at(first.gap_y, -first.anchor_z + tuning.fade_end_distance);
        let eval = evaluate(&mut field, &bird, &tuning);
        assert!(eval.scored.is_empty());
        assert_eq!(eval.removed, 1);
        assert_eq!(field.active_count(), tuning.pipe_count - 1);
        assert!(field.get(first.id).unwrap().removed);
    }

    #[test]
    fn test_pass_and_remove_same_frame() {
        let tuning = Tuning::default();
        let mut field = PipeField::new(10);
        field.fill_initial(&tuning);
        let first = field.active().next().unwrap().clone();
        // One big jump straight past the fade distance
        let bird = bird_at(first.gap_y, -first.anchor_z + 5.0);
        let eval = evaluate(&mut field, &bird, &tuning);
        assert_eq!(eval.scored, vec![first.id]);
        assert_eq!(eval.removed, 1);
    }

    #[test]
    fn test_hit_stops_evaluation() {
        let tuning = Tuning::default();
        let mut field = PipeField::new(11);
        field.fill_initial(&tuning);
        let first = field.active().next().unwrap().clone();
        // Inside the band of the first pipe, far below its gap
        let bird = bird_at(first.gap_bottom(tuning.gap_size) - 2.0, -first.anchor_z + 0.5);
        let eval = evaluate(&mut field, &bird, &tuning);
        assert_eq!(eval.collided, Some(first.id));
        assert!(eval.scored.is_empty());
        assert!(!field.get(first.id).unwrap().passed);
    }
}
