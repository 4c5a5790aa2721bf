//! Game state and one-shot events
//!
//! `GameState` is the single owner of every simulation entity. Sub-systems
//! only ever see the bird as a borrowed snapshot handed down from here.

use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::pipes::PipeField;
use super::session::{GamePhase, RunSummary, Session};
use crate::highscores::HighScoreStore;
use crate::tuning::Tuning;

/// Notifications for the presentation layer, collected per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored { pipe_id: u32, score: u32 },
    Collided { pipe_id: u32 },
    HitGround,
    Ended {
        score: u32,
        high_score: u32,
        new_high_score: bool,
    },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub bird: Bird,
    pub pipes: PipeField,
    pub session: Session,
    /// Simulation time in seconds (advances only while running)
    pub time: f64,
    /// Ticks that reached the simulation
    pub frames: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Title-screen state with a preview window of pipes
    pub fn new(seed: u64, tuning: Tuning, high_score: u32) -> Self {
        let mut state = Self {
            tuning,
            bird: Bird::new(),
            pipes: PipeField::new(seed),
            session: Session::new(high_score),
            time: 0.0,
            frames: 0,
            events: Vec::new(),
        };
        state.pipes.fill_initial(&state.tuning);
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// Begin (or restart) a run: zero score, launch pose, fresh pipe window
    pub fn start(&mut self) -> bool {
        let started = match self.phase() {
            GamePhase::Ended => self.session.restart(),
            GamePhase::NotStarted | GamePhase::Running => self.session.start(),
        };
        if !started {
            return false;
        }
        self.bird.reset();
        self.pipes.fill_initial(&self.tuning);
        self.time = 0.0;
        self.events.push(GameEvent::Started);
        log::info!("Run started (best {})", self.session.high_score());
        true
    }

    /// Finish the run. Safe to call repeatedly; only the first call counts.
    pub fn end(&mut self, store: &mut dyn HighScoreStore) -> Option<RunSummary> {
        let summary = self.session.end(store)?;
        self.events.push(GameEvent::Ended {
            score: summary.score,
            high_score: summary.high_score,
            new_high_score: summary.new_high_score,
        });
        log::info!(
            "Run ended: score {} after {:.1} units",
            summary.score,
            self.bird.forward_distance
        );
        Some(summary)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand the pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
