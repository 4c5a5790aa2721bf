//! Run lifecycle and score bookkeeping

use serde::{Deserialize, Serialize};

use crate::highscores::HighScoreStore;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen with a static pipe preview (only at boot)
    #[default]
    NotStarted,
    /// Bird in flight
    Running,
    /// Run over, waiting for restart
    Ended,
}

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
}

/// Phase, score and high score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    phase: GamePhase,
    score: u32,
    high_score: u32,
}

impl Session {
    /// Fresh session at the title screen
    pub fn new(high_score: u32) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            score: 0,
            high_score,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Enter `Running` from `NotStarted` or `Ended`, zeroing the score.
    /// Returns false (and changes nothing) while already running.
    pub fn start(&mut self) -> bool {
        match self.phase {
            GamePhase::NotStarted | GamePhase::Ended => {
                self.score = 0;
                self.phase = GamePhase::Running;
                true
            }
            GamePhase::Running => {
                log::debug!("start() ignored: run in progress");
                false
            }
        }
    }

    /// `start()` restricted to the game-over screen
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::Ended {
            log::debug!("restart() ignored in {:?}", self.phase);
            return false;
        }
        self.start()
    }

    /// Count one passed pipe. Ignored unless running.
    pub fn add_point(&mut self) -> u32 {
        if self.is_running() {
            self.score += 1;
        }
        self.score
    }

    /// Finish the run, persisting a beaten high score.
    ///
    /// Only the first call per run does anything; later collision or ground
    /// signals get `None`.
    pub fn end(&mut self, store: &mut dyn HighScoreStore) -> Option<RunSummary> {
        if self.phase != GamePhase::Running {
            return None;
        }
        self.phase = GamePhase::Ended;

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
            store.write_high_score(self.high_score);
            log::info!("New high score: {}", self.high_score);
        }

        Some(RunSummary {
            score: self.score,
            high_score: self.high_score,
            new_high_score,
        })
    }
}
