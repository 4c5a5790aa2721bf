//! Whole-run scenarios driven through the public API

use flappy3d::consts::NOMINAL_DT;
use flappy3d::highscores::HighScores;
use flappy3d::input::{InputEvent, InputState, Key};
use flappy3d::persistence::{KeyValueStore, MemoryStore};
use flappy3d::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use flappy3d::{FrameView, HighScoreStore, Tuning};

/// Bird floats and pipes can't be hit
fn ghost_tuning() -> Tuning {
    Tuning {
        gravity: 0.0,
        pipe_width: 0.0,
        ..Default::default()
    }
}

fn run_frames(
    state: &mut GameState,
    input: &TickInput,
    frames: usize,
    scores: &mut HighScores<MemoryStore>,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        tick(state, input, NOMINAL_DT, scores);
        events.extend(state.drain_events());
    }
    events
}

fn start(state: &mut GameState, scores: &mut HighScores<MemoryStore>) {
    let input = TickInput {
        start: true,
        ..Default::default()
    };
    tick(state, &input, NOMINAL_DT, scores);
    assert_eq!(state.phase(), GamePhase::Running);
}

#[test]
fn held_key_flaps_once() {
    let mut scores = HighScores::new(MemoryStore::new());
    let mut state = GameState::new(9, Tuning::default(), 0);
    let mut input = InputState::new();
    let mut flaps = 0;

    input.handle(InputEvent::KeyDown(Key::Space));
    for frame in 0..60 {
        // Key repeat keeps re-sending keydown while held
        if frame % 5 == 0 {
            input.handle(InputEvent::KeyDown(Key::Space));
        }
        let cmd = TickInput {
            flap: input.take_press(),
            ..Default::default()
        };
        tick(&mut state, &cmd, NOMINAL_DT, &mut scores);
        flaps += state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::Flapped)
            .count();
    }
    assert_eq!(flaps, 1);
    assert_eq!(state.phase(), GamePhase::Running);

    input.handle(InputEvent::KeyUp(Key::Space));
    input.handle(InputEvent::TouchStart);
    assert!(input.take_press());
}

#[test]
fn crash_then_restart_resets_run() {
    let mut scores = HighScores::new(MemoryStore::new());
    let mut state = GameState::new(9, Tuning::default(), 0);
    start(&mut state, &mut scores);

    let events = run_frames(&mut state, &TickInput::default(), 600, &mut scores);
    assert_eq!(state.phase(), GamePhase::Ended);
    assert!(events.contains(&GameEvent::HitGround));
    assert!(FrameView::capture(&state).pipes.is_empty());

    start(&mut state, &mut scores);
    assert_eq!(state.session.score(), 0);
    // One frame of gravity since the reset
    assert!(state.bird.y.abs() < 0.01);
    assert!(state.bird.vel_y <= 0.0 && state.bird.vel_y > -0.1);
    assert!(state.bird.forward_distance > 0.0 && state.bird.forward_distance < 1.0);
    assert_eq!(state.pipes.active_count(), state.tuning.pipe_count);
}

#[test]
fn high_score_is_max_of_runs() {
    let mut scores = HighScores::new(MemoryStore::new());
    scores.write_high_score(5);
    let mut state = GameState::new(9, ghost_tuning(), scores.read_high_score());

    // ~30 s of flight clears 11 pipes
    start(&mut state, &mut scores);
    run_frames(&mut state, &TickInput::default(), 60 * 30, &mut scores);
    let summary = state.end(&mut scores).unwrap();
    assert_eq!(summary.score, 11);
    assert!(summary.new_high_score);
    assert_eq!(scores.read_high_score(), 11);

    // A shorter run leaves the best untouched
    start(&mut state, &mut scores);
    run_frames(&mut state, &TickInput::default(), 60 * 5, &mut scores);
    let summary = state.end(&mut scores).unwrap();
    assert!(summary.score < 11);
    assert!(!summary.new_high_score);
    assert_eq!(summary.high_score, 11);
    assert_eq!(scores.read_high_score(), 11);
    assert_eq!(
        scores
            .store()
            .get(HighScores::<MemoryStore>::STORAGE_KEY)
            .unwrap()
            .as_deref(),
        Some("11")
    );
}

#[test]
fn pipe_window_stays_ahead_over_long_flight() {
    let mut scores = HighScores::new(MemoryStore::new());
    let mut state = GameState::new(77, ghost_tuning(), 0);
    start(&mut state, &mut scores);

    for _ in 0..(60 * 120) {
        tick(&mut state, &TickInput::default(), NOMINAL_DT, &mut scores);
        let active = state.pipes.active_count();
        assert!(active >= state.tuning.pipe_threshold);
        assert!(active <= state.tuning.pipe_count);
        // Arena never grows without bound
        assert!(state.pipes.slot_count() <= state.tuning.pipe_count * 3);
    }
    assert_eq!(state.phase(), GamePhase::Running);

    let ids: Vec<u32> = state.pipes.active().map(|p| p.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    let min_gap = state.tuning.min_gap_y();
    assert!(
        state
            .pipes
            .active()
            .all(|p| p.gap_y >= min_gap && p.gap_y <= state.tuning.gap_y_max)
    );
}

#[test]
fn autopilot_survives_default_tuning() {
    let mut scores = HighScores::new(MemoryStore::new());
    let mut state = GameState::new(5, Tuning::default(), 0);
    start(&mut state, &mut scores);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let events = run_frames(&mut state, &input, 60 * 3, &mut scores);
    // Keeps the bird off the floor until the first pipe arrives
    assert!(!events.contains(&GameEvent::HitGround));
    assert!(state.bird.forward_distance > 18.0);
}

#[test]
fn tuning_override_from_store() {
    let mut store = MemoryStore::new();
    store
        .set(Tuning::STORAGE_KEY, r#"{"forward_speed": 10.0}"#)
        .unwrap();
    let tuning = Tuning::load(&store);
    assert_eq!(tuning.forward_speed, 10.0);
    assert_eq!(tuning.gap_size, Tuning::default().gap_size);

    let mut scores = HighScores::new(store);
    let mut state = GameState::new(1, tuning, 0);
    start(&mut state, &mut scores);
    assert!((state.bird.forward_distance - 10.0 * NOMINAL_DT).abs() < 1e-5);
}
