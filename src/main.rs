//! Flappy 3D entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, PointerEvent, TouchEvent};

    use flappy3d::highscores::HighScores;
    use flappy3d::input::{InputEvent, InputState, Key};
    use flappy3d::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use flappy3d::platform::{FrameClock, clock_seed, now_ms};
    use flappy3d::sim::{GameEvent, GamePhase, GameState, TickInput, sanitize_dt, tick};
    use flappy3d::{FrameView, HighScoreStore, Tuning};

    // Hands each frame to whatever renderer the page installed
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.flappyPresent === 'function') {
                window.flappyPresent(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    /// Length of the score pop CSS animation
    const SCORE_POP_MS: f64 = 300.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scores: HighScores<Box<dyn KeyValueStore>>,
        input: InputState,
        /// Start / Play Again clicked since the last frame
        start_requested: bool,
        autopilot: bool,
        clock: FrameClock,
        /// When the score pop animation class comes off (ms)
        pop_until: Option<f64>,
    }

    impl Game {
        fn new(store: Box<dyn KeyValueStore>) -> Self {
            let tuning = Tuning::load(&*store);
            let scores = HighScores::new(store);
            let high_score = scores.read_high_score();
            let seed = clock_seed();
            log::info!("Game initialized with seed: {}", seed);
            Self {
                state: GameState::new(seed, tuning, high_score),
                scores,
                input: InputState::new(),
                start_requested: false,
                autopilot: false,
                clock: FrameClock::new(),
                pop_until: None,
            }
        }

        /// Run one simulation frame
        fn update(&mut self, dt: f32) {
            // Leave a mid-run press latched for the next usable frame
            let flap = if sanitize_dt(dt).is_some() || !self.state.session.is_running() {
                self.input.take_press()
            } else {
                false
            };
            let input = TickInput {
                flap,
                start: std::mem::take(&mut self.start_requested),
                autopilot: self.autopilot,
            };
            tick(&mut self.state, &input, dt, &mut self.scores);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Ended {
                        score,
                        new_high_score: true,
                        ..
                    } => log::info!("New best: {}", score),
                    GameEvent::Collided { pipe_id } => log::debug!("Hit pipe {}", pipe_id),
                    GameEvent::HitGround => log::debug!("Hit the ground"),
                    _ => {}
                }
                self.flash_hud(event);
            }
        }

        /// One-shot HUD animations
        fn flash_hud(&mut self, event: GameEvent) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            match event {
                GameEvent::Scored { .. } => {
                    if let Some(el) = document.get_element_by_id("hud-score") {
                        let _ = el.class_list().add_1("pop");
                        self.pop_until = Some(now_ms() + SCORE_POP_MS);
                    }
                }
                GameEvent::Ended {
                    new_high_score, ..
                } => set_visible(&document, "new-best", new_high_score),
                GameEvent::Started => set_visible(&document, "new-best", false),
                _ => {}
            }
        }

        /// Publish the frame to the external renderer
        fn present(&self) {
            if let Some(json) = FrameView::capture(&self.state).to_json() {
                present_frame(&json);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            // Drop the pop class so the next point can replay it
            if self.pop_until.is_some_and(|until| now_ms() >= until) {
                self.pop_until = None;
                if let Some(el) = document.get_element_by_id("hud-score") {
                    let _ = el.class_list().remove_1("pop");
                }
            }
            let phase = self.state.phase();
            let score = self.state.session.score().to_string();
            let best = self.state.session.high_score().to_string();

            set_text(&document, "hud-score", &score);
            set_text(&document, "hud-best", &best);
            set_visible(&document, "hud", phase != GamePhase::NotStarted);
            set_visible(&document, "start-screen", phase == GamePhase::NotStarted);
            set_visible(&document, "game-over", phase == GamePhase::Ended);
            if phase == GamePhase::Ended {
                set_text(&document, "final-score", &score);
                set_text(&document, "final-best", &best);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flappy 3D starting...");

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({e:#}), high score won't persist");
                Box::new(MemoryStore::new())
            }
        };
        let game = Rc::new(RefCell::new(Game::new(store)));

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            // Hide loading indicator
            set_visible(&document, "loading", false);
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_visibility(game.clone());

        game.borrow_mut().update_hud();
        request_animation_frame(game);

        log::info!("Flappy 3D running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_code(&event.code());
                if key != Key::Other {
                    // Keep Space from scrolling the page
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                if event.key().eq_ignore_ascii_case("i") && !event.repeat() {
                    g.autopilot = !g.autopilot;
                    log::info!("Autopilot: {}", g.autopilot);
                }
                g.input.handle(InputEvent::KeyDown(key));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_code(&event.code());
                game.borrow_mut().input.handle(InputEvent::KeyUp(key));
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch (mobile)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.handle(InputEvent::TouchStart);
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.handle(InputEvent::TouchEnd);
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer on the canvas (mouse clicks)
        let Some(canvas) = window
            .document()
            .and_then(|d| d.get_element_by_id("canvas"))
        else {
            log::warn!("No #canvas element, pointer input disabled");
            return;
        };
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                // Touch already arrives through touchstart
                if event.pointer_type() != "touch" {
                    game.borrow_mut().input.handle(InputEvent::PointerDown);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.pointer_type() != "touch" {
                    game.borrow_mut().input.handle(InputEvent::PointerUp);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start_requested = true;
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_visibility(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Tab switch: drop held keys and don't count the hidden time as a frame
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.input.reset();
            g.clock.reset();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                log::info!("Tab hidden");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let dt = g.clock.advance(time);
            g.update(dt);
            g.present();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy 3D (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - serve the wasm build to play");

    demo::run(3, 60.0);
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use flappy3d::consts::NOMINAL_DT;
    use flappy3d::highscores::HighScores;
    use flappy3d::persistence::MemoryStore;
    use flappy3d::platform::clock_seed;
    use flappy3d::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use flappy3d::{HighScoreStore, Tuning};

    /// Let the autopilot fly `runs` runs of at most `max_secs` each
    pub fn run(runs: u32, max_secs: f32) {
        let mut scores = HighScores::new(MemoryStore::new());
        let seed = clock_seed();
        let mut state = GameState::new(seed, Tuning::default(), scores.read_high_score());
        log::info!("Demo seed: {}", seed);

        let max_frames = (max_secs / NOMINAL_DT) as u32;
        for run in 1..=runs {
            let start = TickInput {
                start: true,
                ..Default::default()
            };
            tick(&mut state, &start, NOMINAL_DT, &mut scores);

            let input = TickInput {
                autopilot: true,
                ..Default::default()
            };
            let mut frames = 0;
            while state.phase() == GamePhase::Running && frames < max_frames {
                tick(&mut state, &input, NOMINAL_DT, &mut scores);
                frames += 1;
            }
            if state.phase() == GamePhase::Running {
                // Out of time - close the run like a crash would
                state.end(&mut scores);
            }

            let cause = state
                .drain_events()
                .into_iter()
                .find_map(|e| match e {
                    GameEvent::Collided { pipe_id } => Some(format!("hit pipe {pipe_id}")),
                    GameEvent::HitGround => Some("hit the ground".to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| "time limit".to_string());

            println!(
                "Run {}: score {} ({}, {:.1} units, {} frames)",
                run,
                state.session.score(),
                cause,
                state.bird.forward_distance,
                frames
            );
        }
        println!("Best: {}", state.session.high_score());
    }
}
