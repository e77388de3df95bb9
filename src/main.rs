//! Math Asteroids entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent, MouseEvent};

    use math_asteroids::audio::{AudioManager, SoundEffect};
    use math_asteroids::consts::ANSWER_LOCK_MS;
    use math_asteroids::platform::{FrameCallback, FrameScheduler};
    use math_asteroids::renderer::{CanvasRenderer, paint_starfield};
    use math_asteroids::sim::{self, GameEvent, GameState, Operation};
    use math_asteroids::{HighScore, Settings};

    /// `requestAnimationFrame`-backed scheduler. Holds the pending handle so
    /// teardown and pause leave no dangling callback.
    struct RafScheduler {
        pending: Option<i32>,
    }

    impl RafScheduler {
        fn new() -> Self {
            Self { pending: None }
        }
    }

    impl FrameScheduler for RafScheduler {
        fn schedule_next(&mut self, callback: FrameCallback) {
            self.cancel();
            let closure = Closure::once(move |time: f64| callback(time));
            if let Some(window) = web_sys::window() {
                match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                    Ok(handle) => self.pending = Some(handle),
                    Err(_) => log::warn!("requestAnimationFrame failed"),
                }
            }
            closure.forget();
        }

        fn cancel(&mut self) {
            if let Some(handle) = self.pending.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }
    }

    /// Game instance holding all state and resource handles.
    ///
    /// Owned session context instead of module-level singletons; everything
    /// is torn down together when the instance drops.
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        scheduler: RafScheduler,
        canvas: HtmlCanvasElement,
        /// Pending wrong-answer unlock timer
        unlock_timeout: Option<i32>,
        /// Guards against double-scheduling the frame chain
        loop_running: bool,
    }

    impl Game {
        /// Push score/lives/choices and overlay visibility into the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "hud-score", &self.state.score.to_string());
            set_text(&document, "hud-lives", &self.state.lives.to_string());
            set_text(&document, "hud-best", &self.high_score.0.to_string());

            // Answer buttons mirror the current target's choices
            if let Some(choices) = self.state.current_choices() {
                for (i, choice) in choices.iter().enumerate() {
                    set_text(&document, &format!("answer-{i}"), &choice.to_string());
                }
            }

            set_hidden(&document, "game-over", !self.state.game_over);
            set_hidden(
                &document,
                "pause-menu",
                !(self.state.paused && !self.state.game_over),
            );
            set_hidden(&document, "settings-panel", !self.settings.show_settings);

            if self.state.game_over {
                set_text(&document, "final-score", &self.state.score.to_string());
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Map state-machine events to audio, persistence, and the unlock timer
    fn handle_events(game: &Rc<RefCell<Game>>, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Correct => game.borrow().audio.play(SoundEffect::Correct),
                GameEvent::Incorrect { unlock_generation } => {
                    game.borrow().audio.play(SoundEffect::Incorrect);
                    schedule_unlock(game, unlock_generation);
                }
                GameEvent::LifeLost => game.borrow().audio.play(SoundEffect::LifeLost),
                GameEvent::GameOver { final_score } => {
                    let mut g = game.borrow_mut();
                    log::info!("Game over with score {}", final_score);
                    if g.high_score.record(final_score) {
                        log::info!("New high score: {}", final_score);
                    }
                }
            }
        }
    }

    /// Arm the wrong-answer cooldown timer.
    ///
    /// The generation guard in `clear_answer_lock` makes a stale timer a
    /// no-op, but the handle is still tracked so restart can clear it early.
    fn schedule_unlock(game: &Rc<RefCell<Game>>, generation: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_ref = game.clone();
        let closure = Closure::once(move || {
            let mut g = game_ref.borrow_mut();
            g.unlock_timeout = None;
            g.state.clear_answer_lock(generation);
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ANSWER_LOCK_MS,
        ) {
            Ok(handle) => {
                let mut g = game.borrow_mut();
                if let Some(old) = g.unlock_timeout.replace(handle) {
                    window.clear_timeout_with_handle(old);
                }
            }
            Err(_) => log::warn!("Failed to schedule unlock timer"),
        }
        closure.forget();
    }

    /// Cancel any pending unlock timer (restart path)
    fn cancel_unlock(game: &mut Game) {
        if let Some(handle) = game.unlock_timeout.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    /// One frame: advance, render the snapshot, update the HUD, reschedule
    /// unless the game paused (the chain restarts on resume).
    fn game_loop(game: Rc<RefCell<Game>>, _time: f64) {
        let events = {
            let mut g = game.borrow_mut();

            // The 2D context can show up late; retry until it does
            if g.renderer.is_none() {
                g.renderer = CanvasRenderer::new(&g.canvas);
            }

            let events = sim::advance(&mut g.state);
            let snapshot = g.state.snapshot();
            if let Some(renderer) = &g.renderer {
                renderer.render(&snapshot);
            }
            g.update_hud();
            events
        };
        handle_events(&game, events);

        let mut g = game.borrow_mut();
        if g.state.paused {
            g.loop_running = false;
        } else {
            let game_next = game.clone();
            g.scheduler
                .schedule_next(Box::new(move |time| game_loop(game_next, time)));
        }
    }

    /// Start the frame chain if it is not already running
    fn start_loop(game: &Rc<RefCell<Game>>) {
        let game_next = game.clone();
        let mut g = game.borrow_mut();
        if g.loop_running {
            return;
        }
        g.loop_running = true;
        g.scheduler
            .schedule_next(Box::new(move |time| game_loop(game_next, time)));
    }

    /// Submit the choice at `index` on the current target
    fn submit_choice(game: &Rc<RefCell<Game>>, index: usize) {
        let events = {
            let mut g = game.borrow_mut();
            match g.state.current_choices() {
                Some(choices) if index < choices.len() => {
                    sim::submit_answer(&mut g.state, choices[index])
                }
                _ => Vec::new(),
            }
        };
        handle_events(game, events);
    }

    fn toggle_pause(game: &Rc<RefCell<Game>>) {
        let resumed = {
            let mut g = game.borrow_mut();
            sim::toggle_pause(&mut g.state);
            !g.state.paused
        };
        if resumed {
            start_loop(game);
        }
        // When pausing, the pending frame runs once more and halts the chain
    }

    /// Fresh run with the same operation; cancels the pending unlock timer
    fn restart(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            cancel_unlock(&mut g);
            g.state.reset();
        }
        log::info!("Game restarted");
        start_loop(game);
    }

    /// New run with a different operation (new seed, viewport kept)
    fn change_operation(game: &Rc<RefCell<Game>>, operation: Operation) {
        {
            let mut g = game.borrow_mut();
            cancel_unlock(&mut g);
            let viewport = g.state.viewport;
            let seed = js_sys::Date::now() as u64;
            g.state = GameState::new(seed, operation);
            g.state.viewport = viewport;
        }
        log::info!("Operation changed to {}", operation.as_str());
        start_loop(game);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Math Asteroids starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = size_canvases(&window, &document, &canvas);

        // Operation is chosen before the run and immutable for its duration
        let operation = document
            .get_element_by_id("operation")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .and_then(|sel| Operation::from_str(&sel.value()))
            .unwrap_or_default();

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, operation);
        state.set_viewport(width, height);

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.set_muted(!settings.sound_enabled);

        let renderer = CanvasRenderer::new(&canvas);
        if renderer.is_none() {
            log::warn!("2D context unavailable, frames will be skipped until it appears");
        }

        let game = Rc::new(RefCell::new(Game {
            state,
            renderer,
            audio,
            settings,
            high_score: HighScore::load(),
            scheduler: RafScheduler::new(),
            canvas: canvas.clone(),
            unlock_timeout: None,
            loop_running: false,
        }));

        log::info!(
            "Game initialized: seed {}, operation {}",
            seed,
            operation.as_str()
        );

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());
        setup_auto_pause(game.clone());

        start_loop(&game);

        log::info!("Math Asteroids running!");
    }

    /// Size both canvases to the window and repaint the starfield.
    /// Returns the game canvas dimensions in device pixels.
    fn size_canvases(
        window: &web_sys::Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
    ) -> (f32, f32) {
        let dpr = window.device_pixel_ratio();
        let client_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let client_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        let width = (client_w * dpr) as u32;
        let height = (client_h * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        if let Some(bg) = document
            .get_element_by_id("background-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            bg.set_width(width);
            bg.set_height(height);
            paint_starfield(&bg);
        }

        (width as f32, height as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard: 1-4 pick the corresponding visible choice, Escape pauses
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "1" => submit_choice(&game, 0),
                    "2" => submit_choice(&game, 1),
                    "3" => submit_choice(&game, 2),
                    "4" => submit_choice(&game, 3),
                    "Escape" => toggle_pause(&game),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Canvas click restarts after game over (original behavior)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if game.borrow().state.game_over {
                    restart(&game);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Answer buttons
        for index in 0..4 {
            if let Some(btn) = document.get_element_by_id(&format!("answer-{index}")) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    submit_choice(&game, index);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Restart button
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                restart(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause button
        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle_pause(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Settings panel toggle
        if let Some(btn) = document.get_element_by_id("settings-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.toggle_panel();
                g.update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Sound toggle
        if let Some(btn) = document.get_element_by_id("sound-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.toggle_sound();
                let muted = !g.settings.sound_enabled;
                g.audio.set_muted(muted);
                log::info!("Sound {}", if muted { "muted" } else { "enabled" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Operation selector starts a new run on change
        if let Some(select) = document
            .get_element_by_id("operation")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(operation) = Operation::from_str(&select_clone.value()) {
                    change_operation(&game, operation);
                }
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(document) = window.document() else {
                return;
            };
            let mut g = game.borrow_mut();
            let canvas = g.canvas.clone();
            let (width, height) = size_canvases(&window, &document, &canvas);
            // Layout changes only affect future spawns
            g.state.set_viewport(width, height);
            if let Some(renderer) = &mut g.renderer {
                renderer.resize(width as f64, height as f64);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let should_pause = {
                    let g = game.borrow();
                    !g.state.paused && !g.state.game_over
                };
                if should_pause {
                    toggle_pause(&game);
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use math_asteroids::sim::{self, GameState, Operation};

    env_logger::init();
    log::info!("Math Asteroids (native) starting...");
    log::info!("Run with `trunk serve` for the web version");

    // Headless smoke run
    let mut state = GameState::new(42, Operation::Multiplication);
    state.set_viewport(1280.0, 720.0);
    let mut events = 0;
    for _ in 0..600 {
        events += sim::advance(&mut state).len();
    }
    println!(
        "Simulated 600 ticks: score={} lives={} asteroids={} events={}",
        state.score,
        state.lives,
        state.asteroids.len(),
        events
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
