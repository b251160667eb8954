//! Dragon Glide entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use dragon_glide::audio::AudioManager;
    use dragon_glide::renderer::CanvasRenderer;
    use dragon_glide::sim::{self, GameEvent, GamePhase, GameState};
    use dragon_glide::ui::HudModel;
    use dragon_glide::{HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, width: f32, height: f32) -> Self {
            let settings = Settings::load();
            let high_score = HighScore::load();

            let mut state = GameState::new(seed, width, height);
            state.high_score = high_score.best;

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            Self {
                state,
                renderer: None,
                audio,
                settings,
                high_score,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance the simulation one tick and fan out its events
        fn update(&mut self, time: f64) {
            sim::tick(&mut self.state);

            for event in self.state.take_events() {
                match event {
                    GameEvent::Cue(cue) => self.audio.play(cue),
                    GameEvent::HighScore(best) => {
                        if self.high_score.observe(best) {
                            self.high_score.save();
                        }
                    }
                    GameEvent::Evolved(stage) => {
                        log::info!("Now a {}", stage.display_name());
                    }
                    GameEvent::GameOver { score } => {
                        log::info!("Run ended at {}", score);
                    }
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.state);
            }
        }

        /// Push derived values into the DOM HUD
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = HudModel::from_state(&self.state);

            if let Some(el) = document.get_element_by_id("current-score") {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("high-score") {
                el.set_text_content(Some(&hud.high_score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("evolution-stage") {
                el.set_text_content(Some(hud.evolution_name));
            }
            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("fps") {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Ability badges
            for (id, ability) in [("fire-ability", &hud.fire), ("shield-ability", &hud.shield)] {
                if let Some(el) = document.get_element_by_id(id) {
                    let classes = el.class_list();
                    if ability.unlocked {
                        let _ = classes.remove_1("locked");
                        if ability.available {
                            let _ = classes.add_1("active");
                        } else {
                            let _ = classes.remove_1("active");
                        }
                    } else {
                        let _ = classes.add_1("locked");
                    }
                }
            }

            // Cooldown bars; the shield bar stays empty while the shield is up
            let fire_pct = hud.fire.cooldown_fraction * 100.0;
            let shield_pct = if self.state.abilities.shield.active {
                0.0
            } else {
                hud.shield.cooldown_fraction * 100.0
            };
            for (id, pct) in [("fire-cooldown", fire_pct), ("shield-cooldown", shield_pct)] {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("style", &format!("width: {:.0}%", pct));
                }
            }

            // Active power-up banner
            if let Some(el) = document.get_element_by_id("powerup-display") {
                match hud.powerup {
                    Some(p) => {
                        el.set_text_content(Some(&format!("{} ({}s)", p.name, p.remaining_secs)));
                        let _ = el.class_list().add_1("active");
                    }
                    None => {
                        let _ = el.class_list().remove_1("active");
                    }
                }
            }

            // Game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.class_list().remove_1("hidden");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&hud.score.to_string()));
                    }
                    if let Some(hs_el) = document.get_element_by_id("final-high-score") {
                        hs_el.set_text_content(Some(&hud.high_score.to_string()));
                    }
                } else {
                    let _ = el.class_list().add_1("hidden");
                }
            }
        }
    }

    fn view_size(window: &web_sys::Window) -> (f32, f32) {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1280.0) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(720.0) as f32;
        (width, height)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dragon Glide starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Full-window canvas, like the original page
        let (width, height) = view_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, width, height);
        log::info!("Session seed: {}", seed);

        match CanvasRenderer::new(&canvas) {
            Ok(renderer) => game.renderer = Some(renderer),
            Err(e) => log::error!("Canvas renderer unavailable: {:?}", e),
        }

        let game = Rc::new(RefCell::new(game));

        setup_input_handlers(&canvas, game.clone());
        setup_lifecycle_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Dragon Glide running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard: Space = jump, F = fire breath, S = shield
        {
            let game = game.clone();
            let document = web_sys::window().unwrap().document().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        sim::jump(&mut g.state);
                    }
                    "KeyF" => sim::use_fire_breath(&mut g.state),
                    "KeyS" => sim::use_shield(&mut g.state),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click/tap anywhere on the canvas also jumps
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                sim::jump(&mut g.state);
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("start-screen") {
                    let _ = el.class_list().add_1("hidden");
                }
                let mut g = game.borrow_mut();
                sim::start(&mut g.state);
                // Audio context needs this user gesture
                g.audio.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("game-over") {
                    let _ = el.class_list().add_1("hidden");
                }
                sim::restart(&mut game.borrow_mut().state);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                if g.state.phase == GamePhase::Playing {
                    sim::pause(&mut g.state);
                    if g.settings.mute_on_blur {
                        g.audio.set_muted(true);
                    }
                    log::info!("Auto-paused (tab hidden)");
                }
            } else if g.state.phase == GamePhase::Paused {
                sim::resume(&mut g.state);
                if g.settings.mute_on_blur {
                    let muted = g.settings.muted;
                    g.audio.set_muted(muted);
                }
                // Re-baseline the clock so the pause never reads as elapsed time
                g.last_time = 0.0;
                log::info!("Resumed (tab visible)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = view_size(&window);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
            game.borrow_mut().state.resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            // last_time == 0 marks an invalidated baseline (startup or
            // resume): drop stale FPS samples so the gap never reads as
            // elapsed time
            if g.last_time == 0.0 {
                g.frame_times = [0.0; 60];
                g.frame_index = 0;
            }
            g.last_time = time;

            g.update(time);
            g.render();
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

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dragon_glide::sim::{self, GamePhase, GameState};

    env_logger::init();
    log::info!("Dragon Glide (native) starting...");
    log::info!("The playable build targets the browser; running a headless demo session.");

    let mut state = GameState::new(0xD12A_604, 1280.0, 720.0);
    sim::start(&mut state);

    // Naive pilot: flap whenever the dragon sinks past mid-screen
    for _ in 0..3600 {
        if state.dragon.pos.y >= state.height / 2.0 {
            sim::jump(&mut state);
        }
        sim::tick(&mut state);
        let _ = state.take_events();
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "Demo run: {} ticks, score {}, stage {}",
        state.time_ticks,
        state.score,
        state.dragon.evolution.display_name()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main; this is just to satisfy the compiler
}
