//! SHPWAT FRED entry point
//!
//! Browser build: wires the canvas, input and audio to the game and runs the
//! animation frame loop. Native build: a headless autopilot run for checking
//! balance and storage from the command line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use shpwat_fred::audio::{AudioManager, SoundEffect};
    use shpwat_fred::consts::*;
    use shpwat_fred::persistence::LocalStore;
    use shpwat_fred::renderer::CanvasRenderer;
    use shpwat_fred::{Game, Tuning};

    /// Browser-side wrapper around the game
    struct App {
        game: Game,
        renderer: CanvasRenderer,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        last_time: f64,
        last_session: u32,
        music_enabled: bool,
    }

    impl App {
        /// Fit the canvas to its CSS box
        fn resize(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let w = self.canvas.client_width().max(1) as f32;
            let h = self.canvas.client_height().max(1) as f32;
            self.renderer.resize(w, h, dpr);
            self.game.resize(w, h);
        }

        /// Push settings changes made by input to the audio side
        fn sync_settings(&mut self) {
            if self.game.settings.music_enabled != self.music_enabled {
                self.music_enabled = self.game.settings.music_enabled;
                self.audio.apply_settings(&self.game.settings);
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                SIM_DT_MS
            };
            self.last_time = time;

            self.game.update(dt);

            let long_shot = self.game.state.tuning.long_shot_points;
            for event in self.game.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event, long_shot) {
                    self.audio.play(effect);
                }
            }

            if self.game.state.session != self.last_session {
                self.last_session = self.game.state.session;
                log::info!(
                    "Session {} (FREDs: {})",
                    self.last_session,
                    self.game.state.avoid.display()
                );
            }

            self.renderer.render(&self.game);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("Logger init failed: {e}")));
        }

        log::info!("SHPWAT FRED starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Tuning::default(), Box::new(LocalStore));
        let audio = AudioManager::new(&game.settings);
        let music_enabled = game.settings.music_enabled;
        let renderer = CanvasRenderer::new(canvas.clone())?;

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            audio,
            canvas: canvas.clone(),
            last_time: 0.0,
            last_session: 0,
            music_enabled,
        }));
        app.borrow_mut().resize();

        setup_input_handlers(&canvas, app.clone())?;
        setup_window_handlers(app.clone())?;

        request_animation_frame(app);

        log::info!("SHPWAT FRED running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Weapon follows the pointer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().game.pointer_move(event.offset_x() as f32);
            });
            canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click: buttons, start, fire
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                // Browsers only allow audio after a user gesture
                a.audio.resume();
                let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
                a.game.pointer_move(x);
                a.game.pointer_down(x, y);
                a.sync_settings();
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard: initials, music toggle
        {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.game.key_down(&event.key());
                a.sync_settings();
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_window_handlers(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mute on blur
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                if a.game.settings.mute_on_blur {
                    a.audio.set_blurred(true);
                    log::info!("Audio muted (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().audio.set_blurred(false);
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use shpwat_fred::consts::SIM_DT_MS;
    use shpwat_fred::persistence::{FileStore, KeyValueStore, MemoryStore};
    use shpwat_fred::sim::{GameEvent, GamePhase};
    use shpwat_fred::ui::{leaderboard_line, recap_lines, summary_lines};
    use shpwat_fred::{Game, Tuning};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Headless SHPWAT FRED autopilot run", long_about = None)]
    pub struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// Give up after this many simulated seconds
        #[arg(long, default_value_t = 300.0)]
        seconds: f32,
        /// JSON file overriding balance values
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Directory holding the leaderboard/settings slots (in-memory when omitted)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Playfield size
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path).with_context(|| format!("read tuning {:?}", path))?;
        Tuning::from_json(&json).with_context(|| format!("parse tuning {:?}", path))
    }

    pub fn run(args: Args) -> Result<()> {
        let tuning = load_tuning(args.tuning.as_ref())?;
        let store: Box<dyn KeyValueStore> = match &args.data_dir {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => Box::new(MemoryStore::new()),
        };
        let seed = match args.seed {
            Some(seed) => seed,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock before 1970")?
                .as_millis() as u64,
        };

        let mut game = Game::new(seed, tuning, store);
        game.resize(args.width, args.height);
        if !game.start() {
            bail!("could not start a session");
        }
        game.set_autopilot(true);
        log::info!("FREDs: {}", game.state.avoid.display());

        let max_steps = (args.seconds * 1000.0 / SIM_DT_MS).ceil() as u64;
        let mut steps = 0;
        let mut spawned = 0;
        while game.phase() == GamePhase::Playing && steps < max_steps {
            game.update(SIM_DT_MS);
            steps += 1;
            for event in game.drain_events() {
                match event {
                    GameEvent::TargetSpawned { .. } => spawned += 1,
                    GameEvent::ScoreChanged { score, delta } => {
                        log::debug!("score {:+} -> {}", delta, score);
                    }
                    _ => {}
                }
            }
        }

        let Some(summary) = game.state.summary.clone() else {
            println!(
                "Time limit reached: score {} after {:.1}s ({} targets)",
                game.state.score,
                game.state.elapsed_ms / 1000.0,
                spawned
            );
            return Ok(());
        };

        for line in summary_lines(&summary) {
            println!("{line}");
        }
        for (line, _) in recap_lines(&summary.counters) {
            println!("  {line}");
        }

        // Autopilot runs are never ranked; show what they would compete with
        if !game.high_scores.is_empty() {
            println!("\nLEADERBOARD");
            for (i, entry) in game.high_scores.entries.iter().enumerate() {
                println!("{}", leaderboard_line(i + 1, entry));
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("SHPWAT FRED (native) starting...");
    headless::run(headless::Args::parse())
}
