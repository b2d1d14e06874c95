//! Flappy Pig entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_pig::consts::SIM_DT;
    use flappy_pig::renderer::{RenderState, scene};
    use flappy_pig::sim::GamePhase;
    use flappy_pig::{Game, SimConfig};

    /// Browser-side session: the game plus everything needed to draw it
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        last_time: f64,
        /// Last values written to the DOM
        shown_score: Option<u32>,
        shown_phase: Option<GamePhase>,
    }

    impl App {
        fn new(game: Game) -> Self {
            Self {
                game,
                render_state: None,
                last_time: 0.0,
                shown_score: None,
                shown_phase: None,
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene::build(self.game.state(), self.game.config());
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM, only touching what changed
        fn update_hud(&mut self, document: &Document) {
            let state = self.game.state();

            if self.shown_score != Some(state.score) {
                if let Some(el) = document.get_element_by_id("hud-score") {
                    el.set_text_content(Some(&state.score.to_string()));
                }
                self.shown_score = Some(state.score);
            }

            if self.shown_phase == Some(state.phase) {
                return;
            }
            self.shown_phase = Some(state.phase);

            set_visible(document, "ready-prompt", state.phase == GamePhase::Ready);
            set_visible(document, "game-over", state.phase == GamePhase::GameOver);
            if state.phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&state.score.to_string()));
                }
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Flappy Pig starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(SimConfig::default(), seed).map_err(js_error)?;
        let playfield = glam::Vec2::new(game.config().game_width, game.config().game_height);
        let app = Rc::new(RefCell::new(App::new(game)));

        // Initialize WebGPU, falling back to WebGL
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_error)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_error)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, playfield)
            .await
            .map_err(js_error)?;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, &canvas, app.clone());
        setup_retry_button(&document, app.clone());

        set_visible(&document, "hud", true);

        request_animation_frame(app);

        log::info!("Flappy Pig running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.request_flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.request_flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "Enter" => {
                        // Keep Space and arrows from scrolling the page
                        event.prevent_default();
                        if !event.repeat() {
                            app.game.request_flap();
                        }
                    }
                    "i" | "I" => {
                        let enabled = !app.game.autopilot();
                        app.game.set_autopilot(enabled);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_retry_button(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("retry-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                app.borrow_mut().game.retry(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.game.advance(dt);
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;

    use flappy_pig::{Game, GameState, SimConfig};

    /// Five minutes of play at 60 Hz
    const DEFAULT_FRAMES: u64 = 60 * 60 * 5;

    /// Headless autopilot run of the flappy pig simulation
    #[derive(Parser, Debug)]
    #[command(name = "flappy-pig")]
    #[command(version, about = "Runs the flappy pig simulation under the autopilot", long_about = None)]
    pub struct Cli {
        /// RNG seed for pipe placement
        #[arg(default_value_t = 0)]
        pub seed: u64,

        /// Maximum number of frames to simulate
        #[arg(default_value_t = DEFAULT_FRAMES)]
        pub frames: u64,

        /// JSON file with (partial) simulation overrides
        #[arg(long, env = "FLAPPY_CONFIG")]
        pub config: Option<PathBuf>,
    }

    pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
        let Some(path) = path else {
            return Ok(SimConfig::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = SimConfig::from_json(&json)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Play until game over or until `frames` run out
    pub fn simulate(config: SimConfig, seed: u64, frames: u64) -> Result<GameState> {
        let mut game = Game::new(config, seed).context("invalid config")?;
        game.set_autopilot(true);

        for _ in 0..frames {
            if game.state().is_over() {
                break;
            }
            game.step_once();
        }
        Ok(game.state().clone())
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Flappy Pig (native) starting with seed {}", cli.seed);

        let config = load_config(cli.config.as_deref())?;
        let state = simulate(config, cli.seed, cli.frames)?;
        log::info!(
            "Finished: phase {:?}, score {}, {} frames, speed {:.2}",
            state.phase,
            state.score,
            state.time_ticks,
            state.speed
        );

        let json = serde_json::to_string_pretty(&state).context("failed to serialize state")?;
        println!("{}", json);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
