//! Brick Racket entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use brick_racket::Settings;
    use brick_racket::atlas::SpriteSheet;
    use brick_racket::consts::SIM_DT;
    use brick_racket::platform::dom::{self, DomSink};
    use brick_racket::platform::{Keyboard, keyboard};
    use brick_racket::renderer::{RenderState, build_vertices};
    use brick_racket::sim::{ArenaLayout, DiagnosticsSink, NullSink, Simulation, tick};

    type Sink = Box<dyn DiagnosticsSink>;

    /// Game instance holding all state
    struct Game {
        sim: Simulation<Sink>,
        sheet: SpriteSheet,
        render_state: Option<RenderState>,
        keyboard: Rc<RefCell<Keyboard>>,
        /// Latest block height from the page controls, not yet applied
        block_y: Rc<Cell<Option<f32>>>,
        last_time: f64,
    }

    impl Game {
        /// Advance one frame
        fn update(&mut self, dt: f32) {
            let mut input = self.keyboard.borrow().tick_input();
            input.block_y = self.block_y.take();
            tick(&mut self.sim, &input, dt);
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_vertices(&self.sim, &self.sheet, self.sim.settings.debug_draw);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Brick Racket starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(dom::CANVAS_ID)
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        // Write back so the stored copy lists every knob with its sanitized value
        settings.save();
        let sheet = SpriteSheet::embedded().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let sink: Sink = if settings.show_readouts {
            Box::new(DomSink::new(&document))
        } else {
            Box::new(NullSink)
        };
        let sim = Simulation::new(ArenaLayout::from_atlas(&sheet), settings, sink);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("device: {e}")))?;

        let keyboard_state = Rc::new(RefCell::new(Keyboard::new()));
        keyboard::attach(&window, keyboard_state.clone())?;

        let block_y = Rc::new(Cell::new(None));
        if let Err(e) = dom::attach_block_y_controls(&document, block_y.clone()) {
            log::warn!("Block height controls unavailable: {:?}", e);
        }

        let game = Rc::new(RefCell::new(Game {
            sim,
            sheet,
            render_state: Some(render_state),
            keyboard: keyboard_state,
            block_y,
            last_time: 0.0,
        }));

        // Start game loop
        request_animation_frame(game);

        log::info!("Brick Racket running!");
        Ok(())
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brick_racket::Settings;
    use brick_racket::atlas::SpriteSheet;
    use brick_racket::consts::SIM_DT;
    use brick_racket::sim::{ArenaLayout, LogSink, Simulation, TickInput, tick};

    env_logger::init();
    log::info!("Brick Racket (native) starting...");
    log::info!("Native mode runs the simulation headless; serve the wasm build to play");

    let frames: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(600);

    let sheet = match SpriteSheet::embedded() {
        Ok(sheet) => sheet,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut sim = Simulation::new(ArenaLayout::from_atlas(&sheet), Settings::load(), LogSink);
    let input = TickInput::default();
    for _ in 0..frames {
        tick(&mut sim, &input, SIM_DT);
    }

    let ball = sim.ball_position_px().unwrap_or_default();
    log::info!(
        "{} frames: {} reactions, {} serves, ball at ({:.1}, {:.1})",
        frames,
        sim.observer.reactions_fired(),
        sim.serves,
        ball.x,
        ball.y
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
