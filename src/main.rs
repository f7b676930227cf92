//! Tetris Tower entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use tetris_tower::Settings;
    use tetris_tower::consts::SIM_DT;
    use tetris_tower::renderer::RenderState;
    use tetris_tower::sim::{KeyAction, Session};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        last_time: f64,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                session: Session::new(settings, seed),
                render_state: None,
                last_time: 0.0,
            }
        }

        /// Step, sync and draw one frame
        fn frame(&mut self, dt: f32) {
            let Game {
                session,
                render_state,
                ..
            } = self;
            if let Some(render_state) = render_state {
                match session.frame(render_state, dt) {
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

        fn resize(&mut self, width: u32, height: u32) {
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
            self.session.camera_mut().set_aspect(width, height);
        }
    }

    /// Canvas size in device pixels
    fn canvas_pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tetris Tower starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_pixel_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        game.borrow_mut()
            .session
            .camera_mut()
            .set_aspect(width, height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Tetris Tower running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(action) = KeyAction::from_code(&event.code()) {
                // Keep Space and arrows from scrolling the page
                event.prevent_default();
                game.borrow_mut().session.on_key(action);
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = canvas_pixel_size(&canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(width, height);
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.frame(dt);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tetris Tower (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);
    let mut settings = tetris_tower::Settings::immediate();
    if let Some(mode) = args.next() {
        match tetris_tower::StepMode::from_str(&mode) {
            Some(step_mode) => settings.step_mode = step_mode,
            None => log::warn!(
                "Unknown step mode {:?}, using {}",
                mode,
                settings.step_mode.as_str()
            ),
        }
    }
    run_headless(settings, seed, 12);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drop `pieces` pieces with random nudges and report the resulting tower
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(settings: tetris_tower::Settings, seed: u64, pieces: usize) {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use std::convert::Infallible;
    use tetris_tower::consts::SIM_DT;
    use tetris_tower::renderer::RenderSurface;
    use tetris_tower::scene::{Camera, DirectionalLight, Scene};
    use tetris_tower::sim::{KeyAction, Session};

    struct Headless;

    impl RenderSurface for Headless {
        type Error = Infallible;

        fn draw(&mut self, _: &Scene, _: &Camera, _: &DirectionalLight) -> Result<(), Infallible> {
            Ok(())
        }
    }

    let mut session = Session::new(settings, seed);
    let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let mut surface = Headless;

    for _ in 0..pieces {
        let nudge: i32 = player.random_range(-3..=3);
        let action = if nudge < 0 {
            KeyAction::MoveLeft
        } else {
            KeyAction::MoveRight
        };
        for _ in 0..nudge.unsigned_abs() {
            session.on_key(action);
        }
        session.on_key(KeyAction::Drop);

        for _ in 0..90 {
            let Ok(()) = session.frame(&mut surface, SIM_DT);
        }
    }

    let top = session
        .active()
        .iter()
        .filter_map(|p| p.transform(session.world()))
        .map(|t| t.position.y)
        .fold(f32::NEG_INFINITY, f32::max);

    log::info!(
        "Dropped {} pieces in {} frames, highest piece at y = {:.2}",
        session.active().len(),
        session.frames(),
        top
    );
    println!(
        "seed {}: {} pieces, {} bodies, tower top y = {:.2}",
        seed,
        session.active().len(),
        session.world().body_count(),
        top
    );
}
