//! Neo Flappy entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use neo_flappy::audio::AudioManager;
    use neo_flappy::consts::{MAX_PLAYFIELD_HEIGHT, MAX_PLAYFIELD_WIDTH};
    use neo_flappy::persistence::LocalStore;
    use neo_flappy::platform::FrameToken;
    use neo_flappy::renderer::RenderState;
    use neo_flappy::sim::CharacterKind;
    use neo_flappy::ui::{PowerUpIndicator, Presenter, Screen, UiCommand};
    use neo_flappy::{Collaborators, Game};

    /// Space kept around the canvas inside the window
    const PAGE_MARGIN: f64 = 40.0;

    struct App {
        game: Game,
        render_state: Option<RenderState>,
    }

    type Shared = Rc<RefCell<App>>;

    impl App {
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            match render_state.draw(self.game.state()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory; rendering disabled");
                    self.render_state = None;
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    /// Screens and HUD as plain DOM elements toggled with a `hidden` class
    struct DomPresenter {
        document: Document,
    }

    impl DomPresenter {
        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl Presenter for DomPresenter {
        fn show_screen(&mut self, screen: Screen) {
            for s in Screen::ALL {
                // The pause overlay sits on top of the game HUD
                let visible = s == screen || (screen == Screen::Paused && s == Screen::Playing);
                self.set_hidden(s.element_id(), !visible);
            }
        }

        fn update_score(&mut self, score: u64) {
            self.set_text("score", &score.to_string());
        }

        fn update_power_up(&mut self, indicator: Option<PowerUpIndicator>) {
            let Some(indicator) = indicator else {
                self.set_hidden("powerUpIndicator", true);
                return;
            };
            self.set_text("powerUpText", indicator.kind.display_name());
            self.set_hidden("powerUpIndicator", false);
            if let Some(timer) = self
                .document
                .get_element_by_id("powerUpTimer")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = timer
                    .style()
                    .set_property("--timer-width", &format!("{:.1}%", indicator.percent));
            }
        }

        fn show_game_over(&mut self, score: u64, best: u64) {
            self.set_text("finalScore", &format!("Score: {}", score));
            self.set_text("bestScore", &format!("Best: {}", best));
        }
    }

    /// Size the canvas to the window, capped at the playfield maximum
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let width = (inner(window.inner_width()) - PAGE_MARGIN)
            .clamp(1.0, MAX_PLAYFIELD_WIDTH as f64) as u32;
        let height = (inner(window.inner_height()) - PAGE_MARGIN)
            .clamp(1.0, MAX_PLAYFIELD_HEIGHT as f64) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neo Flappy starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let (width, height) = fit_canvas(&window, &canvas);

        let collab = Collaborators {
            storage: Box::new(LocalStore::new()),
            presenter: Box::new(DomPresenter {
                document: document.clone(),
            }),
            audio: Box::new(AudioManager::new()),
        };
        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, collab);
        game.resize(width as f32, height as f32);
        log::info!("Game initialized with seed: {}", seed);

        let render_state = init_renderer(canvas.clone(), width, height).await;
        let app = Rc::new(RefCell::new(App { game, render_state }));

        setup_character_options(&document, app.clone());
        setup_buttons(&document, app.clone());
        setup_input_handlers(&document, &canvas, app.clone());
        setup_resize(canvas, app.clone());

        app.borrow_mut().render();
        log::info!("Neo Flappy running!");
    }

    async fn init_renderer(canvas: HtmlCanvasElement, width: u32, height: u32) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    /// Apply a command; if it started a new driver run, begin a frame loop for it
    fn dispatch(app: &Shared, command: UiCommand) {
        let started = {
            let mut a = app.borrow_mut();
            let before = a.game.frame_token();
            a.game.handle(command);
            let after = a.game.frame_token();
            a.render();
            after.filter(|_| after != before)
        };
        if let Some(token) = started {
            request_animation_frame(app.clone(), token);
        }
    }

    fn request_animation_frame(app: Shared, token: FrameToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, token, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One display frame. A stale token ends this loop without rescheduling.
    fn game_loop(app: Shared, token: FrameToken, time: f64) {
        {
            let mut a = app.borrow_mut();
            if a.game.frame_token() != Some(token) {
                return;
            }
            a.game.frame(token, time);
            a.render();
            if a.game.frame_token() != Some(token) {
                return;
            }
        }

        request_animation_frame(app, token);
    }

    fn on_click(element: &Element, app: Shared, command: UiCommand) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            dispatch(&app, command);
        });
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, app: Shared) {
        let buttons = [
            ("startButton", UiCommand::Start),
            ("restartButton", UiCommand::Restart),
            ("backToMenuButton", UiCommand::Menu),
            ("resumeButton", UiCommand::Resume),
            ("pauseMenuButton", UiCommand::Menu),
        ];
        for (id, command) in buttons {
            match document.get_element_by_id(id) {
                Some(btn) => on_click(&btn, app.clone(), command),
                None => log::warn!("Missing button #{}", id),
            }
        }
    }

    fn setup_character_options(document: &Document, app: Shared) {
        let Ok(options) = document.query_selector_all(".bird-option") else {
            return;
        };
        let selected = app.borrow().game.settings().character;

        for i in 0..options.length() {
            let Some(option) = options.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let kind = option
                .get_attribute("data-bird")
                .and_then(|b| CharacterKind::from_str(&b));
            let Some(kind) = kind else {
                continue;
            };
            if kind == selected {
                let _ = option.class_list().add_1("selected");
            }

            let app = app.clone();
            let this = option.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Ok(all) = document.query_selector_all(".bird-option") {
                    for j in 0..all.length() {
                        if let Some(el) = all.item(j).and_then(|n| n.dyn_into::<Element>().ok()) {
                            let _ = el.class_list().remove_1("selected");
                        }
                    }
                }
                let _ = this.class_list().add_1("selected");
                dispatch(&app, UiCommand::SelectCharacter(kind));
            });
            let _ = option.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(document: &Document, canvas: &HtmlCanvasElement, app: Shared) {
        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(command) = UiCommand::from_key(&event.key()) {
                    if command == UiCommand::Jump {
                        event.prevent_default();
                    }
                    dispatch(&app, command);
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click / tap on the playfield
        on_click(canvas, app, UiCommand::Jump);
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = fit_canvas(&window, &canvas);
            let mut a = app.borrow_mut();
            a.game.resize(w as f32, h as f32);
            if let Some(render_state) = a.render_state.as_mut() {
                render_state.resize(w, h);
            }
            a.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot demo: plays a few runs through the full controller and
/// loop driver with a simulated 60 Hz display.
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use neo_flappy::audio::Silent;
    use neo_flappy::persistence::{FileStore, KeyValueStore, MemoryStore};
    use neo_flappy::ui::{PowerUpIndicator, Presenter, Screen};
    use neo_flappy::{Collaborators, Game};

    const RUNS: u32 = 3;
    /// Two minutes of frames per run at most
    const FRAME_LIMIT: u32 = 60 * 120;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Presenter that writes to the log
    struct LogPresenter;

    impl Presenter for LogPresenter {
        fn show_screen(&mut self, screen: Screen) {
            log::debug!("Screen: {:?}", screen);
        }

        fn update_score(&mut self, score: u64) {
            log::trace!("Score: {}", score);
        }

        fn update_power_up(&mut self, indicator: Option<PowerUpIndicator>) {
            if let Some(indicator) = indicator {
                log::trace!("{}: {:.0}%", indicator.kind.display_name(), indicator.percent);
            }
        }

        fn show_game_over(&mut self, score: u64, best: u64) {
            log::info!("Game over screen: score {}, best {}", score, best);
        }
    }

    fn open_storage() -> Box<dyn KeyValueStore> {
        let path = std::env::temp_dir().join("neo-flappy").join("store.json");
        match FileStore::open(&path) {
            Ok(store) => {
                log::info!("Storage: {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("Falling back to in-memory storage: {}", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run(seed: u64) {
        let collab = Collaborators {
            storage: open_storage(),
            presenter: Box::new(LogPresenter),
            audio: Box::new(Silent),
        };
        let mut game = Game::new(seed, collab);
        game.set_autopilot(true);
        log::info!("Tick mode: {}", game.tick_mode().as_str());

        for run in 1..=RUNS {
            game.start();
            let mut now_ms = 0.0;
            let mut frames = 0;
            while let Some(token) = game.frame_token() {
                now_ms += FRAME_MS;
                game.frame(token, now_ms);
                frames += 1;
                if frames >= FRAME_LIMIT {
                    game.return_to_menu();
                }
            }
            let outcome = if game.state().is_over() { "crashed" } else { "stopped" };
            log::info!(
                "Demo run {}: {} with score {} after {} ticks",
                run,
                outcome,
                game.state().score,
                game.state().time_ticks
            );
        }

        println!("Best score: {}", game.best_score());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neo Flappy (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED);
    demo::run(seed);
}
