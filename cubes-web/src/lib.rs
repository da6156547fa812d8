/// Cubes Web - WebGL2 renderer driven by requestAnimationFrame
///
/// The browser supplies the tick timestamps and keyboard events; the scene,
/// the transform strategies and the frame driver come from `cubes-core`.
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, WebGl2RenderingContext, Window};

use cubes_core::{
    Camera, DemoConfig, DirectionalLight, FrameDriver, Scene, StrategySelector, TransformStrategy,
};

pub mod backend;
pub mod frame_loop;
pub mod shaders;

pub use backend::WebGlBackend;
pub use frame_loop::FrameLoop;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Everything one animation frame touches
struct WebApp {
    canvas: HtmlCanvasElement,
    scene: Scene,
    camera: Camera,
    light: DirectionalLight,
    driver: FrameDriver,
    selector: StrategySelector,
    backend: WebGlBackend,
}

impl WebApp {
    fn frame(&mut self, elapsed: f32) -> Result<(), JsValue> {
        let (width, height) = (self.canvas.client_width(), self.canvas.client_height());
        self.camera.set_aspect(width as f32, height as f32);
        self.backend
            .set_viewport(self.canvas.width() as i32, self.canvas.height() as i32);

        let strategy = self.selector.current();
        self.driver.frame(
            &self.scene,
            &self.camera,
            &self.light,
            strategy,
            elapsed,
            &mut self.backend,
        )
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    app: Rc<RefCell<WebApp>>,
    frames: Rc<RefCell<FrameLoop>>,
    /// Sole owner of the frame callback; the callback itself holds a `Weak`
    callback: Rc<RefCell<Option<FrameCallback>>>,
    keydown: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to a canvas with the built-in scene
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        Self::build(canvas_id, DemoConfig::builtin())
    }

    /// Attach to a canvas with a TOML scene description
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(canvas_id: &str, config: &str) -> Result<WebRenderer, JsValue> {
        let config =
            DemoConfig::from_toml_str(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::build(canvas_id, config)
    }

    fn build(canvas_id: &str, config: DemoConfig) -> Result<WebRenderer, JsValue> {
        let document = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| {
                JsValue::from_str(
                    "unable to initialize WebGL; your browser or machine may not support it",
                )
            })?
            .dyn_into::<WebGl2RenderingContext>()?;

        let scene = Scene::from_config(&config.scene);
        let backend = WebGlBackend::new(gl, &scene).inspect_err(|e| log::error!("{:?}", e))?;
        let camera = Camera::from_config(
            &config.camera,
            canvas.client_width().max(1) as u32,
            canvas.client_height().max(1) as u32,
        );

        let app = WebApp {
            canvas,
            scene,
            camera,
            light: config.light(),
            driver: config.driver(),
            selector: StrategySelector::new(config.animation.strategy),
            backend,
        };

        Ok(WebRenderer {
            app: Rc::new(RefCell::new(app)),
            frames: Rc::new(RefCell::new(FrameLoop::new())),
            callback: Rc::new(RefCell::new(None)),
            keydown: None,
        })
    }

    /// Install the keyboard listener and start the animation loop
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.frames.borrow().is_running() {
            return Ok(());
        }
        // Clear what a chain that stopped on an error left behind
        self.stop()?;
        let window = window()?;

        let app = Rc::clone(&self.app);
        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            app.borrow_mut().selector.handle_key(&event.key());
        });
        window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        self.keydown = Some(keydown);

        let generation = self.frames.borrow_mut().start();
        let next: Weak<RefCell<Option<FrameCallback>>> = Rc::downgrade(&self.callback);
        let app = Rc::clone(&self.app);
        let frames = Rc::clone(&self.frames);

        let callback: FrameCallback = Closure::new(move |timestamp: f64| {
            let Some(elapsed) = frames.borrow_mut().fire(generation, timestamp) else {
                return;
            };
            if let Err(e) = app.borrow_mut().frame(elapsed) {
                log::error!("frame failed, stopping: {:?}", e);
                frames.borrow_mut().stop();
                return;
            }
            let Some(slot) = next.upgrade() else {
                return;
            };
            if let Some(callback) = slot.borrow().as_ref() {
                match request_animation_frame(callback) {
                    Ok(handle) => frames.borrow_mut().scheduled(generation, handle),
                    Err(e) => {
                        log::error!("requestAnimationFrame failed: {:?}", e);
                        frames.borrow_mut().stop();
                    }
                }
            };
        });

        let handle = request_animation_frame(&callback)?;
        self.frames.borrow_mut().scheduled(generation, handle);
        *self.callback.borrow_mut() = Some(callback);
        log::info!("animation started");
        Ok(())
    }

    /// Cancel the pending frame, release the callback and detach the
    /// keyboard listener
    pub fn stop(&mut self) -> Result<(), JsValue> {
        let pending = self.frames.borrow_mut().stop();
        if let Some(handle) = pending {
            window()?.cancel_animation_frame(handle)?;
        }
        self.callback.borrow_mut().take();
        if let Some(keydown) = self.keydown.take() {
            window()?
                .remove_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        }
        Ok(())
    }

    /// Switch strategy by name; unknown names are ignored and return false
    #[wasm_bindgen(js_name = setStrategy)]
    pub fn set_strategy(&self, name: &str) -> bool {
        match name.parse::<TransformStrategy>() {
            Ok(strategy) => {
                self.app.borrow_mut().selector.set(strategy);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn strategy(&self) -> String {
        self.app.borrow().selector.current().to_string()
    }

    pub fn angle(&self) -> f32 {
        self.app.borrow().driver.angle()
    }
}

impl Drop for WebRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("failed to stop animation on drop: {:?}", e);
        }
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn request_animation_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the first logger
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::debug!("console logger already installed: {}", e);
    }
    Ok(())
}
