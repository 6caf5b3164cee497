/// Prism Web - WebGL host for the prism scene
///
/// Binds a canvas' `webgl` context to the core renderer, feeds keyboard state
/// into the scene and drives frames from `requestAnimationFrame`.

mod gl;
mod logging;

pub use gl::WebGlContext;

use prism_core::{KeyState, Renderer, SceneConfig, SceneState};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, WebGlRenderingContext};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Everything one animation frame touches.
struct App {
    ctx: WebGlContext,
    canvas: HtmlCanvasElement,
    renderer: Renderer<WebGlContext>,
    state: SceneState,
    keys: Rc<RefCell<KeyState>>,
}

impl App {
    fn frame(&mut self, now_ms: f64) {
        let keys = self.keys.borrow();
        self.state.advance(now_ms, &keys, self.renderer.config());
        let (width, height) = drawing_size(self.canvas.client_width(), self.canvas.client_height());
        // Drawing buffer tracks the displayed size.
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let (width, height) = (width as i32, height as i32);
        // GL errors are already logged by the renderer.
        let _ = self.renderer.render_frame(&self.ctx, &self.state, width, height);
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    app: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attaches to the canvas with id `canvas_id` and draws straight to it.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        Self::build(canvas_id, SceneConfig::default())
    }

    /// Like `new`, but renders into a `width` x `height` texture first and
    /// composites it onto the canvas.
    pub fn with_offscreen(canvas_id: &str, width: i32, height: i32) -> Result<WebRenderer, JsValue> {
        Self::build(canvas_id, SceneConfig::default().with_offscreen(width, height))
    }

    /// Draws a single frame at timestamp `now_ms`.
    pub fn frame(&self, now_ms: f64) {
        self.app.borrow_mut().frame(now_ms);
    }

    /// Starts the animation-frame loop. It runs until the page goes away.
    pub fn start(&self) -> Result<(), JsValue> {
        let app = self.app.clone();
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let next = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            app.borrow_mut().frame(now);
            if let Some(cb) = next.borrow().as_ref() {
                if let Err(e) = request_frame(cb) {
                    log::error!("could not schedule the next frame: {:?}", e);
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let started = match callback.borrow().as_ref() {
            Some(cb) => request_frame(cb).map(|_| ()),
            None => Ok(()),
        };
        log::info!("render loop started");
        started
    }
}

impl WebRenderer {
    fn build(canvas_id: &str, config: SceneConfig) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document available")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| format!("no element with id '{}'", canvas_id))?
            .dyn_into()?;
        let gl: WebGlRenderingContext = canvas
            .get_context("webgl")?
            .ok_or("Unable to initialize WebGL. Your browser or machine may not support it.")?
            .dyn_into()?;

        let ctx = WebGlContext::new(gl);
        let renderer = Renderer::new(&ctx, config).map_err(to_js)?;
        let state = SceneState::new(renderer.config());

        let keys = Rc::new(RefCell::new(KeyState::new()));
        listen_keys(&document, &keys)?;

        Ok(WebRenderer {
            app: Rc::new(RefCell::new(App {
                ctx,
                canvas,
                renderer,
                state,
                keys,
            })),
        })
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init_logging(log::LevelFilter::Info);
    Ok(())
}

/// Registers document-level keydown/keyup listeners that keep `keys` current.
fn listen_keys(document: &web_sys::Document, keys: &Rc<RefCell<KeyState>>) -> Result<(), JsValue> {
    let pressed = keys.clone();
    let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        pressed.borrow_mut().press(key_code(&event));
    }) as Box<dyn FnMut(KeyboardEvent)>);
    document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();

    let released = keys.clone();
    let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        released.borrow_mut().release(key_code(&event));
    }) as Box<dyn FnMut(KeyboardEvent)>);
    document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
    keyup.forget();

    Ok(())
}

#[allow(deprecated)]
fn key_code(event: &KeyboardEvent) -> u32 {
    event.key_code()
}

/// Drawing buffer size for a canvas displayed at `client_width` x
/// `client_height` CSS pixels, never smaller than 1x1.
fn drawing_size(client_width: i32, client_height: i32) -> (u32, u32) {
    (client_width.max(1) as u32, client_height.max(1) as u32)
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or("no window available")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

fn to_js(error: impl Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawing_size_follows_client_size() {
        assert_eq!(drawing_size(800, 600), (800, 600));
        assert_eq!(drawing_size(1920, 1080), (1920, 1080));
    }

    #[test]
    fn test_drawing_size_of_hidden_canvas() {
        assert_eq!(drawing_size(0, 0), (1, 1));
        assert_eq!(drawing_size(300, -4), (300, 1));
    }
}
