use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{window, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent};

use super::canvas::{CanvasRasterizer, CanvasSurface};
use super::events::Listener;
use super::render::FrameLoop;
use crate::config::LogoConfig;
use crate::entropy::SeededEntropy;
use crate::error::FxError;
use crate::stage::LightningStage;

type Stage = LightningStage<CanvasRasterizer, SeededEntropy>;

/// Options for [`LightningLogo::mount`]. Unset fields keep their defaults.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct LogoOptions {
    inner: LogoConfig,
}

#[wasm_bindgen]
impl LogoOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LogoOptions {
        LogoOptions::default()
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: String) {
        self.inner.text = text;
    }

    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&mut self, size: f32) {
        self.inner.size = size;
    }

    /// `#rgb` or `#rrggbb`.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, hex: &str) -> Result<(), JsValue> {
        self.inner = self.inner.clone().with_color_hex(hex).map_err(FxError::from)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setFontFamily)]
    pub fn set_font_family(&mut self, family: String) {
        self.inner.font_family = family;
    }

    #[wasm_bindgen(js_name = setRevealDelay)]
    pub fn set_reveal_delay(&mut self, frames: i32) {
        self.inner = self.inner.clone().with_reveal_delay(frames);
    }

    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, width: u32) {
        self.inner.width = Some(width);
    }

    #[wasm_bindgen(js_name = setHeight)]
    pub fn set_height(&mut self, height: u32) {
        self.inner.height = Some(height);
    }
}

fn measure(container: &HtmlElement, config: &LogoConfig) -> (u32, u32) {
    config.resolve_size(
        container.client_width().max(0) as u32,
        container.client_height().max(0) as u32,
    )
}

/// Lightning-text logo mounted on a canvas inside `container`.
#[wasm_bindgen]
pub struct LightningLogo {
    stage: Rc<RefCell<Stage>>,
    frames: Option<FrameLoop>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl LightningLogo {
    /// Size the canvas to the container (or the explicit option sizes) and
    /// start animating.
    pub fn mount(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        options: Option<LogoOptions>,
    ) -> Result<LightningLogo, JsValue> {
        let window = window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let config = options.map(|o| o.inner).unwrap_or_default();

        let (width, height) = measure(&container, &config);
        canvas.set_width(width);
        canvas.set_height(height);
        let mut surface = CanvasSurface::new(canvas.clone())?;

        log::info!("lightning logo mounted at {width}x{height}");
        let stage = Rc::new(RefCell::new(LightningStage::new(
            config,
            CanvasRasterizer::new(document),
            SeededEntropy::from_clock(),
            width,
            height,
        )));

        let resize = {
            let stage = stage.clone();
            Listener::add(AsRef::<EventTarget>::as_ref(&window), "resize", move |_: Event| {
                let mut stage = stage.borrow_mut();
                let (w, h) = measure(&container, stage.config());
                stage.request_resize(w, h);
            })?
        };
        // dropping `resize` on error unregisters it again
        let click = {
            let stage = stage.clone();
            let target = canvas.clone();
            Listener::add(AsRef::<EventTarget>::as_ref(&canvas), "click", move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = target.get_bounding_client_rect();
                let x = event.client_x() as f64 - rect.left();
                let y = event.client_y() as f64 - rect.top();
                stage.borrow_mut().strike(Vec2::new(x as f32, y as f32));
            })?
        };

        let frames = {
            let stage = stage.clone();
            FrameLoop::start(move |_now| stage.borrow_mut().frame(&mut surface))?
        };

        Ok(LightningLogo {
            stage,
            frames: Some(frames),
            listeners: vec![resize, click],
        })
    }

    /// One bolt and one burst at canvas coordinates `(x, y)`.
    pub fn strike(&self, x: f32, y: f32) {
        self.stage.borrow_mut().strike(Vec2::new(x, y));
    }

    #[wasm_bindgen(js_name = strikeRandom)]
    pub fn strike_random(&self) {
        self.stage.borrow_mut().strike_anywhere();
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.stage.borrow().size().0
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.stage.borrow().size().1
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frames.as_ref().is_some_and(FrameLoop::is_running)
    }

    /// Stop the animation and remove every listener. Safe to call twice.
    pub fn unmount(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.stop();
            log::info!("lightning logo unmounted");
        }
        self.listeners.clear();
    }
}

impl Drop for LightningLogo {
    fn drop(&mut self) {
        self.unmount();
    }
}
