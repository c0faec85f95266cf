use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::{
    window, Event, EventTarget, HtmlCanvasElement, MouseEvent, ResizeObserver,
    ResizeObserverEntry, WebGl2RenderingContext as GL,
};

use super::events::Listener;
use super::render::FrameLoop;
use crate::error::FxError;
use crate::shader::sources::{FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT};
use crate::shader::{ShaderError, ShaderHost};

type Host = Rc<RefCell<ShaderHost<GL>>>;

fn webgl2(canvas: &HtmlCanvasElement) -> Result<Option<GL>, JsValue> {
    let options = Object::new();
    Reflect::set(&options, &"premultipliedAlpha".into(), &JsValue::FALSE)?;
    Ok(canvas
        .get_context_with_context_options("webgl2", &options)?
        .and_then(|ctx| ctx.dyn_into::<GL>().ok()))
}

fn pixel_ratio() -> f64 {
    window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

fn now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn client_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    (canvas.client_width() as f64, canvas.client_height() as f64)
}

struct Mounted {
    host: Host,
    frames: FrameLoop,
    listeners: Vec<Listener>,
    observer: ResizeObserver,
    _on_resize: Closure<dyn FnMut(js_sys::Array)>,
}

/// Fullscreen raymarched nucleus drawn with WebGL2. When the context or the
/// shader is unavailable the handle is inert and the canvas stays blank.
#[wasm_bindgen]
pub struct NucleusBackground {
    inner: Option<Mounted>,
}

#[wasm_bindgen]
impl NucleusBackground {
    pub fn mount(canvas: HtmlCanvasElement) -> Result<NucleusBackground, JsValue> {
        let Some(gl) = webgl2(&canvas)? else {
            log::warn!("{}", FxError::from(ShaderError::ContextUnavailable));
            return Ok(NucleusBackground { inner: None });
        };

        let mut host = ShaderHost::new(gl);
        if host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, now()).is_err() {
            // already logged and released by the host
            return Ok(NucleusBackground { inner: None });
        }
        let host: Host = Rc::new(RefCell::new(host));
        let listeners = pointer_listeners(&host, &canvas)?;

        // last CSS size reported by the observer, read at the start of each frame
        let observed: Rc<Cell<Option<(f64, f64)>>> = Rc::new(Cell::new(None));
        let on_resize = {
            let observed = observed.clone();
            Closure::wrap(Box::new(move |entries: js_sys::Array| {
                let last = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<ResizeObserverEntry>().ok())
                    .last();
                if let Some(entry) = last {
                    let rect = entry.content_rect();
                    observed.set(Some((rect.width(), rect.height())));
                }
            }) as Box<dyn FnMut(js_sys::Array)>)
        };
        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
        observer.observe(&canvas);
        {
            let (w, h) = client_size(&canvas);
            host.borrow_mut().resize(w, h, pixel_ratio());
        }

        let started = {
            let host = host.clone();
            let canvas = canvas.clone();
            FrameLoop::start(move |now| {
                let (w, h) = observed.get().unwrap_or_else(|| client_size(&canvas));
                host.borrow_mut().frame(now, w, h, pixel_ratio());
            })
        };
        let frames = match started {
            Ok(frames) => frames,
            Err(err) => {
                observer.disconnect();
                return Err(err);
            }
        };

        log::info!("nucleus background mounted");
        Ok(NucleusBackground {
            inner: Some(Mounted {
                host,
                frames,
                listeners,
                observer,
                _on_resize: on_resize,
            }),
        })
    }

    /// Whether the shader compiled and frames are being drawn.
    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|m| m.frames.is_running())
    }

    /// Stop drawing and release every GPU object. Safe to call twice.
    pub fn unmount(&mut self) {
        let Some(mounted) = self.inner.take() else {
            return;
        };
        mounted.frames.stop();
        mounted.observer.disconnect();
        drop(mounted.listeners);
        mounted.host.borrow_mut().teardown();
        log::info!("nucleus background unmounted");
    }
}

impl Drop for NucleusBackground {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn pointer_listeners(host: &Host, canvas: &HtmlCanvasElement) -> Result<Vec<Listener>, JsValue> {
    let target: &EventTarget = canvas.as_ref();
    let moved = {
        let host = host.clone();
        let canvas = canvas.clone();
        Listener::add(target, "mousemove", move |event: Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = canvas.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();
            host.borrow_mut()
                .pointer_moved(x as f32, y as f32, rect.height() as f32);
        })?
    };
    let pressed = {
        let host = host.clone();
        Listener::add(target, "mousedown", move |event: Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                host.borrow_mut().pointer_pressed(event.button());
            }
        })?
    };
    let released = {
        let host = host.clone();
        Listener::add(target, "mouseup", move |event: Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                host.borrow_mut().pointer_released(event.button());
            }
        })?
    };
    let context_menu = Listener::add(target, "contextmenu", |event: Event| {
        event.prevent_default();
    })?;
    Ok(vec![moved, pressed, released, context_menu])
}
