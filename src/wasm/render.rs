use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::window;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// requestAnimationFrame loop that can be cancelled from outside the frame.
pub struct FrameLoop {
    // `callback` holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself; taking it out again breaks the cycle on stop.
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    /// Schedule `tick` on every display frame; it receives the frame
    /// timestamp in milliseconds.
    pub fn start(mut tick: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let f = callback.clone();
        let p = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            tick(now);

            // schedule next, unless stop() already dropped the callback
            let next = match f.borrow().as_ref() {
                Some(cb) => request_frame(cb).ok(),
                None => None,
            };
            p.set(next);
        }) as Box<dyn FnMut(f64)>));

        let first = match callback.borrow().as_ref() {
            Some(cb) => request_frame(cb)?,
            None => return Err(JsValue::from_str("frame callback missing")),
        };
        pending.set(Some(first));

        Ok(Self { callback, pending })
    }

    pub fn is_running(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Cancel the pending frame and drop the callback. Must not be called from
    /// inside the frame callback itself.
    pub fn stop(&self) {
        if let Some(handle) = self.pending.take() {
            if let Some(window) = window() {
                if let Err(err) = window.cancel_animation_frame(handle) {
                    log::debug!("cancel_animation_frame failed: {err:?}");
                }
            }
        }
        self.callback.borrow_mut().take();
    }
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()
        .ok_or("no window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}
