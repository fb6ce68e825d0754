//! Visibility gate: a one-shot "the chart container is on screen" signal.
//!
//! [`VisibilityObserver`] is the capability seam. The browser build uses
//! [`IntersectionVisibility`] (an `IntersectionObserver` on the container);
//! [`ManualVisibility`] is triggered by hand so the gating logic can be
//! exercised without a layout engine.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

/// Callback fired when the observed element first becomes visible.
pub type VisibleCallback = Box<dyn FnOnce()>;

/// Source of "became visible" notifications.
pub trait VisibilityObserver {
    /// Register `callback`; it fires at most once, on the first intersection.
    fn on_became_visible(&mut self, callback: VisibleCallback);

    /// Stop observing. A pending callback never fires after this.
    fn disconnect(&mut self);
}

/// Write-once flag shared between the gate and whoever reads it.
#[derive(Debug, Clone, Default)]
pub struct VisibilityLatch(Rc<Cell<bool>>);

impl VisibilityLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Latch to `true`. Returns `true` only for the call that flipped it.
    pub fn set(&self) -> bool {
        !self.0.replace(true)
    }
}

/// Wraps an observer and latches its first signal.
pub struct VisibilityGate<O: VisibilityObserver> {
    observer: O,
    latch: VisibilityLatch,
}

impl<O: VisibilityObserver> VisibilityGate<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            latch: VisibilityLatch::new(),
        }
    }

    /// Begin observing; `on_visible` runs once when the latch flips.
    pub fn watch(&mut self, on_visible: impl FnOnce() + 'static) {
        let latch = self.latch.clone();
        self.observer.on_became_visible(Box::new(move || {
            if latch.set() {
                debug!("container became visible");
                on_visible();
            }
        }));
    }

    pub fn is_visible(&self) -> bool {
        self.latch.is_set()
    }

    pub fn latch(&self) -> VisibilityLatch {
        self.latch.clone()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

#[derive(Default)]
struct ManualState {
    visible: bool,
    disconnected: bool,
    pending: Vec<VisibleCallback>,
}

/// Deterministic observer driven by [`ManualVisibility::show`].
#[derive(Clone, Default)]
pub struct ManualVisibility {
    state: Rc<RefCell<ManualState>>,
}

impl ManualVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the element scrolling into view; fires pending callbacks.
    pub fn show(&self) {
        let callbacks = {
            let mut s = self.state.borrow_mut();
            if s.disconnected {
                return;
            }
            s.visible = true;
            std::mem::take(&mut s.pending)
        };
        for cb in callbacks {
            cb();
        }
    }

    /// Simulate the element scrolling out of view.
    pub fn hide(&self) {
        self.state.borrow_mut().visible = false;
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

impl VisibilityObserver for ManualVisibility {
    fn on_became_visible(&mut self, callback: VisibleCallback) {
        let fire_now = {
            let mut s = self.state.borrow_mut();
            if s.disconnected {
                return;
            }
            if !s.visible {
                s.pending.push(callback);
                return;
            }
            callback
        };
        fire_now();
    }

    fn disconnect(&mut self) {
        let mut s = self.state.borrow_mut();
        s.disconnected = true;
        s.pending.clear();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::IntersectionVisibility;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry};

    use super::{VisibilityObserver, VisibleCallback};

    type EntriesClosure = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

    /// Observer backed by the browser's `IntersectionObserver`.
    pub struct IntersectionVisibility {
        target: Element,
        observer: Option<IntersectionObserver>,
        closure: Option<EntriesClosure>,
    }

    impl IntersectionVisibility {
        pub fn new(target: Element) -> Self {
            Self {
                target,
                observer: None,
                closure: None,
            }
        }
    }

    impl VisibilityObserver for IntersectionVisibility {
        fn on_became_visible(&mut self, callback: VisibleCallback) {
            self.disconnect();
            let slot = Rc::new(RefCell::new(Some(callback)));
            let pending = Rc::clone(&slot);
            let closure: EntriesClosure = Closure::wrap(Box::new(
                move |entries: js_sys::Array, observer: IntersectionObserver| {
                    let visible = entries
                        .iter()
                        .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                        .any(|e| e.is_intersecting() || e.intersection_ratio() > 0.0);
                    if visible {
                        observer.disconnect();
                        let cb = pending.borrow_mut().take();
                        if let Some(cb) = cb {
                            cb();
                        }
                    }
                },
            ));
            match IntersectionObserver::new(closure.as_ref().unchecked_ref()) {
                Ok(observer) => {
                    observer.observe(&self.target);
                    self.observer = Some(observer);
                    self.closure = Some(closure);
                }
                Err(err) => {
                    // No IntersectionObserver: treat the chart as visible now.
                    web_sys::console::warn_1(
                        &format!("IntersectionObserver unavailable: {err:?}").into(),
                    );
                    let cb = slot.borrow_mut().take();
                    if let Some(cb) = cb {
                        cb();
                    }
                }
            }
        }

        fn disconnect(&mut self) {
            if let Some(observer) = self.observer.take() {
                observer.disconnect();
            }
            self.closure = None;
        }
    }

    impl Drop for IntersectionVisibility {
        fn drop(&mut self) {
            self.disconnect();
        }
    }
}
