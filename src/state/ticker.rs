// Repeating timer behind auto-run
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::Callback;

/// A cancellable repeating task. Only the holder of a handle may cancel it.
pub trait Ticker {
    type Handle;

    /// Starts ticking every `interval_ms`. `None` if the host cannot schedule timers.
    fn start(&mut self, interval_ms: u32) -> Option<Self::Handle>;

    /// Stops the task behind `handle`. Consuming the handle makes a second cancel impossible.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Browser interval timer; each tick emits the bound callback.
pub struct IntervalTicker {
    on_tick: Callback<()>,
    live: HashMap<i32, Closure<dyn FnMut()>>,
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self {
            on_tick: Callback::noop(),
            live: HashMap::new(),
        }
    }
}

impl IntervalTicker {
    pub fn bind(&mut self, on_tick: Callback<()>) {
        self.on_tick = on_tick;
    }
}

impl Ticker for IntervalTicker {
    type Handle = i32;

    fn start(&mut self, interval_ms: u32) -> Option<i32> {
        let window = web_sys::window()?;
        let on_tick = self.on_tick.clone();
        let tick = Closure::wrap(Box::new(move || on_tick.emit(())) as Box<dyn FnMut()>);
        let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                timeout,
            )
            .ok()?;
        self.live.insert(id, tick);
        Some(id)
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(handle);
        }
        self.live.remove(&handle);
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        let ids: Vec<i32> = self.live.keys().copied().collect();
        for id in ids {
            self.cancel(id);
        }
    }
}
