use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Event, EventTarget, FormData, HtmlFormElement, Window};

/// A typed event handler attached to a DOM target. The handler is removed
/// when the listener is dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<E, F>(target: &EventTarget, event: &'static str, mut handler: F) -> Result<Self, JsValue>
    where
        E: JsCast,
        F: FnMut(E) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |e: Event| {
            handler(e.unchecked_into::<E>());
        }) as Box<dyn FnMut(Event)>);

        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;

        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Keeps the handler attached for the rest of the page's life.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// A pending `requestAnimationFrame` callback, cancelled on drop.
pub struct AnimationFrame {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

pub fn next_frame(f: impl FnOnce() + 'static) -> Option<AnimationFrame> {
    let window = window()?;
    let mut f = Some(f);
    let callback = Closure::wrap(Box::new(move || {
        if let Some(f) = f.take() {
            f();
        }
    }) as Box<dyn FnMut()>);

    let id = window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()?;

    Some(AnimationFrame {
        id,
        _callback: callback,
    })
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        if let Some(window) = window() {
            let _ = window.cancel_animation_frame(self.id);
        }
    }
}

pub fn form_data(form: &HtmlFormElement) -> Option<FormData> {
    FormData::new_with_form(form).ok()
}

/// String value of a form field, empty when missing.
pub fn form_field(data: &FormData, key: &str) -> String {
    data.get(key).as_string().unwrap_or_default()
}

pub fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map_or(false, |list| list.matches())
}
