use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Object, Reflect};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

pub const REVEAL_SELECTOR: &str =
    ".section, .hero-card, .card, .step, .manager-card, .why-item, .faq-item, .request-card";
pub const REVEAL_THRESHOLD: f64 = 0.15;

const HIDDEN_CLASS: &str = "reveal";
const VISIBLE_CLASS: &str = "reveal-visible";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    /// Reveal each element the first time it scrolls into view.
    OnIntersect,
    /// Show everything right away.
    Immediate,
}

impl RevealMode {
    pub fn choose(prefers_reduced_motion: bool, observer_available: bool) -> Self {
        if !prefers_reduced_motion && observer_available {
            RevealMode::OnIntersect
        } else {
            RevealMode::Immediate
        }
    }
}

fn reveal_targets(document: &Document) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(REVEAL_SELECTOR)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn init(window: &Window, document: &Document, prefers_reduced_motion: bool) -> Result<RevealMode, JsValue> {
    let targets = reveal_targets(document)?;
    for el in &targets {
        el.class_list().add_1(HIDDEN_CLASS)?;
    }

    let global: &Object = window.as_ref();
    let observer_available =
        Reflect::has(global, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);

    let mode = RevealMode::choose(prefers_reduced_motion, observer_available);
    match mode {
        RevealMode::Immediate => {
            for el in &targets {
                el.class_list().add_1(VISIBLE_CLASS)?;
            }
        }
        RevealMode::OnIntersect => {
            let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if entry.is_intersecting() {
                        let target = entry.target();
                        let _ = target.class_list().add_1(VISIBLE_CLASS);
                        observer.unobserve(&target);
                    }
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>);

            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
            let observer =
                IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
            for el in &targets {
                observer.observe(el);
            }
            // The observer lives as long as the page.
            callback.forget();
        }
    }

    Ok(mode)
}
