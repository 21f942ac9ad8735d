use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, PointerEvent, Window};

use crate::dom::Listener;

/// Cards that lean toward the pointer, with their maximum angle in degrees.
pub const TILT_TARGETS: [(&str, f64); 2] = [(".hero-card", 7.0), (".manager-card", 6.0)];

pub const TILT_SHADOW: &str = "0 30px 80px rgba(1, 8, 16, 1)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// Rotation for a pointer at `(x, y)` over `rect`. `None` for empty rects.
    pub fn at(x: f64, y: f64, rect: Rect, strength: f64) -> Option<Self> {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return None;
        }
        let dx = (x - rect.left) / rect.width - 0.5;
        let dy = (y - rect.top) / rect.height - 0.5;
        // `+ 0.0` turns a centered `-0` into `0`.
        Some(Tilt {
            rotate_x: -dy * strength + 0.0,
            rotate_y: dx * strength + 0.0,
        })
    }

    pub fn transform(&self, base: &str) -> String {
        format!(
            "{} perspective(900px) rotateX({}deg) rotateY({}deg) translateY(-3px)",
            base, self.rotate_x, self.rotate_y
        )
    }
}

/// Computed transform to restore after a tilt; `none` means nothing.
pub fn base_transform(computed: &str) -> &str {
    if computed == "none" {
        ""
    } else {
        computed
    }
}

fn bind_card(window: &Window, card: HtmlElement, strength: f64) -> Result<(), JsValue> {
    let computed = window
        .get_computed_style(&card)?
        .and_then(|style| style.get_property_value("transform").ok())
        .unwrap_or_default();
    let base: Rc<str> = Rc::from(base_transform(&computed));

    let on_move = {
        let card = card.clone();
        let base = base.clone();
        move |event: PointerEvent| {
            let bounds = card.get_bounding_client_rect();
            let rect = Rect {
                left: bounds.left(),
                top: bounds.top(),
                width: bounds.width(),
                height: bounds.height(),
            };
            let Some(tilt) = Tilt::at(f64::from(event.client_x()), f64::from(event.client_y()), rect, strength) else {
                return;
            };
            let style = card.style();
            let _ = style.set_property("transform", &tilt.transform(&base));
            let _ = style.set_property("box-shadow", TILT_SHADOW);
        }
    };

    let on_leave = {
        let card = card.clone();
        move |_: PointerEvent| {
            let style = card.style();
            let _ = style.set_property("transform", &base);
            let _ = style.set_property("box-shadow", "");
        }
    };

    Listener::new(&card, "pointermove", on_move)?.forget();
    Listener::new(&card, "pointerleave", on_leave)?.forget();
    Ok(())
}

/// Attaches tilt handlers to whichever cards exist on the page. A card that
/// fails to bind does not stop the others.
pub fn bind(window: &Window, document: &Document) {
    for (selector, strength) in TILT_TARGETS {
        let card = match document.query_selector(selector) {
            Ok(found) => found.and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            Err(e) => {
                warn!("Lookup of {} failed: {:?}", selector, e);
                continue;
            }
        };
        let Some(card) = card else {
            debug!("No {} to tilt", selector);
            continue;
        };
        if let Err(e) = bind_card(window, card, strength) {
            warn!("Tilt setup for {} failed: {:?}", selector, e);
        }
    }
}
