use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions, Window};

use crate::config::SCROLL_OFFSET_PX;
use crate::dom::Listener;

const ANCHOR_SELECTOR: &str = "a[href^='#']";

/// Element id an in-page link points at.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Scroll position that puts an element just below the fixed header.
pub fn scroll_top_for(offset_top: i32) -> f64 {
    f64::from(offset_top) - SCROLL_OFFSET_PX
}

/// Smooth-scrolls to the target of any clicked `#anchor` link.
pub fn bind(window: &Window, document: &Document) -> Result<Listener, JsValue> {
    let window = window.clone();
    let lookup = document.clone();

    Listener::new(document, "click", move |event: MouseEvent| {
        let Some(link) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(ANCHOR_SELECTOR).ok().flatten())
        else {
            return;
        };

        let Some(target) = link
            .get_attribute("href")
            .as_deref()
            .and_then(anchor_target)
            .and_then(|id| lookup.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        event.prevent_default();

        let options = ScrollToOptions::new();
        options.set_top(scroll_top_for(target.offset_top()));
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    })
}
