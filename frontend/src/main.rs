use std::fmt::Debug;

use log::{info, warn};
use web_sys::{window, Document, Window};

mod config;
mod dom;
mod reviews {
    pub mod api;
    pub mod component;
    pub mod feed;
    pub mod model;
    pub mod widget;
}
mod page {
    pub mod lead;
    pub mod reveal;
    pub mod scroll;
    pub mod tilt;
}

use reviews::component::{bind_review_form, ReviewsBoard, ReviewsList, ReviewsListProps};

/// Logs a failed setup step so the remaining ones still run.
fn setup_step<T, E: Debug>(name: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} setup failed: {:?}", name, e);
            None
        }
    }
}

fn init_page(window: &Window, document: &Document) {
    let prefers_reduced_motion = dom::media_matches(window, "(prefers-reduced-motion: reduce)");
    let has_fine_pointer = dom::media_matches(window, "(pointer: fine)");

    if let Some(listener) = setup_step("Smooth scroll", page::scroll::bind(window, document)) {
        listener.forget();
    }

    if let Some(mode) = setup_step("Reveal", page::reveal::init(window, document, prefers_reduced_motion)) {
        info!("Reveal mode: {:?}", mode);
    }

    if has_fine_pointer && !prefers_reduced_motion {
        page::tilt::bind(window, document);
    }

    if let Some(Some(listener)) = setup_step("Lead form", page::lead::bind(window, document)) {
        listener.forget();
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    init_page(&window, &document);

    let board = ReviewsBoard::new(config::get_reviews_url());
    if let Some(listener) = bind_review_form(&document, board.clone()) {
        listener.forget();
    }

    match document.get_element_by_id(config::REVIEWS_LIST_ID) {
        Some(root) => {
            info!("Mounting reviews list");
            root.set_inner_html("");
            yew::Renderer::<ReviewsList>::with_root_and_props(root, ReviewsListProps { board }).render();
        }
        None => info!("No reviews list on this page"),
    }
}
