use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, HtmlFormElement, Window};

use crate::config::LEAD_CHAT_URL;
use crate::dom::{form_data, form_field, Listener};

// The reviews form shares the `.request-form` styling.
const LEAD_FORM_SELECTOR: &str = ".request-form:not(#review-form)";

/// A sales request typed into the lead form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRequest {
    pub name: String,
    pub telegram: String,
    pub task: String,
    pub budget: String,
}

fn or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

impl LeadRequest {
    pub fn new(name: &str, telegram: &str, task: &str, budget: &str) -> Self {
        LeadRequest {
            name: or_default(name, "Не указано"),
            telegram: or_default(telegram, "Не указан"),
            task: or_default(task, "Не описана"),
            budget: or_default(budget, "Не выбран"),
        }
    }

    pub fn message(&self) -> String {
        [
            "Заявка с сайта b.o.t.logic".to_string(),
            String::new(),
            format!("Имя: {}", self.name),
            format!("Telegram: {}", self.telegram),
            format!("Ниша и задача: {}", self.task),
            format!("Бюджет: {}", self.budget),
        ]
        .join("\n")
    }

    /// Chat link with the message prefilled.
    pub fn chat_url(&self) -> String {
        format!("{}?text={}", LEAD_CHAT_URL, urlencoding::encode(&self.message()))
    }
}

/// Opens the Telegram chat when the lead form is submitted. `None` when the
/// page has no lead form.
pub fn bind(window: &Window, document: &Document) -> Result<Option<Listener>, JsValue> {
    let Some(form) = document
        .query_selector(LEAD_FORM_SELECTOR)?
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return Ok(None);
    };

    let window = window.clone();
    let source = form.clone();
    let listener = Listener::new(&form, "submit", move |event: Event| {
        event.prevent_default();

        let Some(data) = form_data(&source) else {
            return;
        };
        let request = LeadRequest::new(
            &form_field(&data, "name"),
            &form_field(&data, "telegram"),
            &form_field(&data, "task"),
            &form_field(&data, "budget"),
        );

        info!("Opening Telegram chat for lead request");
        if let Err(e) = window.open_with_url_and_target(&request.chat_url(), "_blank") {
            error!("Failed to open chat: {:?}", e);
        }
    })?;

    Ok(Some(listener))
}
