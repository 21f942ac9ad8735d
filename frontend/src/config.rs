
// Google Apps Script deployment backing the reviews sheet.
const DEFAULT_REVIEWS_URL: &str = "https://script.google.com/macros/s/AKfycbw1kblvoyY-y8GHFrNlpaOUE0MCTS9674COAyEbOwD-gTwV5fBVJI7nE42aDa4p7pxatw/exec";

/// Reviews endpoint, overridable at build time with `REVIEWS_API_URL`.
pub fn get_reviews_url() -> &'static str {
    match option_env!("REVIEWS_API_URL") {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_REVIEWS_URL,
    }
}

pub const LEAD_CHAT_URL: &str = "https://t.me/Efim_botLogic";

pub const REVIEWS_LIST_ID: &str = "reviews-list";
pub const REVIEW_FORM_ID: &str = "review-form";

pub const REVIEWS_POLL_MS: u32 = 25_000;
pub const HIGHLIGHT_MS: u32 = 2_500;

// Height of the fixed header.
pub const SCROLL_OFFSET_PX: f64 = 70.0;

#[cfg(debug_assertions)]
pub fn log_level() -> log::Level {
    log::Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> log::Level {
    log::Level::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviews_url_is_never_empty() {
        assert!(get_reviews_url().starts_with("http"));
    }
}
