use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const DEFAULT_NAME: &str = "Клиент";
pub const EMPTY_AVATAR: &str = "•";
pub const STAR: &str = "★";
pub const EMPTY_PLACEHOLDER: &str = "Пока отзывов нет. Будете первым 🙂";

/// Longest run of stars a browser string can hold (`2^29 - 24` UTF-16 units).
pub const MAX_STARS: usize = (1 << 29) - 24;

const BOT_LABEL: &str = "Отзыв из Telegram-бота";
const SITE_LABEL: &str = "Отзыв с сайта";

/// A review exactly as the endpoint sends it. Every field may be missing or
/// carry any JSON type.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawReview {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub rating: Value,
    #[serde(default)]
    pub text: Value,
    #[serde(default)]
    pub source: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSource {
    Bot,
    Site,
}

impl ReviewSource {
    /// Any tag other than `bot` counts as the site form.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "bot" {
            ReviewSource::Bot
        } else {
            ReviewSource::Site
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewSource::Bot => BOT_LABEL,
            ReviewSource::Site => SITE_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub name: String,
    pub rating: f64,
    pub text: String,
    pub source: Option<ReviewSource>,
}

impl Review {
    pub fn avatar(&self) -> String {
        match self.name.trim().chars().next() {
            Some(first) => first.to_uppercase().collect(),
            None => EMPTY_AVATAR.to_string(),
        }
    }

    pub fn star_count(&self) -> Option<usize> {
        star_count(self.rating)
    }

    /// `None` when the rating asks for more stars than can be drawn.
    pub fn stars(&self) -> Option<String> {
        self.star_count().map(|count| STAR.repeat(count))
    }
}

impl From<RawReview> for Review {
    fn from(raw: RawReview) -> Self {
        Review {
            name: loose_text(&raw.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            rating: loose_number(&raw.rating),
            text: loose_text(&raw.text).unwrap_or_default(),
            source: loose_text(&raw.source).map(|tag| ReviewSource::from_tag(&tag)),
        }
    }
}

/// `max(0, round(rating))`. Counts past [`MAX_STARS`] are not drawable and
/// give `None` rather than being clamped.
pub fn star_count(rating: f64) -> Option<usize> {
    if !rating.is_finite() {
        return Some(0);
    }
    let count = rating.round().max(0.0);
    if count > MAX_STARS as f64 {
        None
    } else {
        Some(count as usize)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Text of a truthy value, `None` for falsy ones.
pub fn loose_text(value: &Value) -> Option<String> {
    if is_falsy(value) {
        return None;
    }
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Numeric coercion; anything that does not read as a number is 0.
pub fn loose_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_number(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if parsed.is_nan() {
        0.0
    } else {
        parsed
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Fields read from the review form before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewForm {
    pub name: String,
    pub rating: String,
    pub text: String,
}

/// Body of the POST request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewReview {
    pub name: String,
    pub rating: Number,
    pub text: String,
    pub source: &'static str,
}

impl ReviewForm {
    /// Trims the fields and checks that name, text and a non-zero rating are
    /// all present.
    pub fn validate(&self) -> Option<NewReview> {
        let name = self.name.trim();
        let text = self.text.trim();
        let rating = parse_number(&self.rating);

        if name.is_empty() || text.is_empty() || rating == 0.0 || !rating.is_finite() {
            return None;
        }

        Some(NewReview {
            name: name.to_string(),
            rating: json_number(rating)?,
            text: text.to_string(),
            source: "site",
        })
    }
}

fn json_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn review(value: Value) -> Review {
        serde_json::from_value::<RawReview>(value).unwrap().into()
    }

    #[test]
    fn bot_review_normalizes() {
        let r = review(json!({"name": "Anna", "rating": 5, "text": "Great", "source": "bot"}));
        assert_eq!(r.avatar(), "A");
        assert_eq!(r.stars().as_deref(), Some("★★★★★"));
        assert_eq!(r.text, "Great");
        assert_eq!(r.source.map(ReviewSource::label), Some("Отзыв из Telegram-бота"));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let r = review(json!({}));
        assert_eq!(r.name, "Клиент");
        assert_eq!(r.avatar(), "К");
        assert_eq!(r.star_count(), Some(0));
        assert_eq!(r.text, "");
        assert_eq!(r.source, None);
    }

    #[test]
    fn blank_name_falls_back_to_bullet() {
        let r = review(json!({"name": "   "}));
        assert_eq!(r.name, "   ");
        assert_eq!(r.avatar(), "•");
    }

    #[test]
    fn lowercase_name_gets_uppercase_avatar() {
        assert_eq!(review(json!({"name": "  олег"})).avatar(), "О");
    }

    #[test]
    fn unknown_source_counts_as_site() {
        let r = review(json!({"source": "instagram"}));
        assert_eq!(r.source, Some(ReviewSource::Site));
        assert_eq!(r.source.map(ReviewSource::label), Some("Отзыв с сайта"));
    }

    #[test]
    fn non_string_fields_are_stringified() {
        let r = review(json!({"name": 42, "text": true}));
        assert_eq!(r.name, "42");
        assert_eq!(r.text, "true");
    }

    #[rstest]
    #[case(json!(7), 7)]
    #[case(json!(4.4), 4)]
    #[case(json!(4.5), 5)]
    #[case(json!(-3), 0)]
    #[case(json!("3"), 3)]
    #[case(json!(" 2 "), 2)]
    #[case(json!("five"), 0)]
    #[case(json!(null), 0)]
    #[case(json!(true), 1)]
    #[case(json!([1, 2]), 0)]
    fn rating_coercion(#[case] rating: Value, #[case] stars: usize) {
        assert_eq!(review(json!({ "rating": rating })).star_count(), Some(stars));
    }

    #[test]
    fn non_finite_rating_has_no_stars() {
        assert_eq!(star_count(f64::INFINITY), Some(0));
        assert_eq!(star_count(f64::NAN), Some(0));
    }

    #[test]
    fn undrawable_rating_has_no_star_count() {
        assert_eq!(star_count(1e300), None);
        assert_eq!(star_count(MAX_STARS as f64 + 1.0), None);
        assert_eq!(star_count(MAX_STARS as f64), Some(MAX_STARS));
        assert_eq!(review(json!({"rating": 1e300})).stars(), None);
    }

    #[test]
    fn form_with_zero_rating_is_rejected() {
        let form = ReviewForm {
            name: "Anna".into(),
            rating: "0".into(),
            text: "Great".into(),
        };
        assert_eq!(form.validate(), None);
    }

    #[rstest]
    #[case("", "5", "text")]
    #[case("Anna", "5", "   ")]
    #[case("Anna", "", "text")]
    #[case("Anna", "abc", "text")]
    fn incomplete_forms_are_rejected(#[case] name: &str, #[case] rating: &str, #[case] text: &str) {
        let form = ReviewForm {
            name: name.into(),
            rating: rating.into(),
            text: text.into(),
        };
        assert!(form.validate().is_none());
    }

    #[test]
    fn valid_form_builds_site_payload() {
        let form = ReviewForm {
            name: "  Anna ".into(),
            rating: "4".into(),
            text: " Nice bot ".into(),
        };
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"name": "Anna", "rating": 4, "text": "Nice bot", "source": "site"})
        );
        assert_eq!(body["rating"].to_string(), "4");
    }
}
