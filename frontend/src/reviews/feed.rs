use serde_json::Value;

use super::api::ReviewsError;
use super::model::{RawReview, Review};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Flag the first card as new after rendering.
    pub highlight_first: bool,
    /// The call comes from the polling timer.
    pub is_auto: bool,
}

impl RefreshOptions {
    pub fn polling() -> Self {
        RefreshOptions {
            is_auto: true,
            ..Default::default()
        }
    }

    pub fn highlighted() -> Self {
        RefreshOptions {
            highlight_first: true,
            ..Default::default()
        }
    }
}

/// What one card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard {
    pub avatar: String,
    pub name: String,
    pub stars: String,
    pub text: String,
    pub source_label: Option<&'static str>,
}

impl TryFrom<&Review> for ReviewCard {
    type Error = ReviewsError;

    fn try_from(review: &Review) -> Result<Self, Self::Error> {
        let stars = review
            .stars()
            .ok_or(ReviewsError::TooManyStars(review.rating))?;

        Ok(ReviewCard {
            avatar: review.avatar(),
            name: review.name.clone(),
            stars,
            text: review.text.clone(),
            source_label: review.source.map(|s| s.label()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Placeholder,
    Cards(Vec<ReviewCard>),
}

/// An accepted snapshot, ready to replace whatever is on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub generation: u64,
    pub view: FeedView,
    pub highlight_first: bool,
}

impl Rendered {
    pub fn cards(&self) -> &[ReviewCard] {
        match &self.view {
            FeedView::Cards(cards) => cards,
            FeedView::Placeholder => &[],
        }
    }
}

/// Result of offering a fetched payload to the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    /// The payload is not a list; nothing to show.
    NoData,
    /// A poll returned the same list as last time.
    Unchanged,
    Render(Rendered),
}

/// Change detection between polls plus the most recently accepted snapshot.
#[derive(Debug, Default)]
pub struct ReviewFeed {
    last_fingerprint: Option<String>,
    generation: u64,
    current: Option<Rendered>,
}

impl ReviewFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fingerprint(&self) -> Option<&str> {
        self.last_fingerprint.as_deref()
    }

    pub fn current(&self) -> Option<&Rendered> {
        self.current.as_ref()
    }

    /// Decides whether a fetched payload replaces the rendered list.
    ///
    /// Non-array payloads are "no data" and never accepted. A polling call
    /// whose fingerprint matches the stored one is skipped. A list that
    /// cannot be drawn is rejected and leaves the feed as it was.
    pub fn accept(&mut self, payload: &Value, options: RefreshOptions) -> Result<FeedUpdate, ReviewsError> {
        let Some(items) = payload.as_array() else {
            return Ok(FeedUpdate::NoData);
        };
        let fingerprint = payload.to_string();

        if options.is_auto && self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return Ok(FeedUpdate::Unchanged);
        }

        let view = if items.is_empty() {
            FeedView::Placeholder
        } else {
            let cards = items
                .iter()
                .map(|item| {
                    let raw: RawReview = serde_json::from_value(item.clone()).unwrap_or_default();
                    ReviewCard::try_from(&Review::from(raw))
                })
                .collect::<Result<Vec<_>, _>>()?;
            FeedView::Cards(cards)
        };

        self.last_fingerprint = Some(fingerprint);
        self.generation += 1;

        let rendered = Rendered {
            generation: self.generation,
            view,
            highlight_first: options.highlight_first,
        };
        self.current = Some(rendered.clone());
        Ok(FeedUpdate::Render(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn anna() -> Value {
        json!([{"name": "Anna", "rating": 5, "text": "Great", "source": "bot"}])
    }

    fn render(feed: &mut ReviewFeed, payload: &Value, options: RefreshOptions) -> Rendered {
        match feed.accept(payload, options).unwrap() {
            FeedUpdate::Render(rendered) => rendered,
            other => panic!("expected a render, got {:?}", other),
        }
    }

    #[test]
    fn single_bot_review_renders_one_card() {
        let mut feed = ReviewFeed::new();
        let rendered = render(&mut feed, &anna(), RefreshOptions::default());

        assert_eq!(
            rendered.cards(),
            &[ReviewCard {
                avatar: "A".into(),
                name: "Anna".into(),
                stars: "★★★★★".into(),
                text: "Great".into(),
                source_label: Some("Отзыв из Telegram-бота"),
            }]
        );
    }

    #[test]
    fn empty_array_renders_placeholder_only() {
        let mut feed = ReviewFeed::new();
        let rendered = render(&mut feed, &json!([]), RefreshOptions::default());
        assert_eq!(rendered.view, FeedView::Placeholder);
        assert!(rendered.cards().is_empty());
    }

    #[test]
    fn non_array_payload_is_no_data() {
        let mut feed = ReviewFeed::new();
        render(&mut feed, &anna(), RefreshOptions::default());
        let before = feed.last_fingerprint().map(str::to_owned);

        assert_eq!(
            feed.accept(&json!({"error": "quota"}), RefreshOptions::default()).unwrap(),
            FeedUpdate::NoData
        );
        assert_eq!(
            feed.accept(&json!("oops"), RefreshOptions::polling()).unwrap(),
            FeedUpdate::NoData
        );
        assert_eq!(feed.last_fingerprint().map(str::to_owned), before);
        assert_eq!(feed.current().unwrap().generation, 1);
    }

    #[test]
    fn manual_refresh_rerenders_identical_snapshot() {
        let mut feed = ReviewFeed::new();
        let first = render(&mut feed, &anna(), RefreshOptions::default());
        let second = render(&mut feed, &anna(), RefreshOptions::default());

        assert_eq!(first.view, second.view);
        assert_eq!(second.generation, first.generation + 1);
    }

    #[test]
    fn unchanged_poll_is_skipped() {
        let mut feed = ReviewFeed::new();
        render(&mut feed, &anna(), RefreshOptions::default());
        assert_eq!(
            feed.accept(&anna(), RefreshOptions::polling()).unwrap(),
            FeedUpdate::Unchanged
        );
        assert_eq!(feed.current().unwrap().generation, 1);
    }

    #[test]
    fn first_poll_is_accepted() {
        let mut feed = ReviewFeed::new();
        render(&mut feed, &anna(), RefreshOptions::polling());
    }

    #[test]
    fn poll_with_one_changed_field_rebuilds() {
        let mut feed = ReviewFeed::new();
        render(&mut feed, &anna(), RefreshOptions::polling());

        let changed = json!([{"name": "Anna", "rating": 4, "text": "Great", "source": "bot"}]);
        let rendered = render(&mut feed, &changed, RefreshOptions::polling());
        assert_eq!(rendered.generation, 2);
        assert_eq!(rendered.cards()[0].stars, "★★★★");
    }

    #[test]
    fn key_order_does_not_change_fingerprint() {
        let mut feed = ReviewFeed::new();
        render(&mut feed, &anna(), RefreshOptions::polling());

        let reordered: Value =
            serde_json::from_str(r#"[{"source":"bot","text":"Great","rating":5,"name":"Anna"}]"#).unwrap();
        assert_eq!(
            feed.accept(&reordered, RefreshOptions::polling()).unwrap(),
            FeedUpdate::Unchanged
        );
    }

    #[test]
    fn non_object_entries_render_as_defaults() {
        let mut feed = ReviewFeed::new();
        let rendered = render(&mut feed, &json!([7]), RefreshOptions::default());
        let card = &rendered.cards()[0];
        assert_eq!(card.name, "Клиент");
        assert_eq!(card.stars, "");
        assert_eq!(card.source_label, None);
    }

    #[test]
    fn highlight_flag_is_carried() {
        let mut feed = ReviewFeed::new();
        let rendered = render(&mut feed, &anna(), RefreshOptions::highlighted());
        assert!(rendered.highlight_first);
    }

    #[test]
    fn undrawable_rating_rejects_snapshot() {
        let mut feed = ReviewFeed::new();
        render(&mut feed, &anna(), RefreshOptions::default());
        let before = feed.last_fingerprint().map(str::to_owned);

        let huge = json!([{"name": "X", "rating": 1e300}]);
        let result = feed.accept(&huge, RefreshOptions::polling());

        assert!(matches!(result, Err(ReviewsError::TooManyStars(_))));
        assert_eq!(feed.last_fingerprint().map(str::to_owned), before);
        assert_eq!(feed.current().unwrap().generation, 1);
        assert_eq!(feed.current().unwrap().cards()[0].name, "Anna");
    }
}
