use std::cell::{Cell, RefCell};

use log::{debug, error, info};

use super::api::ReviewsApi;
use super::feed::{FeedUpdate, RefreshOptions, Rendered, ReviewFeed};
use super::model::ReviewForm;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A required field was missing, nothing was sent.
    Invalid,
    /// The request failed; the form keeps its contents.
    Failed,
    /// The review was sent. Carries the follow-up refresh result.
    Sent(Option<Rendered>),
}

/// Owns the fingerprint state and talks to the endpoint. Shared by the
/// polling timer and the form handler on the page thread.
pub struct ReviewsWidget<A> {
    api: A,
    feed: RefCell<ReviewFeed>,
    attached: Cell<bool>,
}

impl<A: ReviewsApi> ReviewsWidget<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            feed: RefCell::new(ReviewFeed::new()),
            attached: Cell::new(false),
        }
    }

    /// Marks the list container as present. Until then `refresh` does nothing.
    pub fn attach(&self) {
        self.attached.set(true);
    }

    pub fn detach(&self) {
        self.attached.set(false);
    }

    pub fn last_fingerprint(&self) -> Option<String> {
        self.feed.borrow().last_fingerprint().map(str::to_owned)
    }

    /// Fetches the list and returns a new snapshot to render, or `None` when
    /// the page should stay as it is. Errors are logged, never returned.
    pub async fn refresh(&self, options: RefreshOptions) -> Option<Rendered> {
        if !self.attached.get() {
            return None;
        }

        let payload = match self.api.fetch().await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to load reviews: {}", e);
                return None;
            }
        };

        let update = self.feed.borrow_mut().accept(&payload, options);
        match update {
            Ok(FeedUpdate::Render(rendered)) => {
                debug!("Rendering reviews snapshot #{}", rendered.generation);
                Some(rendered)
            }
            Ok(FeedUpdate::Unchanged) => {
                debug!("Reviews unchanged since last poll");
                None
            }
            Ok(FeedUpdate::NoData) => {
                debug!("Reviews endpoint returned no list, skipping");
                None
            }
            Err(e) => {
                error!("Failed to render reviews: {}", e);
                None
            }
        }
    }

    /// Sends a review from the form. `clear_form` runs once the request went
    /// through, before the list is reloaded with the first card highlighted.
    pub async fn submit(&self, form: &ReviewForm, clear_form: impl FnOnce()) -> SubmitOutcome {
        let Some(review) = form.validate() else {
            return SubmitOutcome::Invalid;
        };

        if let Err(e) = self.api.submit(&review).await {
            error!("Failed to send review: {}", e);
            return SubmitOutcome::Failed;
        }
        info!("Review sent");

        clear_form();
        SubmitOutcome::Sent(self.refresh(RefreshOptions::highlighted()).await)
    }
}
