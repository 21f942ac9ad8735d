use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use log::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlFormElement};
use yew::prelude::*;

use crate::config::{HIGHLIGHT_MS, REVIEWS_POLL_MS, REVIEW_FORM_ID};
use crate::dom::{form_data, form_field, next_frame, Listener};

use super::api::HttpReviewsApi;
use super::feed::{FeedView, RefreshOptions, Rendered, ReviewCard};
use super::model::{ReviewForm, EMPTY_PLACEHOLDER};
use super::widget::{ReviewsWidget, SubmitOutcome};

/// The page's reviews widget plus the list it draws into, once one is mounted.
/// The review form and the list share a single board.
pub struct ReviewsBoard {
    widget: ReviewsWidget<HttpReviewsApi>,
    list: RefCell<Option<Callback<Rendered>>>,
}

impl ReviewsBoard {
    pub fn new(endpoint: &str) -> Rc<Self> {
        Rc::new(Self {
            widget: ReviewsWidget::new(HttpReviewsApi::new(endpoint)),
            list: RefCell::new(None),
        })
    }

    fn mount(&self, list: Callback<Rendered>) {
        *self.list.borrow_mut() = Some(list);
        self.widget.attach();
    }

    fn unmount(&self) {
        self.widget.detach();
        self.list.borrow_mut().take();
    }

    fn show(&self, rendered: Rendered) {
        let list = self.list.borrow().clone();
        if let Some(list) = list {
            list.emit(rendered);
        }
    }

    async fn refresh(&self, options: RefreshOptions) {
        if let Some(rendered) = self.widget.refresh(options).await {
            self.show(rendered);
        }
    }
}

/// Hooks the page's review form up to the board. Returns `None` when the
/// page has no such form.
pub fn bind_review_form(document: &Document, board: Rc<ReviewsBoard>) -> Option<Listener> {
    let form = document
        .get_element_by_id(REVIEW_FORM_ID)?
        .dyn_into::<HtmlFormElement>()
        .ok()?;

    let source = form.clone();
    let listener = Listener::new(&form, "submit", move |event: Event| {
        event.prevent_default();

        let Some(data) = form_data(&source) else {
            return;
        };
        let fields = ReviewForm {
            name: form_field(&data, "name"),
            rating: form_field(&data, "rating"),
            text: form_field(&data, "text"),
        };

        let board = board.clone();
        let form = source.clone();
        spawn_local(async move {
            match board.widget.submit(&fields, || form.reset()).await {
                SubmitOutcome::Sent(Some(snapshot)) => board.show(snapshot),
                SubmitOutcome::Invalid => debug!("Review form incomplete, not sending"),
                _ => {}
            }
        });
    });

    match listener {
        Ok(listener) => Some(listener),
        Err(e) => {
            error!("Failed to bind review form: {:?}", e);
            None
        }
    }
}

#[derive(Properties)]
pub struct ReviewsListProps {
    pub board: Rc<ReviewsBoard>,
}

impl PartialEq for ReviewsListProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.board, &other.board)
    }
}

#[function_component(ReviewsList)]
pub fn reviews_list(props: &ReviewsListProps) -> Html {
    let rendered = use_state(|| None::<Rendered>);

    {
        let board = props.board.clone();
        let rendered = rendered.clone();
        use_effect_with_deps(
            move |_| {
                board.mount(Callback::from(move |snapshot: Rendered| {
                    rendered.set(Some(snapshot));
                }));

                let load = {
                    let board = board.clone();
                    move |options: RefreshOptions| {
                        let board = board.clone();
                        spawn_local(async move {
                            board.refresh(options).await;
                        });
                    }
                };

                load(RefreshOptions::default());
                let interval = Interval::new(REVIEWS_POLL_MS, move || {
                    load(RefreshOptions::polling());
                });

                move || {
                    drop(interval);
                    board.unmount();
                }
            },
            (),
        );
    }

    let Some(snapshot) = &*rendered else {
        return html! {};
    };

    match &snapshot.view {
        FeedView::Placeholder => html! {
            <p class="section-subtitle">{ EMPTY_PLACEHOLDER }</p>
        },
        FeedView::Cards(cards) => html! {
            <>
                { for cards.iter().enumerate().map(|(index, card)| html! {
                    <ReviewItem
                        key={format!("{}-{}", snapshot.generation, index)}
                        card={card.clone()}
                        highlight={snapshot.highlight_first && index == 0}
                    />
                }) }
            </>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct ReviewItemProps {
    pub card: ReviewCard,
    #[prop_or_default]
    pub highlight: bool,
}

#[function_component(ReviewItem)]
pub fn review_item(props: &ReviewItemProps) -> Html {
    let visible = use_state(|| false);
    let highlighted = use_state(|| false);

    {
        let visible = visible.clone();
        let highlighted = highlighted.clone();
        let highlight = props.highlight;
        use_effect_with_deps(
            move |_| {
                let expiry: Rc<RefCell<Option<Timeout>>> = Rc::default();
                let frame = {
                    let expiry = expiry.clone();
                    next_frame(move || {
                        visible.set(true);
                        if highlight {
                            highlighted.set(true);
                            let clear = Timeout::new(HIGHLIGHT_MS, move || highlighted.set(false));
                            *expiry.borrow_mut() = Some(clear);
                        }
                    })
                };

                move || {
                    drop(frame);
                    expiry.borrow_mut().take();
                }
            },
            (),
        );
    }

    let card = &props.card;
    html! {
        <article class={classes!(
            "review-item",
            (*visible).then(|| "review-item-visible"),
            (*highlighted).then(|| "review-item-new")
        )}>
            <div class="review-head">
                <div class="review-avatar">{ &card.avatar }</div>
                <div class="review-meta">
                    <div class="review-name">{ &card.name }</div>
                    <div class="review-rating">{ &card.stars }</div>
                </div>
            </div>
            <div class="review-text">{ &card.text }</div>
            if let Some(label) = card.source_label {
                <div class="review-source">{ label }</div>
            }
        </article>
    }
}
