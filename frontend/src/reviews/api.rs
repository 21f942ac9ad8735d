use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;
use thiserror::Error;

use super::model::NewReview;

#[derive(Debug, Error)]
pub enum ReviewsError {
    #[error("request failed: {0}")]
    Transport(#[from] gloo_net::Error),
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("rating {0} needs more stars than can be drawn")]
    TooManyStars(f64),
}

/// The remote reviews store.
#[async_trait(?Send)]
pub trait ReviewsApi {
    async fn fetch(&self) -> Result<Value, ReviewsError>;
    async fn submit(&self, review: &NewReview) -> Result<(), ReviewsError>;
}

pub struct HttpReviewsApi {
    url: String,
}

impl HttpReviewsApi {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait(?Send)]
impl ReviewsApi for HttpReviewsApi {
    async fn fetch(&self) -> Result<Value, ReviewsError> {
        let response = Request::get(&self.url).send().await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    // The response body is not inspected.
    async fn submit(&self, review: &NewReview) -> Result<(), ReviewsError> {
        Request::post(&self.url).json(review)?.send().await?;
        Ok(())
    }
}
