//! Guest reviews (`/reviews`).

use chrono::{DateTime, Utc};
use futures_core::Stream;
use serde::{Deserialize, Serialize};

use urlencoding::encode;
use crate::client::HostkitClient;
use crate::filters::ReviewFilter;
use crate::pager::PageRequest;
use crate::types::{ApiError, Page, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub property_id: String,
    #[serde(default)]
    pub reservation_id: Option<String>,
    /// 1-5.
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub comment: Option<String>,
    /// The host's public reply, once posted.
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HostkitClient {
    /// First page of reviews matching `filter`.
    pub async fn list_reviews(&self, filter: &ReviewFilter) -> Result<Page<Review>> {
        let request = PageRequest::first(filter.to_params());
        self.list_page("/reviews", request.query_pairs()).await
    }

    /// Every review matching `filter`, fetched page by page.
    pub fn reviews<'a>(
        &'a self,
        filter: &ReviewFilter,
    ) -> impl Stream<Item = Result<Review>> + Send + use<'a> {
        self.paginate("/reviews".to_string(), filter.to_params())
    }

    /// Post the host's reply to a review.
    pub async fn respond_to_review(&self, review_id: &str, response: &str) -> Result<Review> {
        if response.trim().is_empty() {
            return Err(ApiError::Config("review response must not be empty".to_string()));
        }

        self.post(
            &format!("/reviews/{}/response", encode(review_id)),
            &serde_json::json!({ "response": response }),
        )
        .await
    }
}
