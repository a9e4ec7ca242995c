//! Guest messaging (`/reservations/{id}/messages`).

use chrono::{DateTime, Utc};
use futures_core::Stream;
use serde::{Deserialize, Serialize};

use urlencoding::encode;
use crate::client::HostkitClient;
use crate::pager::PageRequest;
use crate::types::{ApiError, Page, Result};

/// A message in a reservation thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub reservation_id: String,
    pub body: String,
    /// `host` or `guest`.
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub(super) fn thread_path(reservation_id: &str) -> String {
    format!("/reservations/{}/messages", encode(reservation_id))
}

impl HostkitClient {
    /// One page of a reservation's message thread.
    ///
    /// Pass the previous page's `meta.next_cursor` to continue.
    pub async fn list_messages(
        &self,
        reservation_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Message>> {
        let request = PageRequest::first(Vec::new()).with_cursor(cursor);
        self.list_page(&thread_path(reservation_id), request.query_pairs())
            .await
    }

    /// The whole thread, oldest page first.
    pub fn messages<'a>(
        &'a self,
        reservation_id: &str,
    ) -> impl Stream<Item = Result<Message>> + Send + use<'a> {
        self.paginate(thread_path(reservation_id), Vec::new())
    }

    /// Send a message to the guest.
    pub async fn send_message(&self, reservation_id: &str, body: &str) -> Result<Message> {
        if body.trim().is_empty() {
            return Err(ApiError::Config("message body must not be empty".to_string()));
        }

        self.post(
            &thread_path(reservation_id),
            &serde_json::json!({ "body": body }),
        )
        .await
    }
}
