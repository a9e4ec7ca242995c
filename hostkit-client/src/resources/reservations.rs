//! Reservations (`/reservations`).

use chrono::{DateTime, NaiveDate, Utc};
use futures_core::Stream;
use serde::{Deserialize, Serialize};

use urlencoding::encode;
use crate::client::HostkitClient;
use crate::filters::ReservationFilter;
use crate::pager::PageRequest;
use crate::types::{Page, Result};

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Inquiry,
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    /// A status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// The guest on a reservation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub property_id: String,
    pub status: ReservationStatus,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub guest: Option<Guest>,
    #[serde(default)]
    pub guest_count: Option<u32>,
    /// Total price in minor units of `currency`.
    #[serde(default)]
    pub total_amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Reservation {
    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

impl HostkitClient {
    /// First page of reservations matching `filter`.
    pub async fn list_reservations(&self, filter: &ReservationFilter) -> Result<Page<Reservation>> {
        let request = PageRequest::first(filter.to_params());
        self.list_page("/reservations", request.query_pairs()).await
    }

    /// Every reservation matching `filter`, fetched page by page.
    pub fn reservations<'a>(
        &'a self,
        filter: &ReservationFilter,
    ) -> impl Stream<Item = Result<Reservation>> + Send + use<'a> {
        self.paginate("/reservations".to_string(), filter.to_params())
    }

    pub async fn get_reservation(&self, reservation_id: &str) -> Result<Reservation> {
        self.get(&format!("/reservations/{}", encode(reservation_id)), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_deserialization() {
        let json = r#"{
            "id": "res_1",
            "propertyId": "prop_1",
            "status": "checked_in",
            "checkIn": "2026-08-01",
            "checkOut": "2026-08-05",
            "guest": { "firstName": "Ana", "email": "ana@example.com" },
            "source": "direct"
        }"#;

        let reservation: Reservation = serde_json::from_str(json).unwrap();
        assert_eq!(reservation.status, ReservationStatus::CheckedIn);
        assert_eq!(reservation.nights(), 4);
        assert_eq!(reservation.guest.unwrap().first_name.as_deref(), Some("Ana"));
        assert_eq!(reservation.extra["source"], "direct");
    }

    #[test]
    fn test_unknown_status() {
        let status: ReservationStatus = serde_json::from_str(r#""awaiting_payment""#).unwrap();
        assert_eq!(status, ReservationStatus::Unknown);
    }
}
