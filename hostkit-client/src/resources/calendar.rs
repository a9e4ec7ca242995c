//! Availability and pricing calendar (`/properties/{id}/calendar`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use urlencoding::encode;
use crate::client::HostkitClient;
use crate::filters::DateRange;
use crate::types::Result;

/// One night in a property's calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub available: bool,
    /// Nightly price in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stay: Option<u32>,
}

impl CalendarDay {
    /// An available night with no price override.
    pub fn available(date: NaiveDate) -> Self {
        Self {
            date,
            available: true,
            price: None,
            min_stay: None,
        }
    }

    /// A blocked night.
    pub fn blocked(date: NaiveDate) -> Self {
        Self {
            available: false,
            ..Self::available(date)
        }
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_min_stay(mut self, nights: u32) -> Self {
        self.min_stay = Some(nights);
        self
    }
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    data: Vec<CalendarDay>,
}

pub(super) fn calendar_path(property_id: &str) -> String {
    format!("/properties/{}/calendar", encode(property_id))
}

impl HostkitClient {
    /// Calendar days for `range`, both ends included.
    pub async fn get_calendar(&self, property_id: &str, range: &DateRange) -> Result<Vec<CalendarDay>> {
        let response: CalendarResponse = self
            .get(&calendar_path(property_id), &range.to_params())
            .await?;
        Ok(response.data)
    }

    /// Overwrite the given days; returns the days as stored.
    pub async fn update_calendar(
        &self,
        property_id: &str,
        days: &[CalendarDay],
    ) -> Result<Vec<CalendarDay>> {
        let response: CalendarResponse = self
            .put(
                &calendar_path(property_id),
                &serde_json::json!({ "days": days }),
            )
            .await?;
        Ok(response.data)
    }
}
