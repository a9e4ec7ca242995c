//! Query filters for list endpoints.
//!
//! Filters are plain values: every `with_*` method returns a new filter and
//! leaves the receiver untouched, so a base filter can be shared and
//! specialized.
//!
//! ```
//! use hostkit_client::filters::PropertyFilter;
//!
//! let active = PropertyFilter::new().with_status("active");
//! let lisbon = active.with_city("Lisbon");
//!
//! assert_eq!(active.to_params().len(), 1);
//! assert_eq!(lisbon.to_params().len(), 2);
//! ```

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::types::{ApiError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Create a range; `from` must not be after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(ApiError::Config(format!(
                "date range starts after it ends: {} > {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// `from`/`to` query pairs.
    pub fn to_params(&self) -> Vec<(String, String)> {
        self.to_prefixed_params("from", "to")
    }

    fn to_prefixed_params(&self, from_key: &str, to_key: &str) -> Vec<(String, String)> {
        vec![
            (from_key.to_string(), self.from.format(DATE_FORMAT).to_string()),
            (to_key.to_string(), self.to.format(DATE_FORMAT).to_string()),
        ]
    }
}

fn push(params: &mut Vec<(String, String)>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        params.push((key.to_string(), value.clone()));
    }
}

/// Filter for `GET /properties`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    status: Option<String>,
    city: Option<String>,
    search: Option<String>,
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(&self, status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..self.clone()
        }
    }

    pub fn with_city(&self, city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..self.clone()
        }
    }

    /// Free-text search over names and addresses.
    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..self.clone()
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push(&mut params, "status", &self.status);
        push(&mut params, "city", &self.city);
        push(&mut params, "search", &self.search);
        params
    }
}

/// Filter for `GET /reservations`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationFilter {
    property_id: Option<String>,
    status: Option<String>,
    check_in: Option<DateRange>,
    updated_since: Option<DateTime<Utc>>,
}

impl ReservationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(&self, property_id: impl Into<String>) -> Self {
        Self {
            property_id: Some(property_id.into()),
            ..self.clone()
        }
    }

    pub fn with_status(&self, status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..self.clone()
        }
    }

    /// Only reservations checking in within `range`.
    pub fn with_check_in(&self, range: DateRange) -> Self {
        Self {
            check_in: Some(range),
            ..self.clone()
        }
    }

    pub fn with_updated_since(&self, since: DateTime<Utc>) -> Self {
        Self {
            updated_since: Some(since),
            ..self.clone()
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push(&mut params, "propertyId", &self.property_id);
        push(&mut params, "status", &self.status);
        if let Some(range) = &self.check_in {
            params.extend(range.to_prefixed_params("checkInFrom", "checkInTo"));
        }
        if let Some(since) = &self.updated_since {
            params.push((
                "updatedSince".to_string(),
                since.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        params
    }
}

/// Filter for `GET /reviews`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    property_id: Option<String>,
    min_rating: Option<u8>,
    responded: Option<bool>,
}

impl ReviewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(&self, property_id: impl Into<String>) -> Self {
        Self {
            property_id: Some(property_id.into()),
            ..self.clone()
        }
    }

    /// Ratings are 1-5; larger values are clamped.
    pub fn with_min_rating(&self, rating: u8) -> Self {
        Self {
            min_rating: Some(rating.clamp(1, 5)),
            ..self.clone()
        }
    }

    /// Only reviews that have (or have not) been answered.
    pub fn with_responded(&self, responded: bool) -> Self {
        Self {
            responded: Some(responded),
            ..self.clone()
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push(&mut params, "propertyId", &self.property_id);
        if let Some(rating) = self.min_rating {
            params.push(("minRating".to_string(), rating.to_string()));
        }
        if let Some(responded) = self.responded {
            params.push(("responded".to_string(), responded.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(date(2026, 7, 1), date(2026, 7, 7)).unwrap();
        assert_eq!(range.days(), 7);
        assert_eq!(
            range.to_params(),
            vec![
                ("from".to_string(), "2026-07-01".to_string()),
                ("to".to_string(), "2026-07-07".to_string()),
            ]
        );

        assert!(DateRange::new(date(2026, 7, 8), date(2026, 7, 7)).is_err());
    }

    #[test]
    fn test_builders_leave_original_untouched() {
        let base = ReservationFilter::new().with_property("prop_1");
        let confirmed = base.with_status("confirmed");

        assert_eq!(base.to_params().len(), 1);
        assert_eq!(confirmed.to_params().len(), 2);
        assert_ne!(base, confirmed);
    }

    #[test]
    fn test_reservation_params() {
        let filter = ReservationFilter::new()
            .with_property("prop_1")
            .with_check_in(DateRange::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap())
            .with_updated_since(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());

        assert_eq!(
            filter.to_params(),
            vec![
                ("propertyId".to_string(), "prop_1".to_string()),
                ("checkInFrom".to_string(), "2026-01-01".to_string()),
                ("checkInTo".to_string(), "2026-01-31".to_string()),
                ("updatedSince".to_string(), "2026-01-02T03:04:05Z".to_string()),
            ]
        );
    }

    #[test]
    fn test_review_params() {
        let filter = ReviewFilter::new().with_min_rating(9).with_responded(false);
        assert_eq!(
            filter.to_params(),
            vec![
                ("minRating".to_string(), "5".to_string()),
                ("responded".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_filter_has_no_params() {
        assert!(PropertyFilter::new().to_params().is_empty());
        assert!(ReservationFilter::new().to_params().is_empty());
        assert!(ReviewFilter::new().to_params().is_empty());
    }
}
