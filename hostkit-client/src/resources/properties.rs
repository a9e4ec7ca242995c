//! Properties (`/properties`).

use futures_core::Stream;
use serde::{Deserialize, Serialize};

use urlencoding::encode;
use crate::client::HostkitClient;
use crate::filters::PropertyFilter;
use crate::pager::PageRequest;
use crate::types::{Page, Result};

/// Postal address of a property.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A rental unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HostkitClient {
    /// First page of properties matching `filter`.
    pub async fn list_properties(&self, filter: &PropertyFilter) -> Result<Page<Property>> {
        let request = PageRequest::first(filter.to_params());
        self.list_page("/properties", request.query_pairs()).await
    }

    /// Every property matching `filter`, fetched page by page.
    pub fn properties<'a>(
        &'a self,
        filter: &PropertyFilter,
    ) -> impl Stream<Item = Result<Property>> + Send + use<'a> {
        self.paginate("/properties".to_string(), filter.to_params())
    }

    pub async fn get_property(&self, property_id: &str) -> Result<Property> {
        self.get(&format!("/properties/{}", encode(property_id)), &[])
            .await
    }
}
