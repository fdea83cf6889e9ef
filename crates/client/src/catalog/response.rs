//! Catalog response types and normalization.
//!
//! The catalog mirrors its XML schema in JSON: element names are PascalCase
//! and repeated elements collapse to a bare object when only one is present,
//! so list-valued fields accept either shape.

use adsift_core::CatalogItem;
use serde::Deserialize;

use super::ApiError;

/// One element or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(items) => items.first(),
        }
    }
}

/// Raw response from the catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogApiResponse {
    #[serde(default)]
    pub items: Option<Items>,
}

/// Items container with the request echo.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Items {
    #[serde(default)]
    pub request: Option<RequestEcho>,
    #[serde(default)]
    pub item: OneOrMany<Item>,
}

/// Echo of the request, carrying errors when the catalog rejected it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestEcho {
    #[serde(default)]
    pub errors: Option<Errors>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Errors {
    #[serde(default)]
    pub error: OneOrMany<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Individual catalog item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    #[serde(default, rename = "ASIN")]
    pub asin: Option<String>,
    #[serde(default, rename = "DetailPageURL")]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub small_image: Option<Image>,
    #[serde(default)]
    pub item_attributes: Option<ItemAttributes>,
    #[serde(default)]
    pub offer_summary: Option<OfferSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    #[serde(default, rename = "URL")]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemAttributes {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferSummary {
    #[serde(default)]
    pub lowest_new_price: Option<Price>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Price {
    #[serde(default)]
    pub formatted_price: Option<String>,
}

impl From<Item> for CatalogItem {
    fn from(raw: Item) -> Self {
        CatalogItem {
            title: raw.item_attributes.and_then(|a| a.title),
            detail_page_url: raw.detail_page_url,
            small_image_url: raw.small_image.and_then(|i| i.url),
            formatted_price: raw
                .offer_summary
                .and_then(|o| o.lowest_new_price)
                .and_then(|p| p.formatted_price),
        }
    }
}

impl CatalogApiResponse {
    /// Parse a response body.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Accept the response if at least one item has a title.
    ///
    /// A rejected response quotes the catalog's first reported error.
    pub fn verify(self) -> Result<Vec<CatalogItem>, ApiError> {
        let items = self.items.ok_or(ApiError::InvalidResponse(None))?;

        let has_title = match &items.item {
            OneOrMany::One(item) => item.item_attributes.as_ref().is_some_and(|a| a.title.is_some()),
            OneOrMany::Many(list) => list
                .iter()
                .any(|item| item.item_attributes.as_ref().is_some_and(|a| a.title.is_some())),
        };

        if !has_title {
            let detail = items
                .request
                .and_then(|r| r.errors)
                .and_then(|e| e.error.first().map(|d| format!("Code: {}; Message: {}", d.code, d.message)));
            return Err(ApiError::InvalidResponse(detail));
        }

        Ok(items.item.into_vec().into_iter().map(CatalogItem::from).collect())
    }
}
