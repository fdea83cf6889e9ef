//! Ad records and result sets handed to the rendering layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// Insecure image host prefix used by catalog responses.
pub const INSECURE_IMAGE_HOST: &str = "http://ecx.images-amazon.com/";

/// TLS image host that serves the same paths.
pub const SECURE_IMAGE_HOST: &str = "https://images-na.ssl-images-amazon.com/";

/// Display fields of one advertised product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ItemRecord {
    pub title: String,
    pub url: String,
    pub image_url: String,
    pub price_display: String,
}

impl ItemRecord {
    /// Build a record for an identifier lookup.
    ///
    /// Returns `None` when the catalog item has no title or no detail page,
    /// since such an ad cannot be rendered.
    pub fn from_lookup(item: CatalogItem, secure_images: bool) -> Option<Self> {
        let title = item.title?;
        let url = item.detail_page_url?;
        Some(Self::assemble(title, url, item.small_image_url, item.formatted_price, secure_images))
    }

    /// Build a record for a keyword search; missing fields become empty strings.
    pub fn from_search(item: CatalogItem, secure_images: bool) -> Self {
        Self::assemble(
            item.title.unwrap_or_default(),
            item.detail_page_url.unwrap_or_default(),
            item.small_image_url,
            item.formatted_price,
            secure_images,
        )
    }

    fn assemble(
        title: String, url: String, image: Option<String>, price: Option<String>, secure_images: bool,
    ) -> Self {
        let image_url = image.unwrap_or_default();
        let image_url = if secure_images { secure_image_url(&image_url) } else { image_url };
        Self { title, url, image_url, price_display: price.unwrap_or_default() }
    }
}

/// Rewrite an image URL onto the TLS image host.
///
/// URLs on any other host are returned unchanged.
pub fn secure_image_url(url: &str) -> String {
    url.replace(INSECURE_IMAGE_HOST, SECURE_IMAGE_HOST)
}

/// A timestamped, ordered collection of ads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Freshness of the oldest contributing fetch; `None` when nothing was fetched.
    pub cache_date: Option<DateTime<Utc>>,
    pub items: Vec<ItemRecord>,
}

impl ResultSet {
    /// An empty result: "no ads available".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(cache_date: DateTime<Utc>, items: Vec<ItemRecord>) -> Self {
        Self { cache_date: Some(cache_date), items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
