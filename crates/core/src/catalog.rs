//! Boundary between the ad engine and a remote product catalog.
//!
//! The engine only knows this trait and these types; the HTTP implementation
//! lives in `adsift-client`, and tests substitute in-process fakes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Search index for music releases.
pub const MUSIC: &str = "Music";

/// Search index for films.
pub const DVD: &str = "DVD";

/// Search index for console and PC games.
pub const VIDEO_GAMES: &str = "VideoGames";

/// Level of detail requested from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseGroup {
    Small,
    Medium,
    Large,
    Reviews,
    EditorialReview,
    PromotionSummary,
    OfferSummary,
    VariationSummary,
    Offers,
    OfferFull,
    Images,
    ItemAttributes,
    ItemIds,
    SalesRank,
    VariationImages,
    Variations,
    RelatedItems,
    Similarities,
    Accessories,
    Tracks,
    BrowseNodes,
}

impl ResponseGroup {
    const ALL: [ResponseGroup; 21] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Reviews,
        Self::EditorialReview,
        Self::PromotionSummary,
        Self::OfferSummary,
        Self::VariationSummary,
        Self::Offers,
        Self::OfferFull,
        Self::Images,
        Self::ItemAttributes,
        Self::ItemIds,
        Self::SalesRank,
        Self::VariationImages,
        Self::Variations,
        Self::RelatedItems,
        Self::Similarities,
        Self::Accessories,
        Self::Tracks,
        Self::BrowseNodes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Reviews => "Reviews",
            Self::EditorialReview => "EditorialReview",
            Self::PromotionSummary => "PromotionSummary",
            Self::OfferSummary => "OfferSummary",
            Self::VariationSummary => "VariationSummary",
            Self::Offers => "Offers",
            Self::OfferFull => "OfferFull",
            Self::Images => "Images",
            Self::ItemAttributes => "ItemAttributes",
            Self::ItemIds => "ItemIds",
            Self::SalesRank => "SalesRank",
            Self::VariationImages => "VariationImages",
            Self::Variations => "Variations",
            Self::RelatedItems => "RelatedItems",
            Self::Similarities => "Similarities",
            Self::Accessories => "Accessories",
            Self::Tracks => "Tracks",
            Self::BrowseNodes => "BrowseNodes",
        }
    }

    /// Response group for an identifier lookup; unknown names fall back to `Medium`.
    pub fn for_lookup(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == name)
            .unwrap_or(Self::Medium)
    }
}

impl fmt::Display for ResponseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// Look up items by a comma-separated identifier list.
    ItemLookup { ids: String, response_group: ResponseGroup },
    /// Search one index for a keyword string.
    ItemSearch { keywords: String, search_index: String, response_group: ResponseGroup },
    /// Look up one product by its UPC barcode within an index.
    UpcLookup { upc: String, search_index: String },
    /// Search one index by product title.
    TitleSearch { title: String, search_index: String },
}

impl CatalogRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ItemLookup { .. } | Self::UpcLookup { .. } => "ItemLookup",
            Self::ItemSearch { .. } | Self::TitleSearch { .. } => "ItemSearch",
        }
    }
}

/// A decoded catalog item, before it is shaped into an ad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub small_image_url: Option<String>,
    #[serde(default)]
    pub formatted_price: Option<String>,
}

/// Failure reported by a catalog client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The catalog could not be reached or answered with an HTTP failure.
    #[error("catalog transport error: {0}")]
    Transport(String),

    /// The request was rejected or the response carried no usable items.
    #[error("catalog validation error: {0}")]
    Validation(String),
}

/// A remote product catalog.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Perform one lookup or search and return the decoded items.
    async fn lookup(&self, request: &CatalogRequest) -> Result<Vec<CatalogItem>, CatalogError>;
}
