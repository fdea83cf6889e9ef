//! Catalog request validation and query-string construction.

use std::sync::LazyLock;

use adsift_core::{CatalogRequest, ResponseGroup};
use regex::Regex;

use super::ApiError;

/// Maximum keyword length accepted by the catalog.
pub const MAX_KEYWORD_LEN: usize = 400;

/// Maximum identifiers per lookup.
pub const MAX_LOOKUP_IDS: usize = 10;

const SERVICE: &str = "AWSECommerceService";

static ITEM_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{10}$").expect("valid item id pattern"));

static UPC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid upc pattern"));

fn check_search_text(what: &str, text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::InvalidKeyword(format!("{what} cannot be empty")));
    }
    let len = text.chars().count();
    if len > MAX_KEYWORD_LEN {
        return Err(ApiError::InvalidKeyword(format!("{what} too long: {len} chars (max {MAX_KEYWORD_LEN})")));
    }
    Ok(())
}

/// Validate a request before it is sent.
///
/// Returns an error if the keyword is empty or too long, or if the
/// identifier list is empty, too long or contains a malformed identifier.
pub fn validate(request: &CatalogRequest) -> Result<(), ApiError> {
    match request {
        CatalogRequest::ItemSearch { keywords, .. } => check_search_text("keyword", keywords)?,
        CatalogRequest::TitleSearch { title, .. } => check_search_text("title", title)?,
        CatalogRequest::UpcLookup { upc, .. } => {
            if !UPC.is_match(upc.trim()) {
                return Err(ApiError::InvalidIdentifier(format!("'{upc}' is not a 12-digit UPC")));
            }
        }
        CatalogRequest::ItemLookup { ids, .. } => {
            let ids: Vec<&str> = ids.split(',').map(str::trim).collect();
            if ids.len() > MAX_LOOKUP_IDS {
                return Err(ApiError::InvalidIdentifier(format!(
                    "too many identifiers: {} (max {MAX_LOOKUP_IDS})",
                    ids.len()
                )));
            }
            if let Some(bad) = ids.iter().find(|id| !ITEM_ID.is_match(id)) {
                return Err(ApiError::InvalidIdentifier(format!("'{bad}' is not a 10-character item id")));
            }
        }
    }

    Ok(())
}

/// Query parameters for `request`, in a stable order.
pub fn query_params(request: &CatalogRequest, access_key: &str, partner_tag: &str) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("Service", SERVICE.to_string()),
        ("AWSAccessKeyId", access_key.to_string()),
        ("AssociateTag", partner_tag.to_string()),
        ("Operation", request.operation().to_string()),
    ];

    match request {
        CatalogRequest::ItemLookup { ids, response_group } => {
            let ids: Vec<&str> = ids.split(',').map(str::trim).collect();
            params.push(("ItemId", ids.join(",")));
            params.push(("ResponseGroup", response_group.to_string()));
        }
        CatalogRequest::ItemSearch { keywords, search_index, response_group } => {
            params.push(("Keywords", keywords.clone()));
            params.push(("SearchIndex", search_index.clone()));
            params.push(("ResponseGroup", response_group.to_string()));
            // Unavailable products make poor ads.
            params.push(("Availability", "Available".to_string()));
        }
        CatalogRequest::UpcLookup { upc, search_index } => {
            params.push(("ItemId", upc.trim().to_string()));
            params.push(("IdType", "UPC".to_string()));
            params.push(("SearchIndex", search_index.clone()));
            params.push(("ResponseGroup", ResponseGroup::Medium.to_string()));
        }
        CatalogRequest::TitleSearch { title, search_index } => {
            params.push(("Title", title.clone()));
            params.push(("SearchIndex", search_index.clone()));
            params.push(("ResponseGroup", ResponseGroup::Medium.to_string()));
        }
    }

    params
}
