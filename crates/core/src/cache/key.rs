//! Deterministic cache keys derived from query identity.

use std::borrow::Cow;
use std::fmt;

use sha2::{Digest, Sha256};
use url::form_urlencoded;

use crate::catalog::ResponseGroup;

/// Section holding identifier lookups.
pub const LOOKUP_SECTION: &str = "items";

/// Section holding keyword searches.
pub const SEARCH_SECTION: &str = "search";

/// Longest name kept verbatim on disk before it is replaced by a digest.
const MAX_STEM_LEN: usize = 200;

/// Location of one cache entry: an optional section and a name within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub section: Option<String>,
    pub name: String,
}

impl CacheKey {
    /// A key outside of any section.
    pub fn new(name: impl Into<String>) -> Self {
        Self { section: None, name: name.into() }
    }

    /// A key namespaced under `section`.
    pub fn in_section(section: impl Into<String>, name: impl Into<String>) -> Self {
        Self { section: Some(section.into()), name: name.into() }
    }

    /// Key for an identifier lookup.
    ///
    /// The default `Medium` group keeps the bare identifier list as the name;
    /// other groups are suffixed so different detail levels never collide.
    pub fn for_lookup(ids: &str, response_group: ResponseGroup) -> Self {
        let name = match response_group {
            ResponseGroup::Medium => encode(ids),
            other => format!("{}--{}", encode(ids), other),
        };
        Self::in_section(LOOKUP_SECTION, name)
    }

    /// Key for a keyword search: `category--urlencoded_keyword`.
    pub fn for_search(category: &str, keywords: &str) -> Self {
        Self::in_section(SEARCH_SECTION, format!("{}--{}", encode(category), encode(keywords)))
    }

    /// Section as stored in SQLite, where "no section" is the empty string.
    pub fn section_str(&self) -> &str {
        self.section.as_deref().unwrap_or("")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{}/{}", section, self.name),
            None => f.write_str(&self.name),
        }
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// File stem for a key name or section.
///
/// Names made only of portable characters are used as-is; anything else
/// (path separators, leading dots, overly long names) is replaced by its
/// SHA-256 hex digest.
pub fn file_stem(name: &str) -> Cow<'_, str> {
    let portable = !name.is_empty()
        && name.len() <= MAX_STEM_LEN
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '%' | '+'));

    if portable {
        Cow::Borrowed(name)
    } else {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        Cow::Owned(hex::encode(hasher.finalize()))
    }
}
