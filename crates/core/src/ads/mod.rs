//! Ad selection: fetching, expression expansion, deduplication and sampling.

pub mod engine;
pub mod keywords;
pub mod sampling;
pub mod similarity;

pub use engine::{AdEngine, DEFAULT_LIMIT, DEFAULT_SIMILARITY, FRESHNESS_WINDOW_SECS, SearchOptions};
pub use keywords::parse_expression;
pub use sampling::sample_limit;
pub use similarity::{dedupe, similarity};
