//! Domain module - listing entities and pure business rules
//!
//! Nothing in here performs I/O: link filtering, pagination URLs, district
//! matching and numeric normalization are all plain functions over text.

pub mod district;
pub mod listing;
pub mod normalization;
pub mod pagination;

// Re-export commonly used items for convenience
pub use district::{WARSAW_DISTRICTS, match_district};
pub use listing::{CleanRecord, DetailLink, OUTPUT_COLUMNS, RawRecord, is_detail_href};
pub use normalization::{extract_decimal, extract_floor_number, extract_integer, normalize};
pub use pagination::feed_page_url;
