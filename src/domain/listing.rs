//! Listing entities flowing through one scrape run
//!
//! `DetailLink` is produced by the URL collector, `RawRecord` by the record
//! assembler and `CleanRecord` by the normalizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path marker every listing detail page carries
pub const DETAIL_PATH_MARKER: &str = "/pl/oferta/";

/// Path marker of investment (developer project) pages, which are not listings
pub const INVESTMENT_PATH_MARKER: &str = "/pl/inwestycja/";

/// Column names of the clean dataset, in output order
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "rynek",
    "district",
    "price_clean",
    "price_per_m2_clean",
    "area_clean",
    "rooms_clean",
    "floor_clean",
];

/// URL of one listing's detail page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailLink(String);

impl DetailLink {
    /// Accepts `href` only if it points at a detail page and not at an investment page
    pub fn parse(href: &str) -> Option<Self> {
        let href = href.trim();
        if is_detail_href(href) {
            Some(Self(href.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Detail-link filter shared by the collector and `DetailLink::parse`
pub fn is_detail_href(href: &str) -> bool {
    href.contains(DETAIL_PATH_MARKER) && !href.contains(INVESTMENT_PATH_MARKER)
}

impl AsRef<str> for DetailLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<DetailLink> for String {
    fn from(link: DetailLink) -> Self {
        link.0
    }
}

impl fmt::Display for DetailLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unparsed text fields of one listing, exactly as read from its detail page.
///
/// Every field may be empty; an empty field means the value was absent or
/// its lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Market type ("pierwotny" / "wtórny")
    pub rynek: String,
    pub price: String,
    pub price_per_m2: String,
    #[serde(rename = "area_m2")]
    pub area: String,
    pub rooms: String,
    pub floor: String,
    pub location: String,
    /// One of the known district names, or empty
    pub district: String,
    pub url: String,
}

/// Typed row of the final dataset.
///
/// Raw text columns and the source url are intentionally absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub rynek: String,
    pub district: String,
    pub price_clean: Option<u64>,
    pub price_per_m2_clean: Option<u64>,
    pub area_clean: Option<f64>,
    pub rooms_clean: Option<u64>,
    pub floor_clean: Option<u32>,
}

impl CleanRecord {
    /// Cells in `OUTPUT_COLUMNS` order, missing values as empty strings
    pub fn to_row(&self) -> [String; 7] {
        fn cell<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        [
            self.rynek.clone(),
            self.district.clone(),
            cell(self.price_clean),
            cell(self.price_per_m2_clean),
            cell(self.area_clean),
            cell(self.rooms_clean),
            cell(self.floor_clean),
        ]
    }
}
