//! listing-scout - Warsaw apartment listing scraper
//!
//! Collects listing URLs from the Otodom search feed, reads each listing's
//! detail page into a raw record, and normalizes the records into a typed
//! dataset ready for CSV export.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ScrapeOutcome, ScrapeRun};
pub use domain::{CleanRecord, DetailLink, RawRecord};
