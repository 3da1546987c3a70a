//! Application layer module
//!
//! Orchestrates the domain rules over a `PageDriver`: link collection,
//! per-listing field extraction and record assembly, and the scrape run
//! that ties them together.

pub mod field_extractor;
pub mod record_assembler;
pub mod scrape_run;
pub mod url_collector;

pub use field_extractor::{FieldExtractor, FieldLookup};
pub use record_assembler::{AssemblyError, RecordAssembler};
pub use scrape_run::{RunSummary, ScrapeOutcome, ScrapeRun};
pub use url_collector::{Collection, CollectionReport, StopReason, UrlCollector};
