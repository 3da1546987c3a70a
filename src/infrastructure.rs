//! Infrastructure layer: page drivers, configuration, logging and export
//!
//! Everything that touches the network, the filesystem or process-wide
//! state lives here; the application layer only sees the `PageDriver` trait.

pub mod config; // Layered configuration
pub mod csv_export;
pub mod html_query; // Locator evaluation shared by the drivers
pub mod http_driver;
pub mod logging;
pub mod memory_driver;
pub mod page_driver;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, HttpConfig, LoggingConfig, OutputConfig, ScraperConfig};
pub use csv_export::{ExportError, save_to_csv, write_csv};
pub use http_driver::HttpPageDriver;
pub use logging::{init_logging, init_logging_with_config};
pub use memory_driver::MemoryPageDriver;
pub use page_driver::{DriverError, DriverResult, Locator, PageDriver, PageElement};
