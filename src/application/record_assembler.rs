//! Turns one detail URL into one raw record

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::field_extractor::{
    AREA_LABEL, FLOOR_LABEL, FieldExtractor, FieldLookup, MARKET_LABEL, ROOMS_LABEL,
};
use crate::domain::district::match_district;
use crate::domain::listing::{DetailLink, RawRecord};
use crate::infrastructure::page_driver::{DriverError, PageDriver};

#[derive(Error, Debug)]
pub enum AssemblyError {
    /// The detail page never loaded, so there is no record
    #[error("Could not open {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: DriverError,
    },
}

/// Assembles raw records from detail pages
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    page_load_wait: Duration,
}

impl RecordAssembler {
    pub fn new(page_load_wait: Duration) -> Self {
        Self { page_load_wait }
    }

    /// Loads `link` and reads every field from it.
    ///
    /// Only a failed navigation is an error. Once the page is loaded each
    /// field is read on its own and left empty when it cannot be found.
    pub async fn scrape_one<D>(&self, driver: &mut D, link: &DetailLink) -> Result<RawRecord, AssemblyError>
    where
        D: PageDriver + ?Sized,
    {
        driver
            .navigate(link.as_str())
            .await
            .map_err(|source| AssemblyError::Navigation {
                url: link.to_string(),
                source,
            })?;

        if !self.page_load_wait.is_zero() {
            tokio::time::sleep(self.page_load_wait).await;
        }

        let mut fields = FieldExtractor::new(driver);
        let mut failed = 0usize;
        let mut text = |lookup: FieldLookup| {
            if lookup.is_failed() {
                failed += 1;
            }
            lookup.into_text()
        };

        let rynek = text(fields.lookup_detail_value(MARKET_LABEL).await);
        let price = text(fields.lookup_price().await);
        let price_per_m2 = text(fields.lookup_price_per_m2().await);
        let area = text(fields.lookup_detail_value(AREA_LABEL).await);
        let rooms = text(fields.lookup_detail_value(ROOMS_LABEL).await);
        let floor = text(fields.lookup_detail_value(FLOOR_LABEL).await);
        let location = text(fields.lookup_location().await);

        if failed > 0 {
            warn!("{} field lookups failed on {}", failed, link);
        }

        let district = match_district(&location).to_string();
        debug!("Assembled {} (district: {:?})", link, district);

        Ok(RawRecord {
            rynek,
            price,
            price_per_m2,
            area,
            rooms,
            floor,
            location,
            district,
            url: link.to_string(),
        })
    }
}
