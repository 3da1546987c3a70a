//! Best-effort field lookups on a loaded detail page
//!
//! Every lookup has two forms: `lookup_*` returns a `FieldLookup` that keeps
//! "not on the page" apart from "the query broke", and `get_*` flattens that
//! into the plain text column value (empty string for anything but a hit).

use tracing::debug;

use crate::infrastructure::page_driver::{DriverError, DriverResult, Locator, PageDriver, PageElement};

/// Header price, e.g. "1 250 000 zł"
pub const PRICE_SELECTOR: &str = r#"[data-cy="adPageHeaderPrice"]"#;
/// Price per square metre, e.g. "19 231 zł/m²"
pub const PRICE_PER_M2_SELECTOR: &str = r#"[aria-label="Cena za metr kwadratowy"]"#;
/// Address link that scrolls to the map
pub const LOCATION_SELECTOR: &str = r##"a[href="#map"]"##;

pub const MARKET_LABEL: &str = "Rynek";
pub const AREA_LABEL: &str = "Powierzchnia";
pub const ROOMS_LABEL: &str = "Liczba pokoi";
pub const FLOOR_LABEL: &str = "Piętro";

/// Outcome of one field lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLookup {
    /// Element found with non-empty text (trimmed)
    Found(String),
    /// The page has no such element, or it is blank
    Absent,
    /// The lookup itself failed
    Failed(DriverError),
}

impl FieldLookup {
    fn from_result(result: DriverResult<PageElement>) -> Self {
        match result {
            Ok(element) => {
                let text = element.text.trim();
                if text.is_empty() {
                    Self::Absent
                } else {
                    Self::Found(text.to_string())
                }
            }
            Err(e) if e.is_not_found() => Self::Absent,
            Err(e) => Self::Failed(e),
        }
    }

    /// Column value: the text when found, otherwise empty
    pub fn into_text(self) -> String {
        match self {
            Self::Found(text) => text,
            Self::Absent | Self::Failed(_) => String::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Field lookups against whatever page `driver` has loaded
pub struct FieldExtractor<'a, D: PageDriver + ?Sized> {
    driver: &'a mut D,
}

impl<'a, D: PageDriver + ?Sized> FieldExtractor<'a, D> {
    pub fn new(driver: &'a mut D) -> Self {
        Self { driver }
    }

    async fn lookup(&mut self, field: &str, locator: Locator) -> FieldLookup {
        let outcome = FieldLookup::from_result(self.driver.find_element(&locator).await);
        match &outcome {
            FieldLookup::Found(text) => debug!("Extracted {}: {}", field, text),
            FieldLookup::Absent => debug!("No {} on page ({})", field, locator),
            FieldLookup::Failed(e) => debug!("Lookup of {} failed: {}", field, e),
        }
        outcome
    }

    /// Value cell next to `label` in the details table
    pub async fn lookup_detail_value(&mut self, label: &str) -> FieldLookup {
        self.lookup(label, Locator::labeled(label)).await
    }

    pub async fn lookup_price(&mut self) -> FieldLookup {
        self.lookup("price", Locator::css(PRICE_SELECTOR)).await
    }

    pub async fn lookup_price_per_m2(&mut self) -> FieldLookup {
        self.lookup("price per m²", Locator::css(PRICE_PER_M2_SELECTOR)).await
    }

    pub async fn lookup_location(&mut self) -> FieldLookup {
        self.lookup("location", Locator::css(LOCATION_SELECTOR)).await
    }

    pub async fn get_detail_value(&mut self, label: &str) -> String {
        self.lookup_detail_value(label).await.into_text()
    }

    pub async fn get_price(&mut self) -> String {
        self.lookup_price().await.into_text()
    }

    pub async fn get_price_per_m2(&mut self) -> String {
        self.lookup_price_per_m2().await.into_text()
    }

    pub async fn get_location(&mut self) -> String {
        self.lookup_location().await.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_driver::MemoryPageDriver;

    const URL: &str = "https://www.otodom.pl/pl/oferta/kawalerka-ID4xyz";

    const DETAIL_PAGE: &str = r##"
        <html><body>
          <strong data-cy="adPageHeaderPrice">  549 000 zł </strong>
          <div aria-label="Cena za metr kwadratowy">17 710 zł/m²</div>
          <a href="#map">ul. Grójecka, Ochota, Warszawa, mazowieckie</a>
          <div><div>Powierzchnia:</div><div>31 m²</div></div>
          <div><div>Liczba pokoi:</div><div>1</div></div>
          <div><div>Piętro:</div><div>parter/4</div></div>
          <div><div>Rynek:</div><div></div></div>
        </body></html>
    "##;

    async fn loaded_driver() -> MemoryPageDriver {
        let mut driver = MemoryPageDriver::new().with_page(URL, DETAIL_PAGE);
        driver.navigate(URL).await.unwrap();
        driver
    }

    #[tokio::test]
    async fn reads_attribute_and_link_keyed_fields() {
        let mut driver = loaded_driver().await;
        let mut extractor = FieldExtractor::new(&mut driver);

        assert_eq!(extractor.get_price().await, "549 000 zł");
        assert_eq!(extractor.get_price_per_m2().await, "17 710 zł/m²");
        assert_eq!(
            extractor.get_location().await,
            "ul. Grójecka, Ochota, Warszawa, mazowieckie"
        );
    }

    #[tokio::test]
    async fn reads_labeled_values() {
        let mut driver = loaded_driver().await;
        let mut extractor = FieldExtractor::new(&mut driver);

        assert_eq!(extractor.get_detail_value(AREA_LABEL).await, "31 m²");
        assert_eq!(extractor.get_detail_value(ROOMS_LABEL).await, "1");
        assert_eq!(extractor.get_detail_value(FLOOR_LABEL).await, "parter/4");
    }

    #[tokio::test]
    async fn blank_and_missing_fields_are_absent() {
        let mut driver = loaded_driver().await;
        let mut extractor = FieldExtractor::new(&mut driver);

        assert_eq!(extractor.lookup_detail_value(MARKET_LABEL).await, FieldLookup::Absent);
        assert_eq!(extractor.lookup_detail_value("Czynsz").await, FieldLookup::Absent);
        assert_eq!(extractor.get_detail_value("Czynsz").await, "");
    }

    #[tokio::test]
    async fn failed_queries_are_reported_but_read_as_empty() {
        let mut driver = MemoryPageDriver::new()
            .with_page(URL, DETAIL_PAGE)
            .with_failing_queries(URL);
        driver.navigate(URL).await.unwrap();
        let mut extractor = FieldExtractor::new(&mut driver);

        let lookup = extractor.lookup_price().await;
        assert!(lookup.is_failed());
        assert_eq!(lookup.into_text(), "");
        assert_eq!(extractor.get_location().await, "");
    }

    #[tokio::test]
    async fn lookups_without_a_page_fail_quietly() {
        let mut driver = MemoryPageDriver::new();
        let mut extractor = FieldExtractor::new(&mut driver);

        assert!(extractor.lookup_price().await.is_failed());
        assert_eq!(extractor.get_detail_value(AREA_LABEL).await, "");
    }
}
