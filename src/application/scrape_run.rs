//! One end-to-end scrape: collect links, assemble raw records, normalize
//!
//! A `ScrapeRun` owns its driver and every piece of run-scoped state, and is
//! consumed by `run`, so nothing carries over from one run to the next.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use super::record_assembler::RecordAssembler;
use super::url_collector::{CollectionReport, UrlCollector};
use crate::domain::listing::{CleanRecord, RawRecord};
use crate::domain::normalization::normalize;
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::page_driver::PageDriver;

/// Counters describing a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub links_collected: usize,
    pub records_assembled: usize,
    /// Detail pages that could not be opened
    pub records_dropped: usize,
    pub clean_records: usize,
    pub elapsed_ms: u64,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub records: Vec<CleanRecord>,
    pub summary: RunSummary,
    pub collection: CollectionReport,
}

impl ScrapeOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct ScrapeRun<D: PageDriver> {
    id: Uuid,
    driver: D,
    settings: ScraperConfig,
    raw_records: Vec<RawRecord>,
}

impl<D: PageDriver> ScrapeRun<D> {
    pub fn new(driver: D, settings: ScraperConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
            settings,
            raw_records: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Runs the whole pipeline; never fails, only ever yields fewer records
    pub async fn run(mut self) -> ScrapeOutcome {
        let started = Instant::now();
        info!("🚀 Starting scrape run {}", self.id);

        let collector = UrlCollector::new(&self.settings.feed_url, self.settings.page_load_wait());
        let collection = collector
            .collect(&mut self.driver, self.settings.max_pages, self.settings.max_results)
            .await;

        let total = collection.links.len();
        let mut dropped = 0usize;

        if total == 0 {
            warn!("No listing URLs collected in run {}", self.id);
        } else {
            info!("Scraping {} apartments...", total);
            let assembler = RecordAssembler::new(self.settings.page_load_wait());
            let item_delay = self.settings.item_delay();

            for (index, link) in collection.links.iter().enumerate() {
                if index > 0 {
                    pause(item_delay).await;
                }

                info!("[{}/{}] Scraping apartment...", index + 1, total);
                match assembler.scrape_one(&mut self.driver, link).await {
                    Ok(record) => self.raw_records.push(record),
                    Err(e) => {
                        warn!("⚠️ Dropping {}: {}", link, e);
                        dropped += 1;
                    }
                }
            }
        }

        let records = normalize(&self.raw_records);
        let summary = RunSummary {
            run_id: self.id,
            links_collected: total,
            records_assembled: self.raw_records.len(),
            records_dropped: dropped,
            clean_records: records.len(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            "✅ Scrape run {} finished: {} records ({} dropped) in {} ms",
            summary.run_id, summary.clean_records, summary.records_dropped, summary.elapsed_ms
        );

        ScrapeOutcome {
            records,
            summary,
            collection: collection.report,
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::url_collector::StopReason;
    use crate::domain::pagination::feed_page_url;
    use crate::infrastructure::memory_driver::MemoryPageDriver;

    const FEED: &str = "https://www.otodom.pl/pl/wyniki/sprzedaz/mieszkanie/warszawa";

    fn settings(max_pages: u32, max_results: usize) -> ScraperConfig {
        ScraperConfig {
            feed_url: FEED.to_string(),
            max_pages,
            max_results,
            ..ScraperConfig::default()
        }
        .without_waits()
    }

    fn detail(price: &str, location: &str) -> String {
        format!(
            r##"<strong data-cy="adPageHeaderPrice">{price}</strong>
                <a href="#map">{location}</a>
                <div><div>Piętro:</div><div>parter</div></div>"##
        )
    }

    #[tokio::test]
    async fn runs_the_pipeline_and_drops_unreachable_details() {
        let feed = r#"
            <a href="/pl/oferta/a-ID1">A</a>
            <a href="/pl/oferta/b-ID2">B</a>
            <a href="/pl/oferta/c-ID3">C</a>
        "#;
        let mut driver = MemoryPageDriver::new()
            .with_page(feed_page_url(FEED, 1), feed)
            .with_page(feed_page_url(FEED, 2), feed)
            .with_page(
                "https://www.otodom.pl/pl/oferta/a-ID1",
                detail("600 000 zł", "Wola, Warszawa"),
            )
            .with_failing_navigation("https://www.otodom.pl/pl/oferta/b-ID2")
            .with_page(
                "https://www.otodom.pl/pl/oferta/c-ID3",
                detail("1 200 000 zł", "Sadyba, Wilanów"),
            );

        let outcome = ScrapeRun::new(&mut driver, settings(3, 10)).run().await;

        assert_eq!(outcome.collection.stop_reason, StopReason::NoNewLinks);
        assert_eq!(outcome.summary.links_collected, 3);
        assert_eq!(outcome.summary.records_assembled, 2);
        assert_eq!(outcome.summary.records_dropped, 1);
        assert_eq!(outcome.summary.clean_records, 2);

        assert_eq!(outcome.records[0].district, "Wola");
        assert_eq!(outcome.records[0].price_clean, Some(600_000));
        assert_eq!(outcome.records[0].floor_clean, Some(0));
        assert_eq!(outcome.records[1].district, "Wilanów");

        assert_eq!(driver.visited().len(), 5);
    }

    #[tokio::test]
    async fn empty_feed_gives_empty_outcome() {
        let mut driver = MemoryPageDriver::new().with_page(feed_page_url(FEED, 1), "<p>Brak ogłoszeń</p>");

        let outcome = ScrapeRun::new(&mut driver, settings(3, 10)).run().await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.summary.links_collected, 0);
        assert_eq!(outcome.collection.pages_visited, 1);
    }

    #[test]
    fn each_run_gets_its_own_id() {
        let first = ScrapeRun::new(MemoryPageDriver::new(), settings(1, 1));
        let second = ScrapeRun::new(MemoryPageDriver::new(), settings(1, 1));
        assert_ne!(first.id(), second.id());
    }
}
