//! Listing URL collection
//!
//! Walks the feed pages in order and gathers detail-page links until one of
//! the stopping rules fires: the quota is met, a page contributes nothing
//! new, or the page budget runs out. Links are unique and kept in the order
//! they were first seen.

use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::listing::{DETAIL_PATH_MARKER, DetailLink};
use crate::domain::pagination::feed_page_url;
use crate::infrastructure::page_driver::{DriverResult, Locator, PageDriver};

/// Why collection stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `max_results` links collected
    QuotaReached,
    /// A page was read successfully but added no new links
    NoNewLinks,
    /// All `max_pages` pages were tried
    PageBudgetExhausted,
}

/// What happened during one collection pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    /// Feed pages attempted, failed ones included
    pub pages_visited: u32,
    /// Page numbers skipped because loading or querying them failed
    pub failed_pages: Vec<u32>,
    pub stop_reason: StopReason,
    pub links_collected: usize,
}

/// Collected links plus the report describing how they were gathered
#[derive(Debug, Clone)]
pub struct Collection {
    pub links: Vec<DetailLink>,
    pub report: CollectionReport,
}

/// Ordered set of detail links
#[derive(Debug, Default)]
struct LinkSet {
    seen: HashSet<DetailLink>,
    ordered: Vec<DetailLink>,
}

impl LinkSet {
    /// Adds `link` unless already present; true when it was new
    fn insert(&mut self, link: DetailLink) -> bool {
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.ordered.push(link);
        true
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }

    fn into_vec(self) -> Vec<DetailLink> {
        self.ordered
    }
}

/// Collects listing links from the paginated search feed
#[derive(Debug, Clone)]
pub struct UrlCollector {
    feed_url: String,
    page_load_wait: Duration,
}

impl UrlCollector {
    pub fn new(feed_url: impl Into<String>, page_load_wait: Duration) -> Self {
        Self {
            feed_url: feed_url.into(),
            page_load_wait,
        }
    }

    /// Up to `max_results` unique detail links from at most `max_pages` feed pages.
    ///
    /// Pages that fail to load or answer are logged and skipped. The page
    /// that crosses the quota is read in full and the result cut back to
    /// `max_results` in discovery order.
    pub async fn collect<D>(&self, driver: &mut D, max_pages: u32, max_results: usize) -> Collection
    where
        D: PageDriver + ?Sized,
    {
        let mut links = LinkSet::default();
        let mut report = CollectionReport {
            pages_visited: 0,
            failed_pages: Vec::new(),
            stop_reason: StopReason::PageBudgetExhausted,
            links_collected: 0,
        };

        if max_results == 0 {
            info!("🛑 Link quota is zero, skipping collection");
            report.stop_reason = StopReason::QuotaReached;
            return Collection {
                links: Vec::new(),
                report,
            };
        }

        info!("🔍 Collecting listing URLs (max {} pages, {} links)", max_pages, max_results);

        for page in 1..=max_pages {
            report.pages_visited += 1;
            let url = feed_page_url(&self.feed_url, page);
            info!("🔗 Loading page {}/{}: {}", page, max_pages, url);

            let found = match self.harvest_page(driver, &url).await {
                Ok(found) => found,
                Err(e) => {
                    warn!("⚠️ Error on page {}: {}", page, e);
                    report.failed_pages.push(page);
                    continue;
                }
            };

            let found_count = found.len();
            let new_count = found
                .into_iter()
                .map(|link| links.insert(link))
                .filter(|inserted| *inserted)
                .count();
            info!(
                "📝 Page {}: {} links, {} new (total: {})",
                page,
                found_count,
                new_count,
                links.len()
            );

            if links.len() >= max_results {
                report.stop_reason = StopReason::QuotaReached;
                break;
            }
            if new_count == 0 {
                info!("🛑 No new links on page {}, stopping", page);
                report.stop_reason = StopReason::NoNewLinks;
                break;
            }
        }

        let mut links = links.into_vec();
        links.truncate(max_results);
        report.links_collected = links.len();
        info!(
            "✅ Collected {} unique links from {} pages ({:?})",
            report.links_collected, report.pages_visited, report.stop_reason
        );

        Collection { links, report }
    }

    /// Detail links on one feed page, in document order
    async fn harvest_page<D>(&self, driver: &mut D, url: &str) -> DriverResult<Vec<DetailLink>>
    where
        D: PageDriver + ?Sized,
    {
        driver.navigate(url).await?;
        if !self.page_load_wait.is_zero() {
            tokio::time::sleep(self.page_load_wait).await;
        }

        let anchors = driver
            .find_elements(&Locator::css(format!("a[href*=\"{DETAIL_PATH_MARKER}\"]")))
            .await?;

        let links = anchors
            .into_iter()
            .filter_map(|anchor| match anchor.href {
                Some(href) => DetailLink::parse(&href),
                None => {
                    debug!("Skipping anchor without href");
                    None
                }
            })
            .collect();

        Ok(links)
    }
}
