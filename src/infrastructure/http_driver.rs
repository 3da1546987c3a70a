//! HTTP-backed page driver
//!
//! Fetches server-rendered HTML with reqwest and answers locator queries
//! with `scraper`. A governor rate limiter keeps the request rate polite
//! independently of the scrape loop's own fixed delays.

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::{
    Client,
    header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT},
};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, info};

use super::config::HttpConfig;
use super::html_query;
use super::page_driver::{DriverError, DriverResult, Locator, PageDriver, PageElement};

/// Page loaded by the last successful navigation
#[derive(Debug)]
struct LoadedPage {
    url: String,
    html: String,
}

pub struct HttpPageDriver {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    page: Option<LoadedPage>,
}

impl HttpPageDriver {
    /// Build a driver from the HTTP section of the app config
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("pl-PL,pl;q=0.9,en;q=0.5"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .cookie_store(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );

        Ok(Self {
            client,
            rate_limiter: RateLimiter::direct(quota),
            page: None,
        })
    }

    fn loaded(&self) -> DriverResult<&LoadedPage> {
        self.page.as_ref().ok_or(DriverError::NoPageLoaded)
    }
}

#[async_trait]
impl PageDriver for HttpPageDriver {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.rate_limiter.until_ready().await;

        info!("Fetching URL: {}", url);
        // A failed navigation leaves no page behind, like a browser error page
        self.page = None;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DriverError::navigation(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriverError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Redirects (e.g. past the last feed page) land somewhere else
        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| DriverError::navigation(url, e))?;

        debug!("Loaded {} ({} bytes, {})", final_url, html.len(), status);
        self.page = Some(LoadedPage { url: final_url, html });
        Ok(())
    }

    async fn find_elements(&mut self, locator: &Locator) -> DriverResult<Vec<PageElement>> {
        let page = self.loaded()?;
        html_query::select(&page.html, &page.url, locator)
    }

    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.url.as_str())
    }
}
