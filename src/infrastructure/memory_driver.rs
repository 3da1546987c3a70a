//! In-memory page driver
//!
//! Serves canned HTML keyed by URL and keeps a log of every navigation, so
//! collection and extraction logic can be exercised without a network. Also
//! handy for replaying pages saved from an earlier run.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use super::html_query;
use super::page_driver::{DriverError, DriverResult, Locator, PageDriver, PageElement};

#[derive(Debug, Default, Clone)]
pub struct MemoryPageDriver {
    pages: HashMap<String, String>,
    failing_navigation: HashSet<String>,
    failing_queries: HashSet<String>,
    visited: Vec<String>,
    current: Option<String>,
}

impl MemoryPageDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Make navigation to `url` fail
    pub fn with_failing_navigation(mut self, url: impl Into<String>) -> Self {
        self.failing_navigation.insert(url.into());
        self
    }

    /// Let navigation to `url` succeed but make every query on it fail
    pub fn with_failing_queries(mut self, url: impl Into<String>) -> Self {
        self.failing_queries.insert(url.into());
        self
    }

    /// Every URL passed to `navigate`, in call order, failures included
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// How many navigations targeted `url`
    pub fn visit_count(&self, url: &str) -> usize {
        self.visited.iter().filter(|visited| *visited == url).count()
    }
}

#[async_trait]
impl PageDriver for MemoryPageDriver {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.visited.push(url.to_string());
        self.current = None;

        if self.failing_navigation.contains(url) {
            return Err(DriverError::navigation(url, "simulated navigation failure"));
        }
        if !self.pages.contains_key(url) {
            return Err(DriverError::HttpStatus {
                status: 404,
                url: url.to_string(),
            });
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    async fn find_elements(&mut self, locator: &Locator) -> DriverResult<Vec<PageElement>> {
        let url = self.current.as_deref().ok_or(DriverError::NoPageLoaded)?;
        if self.failing_queries.contains(url) {
            return Err(DriverError::navigation(url, "simulated query failure"));
        }

        let html = self.pages.get(url).ok_or(DriverError::NoPageLoaded)?;
        html_query::select(html, url, locator)
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
