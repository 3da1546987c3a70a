//! Page-control capability the scraping core depends on
//!
//! The collector and the record assembler only ever talk to a `PageDriver`:
//! navigate somewhere, then look elements up on whatever page is loaded.
//! `HttpPageDriver` backs it with real HTTP fetches, `MemoryPageDriver` with
//! canned HTML for tests and offline replay.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// How to find an element on the loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Any CSS selector `scraper` understands
    Css(String),
    /// The value cell next to a label: the first `div` whose own text
    /// contains the label, then that div's first following sibling `div`
    LabeledValue(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Self::LabeledValue(label.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css `{selector}`"),
            Self::LabeledValue(label) => write!(f, "value labeled `{label}`"),
        }
    }
}

/// Snapshot of one matched element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageElement {
    /// Rendered text, whitespace collapsed and trimmed
    pub text: String,
    /// `href` attribute resolved against the page URL, when present
    pub href: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("HTTP {status} while loading {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid CSS selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No element matches {locator}")]
    ElementNotFound { locator: String },

    #[error("No page loaded yet")]
    NoPageLoaded,
}

impl DriverError {
    pub fn navigation(url: &str, reason: impl fmt::Display) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True when the page loaded fine but simply lacks the element
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Browser-like page session.
///
/// A driver holds at most one loaded page; queries always run against the
/// page loaded by the latest successful `navigate`.
#[async_trait]
pub trait PageDriver: Send {
    /// Load `url`, replacing the current page
    async fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// All elements matching `locator`, in document order
    async fn find_elements(&mut self, locator: &Locator) -> DriverResult<Vec<PageElement>>;

    /// First element matching `locator`
    async fn find_element(&mut self, locator: &Locator) -> DriverResult<PageElement> {
        self.find_elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::ElementNotFound {
                locator: locator.to_string(),
            })
    }

    /// URL of the loaded page, if any
    fn current_url(&self) -> Option<&str>;
}

/// A borrowed driver drives the same session as the driver itself
#[async_trait]
impl<'a, D: PageDriver + ?Sized> PageDriver for &'a mut D {
    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        (**self).navigate(url).await
    }

    async fn find_elements(&mut self, locator: &Locator) -> DriverResult<Vec<PageElement>> {
        (**self).find_elements(locator).await
    }

    async fn find_element(&mut self, locator: &Locator) -> DriverResult<PageElement> {
        (**self).find_element(locator).await
    }

    fn current_url(&self) -> Option<&str> {
        (**self).current_url()
    }
}
