//! Locator evaluation over static HTML with `scraper`
//!
//! Shared by every driver that ends up holding a page's markup as a string.
//! `scraper::Html` is not `Send`, so documents are parsed per query and never
//! held across an await point.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::page_driver::{DriverError, DriverResult, Locator, PageElement};

/// Evaluates `locator` against `html`, resolving hrefs relative to `page_url`
pub fn select(html: &str, page_url: &str, locator: &Locator) -> DriverResult<Vec<PageElement>> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let elements = match locator {
        Locator::Css(selector) => {
            let selector = compile_selector(selector)?;
            document
                .select(&selector)
                .map(|element| to_page_element(element, base.as_ref()))
                .collect()
        }
        Locator::LabeledValue(label) => labeled_values(&document, label)
            .into_iter()
            .map(|element| to_page_element(element, base.as_ref()))
            .collect(),
    };

    Ok(elements)
}

fn compile_selector(selector: &str) -> DriverResult<Selector> {
    Selector::parse(selector).map_err(|e| DriverError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// For each `div` whose own text contains `label`, its next sibling `div`
fn labeled_values<'a>(document: &'a Html, label: &str) -> Vec<ElementRef<'a>> {
    let Ok(div) = Selector::parse("div") else {
        return Vec::new();
    };

    document
        .select(&div)
        .filter(|element| own_text_contains(*element, label))
        .filter_map(|element| {
            element
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|sibling| sibling.value().name() == "div")
        })
        .collect()
}

fn own_text_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .any(|text| text.contains(needle))
}

fn to_page_element(element: ElementRef<'_>, base: Option<&Url>) -> PageElement {
    let text = collapse_whitespace(&element.text().collect::<String>());
    let href = element
        .value()
        .attr("href")
        .map(|href| resolve_href(href, base));

    PageElement { text, href }
}

/// Absolute form of `href`; left untouched when it cannot be resolved
fn resolve_href(href: &str, base: Option<&Url>) -> String {
    match base.map(|base| base.join(href)) {
        Some(Ok(resolved)) => resolved.to_string(),
        Some(Err(e)) => {
            debug!("Could not resolve href '{}': {}", href, e);
            href.to_string()
        }
        None => href.to_string(),
    }
}

/// Collapses whitespace runs (including no-break spaces) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
