//! Feed pagination rules.
//!
//! Page numbering is 1-based. The first page is the configured feed URL as
//! is; later pages add a `page` query parameter.

/// Builds the URL of feed page `page`.
///
/// The base URL is used verbatim for page 1 (and for page 0, which callers
/// never request). For later pages `page=N` is appended with `&` when the
/// base already carries a query string and with `?` otherwise.
pub fn feed_page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        return base_url.to_string();
    }

    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}page={page}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILTERED: &str =
        "https://www.otodom.pl/pl/wyniki/sprzedaz/mieszkanie/warszawa?limit=36&by=DEFAULT";

    #[test]
    fn first_page_is_base_url() {
        assert_eq!(feed_page_url(FILTERED, 1), FILTERED);
    }

    #[test]
    fn later_pages_extend_existing_query() {
        assert_eq!(feed_page_url(FILTERED, 2), format!("{FILTERED}&page=2"));
        assert_eq!(feed_page_url(FILTERED, 17), format!("{FILTERED}&page=17"));
    }

    #[test]
    fn later_pages_start_query_when_missing() {
        assert_eq!(
            feed_page_url("https://example.test/feed", 3),
            "https://example.test/feed?page=3"
        );
    }
}
