//! Full scrape runs over an in-memory Otodom replica
use listing_scout::application::{ScrapeRun, StopReason};
use listing_scout::domain::{CleanRecord, OUTPUT_COLUMNS, feed_page_url};
use listing_scout::infrastructure::{MemoryPageDriver, ScraperConfig, save_to_csv, write_csv};

const FEED: &str = "https://www.otodom.pl/pl/wyniki/sprzedaz/mieszkanie/mazowieckie/warszawa?limit=36";

const FEED_PAGE: &str = r#"
<html><body>
  <div data-cy="search.listing.promoted">
    <a href="/pl/inwestycja/osiedle-zielone-ID5xyz">Osiedle Zielone</a>
  </div>
  <div data-cy="search.listing.organic">
    <article><a href="/pl/oferta/2-pokoje-ochota-ID1">2 pokoje, Ochota</a></article>
    <article><a href="/pl/oferta/kawalerka-praga-ID2">Kawalerka</a></article>
    <article><a href="/pl/oferta/3-pokoje-zoliborz-ID3">3 pokoje</a></article>
  </div>
</body></html>
"#;

fn detail_page(price: &str, per_m2: &str, location: &str, fields: &[(&str, &str)]) -> String {
    let rows: String = fields
        .iter()
        .map(|(label, value)| {
            format!(r#"<div class="row"><div>{label}:</div><div class="value">{value}</div></div>"#)
        })
        .collect();
    format!(
        r##"<html><body>
             <h1>Mieszkanie</h1>
             <strong data-cy="adPageHeaderPrice">{price}</strong>
             <div aria-label="Cena za metr kwadratowy">{per_m2}</div>
             <a href="#map">{location}</a>
             <div data-testid="ad.top-information.table">{rows}</div>
           </body></html>"##
    )
}

fn replica() -> MemoryPageDriver {
    MemoryPageDriver::new()
        .with_page(feed_page_url(FEED, 1), FEED_PAGE)
        .with_page(feed_page_url(FEED, 2), FEED_PAGE)
        .with_page(
            "https://www.otodom.pl/pl/oferta/2-pokoje-ochota-ID1",
            detail_page(
                "749\u{a0}000 zł",
                "15\u{a0}604 zł/m²",
                "ul. Grójecka, Ochota, Warszawa, mazowieckie",
                &[("Rynek", "wtórny"), ("Powierzchnia", "48,02 m²"), ("Liczba pokoi", "2"), ("Piętro", "3/4")],
            ),
        )
        .with_page(
            "https://www.otodom.pl/pl/oferta/kawalerka-praga-ID2",
            detail_page(
                "Zapytaj o cenę",
                "",
                "ul. Targowa, Praga-Północ, Warszawa, mazowieckie",
                &[("Rynek", "wtórny"), ("Powierzchnia", "27 m²"), ("Piętro", "parter/5")],
            ),
        )
        .with_failing_navigation("https://www.otodom.pl/pl/oferta/3-pokoje-zoliborz-ID3")
}

#[tokio::test]
async fn scrape_run_produces_normalized_records() {
    let mut driver = replica();
    let settings = ScraperConfig {
        feed_url: FEED.to_string(),
        max_pages: 3,
        max_results: 10,
        ..ScraperConfig::default()
    }
    .without_waits();

    let outcome = ScrapeRun::new(&mut driver, settings).run().await;

    assert_eq!(outcome.collection.stop_reason, StopReason::NoNewLinks);
    assert_eq!(outcome.summary.links_collected, 3);
    assert_eq!(outcome.summary.records_dropped, 1);
    assert_eq!(
        outcome.records,
        vec![
            CleanRecord {
                rynek: "wtórny".to_string(),
                district: "Ochota".to_string(),
                price_clean: Some(749_000),
                price_per_m2_clean: Some(15_604),
                area_clean: Some(48.02),
                rooms_clean: Some(2),
                floor_clean: Some(3),
            },
            CleanRecord {
                rynek: "wtórny".to_string(),
                district: "Praga-Północ".to_string(),
                price_clean: None,
                price_per_m2_clean: None,
                area_clean: Some(27.0),
                rooms_clean: None,
                floor_clean: Some(0),
            },
        ]
    );
}

#[tokio::test]
async fn quota_limits_detail_visits() {
    let mut driver = replica();
    let settings = ScraperConfig {
        feed_url: FEED.to_string(),
        max_pages: 3,
        max_results: 1,
        ..ScraperConfig::default()
    }
    .without_waits();

    let outcome = ScrapeRun::new(&mut driver, settings).run().await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.collection.stop_reason, StopReason::QuotaReached);
    assert_eq!(
        driver.visited(),
        [
            feed_page_url(FEED, 1),
            "https://www.otodom.pl/pl/oferta/2-pokoje-ochota-ID1".to_string(),
        ]
    );
}

#[tokio::test]
async fn unreachable_feed_yields_empty_dataset() {
    let mut driver = MemoryPageDriver::new();
    let settings = ScraperConfig {
        feed_url: FEED.to_string(),
        max_pages: 2,
        ..ScraperConfig::default()
    }
    .without_waits();

    let outcome = ScrapeRun::new(&mut driver, settings).run().await;

    assert!(outcome.is_empty());
    assert_eq!(outcome.collection.failed_pages, vec![1, 2]);
    assert_eq!(outcome.collection.stop_reason, StopReason::PageBudgetExhausted);
}

#[tokio::test]
async fn exported_csv_has_only_clean_columns() {
    let mut driver = replica();
    let settings = ScraperConfig {
        feed_url: FEED.to_string(),
        ..ScraperConfig::default()
    }
    .without_waits();
    let outcome = ScrapeRun::new(&mut driver, settings).run().await;

    let dir = tempfile::tempdir().unwrap();
    let path = save_to_csv(&outcome.records, dir.path(), None).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();

    let mut lines = written.lines();
    assert_eq!(lines.next(), Some(OUTPUT_COLUMNS.join(",").as_str()));
    assert_eq!(lines.next(), Some("wtórny,Ochota,749000,15604,48.02,2,3"));
    assert_eq!(lines.next(), Some("wtórny,Praga-Północ,,,27,,0"));
    assert_eq!(lines.next(), None);

    for raw in ["price,", "location", "url", "area_m2"] {
        assert!(!written.contains(raw), "raw column {raw} leaked into export");
    }

    let mut preview = Vec::new();
    write_csv(&outcome.records[..1], &mut preview).unwrap();
    assert_eq!(String::from_utf8(preview).unwrap().lines().count(), 2);
}
