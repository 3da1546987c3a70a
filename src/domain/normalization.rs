//! Text-to-number normalization of raw listing fields
//!
//! Polish listing pages format numbers with spaces as thousands separators
//! ("1 000 000 zł"), commas as decimal separators ("45,5 m²") and the word
//! "parter" for the ground floor. Every parser here is total: text that does
//! not have the expected shape becomes `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::listing::{CleanRecord, RawRecord};

/// Ground-floor keyword, matched case-insensitively
pub const GROUND_FLOOR_KEYWORD: &str = "parter";

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit pattern"));
static DECIMAL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+\.?[0-9]*").expect("valid decimal pattern"));

/// Concatenates every digit run in `text` and parses the result.
///
/// `"1 000 000 zł"` → `1000000`. Text without digits, or whose digits do
/// not fit a `u64`, yields `None`.
pub fn extract_integer(text: &str) -> Option<u64> {
    if text.is_empty() {
        return None;
    }

    let digits: String = DIGIT_RUN.find_iter(text).map(|m| m.as_str()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parses the first integer-or-decimal token, accepting a comma as the
/// decimal separator. `"45,5 m²"` → `45.5`.
pub fn extract_decimal(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    let text = text.replace(',', ".");
    DECIMAL_TOKEN
        .find(&text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Floor number: `0` for the ground floor, otherwise the first digit run
/// (`"3/10"` → `3`).
pub fn extract_floor_number(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    if lowered.contains(GROUND_FLOOR_KEYWORD) {
        return Some(0);
    }

    DIGIT_RUN
        .find(&lowered)
        .and_then(|m| m.as_str().parse().ok())
}

/// Derives the typed columns of one record, dropping the raw text and url
pub fn normalize_record(raw: &RawRecord) -> CleanRecord {
    CleanRecord {
        rynek: raw.rynek.clone(),
        district: raw.district.clone(),
        price_clean: extract_integer(&raw.price),
        price_per_m2_clean: extract_integer(&raw.price_per_m2),
        area_clean: extract_decimal(&raw.area),
        rooms_clean: extract_integer(&raw.rooms),
        floor_clean: extract_floor_number(&raw.floor),
    }
}

/// Normalizes a batch, preserving record order
pub fn normalize(raws: &[RawRecord]) -> Vec<CleanRecord> {
    raws.iter().map(normalize_record).collect()
}
