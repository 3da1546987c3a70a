//! Warsaw district lookup for free-text listing locations

/// The 18 official Warsaw districts.
///
/// Order matters: when a location mentions several districts (or a street
/// named after one), the earliest entry here wins.
pub const WARSAW_DISTRICTS: [&str; 18] = [
    "Bemowo",
    "Białołęka",
    "Bielany",
    "Mokotów",
    "Ochota",
    "Praga-Południe",
    "Praga-Północ",
    "Rembertów",
    "Śródmieście",
    "Targówek",
    "Ursus",
    "Ursynów",
    "Wawer",
    "Wesoła",
    "Wilanów",
    "Włochy",
    "Wola",
    "Żoliborz",
];

/// Returns the first district whose name occurs in `location`, ignoring case,
/// or an empty string when none does.
pub fn match_district(location: &str) -> &'static str {
    if location.is_empty() {
        return "";
    }

    let haystack = location.to_lowercase();
    WARSAW_DISTRICTS
        .iter()
        .find(|district| haystack.contains(&district.to_lowercase()))
        .copied()
        .unwrap_or("")
}
