//! Term normalization
//!
//! Pure text transforms applied to raw field values and search terms.

use once_cell::sync::Lazy;
use regex::Regex;

/// `<number><unit>` dosage and measure tokens, e.g. `500mg`, `20 ml`
static MEASURE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+\s?(?:mg|g|mcg|µg|ml|kg|l)\b").expect("measure token pattern")
});

/// `<number><pack unit>` tokens, e.g. `10 comprimidos`, `30caps`
static PACK_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+\s?(?:comprimidos?|cp|caps?|tabletes?)\b").expect("pack token pattern")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Spreadsheet cells that mean "no value"
const EMPTY_MARKERS: &[&str] = &["nan", "none"];

/// Trim a raw field value; missing values and empty markers become `""`
pub fn clean(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };
    let trimmed = raw.trim();
    if EMPTY_MARKERS.iter().any(|m| trimmed.eq_ignore_ascii_case(m)) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Lower-case the term and drop quantity/unit tokens.
///
/// Returns the original term untouched when nothing would be left.
pub fn simplify(term: &str) -> String {
    let lowered = term.to_lowercase();
    let without_measures = MEASURE_TOKEN.replace_all(&lowered, " ");
    let without_packs = PACK_TOKEN.replace_all(&without_measures, " ");
    let collapsed = WHITESPACE.replace_all(&without_packs, " ");
    let simplified = collapsed.trim();

    if simplified.is_empty() {
        term.to_string()
    } else {
        simplified.to_string()
    }
}
