//! Strict `dd.mm.yyyy` parsing with `yyyy-mm-dd` output

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Format dates arrive in from the spreadsheet
pub const SOURCE_FORMAT: &str = "%d.%m.%Y";

/// Format dates are stored and compared in
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

// chrono accepts single-digit fields and padding, so the shape is checked first
static SOURCE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("date shape pattern is valid"));

/// Parse a `dd.mm.yyyy` date. Anything else, including impossible calendar
/// dates such as `31.02.2024`, yields `None`.
pub fn parse(input: &str) -> Option<NaiveDate> {
    if !SOURCE_SHAPE.is_match(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, SOURCE_FORMAT).ok()
}

/// Render a date in canonical `yyyy-mm-dd` form
pub fn canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Render a date the way the source format writes it
pub fn to_source(date: NaiveDate) -> String {
    date.format(SOURCE_FORMAT).to_string()
}
