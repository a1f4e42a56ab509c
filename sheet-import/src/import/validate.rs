//! Field-level validation of decoded rows
//!
//! Every rule is checked on its own so a row reports all of its problems at
//! once. Failures are returned as messages, never as errors.

use chrono::NaiveDate;
use log::error;
use once_cell::sync::Lazy;
use regex::Regex;

use super::date;
use super::models::RawRow;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z ]+$").expect("name pattern is valid"));

/// Outcome of validating one row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    /// Messages for every rule the row broke, in rule order
    pub errors: Vec<String>,
    /// Normalized date, present whenever the date cell parsed
    pub date: Option<NaiveDate>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Digits only, at least one
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// ASCII letters and spaces only, at least one
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

pub fn validate_row(row: &RawRow) -> Validation {
    let mut errors = Vec::new();
    let id = &row.id;

    if !is_valid_id(id) {
        errors.push(format!("ID {}: Invalid ID", id));
    }

    if !is_valid_name(&row.name) {
        errors.push(format!("ID {}: Invalid name", id));
    }

    let parsed = date::parse(&row.date);
    if parsed.is_none() {
        errors.push(format!("ID {}: Invalid date", id));
        error!("Invalid date format for ID {}: {}", id, row.date);
    }

    Validation {
        errors,
        date: parsed,
    }
}
