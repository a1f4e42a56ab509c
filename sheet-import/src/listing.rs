//! Stored rows grouped by date

use serde::Serialize;
use std::collections::BTreeMap;

use crate::import::StoredRow;

/// Ids and names of the rows sharing one date, as parallel arrays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub ids: Vec<String>,
    pub names: Vec<String>,
}

/// Group rows by canonical date, dates ascending, rows in the order given.
/// Rows without a date are grouped under the empty key, which sorts first.
pub fn group_by_date(rows: &[StoredRow]) -> BTreeMap<String, DateGroup> {
    let mut groups: BTreeMap<String, DateGroup> = BTreeMap::new();
    for row in rows {
        let group = groups.entry(row.date_key()).or_default();
        group.ids.push(row.id.clone());
        group.names.push(row.name.clone());
    }
    groups
}
