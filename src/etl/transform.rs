//! Derives typed columns and drops incomplete rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::{Result, SalesError};
use crate::record::{RawRecord, RawTable, SalesRecord, SalesTable};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parses dates, computes `TotalPrice` and removes every row with a missing
/// field. Relative order of the kept rows is preserved.
///
/// # Errors
///
/// Returns [`SalesError::Parse`] on the first date string that matches no
/// known format. The whole run is rejected instead of skipping the row.
#[tracing::instrument(skip(raw), fields(rows = raw.len()))]
pub fn transform(raw: RawTable) -> Result<SalesTable> {
    let input_rows = raw.len();
    let mut records = Vec::with_capacity(input_rows);

    for (idx, row) in raw.records.into_iter().enumerate() {
        // Parsed before the completeness check so a bad date fails the run
        // even on an otherwise incomplete row.
        let date = match row.date.as_deref() {
            Some(s) => Some(parse_date(s).map_err(|e| SalesError::Parse {
                // header is line 1
                line: Some(idx as u64 + 2),
                message: e,
            })?),
            None => None,
        };

        if let Some(record) = complete(row, date) {
            records.push(record);
        }
    }

    let dropped = input_rows - records.len();
    if dropped > 0 {
        warn!(dropped, kept = records.len(), "Dropped rows with missing values");
    } else {
        debug!(kept = records.len(), "No incomplete rows");
    }

    Ok(SalesTable::new(records))
}

fn complete(row: RawRecord, date: Option<NaiveDate>) -> Option<SalesRecord> {
    Some(SalesRecord::new(
        date?,
        row.region?,
        row.category?,
        row.product?,
        row.quantity?,
        row.price?,
        row.invoice_id?,
    ))
}

/// Parses a date string in any of the accepted layouts. A time component, if
/// present, is discarded.
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(format!("unrecognised date {s:?}"))
}
