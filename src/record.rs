//! Row and table types shared by the pipeline and the reporting queries.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One row as read from a raw or cleaned CSV, before any validation.
///
/// Every field is optional: an empty cell or one of [`NULL_MARKERS`]
/// deserializes to `None`. A `TotalPrice` column, if present, is ignored and
/// recomputed downstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    #[serde(default, deserialize_with = "de_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "de_quantity")]
    pub quantity: Option<u64>,
    #[serde(default, deserialize_with = "de_price")]
    pub price: Option<f64>,
    #[serde(rename = "InvoiceID", default, deserialize_with = "de_text")]
    pub invoice_id: Option<String>,
}

/// Cell values read as missing, in any column.
pub const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Largest accepted `Quantity`; keeps table-wide sums well inside `u64`.
pub const MAX_QUANTITY: u64 = u32::MAX as u64;

/// A validated transaction line. `total_price` is always `quantity * price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub region: String,
    pub category: String,
    pub product: String,
    pub quantity: u64,
    pub price: f64,
    #[serde(rename = "InvoiceID")]
    pub invoice_id: String,
    total_price: f64,
}

impl SalesRecord {
    pub fn new(
        date: NaiveDate,
        region: impl Into<String>,
        category: impl Into<String>,
        product: impl Into<String>,
        quantity: u64,
        price: f64,
        invoice_id: impl Into<String>,
    ) -> Self {
        SalesRecord {
            date,
            region: region.into(),
            category: category.into(),
            product: product.into(),
            quantity,
            price,
            invoice_id: invoice_id.into(),
            total_price: quantity as f64 * price,
        }
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }
}

/// Raw rows in file order, as produced by the extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cleaned, immutable sales table. Query functions borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        SalesTable { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest `date`, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }
}

impl FromIterator<SalesRecord> for SalesTable {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        SalesTable::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Trimmed cell text, or `None` for an empty cell or a null marker.
fn non_null<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NULL_MARKERS.contains(&trimmed) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

fn de_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    non_null(deserializer)
}

// Float-typed exports write whole quantities as "2.0".
fn de_quantity<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = non_null(deserializer)? else {
        return Ok(None);
    };
    let parsed = match raw.parse::<u64>() {
        Ok(q) => Some(q),
        Err(_) => match raw.parse::<f64>() {
            Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= MAX_QUANTITY as f64 => Some(f as u64),
            _ => None,
        },
    };
    match parsed {
        Some(q) if q <= MAX_QUANTITY => Ok(Some(q)),
        _ => Err(serde::de::Error::custom(format!(
            "invalid Quantity {raw:?}: expected an integer between 0 and {MAX_QUANTITY}"
        ))),
    }
}

fn de_price<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = non_null(deserializer)? else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => Ok(Some(p)),
        _ => Err(serde::de::Error::custom(format!(
            "invalid Price {raw:?}: expected a non-negative decimal"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_rows(data: &str) -> Vec<csv::Result<RawRecord>> {
        csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect()
    }

    #[test]
    fn test_total_price_is_quantity_times_price() {
        let r = SalesRecord::new(date(2025, 1, 5), "North", "A", "X", 3, 19.99, "I1");
        assert_eq!(r.total_price(), 3.0 * 19.99);
    }

    #[test]
    fn test_raw_record_empty_cells_are_none() {
        let rows = read_rows("Date,Region,Category,Product,Quantity,Price,InvoiceID\n2025-01-05,,A,X,,10.5,I1\n");
        let row = rows.into_iter().next().unwrap().unwrap();
        assert_eq!(row.region, None);
        assert_eq!(row.quantity, None);
        assert_eq!(row.price, Some(10.5));
    }

    #[test]
    fn test_raw_record_accepts_float_quantity() {
        let rows = read_rows("Date,Region,Category,Product,Quantity,Price,InvoiceID\n2025-01-05,N,A,X,2.0,10,I1\n");
        assert_eq!(rows[0].as_ref().unwrap().quantity, Some(2));
    }

    #[test]
    fn test_raw_record_rejects_fractional_quantity() {
        let rows = read_rows("Date,Region,Category,Product,Quantity,Price,InvoiceID\n2025-01-05,N,A,X,2.5,10,I1\n");
        assert!(rows[0].is_err());
    }

    #[test]
    fn test_null_markers_in_every_column_are_none() {
        for marker in ["NaN", "NA", "nan", "N/A", "null", "None", "<NA>"] {
            let line = [marker; 7].join(",");
            let rows = read_rows(&format!(
                "Date,Region,Category,Product,Quantity,Price,InvoiceID\n{line}\n"
            ));
            let row = rows[0].as_ref().unwrap();
            assert_eq!(row, &RawRecord::default(), "marker {marker}");
        }
    }

    #[test]
    fn test_raw_record_rejects_negative_price() {
        let rows = read_rows("Date,Region,Category,Product,Quantity,Price,InvoiceID\n2025-01-05,N,A,X,1,-5,I1\n");
        assert!(rows[0].is_err());
    }

    #[test]
    fn test_raw_record_rejects_infinite_price() {
        let rows = read_rows("Date,Region,Category,Product,Quantity,Price,InvoiceID\n2025-01-05,N,A,X,1,inf,I1\n");
        assert!(rows[0].is_err());
    }

    #[test]
    fn test_raw_record_rejects_oversized_quantity() {
        let data = format!(
            "Date,Region,Category,Product,Quantity,Price,InvoiceID\n2025-01-05,N,A,X,{},1,I1\n",
            MAX_QUANTITY + 1
        );
        assert!(read_rows(&data)[0].is_err());

        let data = format!(
            "Date,Region,Category,Product,Quantity,Price,InvoiceID\n2025-01-05,N,A,X,{MAX_QUANTITY},1,I1\n"
        );
        assert_eq!(read_rows(&data)[0].as_ref().unwrap().quantity, Some(MAX_QUANTITY));
    }

    #[test]
    fn test_raw_record_ignores_total_price_column() {
        let rows = read_rows(
            "Date,Region,Category,Product,Quantity,Price,InvoiceID,TotalPrice\n2025-01-05,N,A,X,2,10,I1,999\n",
        );
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.invoice_id.as_deref(), Some("I1"));
    }

    #[test]
    fn test_date_range() {
        let table = SalesTable::new(vec![
            SalesRecord::new(date(2025, 3, 1), "N", "A", "X", 1, 1.0, "I1"),
            SalesRecord::new(date(2025, 1, 9), "N", "A", "X", 1, 1.0, "I2"),
            SalesRecord::new(date(2025, 2, 2), "N", "A", "X", 1, 1.0, "I3"),
        ]);
        assert_eq!(table.date_range(), Some((date(2025, 1, 9), date(2025, 3, 1))));
        assert_eq!(SalesTable::default().date_range(), None);
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
