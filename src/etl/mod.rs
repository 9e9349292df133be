//! Offline batch pipeline: extract the raw CSV, derive `TotalPrice` and drop
//! incomplete rows, then persist the cleaned table.
//!
//! Any stage error aborts the run; the loader never leaves a partial file.

pub mod extract;
pub mod load;
pub mod transform;

use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::record::SalesTable;

pub use extract::extract;
pub use load::load;
pub use transform::transform;

/// Column headers every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Date",
    "Region",
    "Category",
    "Product",
    "Quantity",
    "Price",
    "InvoiceID",
];

/// Runs extract → transform → load and returns the cleaned table.
#[tracing::instrument(fields(input = %input.display(), output = %output.display()))]
pub fn run(input: &Path, output: &Path) -> Result<SalesTable> {
    let raw = extract(input)?;
    let table = transform(raw)?;
    load(&table, output)?;
    info!(rows = table.len(), "Cleaned data saved");
    Ok(table)
}

/// Reads a previously cleaned file for the reporting side.
///
/// The file goes back through [`transform`], so `TotalPrice` is recomputed
/// from `Quantity` and `Price` rather than trusted from disk.
pub fn load_clean_table(path: &Path) -> Result<SalesTable> {
    transform(extract(path)?)
}
