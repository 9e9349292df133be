//! Reads a raw sales CSV into a [`RawTable`].

use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::REQUIRED_COLUMNS;
use crate::error::{Result, SalesError};
use crate::record::{RawRecord, RawTable};

/// Reads `path` into a [`RawTable`], preserving row order and raw values.
///
/// Paths ending in `.gz` are decompressed on the fly.
///
/// # Errors
///
/// [`SalesError::FileNotFound`] if the path does not exist,
/// [`SalesError::Parse`] if the header lacks a required column or a row is
/// not valid CSV for the sales schema.
#[tracing::instrument(fields(path = %path.display()))]
pub fn extract(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| SalesError::open(path, e))?;
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let table = extract_from_reader(reader)?;
    debug!(rows = table.len(), "Raw rows extracted");
    Ok(table)
}

/// Same as [`extract`] over any reader.
pub fn extract_from_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(SalesError::parse(format!("missing column {missing:?}")));
    }

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: RawRecord = result?;
        records.push(record);
    }

    Ok(RawTable { records })
}

pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}
