//! Persists a cleaned [`SalesTable`] as CSV.

use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::extract::is_gzip;
use crate::error::{Result, SalesError};
use crate::record::SalesTable;

/// Writes `table` to `path` with a header row and no index column, creating
/// or replacing the file. Paths ending in `.gz` are gzip-compressed.
///
/// The rows go to a sibling `*.tmp` file first, which is renamed over `path`
/// only once everything has been flushed.
///
/// # Errors
///
/// [`SalesError::Write`] if the destination cannot be created or written.
#[tracing::instrument(skip(table), fields(path = %path.display(), rows = table.len()))]
pub fn load(table: &SalesTable, path: &Path) -> Result<()> {
    let tmp = temp_path(path);
    let file = File::create(&tmp).map_err(|e| SalesError::write(path, e))?;

    let written = if is_gzip(path) {
        write_csv(table, GzEncoder::new(file, Compression::default()))
            .and_then(|enc| enc.finish())
            .and_then(|file| file.sync_all())
    } else {
        write_csv(table, file).and_then(|file| file.sync_all())
    };

    if let Err(e) = written.and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(SalesError::write(path, e));
    }

    debug!("Cleaned table written");
    Ok(())
}

/// Serializes `table` into an in-memory CSV buffer.
pub fn to_csv_bytes(table: &SalesTable) -> Result<Vec<u8>> {
    encode(table, Vec::new())
}

fn encode<W: Write>(table: &SalesTable, sink: W) -> Result<W> {
    write_csv(table, sink).map_err(SalesError::Encode)
}

fn write_csv<W: Write>(table: &SalesTable, sink: W) -> io::Result<W> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(sink);
    for record in table {
        writer.serialize(record).map_err(io::Error::other)?;
    }
    // Header row even when there are no records.
    if table.is_empty() {
        writer.write_record(super::REQUIRED_COLUMNS.iter().chain(["TotalPrice"].iter()))?;
    }
    writer.into_inner().map_err(|e| e.into_error())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("sales"));
    name.push(".tmp");
    path.with_file_name(name)
}
