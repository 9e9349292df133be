use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SalesError};
use crate::etl::load::to_csv_bytes;
use crate::record::SalesTable;

pub const CSV_MIME: &str = "text/csv";
pub const DEFAULT_EXPORT_NAME: &str = "sales_report";

/// A serialized download: the filtered table in the cleaned-file layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime: &'static str,
    pub data: Vec<u8>,
}

impl ExportFile {
    /// Writes the payload into `dir` and returns the full path.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.data).map_err(|e| SalesError::write(&path, e))?;
        Ok(path)
    }
}

/// Serializes `table` as CSV under `<name>.csv`. Only the last path
/// component of `name` is used; a blank name falls back to
/// [`DEFAULT_EXPORT_NAME`].
pub fn export_csv(table: &SalesTable, name: &str) -> Result<ExportFile> {
    let stem = Path::new(name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_EXPORT_NAME);

    Ok(ExportFile {
        file_name: format!("{stem}.csv"),
        mime: CSV_MIME,
        data: to_csv_bytes(table)?,
    })
}
