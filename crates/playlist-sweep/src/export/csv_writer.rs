//! Delimited-text export with a fixed column order.

use super::COLUMNS;
use crate::collect::Item;
use crate::error::ExportError;
use std::path::Path;

/// Write a header row plus one row per item.
pub fn write(path: &Path, items: &[Item]) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for item in items {
        writer.write_record(item.row())?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
