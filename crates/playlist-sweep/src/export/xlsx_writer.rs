//! Spreadsheet export with an ON/OFF dropdown on the toggle column.

use super::COLUMNS;
use crate::collect::{Item, Toggle};
use crate::error::ExportError;
use rust_xlsxwriter::{DataValidation, Format, Workbook};
use std::path::Path;

/// Zero-based index of the toggle column (G).
pub const TOGGLE_COLUMN: u16 = 6;

/// Zero-based first and last worksheet rows holding data for `records` items.
///
/// Row 0 is the header, so data occupies rows 1..=records (2..N+1 in A1
/// terms). `None` when there is nothing to validate.
pub fn data_rows(records: usize) -> Option<(u32, u32)> {
    if records == 0 {
        return None;
    }
    Some((1, records as u32))
}

/// Write one worksheet with a header row and one row per item.
pub fn write(path: &Path, items: &[Item]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, item) in items.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, cell) in item.row().iter().enumerate() {
            worksheet.write_string(row, col as u16, *cell)?;
        }
    }

    if let Some((first, last)) = data_rows(items.len()) {
        let validation = DataValidation::new()
            .allow_list_strings(&[Toggle::On.as_str(), Toggle::Off.as_str()])?
            .ignore_blank(false);
        worksheet.add_data_validation(first, TOGGLE_COLUMN, last, TOGGLE_COLUMN, &validation)?;
    }

    workbook.save(path)?;
    Ok(())
}
