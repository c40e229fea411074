//! Spreadsheet renderings of the flattened work log.

use super::projection::{ExportRow, EXPORT_HEADERS};
use crate::error::{AppError, AppResult};
use csv::Writer;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook};

pub const SHEET_NAME: &str = "Registros de Trabalho";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Workbook with one sheet: highlighted, frozen header row and columns wide
/// enough for their longest value.
pub fn to_xlsx(rows: &[ExportRow]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::Yellow)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    let mut widths: Vec<usize> = EXPORT_HEADERS.iter().map(|h| h.chars().count()).collect();

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, row) in rows.iter().enumerate() {
        let row_number = (index + 1) as u32;
        for (col, value) in row.cells().iter().enumerate() {
            widths[col] = widths[col].max(value.chars().count());
            worksheet.write_string(row_number, col as u16, value)?;
        }
        // Minutes go in as a number so the sheet can sum them.
        if let Some(minutes) = row.duration_minutes {
            worksheet.write_number(row_number, (EXPORT_HEADERS.len() - 1) as u16, minutes as f64)?;
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64 + 2.0)?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn to_csv(rows: &[ExportRow]) -> AppResult<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))
}
