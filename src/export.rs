//! Excel export of the attendance report grid.

use std::collections::BTreeMap;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::report::format::{format_minutes, period_label};
use crate::report::{CellValue, ColumnKey, DayPart, FixedColumn, ReportGrid, Status, SummaryColumn};

/// Header background.
const HEADER_COLOR: u32 = 0x1F4E78;
/// Highlight for the lateness/earliness sub-headers.
const DELTA_HEADER_COLOR: u32 = 0xFF0000;

/// Fill and font for one status tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStyle {
    /// Background as `RRGGBB`.
    #[serde(default)]
    pub fill: Option<String>,
    /// Font colour as `RRGGBB`.
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub bold: bool,
}

impl StatusStyle {
    fn new(fill: &str, font: Option<&str>, bold: bool) -> Self {
        Self {
            fill: Some(fill.to_string()),
            font: font.map(str::to_string),
            bold,
        }
    }
}

/// Status tag to presentation mapping, injected into the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StylePalette {
    styles: BTreeMap<Status, StatusStyle>,
}

impl Default for StylePalette {
    fn default() -> Self {
        let styles = BTreeMap::from([
            (Status::Late, StatusStyle::new("FF0000", Some("FFFFFF"), true)),
            (Status::EarlyDeparture, StatusStyle::new("FF0000", Some("FFFFFF"), true)),
            (Status::Tolerated, StatusStyle::new("FFC000", None, true)),
            (Status::Remote, StatusStyle::new("BDD7EE", None, false)),
            (Status::Missing, StatusStyle::new("D9D9D9", Some("7F7F7F"), false)),
            (Status::Attention, StatusStyle::new("F8CBAD", Some("9C0006"), true)),
            (Status::Ok, StatusStyle::new("C6EFCE", Some("006100"), false)),
        ]);
        Self { styles }
    }
}

impl StylePalette {
    pub fn style(&self, status: Status) -> Option<&StatusStyle> {
        self.styles.get(&status)
    }

    pub fn set(&mut self, status: Status, style: StatusStyle) {
        self.styles.insert(status, style);
    }

    /// All configured colours, for validation.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.styles
            .values()
            .flat_map(|style| style.fill.iter().chain(style.font.iter()))
            .map(String::as_str)
    }
}

/// Parse an `RRGGBB` (optionally `#`-prefixed) colour.
pub fn parse_hex_color(input: &str) -> Option<u32> {
    let hex = input.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Pre-built formats for one workbook.
struct Formats {
    title: Format,
    header: Format,
    delta_header: Format,
    cell: Format,
    by_status: BTreeMap<Status, Format>,
}

impl Formats {
    fn new(palette: &StylePalette) -> Self {
        let cell = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);

        let by_status = Status::ALL
            .iter()
            .filter_map(|&status| {
                let style = palette.style(status)?;
                let mut format = cell.clone();
                if let Some(fill) = style.fill.as_deref().and_then(parse_hex_color) {
                    format = format.set_background_color(Color::RGB(fill));
                }
                if let Some(font) = style.font.as_deref().and_then(parse_hex_color) {
                    format = format.set_font_color(Color::RGB(font));
                }
                if style.bold {
                    format = format.set_bold();
                }
                Some((status, format))
            })
            .collect();

        Self {
            title: Format::new().set_bold().set_font_size(14),
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(HEADER_COLOR))
                .set_font_color(Color::White)
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            delta_header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(DELTA_HEADER_COLOR))
                .set_font_color(Color::White)
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            cell,
            by_status,
        }
    }

    fn for_status(&self, status: Option<Status>) -> &Format {
        status.and_then(|s| self.by_status.get(&s)).unwrap_or(&self.cell)
    }
}

/// Excel sheet names: at most 31 characters, none of `[]:*?/\`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() { "Report".to_string() } else { cleaned }
}

fn column_width(key: &ColumnKey) -> f64 {
    match key {
        ColumnKey::Fixed(col) => match col {
            FixedColumn::Number => 5.0,
            FixedColumn::Code => 12.0,
            FixedColumn::Name => 25.0,
            FixedColumn::HireDate | FixedColumn::TerminationDate | FixedColumn::Department => 15.0,
            FixedColumn::Position => 20.0,
            FixedColumn::Management | FixedColumn::RestDays => 10.0,
            FixedColumn::Status | FixedColumn::Registry => 12.0,
            FixedColumn::WorkDays => 18.0,
            FixedColumn::Schedule | FixedColumn::RemoteDays => 20.0,
        },
        ColumnKey::Day { .. } => 10.0,
        ColumnKey::Summary(_) => 14.0,
    }
}

fn is_minute_total(key: &ColumnKey) -> bool {
    matches!(
        key,
        ColumnKey::Summary(SummaryColumn::LateMinutes | SummaryColumn::EarlyMinutes)
    )
}

/// Render the grid into a new workbook.
pub fn build_workbook(grid: &ReportGrid, config: &ExportConfig, sheet_title: &str) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sanitize_sheet_name(sheet_title))?;

    let formats = Formats::new(&config.palette);
    let last_col = grid.columns.len().saturating_sub(1) as u16;

    // Title, subtitle and period lines
    worksheet.merge_range(0, 0, 0, last_col, &config.title, &formats.title)?;
    let header_lines: Vec<String> = config
        .subtitles
        .iter()
        .cloned()
        .chain(period_label(&grid.days))
        .collect();
    for (idx, line) in header_lines.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.merge_range(row, 0, row, last_col, line, &Format::new())?;
    }

    let header_row = header_lines.len() as u32 + 2;
    write_headers(worksheet, grid, &formats, header_row)?;

    // Data rows
    let first_data_row = header_row + 3;
    for (idx, row) in grid.rows.iter().enumerate() {
        let r = first_data_row + idx as u32;
        for (col, cell) in row.cells.iter().enumerate() {
            let c = col as u16;
            let format = formats.for_status(cell.status);
            match &cell.value {
                CellValue::Empty => {
                    worksheet.write_blank(r, c, format)?;
                }
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(r, c, text, format)?;
                }
                CellValue::Number(n) if config.human_durations && is_minute_total(&grid.columns[col].key) => {
                    worksheet.write_string_with_format(r, c, format_minutes(*n), format)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number_with_format(r, c, *n as f64, format)?;
                }
            }
        }
    }

    // Column widths
    for (col, column) in grid.columns.iter().enumerate() {
        worksheet.set_column_width(col as u16, column_width(&column.key))?;
    }

    // Freeze headers and the identity columns
    worksheet.set_freeze_panes(first_data_row, 3)?;

    Ok(workbook)
}

fn write_headers(
    worksheet: &mut Worksheet,
    grid: &ReportGrid,
    formats: &Formats,
    top: u32,
) -> std::result::Result<(), XlsxError> {
    let mut col: u16 = 0;
    while let Some(column) = grid.columns.get(col as usize) {
        match column.key {
            ColumnKey::Fixed(_) | ColumnKey::Summary(_) => {
                worksheet.merge_range(top, col, top + 2, col, column.label, &formats.header)?;
                col += 1;
            }
            ColumnKey::Day { date, .. } => {
                let group_end = col + DayPart::ALL.len() as u16 - 1;
                if let Some(day) = grid.days.iter().find(|d| d.date == date) {
                    worksheet.merge_range(top, col, top, group_end, &day.header_label(), &formats.header)?;
                    worksheet.merge_range(top + 1, col, top + 1, group_end, day.weekday_name, &formats.header)?;
                }
                for (offset, part) in DayPart::ALL.iter().enumerate() {
                    let format = if part.is_delta() {
                        &formats.delta_header
                    } else {
                        &formats.header
                    };
                    worksheet.write_string_with_format(top + 2, col + offset as u16, part.label(), format)?;
                }
                col = group_end + 1;
            }
        }
    }
    Ok(())
}

/// Export the report grid to an Excel file.
pub fn export_report_to_excel(grid: &ReportGrid, config: &ExportConfig, sheet_title: &str, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(grid, config, sheet_title)?;
    workbook.save(path)?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// Export the report grid to an in-memory xlsx file.
pub fn export_report_to_buffer(grid: &ReportGrid, config: &ExportConfig, sheet_title: &str) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(grid, config, sheet_title)?;
    Ok(workbook.save_to_buffer()?)
}
