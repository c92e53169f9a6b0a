//! Spreadsheet report export
//!
//! Datasets of uniform rows become one worksheet each in a single `.xlsx`
//! workbook. Columns are sized to their widest cell, header included.

pub mod reports;
pub mod rows;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::{AppError, AppResult};

pub use reports::{analytics_report, master_report, registrations_report, MASTER_SHEETS};

/// Excel rejects sheet names longer than this
const MAX_SHEET_NAME: usize = 31;
/// Excel's maximum column width, in characters
const MAX_COLUMN_WIDTH: usize = 255;
/// Breathing room added to the widest cell
const COLUMN_PADDING: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn opt_text(value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => Cell::Text(v.to_string()),
            None => Cell::Empty,
        }
    }

    /// Characters the cell occupies when displayed
    fn display_width(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().len(),
            Cell::Empty => 0,
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// A row type that knows its column headers
pub trait ReportRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

/// One named table, written as one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn from_rows<R: ReportRow>(name: &str, rows: &[R]) -> Self {
        Self {
            name: name.to_string(),
            headers: R::HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: rows.iter().map(R::cells).collect(),
        }
    }

    /// Width per column: widest of header and every cell, plus padding
    pub fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        (0..columns)
            .map(|col| {
                let header = self.headers.get(col).map_or(0, |h| h.chars().count());
                let widest_cell = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(Cell::display_width)
                    .max()
                    .unwrap_or(0);
                (header.max(widest_cell) + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

/// A downloadable workbook of one or more datasets
#[derive(Debug, Clone, PartialEq)]
pub struct ReportWorkbook {
    /// Human-readable report label, used in the file name
    pub name: String,
    pub datasets: Vec<Dataset>,
}

impl ReportWorkbook {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            datasets: Vec::new(),
        }
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// `<ReportName>_<yyyy-MM-dd_HHmm>.xlsx`
    pub fn file_name(&self, at: NaiveDateTime) -> String {
        let label: String = self
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{}_{}.xlsx", label, at.format("%Y-%m-%d_%H%M"))
    }

    fn build(&self) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let mut used_names: Vec<String> = Vec::new();

        // A workbook needs at least one sheet
        let empty = Dataset {
            name: self.name.clone(),
            headers: Vec::new(),
            rows: Vec::new(),
        };
        let datasets: Vec<&Dataset> = if self.datasets.is_empty() {
            vec![&empty]
        } else {
            self.datasets.iter().collect()
        };

        for dataset in datasets {
            let sheet_name = unique_sheet_name(&dataset.name, &used_names);
            used_names.push(sheet_name.clone());

            let sheet = workbook.add_worksheet();
            sheet.set_name(&sheet_name)?;

            for (col, header) in dataset.headers.iter().enumerate() {
                sheet.write_string_with_format(0, col as u16, header, &header_format)?;
            }
            for (index, row) in dataset.rows.iter().enumerate() {
                let row_num = (index + 1) as u32;
                for (col, cell) in row.iter().enumerate() {
                    match cell {
                        Cell::Text(value) => {
                            sheet.write_string(row_num, col as u16, value)?;
                        }
                        Cell::Number(value) => {
                            sheet.write_number(row_num, col as u16, *value)?;
                        }
                        Cell::Empty => {}
                    }
                }
            }
            for (col, width) in dataset.column_widths().into_iter().enumerate() {
                sheet.set_column_width(col as u16, width as f64)?;
            }
        }

        Ok(workbook)
    }

    /// Serialize the workbook for download
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        let mut workbook = self.build()?;
        let bytes = workbook.save_to_buffer()?;
        tracing::debug!(
            report = %self.name,
            sheets = self.datasets.len(),
            bytes = bytes.len(),
            "Report serialized"
        );
        Ok(bytes)
    }

    /// Save the workbook into `dir`, returning the written path
    pub fn write_to(&self, dir: &Path, at: NaiveDateTime) -> AppResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::Internal(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        let path = dir.join(self.file_name(at));
        let mut workbook = self.build()?;
        workbook.save(&path)?;
        tracing::info!(report = %self.name, path = %path.display(), "Report written");
        Ok(path)
    }
}

/// Strip characters Excel forbids, truncate, and de-duplicate
fn unique_sheet_name(name: &str, used: &[String]) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let base: String = if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME).collect()
    };

    let taken = |candidate: &str| used.iter().any(|u| u.eq_ignore_ascii_case(candidate));
    if !taken(&base) {
        return base;
    }
    let candidate = (2..)
        .map(|n| {
            let suffix = format!(" ({})", n);
            let keep = MAX_SHEET_NAME - suffix.len();
            format!("{}{}", base.chars().take(keep).collect::<String>(), suffix)
        })
        .find(|candidate| !taken(candidate));
    candidate.unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Pair(&'static str, i64);

    impl ReportRow for Pair {
        const HEADERS: &'static [&'static str] = &["Label", "Count"];

        fn cells(&self) -> Vec<Cell> {
            vec![Cell::text(self.0), self.1.into()]
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_column_widths_include_header() {
        let dataset = Dataset::from_rows(
            "Pairs",
            &[Pair("a much longer label", 7), Pair("x", 12345)],
        );
        assert_eq!(dataset.column_widths(), vec![19 + 2, 5 + 2]);

        let empty = Dataset::from_rows::<Pair>("Pairs", &[]);
        assert_eq!(empty.column_widths(), vec![5 + 2, 5 + 2]);
    }

    #[test]
    fn test_file_name_has_timestamp_suffix() {
        let report = ReportWorkbook::new("Master Report");
        assert_eq!(report.file_name(at()), "Master_Report_2025-08-01_0905.xlsx");
    }

    #[test]
    fn test_sheet_names_are_sanitized_and_unique() {
        let used = vec!["Arrivals".to_string()];
        assert_eq!(unique_sheet_name("Arrivals", &used), "Arrivals (2)");
        assert_eq!(unique_sheet_name("a/b:c", &[]), "abc");
        assert_eq!(unique_sheet_name("", &[]), "Sheet");
        assert_eq!(
            unique_sheet_name("A name that is far longer than thirty one characters", &[])
                .chars()
                .count(),
            MAX_SHEET_NAME
        );
    }

    #[test]
    fn test_empty_dataset_exports() {
        let report =
            ReportWorkbook::new("Empty").with_dataset(Dataset::from_rows::<Pair>("Pairs", &[]));
        let bytes = report.to_bytes().unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_workbook_without_datasets_exports() {
        let bytes = ReportWorkbook::new("Nothing").to_bytes().unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = ReportWorkbook::new("Pairs")
            .with_dataset(Dataset::from_rows("Pairs", &[Pair("a", 1)]));
        let path = report.write_to(dir.path(), at()).unwrap();

        assert_eq!(path.file_name().unwrap(), "Pairs_2025-08-01_0905.xlsx");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
