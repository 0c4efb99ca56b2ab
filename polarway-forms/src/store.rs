//! RecordStore — append-only form records in an XLSX workbook
//!
//! Reads go through `calamine`, writes through `rust_xlsxwriter`. Since the
//! writer cannot edit a workbook in place, an append reads every sheet,
//! adds the row after the last occupied row of the first sheet, and replaces
//! the file atomically.
//!
//! # Example
//!
//! ```rust,no_run
//! use polarway_forms::schema::{Gender, Record};
//! use polarway_forms::store::RecordStore;
//!
//! fn main() -> polarway_forms::Result<()> {
//!     let store = RecordStore::new("/data/forms/form_data.xlsx", "Sheet1");
//!
//!     store.append(&Record::from_form("Bob", Some(Gender::Male))?)?;
//!
//!     match store.load_all()? {
//!         Some(table) => println!("{} records", table.len()),
//!         None => println!("no data yet"),
//!     }
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::{debug, info};

use crate::atomic;
use crate::error::{FormsError, Result};
use crate::schema::{self, Record, RecordTable, RECORD_COLUMNS};

/// One worksheet as read back from disk
#[derive(Debug, Clone)]
struct Sheet {
    name: String,
    /// (row, col) of the top-left cell of `cells`
    origin: (u32, u32),
    cells: Vec<Vec<Data>>,
}

impl Sheet {
    /// Index into `cells` just past the last row holding any value
    fn occupied_height(&self) -> usize {
        self.cells
            .iter()
            .rposition(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
            .map_or(0, |i| i + 1)
    }
}

/// Sole owner of the record spreadsheet
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    sheet_name: String,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ─── Write Operations ───

    /// Append one record below the existing rows of the first sheet
    ///
    /// Creates the file with a header row when absent. Returns the number of
    /// data rows after the write.
    pub fn append(&self, record: &Record) -> Result<usize> {
        let row: Vec<Data> = record.to_row().into_iter().map(Data::String).collect();

        let mut sheets = if self.path.exists() {
            self.read_sheets()?
        } else {
            Vec::new()
        };

        if sheets.is_empty() {
            sheets.push(Sheet {
                name: self.sheet_name.clone(),
                origin: (0, 0),
                cells: Vec::new(),
            });
        }

        let first = &mut sheets[0];
        let height = first.occupied_height();
        if height == 0 {
            first.origin = (0, 0);
            first.cells = vec![
                schema::record_header().into_iter().map(Data::String).collect(),
                row,
            ];
        } else {
            let header = cells_to_strings(&first.cells[0]);
            if !schema::header_matches(&header) {
                return Err(FormsError::SchemaMismatch {
                    expected: RECORD_COLUMNS.join(", "),
                    actual: header.join(", "),
                });
            }
            first.cells.truncate(height);
            first.cells.push(row);
        }
        let data_rows = first.cells.len() - 1;

        let bytes = render_workbook(&sheets)?;
        atomic::replace_file(&self.path, &bytes)?;

        info!(
            path = %self.path.display(),
            name = %record.name,
            gender = %record.gender,
            rows = data_rows,
            "Record appended"
        );
        Ok(data_rows)
    }

    // ─── Read Operations ───

    /// Read the first sheet in row order; `None` when nothing was ever saved
    pub fn load_all(&self) -> Result<Option<RecordTable>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No record file yet");
            return Ok(None);
        }

        let sheets = self.read_sheets()?;
        let table = match sheets.first() {
            Some(sheet) => RecordTable::from_rows(
                sheet.cells[..sheet.occupied_height()]
                    .iter()
                    .map(|row| cells_to_strings(row))
                    .collect(),
            ),
            None => RecordTable::default(),
        };

        debug!(path = %self.path.display(), rows = table.len(), "Records loaded");
        Ok(Some(table))
    }

    fn read_sheets(&self) -> Result<Vec<Sheet>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;
            sheets.push(Sheet {
                origin: range.start().unwrap_or((0, 0)),
                cells: range.rows().map(|r| r.to_vec()).collect(),
                name,
            });
        }
        Ok(sheets)
    }
}

// ─── Cell Conversion ───

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cells_to_strings(row: &[Data]) -> Vec<String> {
    let mut out: Vec<String> = row.iter().map(cell_to_string).collect();
    while out.last().is_some_and(|s| s.is_empty()) {
        out.pop();
    }
    out
}

fn render_workbook(sheets: &[Sheet]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        for (i, row) in sheet.cells.iter().enumerate() {
            let row_num = sheet.origin.0 + i as u32;
            for (j, cell) in row.iter().enumerate() {
                let col_num = u16::try_from(sheet.origin.1 as usize + j).map_err(|_| {
                    FormsError::Spreadsheet(format!("column {} out of range", sheet.origin.1 as usize + j))
                })?;
                write_cell(worksheet, row_num, col_num, cell)?;
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Data) -> Result<()> {
    match cell {
        Data::Empty => {}
        Data::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Data::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        Data::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        Data::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        // dates, durations and error cells come back as text
        other => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Gender;
    use tempfile::TempDir;

    #[test]
    fn test_occupied_height_skips_trailing_blank_rows() {
        let sheet = Sheet {
            name: "Sheet1".into(),
            origin: (0, 0),
            cells: vec![
                vec![Data::String("Name".into())],
                vec![Data::Empty],
                vec![Data::String("Bob".into())],
                vec![Data::Empty, Data::Empty],
            ],
        };
        assert_eq!(sheet.occupied_height(), 3);
    }

    #[test]
    fn test_cells_to_strings_trims_trailing_blanks() {
        let row = vec![Data::String("Bob".into()), Data::Empty, Data::Float(2.0), Data::Empty];
        assert_eq!(cells_to_strings(&row), vec!["Bob", "", "2"]);
    }

    #[test]
    fn test_append_creates_file_with_header() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("form_data.xlsx"), "Sheet1");

        let rows = store
            .append(&Record::from_form("Bob", Some(Gender::Male)).unwrap())
            .unwrap();
        assert_eq!(rows, 1);

        let table = store.load_all().unwrap().unwrap();
        assert_eq!(table.header, vec!["Name", "Gender"]);
        assert_eq!(table.rows, vec![vec!["Bob".to_string(), "Male".to_string()]]);
    }
}
