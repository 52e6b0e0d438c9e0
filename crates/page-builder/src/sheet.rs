//! Workbook loading.
//!
//! Accepted on-disk forms:
//! - `.ods` (also `.xlsx`, `.xls`, `.xlsb`): every sheet of the spreadsheet
//! - `.tsv` / `.txt`: one sheet named after the file stem, tab-separated cells
//! - `.json`: `{"sheets": [{"name": "...", "rows": [[cell, ...], ...]}]}`
//!   with string, number or null cells
//!
//! The first row of every sheet is the column header
//! (`comment  filename  start  commands...`) and is skipped.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use serde::Deserialize;
use serde_json::Value;
use slidershow_common::error::{SlidershowError, SlidershowResult};

/// One spreadsheet row, split into its columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub comment: Option<String>,
    pub filename: Option<String>,
    pub start: Option<String>,
    pub commands: Vec<Option<String>>,
}

impl RawRow {
    /// Build a row from its cells in column order.
    pub fn from_cells(cells: impl IntoIterator<Item = Option<String>>) -> Self {
        let mut cells = cells.into_iter();
        Self {
            comment: cells.next().flatten(),
            filename: cells.next().flatten(),
            start: cells.next().flatten(),
            commands: cells.collect(),
        }
    }

    pub fn has_commands(&self) -> bool {
        self.commands.iter().any(Option::is_some)
    }

    /// Whether every field is absent.
    pub fn is_blank(&self) -> bool {
        self.comment.is_none()
            && self.filename.is_none()
            && self.start.is_none()
            && !self.has_commands()
    }
}

/// A named sheet without its header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct JsonWorkbook {
    sheets: Vec<JsonSheet>,
}

#[derive(Deserialize)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl Workbook {
    /// Load a workbook, choosing the reader by file extension.
    pub fn open(path: &Path) -> SlidershowResult<Self> {
        if !path.exists() {
            return Err(SlidershowError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("ods") | Some("xlsx") | Some("xls") | Some("xlsb") => {
                Self::from_spreadsheet(path)
            }
            Some("json") => Self::from_json(&std::fs::read_to_string(path)?),
            Some("tsv") | Some("txt") => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Sheet1".to_string());
                Ok(Self::from_tsv(name, &std::fs::read_to_string(path)?))
            }
            other => Err(SlidershowError::sheet(format!(
                "Unsupported workbook format {:?} for {}; use .ods, .tsv or .json",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Every sheet of a spreadsheet document, in document order.
    pub fn from_spreadsheet(path: &Path) -> SlidershowResult<Self> {
        let read_error = |e: calamine::Error| {
            SlidershowError::sheet(format!("Failed to read {}: {e}", path.display()))
        };

        let mut document = open_workbook_auto(path).map_err(read_error)?;
        let mut sheets = Vec::new();
        for name in document.sheet_names() {
            let range = document.worksheet_range(&name).map_err(read_error)?;
            tracing::debug!(sheet = %name, size = ?range.get_size(), "Read sheet");
            sheets.push(Sheet {
                rows: range_rows(&range),
                name,
            });
        }
        Ok(Self { sheets })
    }

    /// Single-sheet workbook from tab-separated text.
    pub fn from_tsv(name: impl Into<String>, content: &str) -> Self {
        let rows = content
            .lines()
            .skip(1)
            .map(|line| RawRow::from_cells(line.split('\t').map(text_cell)))
            .collect();
        Self {
            sheets: vec![Sheet {
                name: name.into(),
                rows,
            }],
        }
    }

    pub fn from_json(content: &str) -> SlidershowResult<Self> {
        let parsed: JsonWorkbook = serde_json::from_str(content)?;
        let sheets = parsed
            .sheets
            .into_iter()
            .map(|sheet| Sheet {
                name: sheet.name,
                rows: sheet
                    .rows
                    .into_iter()
                    .skip(1)
                    .map(|cells| RawRow::from_cells(cells.iter().map(json_cell)))
                    .collect(),
            })
            .collect();
        Ok(Self { sheets })
    }

    /// Look up a sheet by name.
    pub fn sheet(&self, name: &str) -> SlidershowResult<&Sheet> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| SlidershowError::sheet(format!("Sheet {name} not found")))
    }
}

fn text_cell(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Whole numbers lose their fraction: `5.0` → `"5"`.
fn number_text(value: f64) -> String {
    value.to_string()
}

/// Render a JSON cell as the text an author would see in the sheet.
fn json_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => text_cell(s),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) => Some(number_text(f)),
            (None, None) => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn spreadsheet_cell(value: &Data) -> Option<String> {
    match value {
        Data::Empty => None,
        Data::String(s) => text_cell(s),
        Data::Float(f) => Some(number_text(*f)),
        Data::Int(i) => Some(i.to_string()),
        other => Some(other.to_string()),
    }
}

/// Rows below the header. A range begins at its first used cell, so leading
/// blank rows and columns are restored.
fn range_rows(range: &Range<Data>) -> Vec<RawRow> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let first_row = first_row as usize;
    let first_col = first_col as usize;

    let leading_blank = std::iter::repeat_with(RawRow::default).take(first_row.saturating_sub(1));
    let used = range
        .rows()
        .enumerate()
        .filter(|(offset, _)| first_row + offset > 0)
        .map(|(_, cells)| {
            RawRow::from_cells(
                std::iter::repeat(None)
                    .take(first_col)
                    .chain(cells.iter().map(spreadsheet_cell)),
            )
        });
    leading_blank.chain(used).collect()
}
