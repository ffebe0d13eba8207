//! Batch reconciliation rows
//!
//! A batch arrives as a spreadsheet-like table already parsed by the caller.
//! Column recognition happens once, before any row is resolved.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::constants::columns;
use super::resolution::ResolutionResult;

/// Structural problems with a whole batch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("input needs at least a NOME or EAN column (found: {})", .columns.join(", "))]
    InputShape { columns: Vec<String> },
}

/// One input row: an optional code and an optional name, both still raw
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRowInput {
    pub code: Option<String>,
    pub name: Option<String>,
}

impl BatchRowInput {
    pub fn new(code: Option<&str>, name: Option<&str>) -> Self {
        Self {
            code: code.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    pub fn from_code(code: &str) -> Self {
        Self::new(Some(code), None)
    }

    pub fn from_name(name: &str) -> Self {
        Self::new(None, Some(name))
    }
}

/// One output row with the six fixed columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRow {
    #[serde(rename = "EAN")]
    pub code: String,
    #[serde(rename = "NOME")]
    pub name: String,
    #[serde(flatten)]
    pub result: ResolutionResult,
}

impl BatchRow {
    pub const fn new(code: String, name: String, result: ResolutionResult) -> Self {
        Self { code, name, result }
    }
}

/// Header row plus cell rows, as handed over by the spreadsheet layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl BatchTable {
    pub const fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from JSON records. Columns are the union of keys, in first-seen order.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| record.get(col).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Map the recognized columns onto row inputs.
    ///
    /// Headers are compared trimmed and upper-cased. A table with a single
    /// unrecognized column is read as a name column.
    pub fn into_row_inputs(self) -> Result<Vec<BatchRowInput>, BatchError> {
        let headers: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.trim().to_uppercase())
            .collect();

        let code_idx = headers.iter().position(|h| h == columns::CODE);
        let mut name_idx = headers.iter().position(|h| h == columns::NAME);

        if code_idx.is_none() && name_idx.is_none() {
            if headers.len() == 1 {
                name_idx = Some(0);
            } else {
                return Err(BatchError::InputShape {
                    columns: self.columns,
                });
            }
        }

        Ok(self
            .rows
            .into_iter()
            .map(|row| BatchRowInput {
                code: code_idx.and_then(|i| row.get(i)).and_then(cell_text),
                name: name_idx.and_then(|i| row.get(i)).and_then(cell_text),
            })
            .collect())
    }
}

/// Render a cell as text. Integral numbers lose their decimal part so that
/// barcodes stored as numbers come back as digit strings.
fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
                        format!("{f:.0}")
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        other => Some(other.to_string()),
    }
}
