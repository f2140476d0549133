//! Tabular data model for ingested sheets.
//!
//! A [`Table`] is a rectangular, column-named, row-ordered data set built from
//! one worksheet. Cells are [`Value`]s with the three semantic types the
//! charts care about (text label, numeric amount, calendar date) plus empty.

use calamine::{Data, Range};
use chrono::NaiveDate;

use crate::error::{DashboardError, Result};

/// A single cell value after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl Value {
    /// Converts a calamine cell into a domain value.
    ///
    /// Datetime cells become calendar dates; ISO datetime strings are parsed;
    /// everything else keeps its obvious mapping. Error cells degrade to text
    /// so they stay visible in the raw preview.
    pub fn from_cell(cell: &Data) -> Value {
        match cell {
            Data::String(s) => Value::Text(s.clone()),
            Data::Float(f) => Value::Number(*f),
            Data::Int(i) => Value::Number(*i as f64),
            Data::Bool(b) => Value::Text(b.to_string()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(d) => Value::Date(d.date()),
                None => Value::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => match parse_iso_date(s) {
                Some(d) => Value::Date(d),
                None => Value::Text(s.clone()),
            },
            Data::DurationIso(s) => Value::Text(s.clone()),
            Data::Error(e) => Value::Text(format!("{e:?}")),
            Data::Empty => Value::Empty,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Display string for previews and chart labels.
    ///
    /// Integer-valued numbers are comma-grouped; non-integers fall back to
    /// their raw representation.
    pub fn display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9e15 {
                    group_thousands(*n as i64)
                } else {
                    n.to_string()
                }
            }
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Empty => String::new(),
        }
    }
}

fn cell_to_header(cell: &Data) -> String {
    Value::from_cell(cell).display()
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.split('T').next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Formats an integer with thousands separators, e.g. `1234567` → `1,234,567`.
pub fn group_thousands(n: i64) -> String {
    let negative = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// One ingested sheet: column names plus row-major cell values.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Sheet name this table was extracted from.
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table from a worksheet range.
    ///
    /// The first row supplies the column names; remaining rows are padded or
    /// truncated to the header width so the table stays rectangular.
    pub fn from_range(name: &str, range: &Range<Data>) -> Table {
        let mut rows_iter = range.rows();

        let columns: Vec<String> = match rows_iter.next() {
            Some(header) => header.iter().map(cell_to_header).collect(),
            None => Vec::new(),
        };

        let rows = rows_iter
            .map(|row| {
                let mut values: Vec<Value> = row.iter().map(Value::from_cell).collect();
                values.resize(columns.len(), Value::Empty);
                values.truncate(columns.len());
                values
            })
            .collect();

        Table {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    /// Index of a column by exact (case-sensitive) name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Like [`Table::column_index`] but fails with a `MissingColumn` naming
    /// the sheet and column, so validation happens up front rather than deep
    /// in chart-mapping code.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| DashboardError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Numeric projection of a column; non-numeric cells read as 0.
    pub fn numbers(&self, column: &str) -> Result<Vec<f64>> {
        let idx = self.require_column(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row[idx].as_number().unwrap_or(0.0))
            .collect())
    }

    /// Display-string projection of a column.
    pub fn strings(&self, column: &str) -> Result<Vec<String>> {
        let idx = self.require_column(column)?;
        Ok(self.rows.iter().map(|row| row[idx].display()).collect())
    }

    /// Appends a derived column; `values` must match the current row count.
    pub fn push_column(&mut self, column: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(column.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// The first `n` rows as display strings, for the raw-data preview.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(Value::display).collect())
            .collect()
    }
}
