//! Workbook ingestion.
//!
//! Reads an uploaded xlsx workbook, extracts the five fixed-name sheets into
//! [`Table`]s, normalizes the date columns, and validates every column the
//! chart mapping will reference. Ingestion is a pure function of the uploaded
//! bytes; [`IngestCache`] memoizes it per distinct upload so re-renders within
//! a session skip the parse.

use std::io::Cursor;

use calamine::{Reader, Xlsx};
use chrono::NaiveDate;

use crate::error::{DashboardError, Result};
use crate::table::{Table, Value};

// Sheet names, exactly as they appear in the workbook.
pub const SHEET_BAR_HIST: &str = "바차트_히스토그램";
pub const SHEET_TIMESERIES: &str = "시계열차트";
pub const SHEET_PIE: &str = "파이차트";
pub const SHEET_SCATTER: &str = "산점도";
pub const SHEET_PARETO: &str = "파레토차트";

pub const REQUIRED_SHEETS: [&str; 5] = [
    SHEET_BAR_HIST,
    SHEET_TIMESERIES,
    SHEET_PIE,
    SHEET_SCATTER,
    SHEET_PARETO,
];

// Column names referenced by the chart mapping.
pub const COL_MONTH: &str = "월";
pub const COL_MONTH_LABEL: &str = "월_str";
pub const COL_TOTAL_SALES: &str = "총 매출";
pub const COL_Q1_SALES: &str = "1분기 매출";
pub const COL_PRODUCT_A_SALES: &str = "제품 A 매출";
pub const COL_COST: &str = "비용";
pub const COL_DEPARTMENT: &str = "부서";
pub const COL_SALES: &str = "매출";

/// The five ingested tables, one per required sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesData {
    pub bar_hist: Table,
    pub timeseries: Table,
    pub pie: Table,
    pub scatter: Table,
    pub pareto: Table,
}

impl SalesData {
    /// The tables in page order, for the raw-data preview.
    pub fn tables(&self) -> [&Table; 5] {
        [
            &self.bar_hist,
            &self.timeseries,
            &self.pie,
            &self.scatter,
            &self.pareto,
        ]
    }
}

/// Parses workbook bytes into the five tables.
///
/// Fails with `MissingSheet` if any required sheet is absent, `MissingColumn`
/// if a downstream-required column is absent, and `DateParse` if a date
/// column holds a value that cannot be coerced to a calendar date. No side
/// effects; the result depends only on the bytes.
pub fn parse_workbook(bytes: &[u8]) -> Result<SalesData> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_names = workbook.sheet_names();
    for required in REQUIRED_SHEETS {
        if !sheet_names.iter().any(|name| name == required) {
            return Err(DashboardError::MissingSheet(required.to_string()));
        }
    }

    let mut bar_hist = read_sheet(&mut workbook, SHEET_BAR_HIST)?;
    let mut timeseries = read_sheet(&mut workbook, SHEET_TIMESERIES)?;
    let pie = read_sheet(&mut workbook, SHEET_PIE)?;
    let scatter = read_sheet(&mut workbook, SHEET_SCATTER)?;
    let pareto = read_sheet(&mut workbook, SHEET_PARETO)?;

    // Date formatting: parse the month columns and derive the YYYY-MM labels
    normalize_months(&mut bar_hist)?;
    normalize_months(&mut timeseries)?;

    // Validate every column the chart mapping references, up front
    bar_hist.require_column(COL_TOTAL_SALES)?;
    if series_columns(&timeseries).is_empty() {
        return Err(DashboardError::MissingColumn {
            sheet: SHEET_TIMESERIES.to_string(),
            column: "(월 이외의 시리즈 열)".to_string(),
        });
    }
    pie.require_column(COL_Q1_SALES)?;
    if pie.columns.len() < 2 {
        return Err(DashboardError::MissingColumn {
            sheet: SHEET_PIE.to_string(),
            column: "(레이블 열)".to_string(),
        });
    }
    scatter.require_column(COL_PRODUCT_A_SALES)?;
    scatter.require_column(COL_COST)?;
    pareto.require_column(COL_DEPARTMENT)?;
    pareto.require_column(COL_SALES)?;

    Ok(SalesData {
        bar_hist,
        timeseries,
        pie,
        scatter,
        pareto,
    })
}

fn read_sheet(workbook: &mut Xlsx<Cursor<&[u8]>>, name: &str) -> Result<Table> {
    let range = workbook.worksheet_range(name)?;
    Ok(Table::from_range(name, &range))
}

/// The time-series value columns: everything except the month and its label.
pub fn series_columns(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| c.as_str() != COL_MONTH && c.as_str() != COL_MONTH_LABEL)
        .cloned()
        .collect()
}

/// Parses the `월` column to calendar dates and appends the `월_str` column
/// with `%Y-%m` labels. Both representations carry the same underlying date.
fn normalize_months(table: &mut Table) -> Result<()> {
    let idx = table.require_column(COL_MONTH)?;

    let mut labels = Vec::with_capacity(table.rows.len());
    for row in &mut table.rows {
        let date = coerce_date(&row[idx]).ok_or_else(|| DashboardError::DateParse {
            column: COL_MONTH.to_string(),
            value: row[idx].display(),
        })?;
        row[idx] = Value::Date(date);
        labels.push(Value::Text(date.format("%Y-%m").to_string()));
    }

    table.push_column(COL_MONTH_LABEL, labels);
    Ok(())
}

/// Coerces a cell to a calendar date.
///
/// Accepts already-typed date cells, `YYYY-MM-DD` / `YYYY/MM/DD` strings, and
/// raw Excel serial numbers.
fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
                .ok()
        }
        Value::Number(n) => excel_serial_date(*n),
        Value::Empty => None,
    }
}

/// Excel serial day numbers count from 1899-12-30 (1900 date system).
fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if serial <= 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(chrono::Days::new(serial as u64))
}

/// Session-scoped memoization of [`parse_workbook`], keyed by a fingerprint
/// of the uploaded bytes. A re-render on the same upload reuses the parsed
/// tables; a new upload with different bytes invalidates the entry.
#[derive(Debug, Default)]
pub struct IngestCache {
    entry: Option<(u64, SalesData)>,
    parses: u64,
}

impl IngestCache {
    pub fn new() -> IngestCache {
        IngestCache::default()
    }

    /// Returns the tables for `bytes`, parsing only on a fingerprint miss.
    pub fn load(&mut self, bytes: &[u8]) -> Result<&SalesData> {
        let key = fingerprint(bytes);
        let hit = matches!(&self.entry, Some((k, _)) if *k == key);
        if !hit {
            let data = parse_workbook(bytes)?;
            self.parses += 1;
            self.entry = Some((key, data));
        }

        let Some((_, data)) = &self.entry else {
            return Err(DashboardError::MissingInput);
        };
        Ok(data)
    }

    /// How many times the parser actually ran, for observability and tests.
    pub fn parses(&self) -> u64 {
        self.parses
    }
}

fn fingerprint(bytes: &[u8]) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
