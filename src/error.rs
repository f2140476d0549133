//! Structured error types for the dashboard.
//!
//! Every ingestion failure is a terminal, user-visible stop for that render
//! pass; the next upload starts a fresh one. `Display` stays English for
//! logs, [`DashboardError::user_message`] carries the Korean banner text.

/// All errors that can stop a dashboard render pass.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// No workbook has been uploaded yet.
    #[error("no workbook uploaded")]
    MissingInput,

    /// The workbook lacks one of the five required sheets.
    #[error("missing sheet: {0}")]
    MissingSheet(String),

    /// A sheet lacks a column the chart mapping needs.
    #[error("missing column '{column}' in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// A cell in a date column could not be coerced to a calendar date.
    #[error("cannot parse '{value}' in column '{column}' as a date")]
    DateParse { column: String, value: String },

    /// The upload is not a readable xlsx workbook.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    /// Localized message shown in the page's status banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput => "엑셀 파일을 업로드하세요.".to_string(),
            Self::MissingSheet(name) => {
                format!("엑셀 파일에 '{name}' 시트가 없습니다.")
            }
            Self::MissingColumn { sheet, column } => {
                format!("'{sheet}' 시트에 '{column}' 열이 없습니다.")
            }
            Self::DateParse { column, value } => {
                format!("'{column}' 열의 값을 날짜로 해석할 수 없습니다: {value}")
            }
            Self::Workbook(_) => "엑셀 파일을 열 수 없습니다.".to_string(),
        }
    }

    /// True for the "nothing uploaded yet" state, which the page shows as an
    /// informational prompt rather than an error banner.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput)
    }
}
