//! The render pass: current input state in, a complete dashboard view out.
//!
//! [`render`] is called synchronously per interaction. It either produces the
//! six chart specs plus the raw-data previews, or an error/status view; there
//! is no partial output and no retry.

use serde::Serialize;

use crate::charts::{ChartSpec, build_charts};
use crate::error::{DashboardError, Result};
use crate::font::{FontAsset, font_family, page_css};
use crate::ingest::IngestCache;
use crate::table::Table;

/// Rows shown per table in the raw-data preview.
const PREVIEW_ROWS: usize = 5;

/// First rows of one ingested sheet, formatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct SheetPreview {
    pub sheet: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything the frontend needs for one render pass.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    /// `"ok"`, `"error"`, or `"empty"` (nothing uploaded yet).
    pub status: String,
    /// Localized banner text.
    pub message: String,
    pub font_family: String,
    pub font_css: String,
    pub charts: Vec<ChartSpec>,
    pub previews: Vec<SheetPreview>,
}

/// Runs one synchronous render pass over the session's current inputs.
///
/// Ingestion is memoized through `cache`; chart mapping re-runs every time.
/// Any failure becomes a terminal error view for this pass, never a crash.
pub fn render(
    workbook: Option<&[u8]>,
    font: Option<&FontAsset>,
    cache: &mut IngestCache,
) -> DashboardView {
    match build(workbook, font, cache) {
        Ok(view) => view,
        Err(err) => {
            let status = if err.is_missing_input() { "empty" } else { "error" };
            DashboardView {
                status: status.to_string(),
                message: err.user_message(),
                font_family: font_family(font),
                font_css: page_css(font),
                charts: Vec::new(),
                previews: Vec::new(),
            }
        }
    }
}

fn build(
    workbook: Option<&[u8]>,
    font: Option<&FontAsset>,
    cache: &mut IngestCache,
) -> Result<DashboardView> {
    let bytes = workbook.ok_or(DashboardError::MissingInput)?;
    let data = cache.load(bytes)?;

    let family = font_family(font);
    let charts = build_charts(data, &family)?;
    let previews = data.tables().into_iter().map(preview).collect();

    Ok(DashboardView {
        status: "ok".to_string(),
        message: "완료: 업로드한 폰트가 있으면 대시보드 전체에 적용됩니다.".to_string(),
        font_family: family,
        font_css: page_css(font),
        charts,
        previews,
    })
}

fn preview(table: &Table) -> SheetPreview {
    SheetPreview {
        sheet: table.name.clone(),
        columns: table.columns.clone(),
        rows: table.head(PREVIEW_ROWS),
    }
}
