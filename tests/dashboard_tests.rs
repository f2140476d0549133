//! End-to-end tests over generated xlsx workbooks: ingestion, validation,
//! memoization, and the full render pass.

use rust_xlsxwriter::{Workbook, Worksheet};

use salesboard::dashboard::render;
use salesboard::error::DashboardError;
use salesboard::ingest::{
    COL_COST, COL_DEPARTMENT, COL_MONTH, COL_MONTH_LABEL, COL_PRODUCT_A_SALES, COL_Q1_SALES,
    COL_SALES, COL_TOTAL_SALES, IngestCache, SHEET_BAR_HIST, SHEET_PARETO, SHEET_PIE,
    SHEET_SCATTER, SHEET_TIMESERIES, parse_workbook,
};

fn add_sheet<'a>(workbook: &'a mut Workbook, name: &str, headers: &[&str]) -> &'a mut Worksheet {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).unwrap();
    for (col, header) in headers.iter().enumerate() {
        if !header.is_empty() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
    }
    sheet
}

fn write_bar_hist(workbook: &mut Workbook) {
    let sheet = add_sheet(workbook, SHEET_BAR_HIST, &[COL_MONTH, COL_TOTAL_SALES]);
    sheet.write_string(1, 0, "2023-01-01").unwrap();
    sheet.write_number(1, 1, 1_000_000.0).unwrap();
    sheet.write_string(2, 0, "2023-02-01").unwrap();
    sheet.write_number(2, 1, 2_000_000.0).unwrap();
}

fn write_timeseries(workbook: &mut Workbook) {
    let sheet = add_sheet(workbook, SHEET_TIMESERIES, &[COL_MONTH, "제품 A", "제품 B"]);
    sheet.write_string(1, 0, "2023-01-01").unwrap();
    sheet.write_number(1, 1, 100.0).unwrap();
    sheet.write_number(1, 2, 200.0).unwrap();
    sheet.write_string(2, 0, "2023-02-01").unwrap();
    sheet.write_number(2, 1, 150.0).unwrap();
    sheet.write_number(2, 2, 250.0).unwrap();
}

fn write_pie(workbook: &mut Workbook) {
    // Leading label column is unnamed, as exported by the source system
    let sheet = add_sheet(workbook, SHEET_PIE, &["", COL_Q1_SALES]);
    sheet.write_string(1, 0, "제품 A").unwrap();
    sheet.write_number(1, 1, 300.0).unwrap();
    sheet.write_string(2, 0, "제품 B").unwrap();
    sheet.write_number(2, 1, 700.0).unwrap();
}

fn write_scatter(workbook: &mut Workbook) {
    let sheet = add_sheet(workbook, SHEET_SCATTER, &[COL_PRODUCT_A_SALES, COL_COST]);
    sheet.write_number(1, 0, 1000.0).unwrap();
    sheet.write_number(1, 1, 400.0).unwrap();
    sheet.write_number(2, 0, 2000.0).unwrap();
    sheet.write_number(2, 1, 700.0).unwrap();
}

fn write_pareto(workbook: &mut Workbook) {
    let sheet = add_sheet(workbook, SHEET_PARETO, &[COL_DEPARTMENT, COL_SALES]);
    for (row, (dept, amount)) in [("A", 300.0), ("B", 100.0), ("C", 100.0)].iter().enumerate() {
        let row = (row + 1) as u32;
        sheet.write_string(row, 0, *dept).unwrap();
        sheet.write_number(row, 1, *amount).unwrap();
    }
}

/// A workbook with all five sheets populated and valid.
fn sample_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    write_bar_hist(&mut workbook);
    write_timeseries(&mut workbook);
    write_pie(&mut workbook);
    write_scatter(&mut workbook);
    write_pareto(&mut workbook);
    workbook.save_to_buffer().unwrap()
}

/// Same as [`sample_workbook`] but without the pie sheet.
fn workbook_without_pie() -> Vec<u8> {
    let mut workbook = Workbook::new();
    write_bar_hist(&mut workbook);
    write_timeseries(&mut workbook);
    write_scatter(&mut workbook);
    write_pareto(&mut workbook);
    workbook.save_to_buffer().unwrap()
}

#[test]
fn ingests_five_tables_with_month_labels() {
    let data = parse_workbook(&sample_workbook()).unwrap();

    assert_eq!(
        data.bar_hist.strings(COL_MONTH_LABEL).unwrap(),
        vec!["2023-01", "2023-02"]
    );
    assert_eq!(
        data.bar_hist.numbers(COL_TOTAL_SALES).unwrap(),
        vec![1_000_000.0, 2_000_000.0]
    );
    assert_eq!(
        data.timeseries.strings(COL_MONTH_LABEL).unwrap(),
        vec!["2023-01", "2023-02"]
    );
    assert_eq!(data.pie.rows.len(), 2);
    assert_eq!(data.scatter.numbers(COL_COST).unwrap(), vec![400.0, 700.0]);
    assert_eq!(data.pareto.rows.len(), 3);
}

#[test]
fn month_column_keeps_date_and_label_in_agreement() {
    let data = parse_workbook(&sample_workbook()).unwrap();
    let dates = data.bar_hist.strings(COL_MONTH).unwrap();
    let labels = data.bar_hist.strings(COL_MONTH_LABEL).unwrap();
    for (date, label) in dates.iter().zip(&labels) {
        assert!(date.starts_with(label.as_str()));
    }
}

#[test]
fn missing_pie_sheet_fails_ingestion() {
    let err = parse_workbook(&workbook_without_pie()).unwrap_err();
    match &err {
        DashboardError::MissingSheet(name) => assert_eq!(name, SHEET_PIE),
        other => panic!("expected MissingSheet, got {other:?}"),
    }
    assert_eq!(err.user_message(), "엑셀 파일에 '파이차트' 시트가 없습니다.");

    // And the render pass halts before any chart
    let mut cache = IngestCache::new();
    let view = render(Some(&workbook_without_pie()), None, &mut cache);
    assert_eq!(view.status, "error");
    assert!(view.charts.is_empty());
    assert!(view.previews.is_empty());
}

#[test]
fn missing_required_column_is_reported() {
    let mut workbook = Workbook::new();
    // bar/hist sheet without the total-sales column
    let sheet = add_sheet(&mut workbook, SHEET_BAR_HIST, &[COL_MONTH]);
    sheet.write_string(1, 0, "2023-01-01").unwrap();
    write_timeseries(&mut workbook);
    write_pie(&mut workbook);
    write_scatter(&mut workbook);
    write_pareto(&mut workbook);
    let bytes = workbook.save_to_buffer().unwrap();

    let err = parse_workbook(&bytes).unwrap_err();
    match err {
        DashboardError::MissingColumn { ref sheet, ref column } => {
            assert_eq!(sheet, SHEET_BAR_HIST);
            assert_eq!(column, COL_TOTAL_SALES);
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn undated_month_cell_is_a_parse_error() {
    let mut workbook = Workbook::new();
    let sheet = add_sheet(&mut workbook, SHEET_BAR_HIST, &[COL_MONTH, COL_TOTAL_SALES]);
    sheet.write_string(1, 0, "첫째 달").unwrap();
    sheet.write_number(1, 1, 1_000_000.0).unwrap();
    write_timeseries(&mut workbook);
    write_pie(&mut workbook);
    write_scatter(&mut workbook);
    write_pareto(&mut workbook);
    let bytes = workbook.save_to_buffer().unwrap();

    let err = parse_workbook(&bytes).unwrap_err();
    match err {
        DashboardError::DateParse { ref column, ref value } => {
            assert_eq!(column, COL_MONTH);
            assert_eq!(value, "첫째 달");
        }
        other => panic!("expected DateParse, got {other:?}"),
    }
}

#[test]
fn ingestion_is_memoized_per_upload() {
    let bytes = sample_workbook();
    let mut cache = IngestCache::new();

    let first = cache.load(&bytes).unwrap().clone();
    assert_eq!(cache.parses(), 1);

    // Same bytes again: identical contents, no second parse
    let second = cache.load(&bytes).unwrap().clone();
    assert_eq!(cache.parses(), 1);
    assert_eq!(first, second);

    // A different upload invalidates the entry
    let other = workbook_without_pie();
    assert!(cache.load(&other).is_err());
}

#[test]
fn render_pass_produces_six_charts_and_five_previews() {
    let bytes = sample_workbook();
    let mut cache = IngestCache::new();
    let view = render(Some(&bytes), None, &mut cache);

    assert_eq!(view.status, "ok");
    assert_eq!(
        view.message,
        "완료: 업로드한 폰트가 있으면 대시보드 전체에 적용됩니다."
    );

    let ids: Vec<&str> = view.charts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["bar", "hist", "timeseries", "pie", "scatter", "pareto"]);

    let sheets: Vec<&str> = view.previews.iter().map(|p| p.sheet.as_str()).collect();
    assert_eq!(
        sheets,
        vec![SHEET_BAR_HIST, SHEET_TIMESERIES, SHEET_PIE, SHEET_SCATTER, SHEET_PARETO]
    );

    // Preview shows at most five rows with comma-grouped integers
    assert_eq!(view.previews[0].rows.len(), 2);
    assert_eq!(view.previews[0].rows[0][1], "1,000,000");
}

#[test]
fn bar_chart_binds_months_to_totals() {
    let bytes = sample_workbook();
    let mut cache = IngestCache::new();
    let view = render(Some(&bytes), None, &mut cache);

    let bar = &view.charts[0];
    assert_eq!(bar.traces[0]["x"], serde_json::json!(["2023-01", "2023-02"]));
    assert_eq!(
        bar.traces[0]["y"],
        serde_json::json!([1_000_000.0, 2_000_000.0])
    );
}

#[test]
fn pareto_chart_orders_ties_by_original_row() {
    let bytes = sample_workbook();
    let mut cache = IngestCache::new();
    let view = render(Some(&bytes), None, &mut cache);

    let pareto = &view.charts[5];
    assert_eq!(pareto.traces[0]["x"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(pareto.traces[1]["y"], serde_json::json!([60.0, 80.0, 100.0]));
    assert_eq!(pareto.layout["yaxis2"]["range"], serde_json::json!([0, 110]));
}

#[test]
fn uploaded_font_reaches_chart_layouts_and_page_css() {
    let bytes = sample_workbook();
    let mut cache = IngestCache::new();
    let font = salesboard::font::FontAsset::new(b"fake-ttf".to_vec());
    let view = render(Some(&bytes), Some(&font), &mut cache);

    assert!(view.font_family.starts_with("'UploadedFont', "));
    assert!(view.font_css.contains("@font-face"));
    for chart in &view.charts {
        assert_eq!(
            chart.layout["font"]["family"],
            serde_json::json!(view.font_family)
        );
    }
}
