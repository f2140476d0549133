//! Chart mapping: tables in, Plotly chart specifications out.
//!
//! Each builder is a pure function from a [`Table`] (plus the fixed column
//! name constants) to a [`ChartSpec`] holding the traces and layout the
//! frontend hands to `Plotly.newPlot`. Every layout carries the uniform font
//! family, consistent margins, and comma-grouped number separators; hover
//! templates use currency-style thousands formatting.

use serde::Serialize;
use serde_json::{Value as Json, json};

use crate::error::Result;
use crate::ingest::{
    COL_COST, COL_MONTH_LABEL, COL_PRODUCT_A_SALES, COL_Q1_SALES, COL_TOTAL_SALES, SalesData,
    series_columns,
};
use crate::pareto;
use crate::table::{Table, Value};

/// One chart ready for the rendering surface.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    /// Element id the frontend mounts the chart into.
    pub id: String,
    /// Panel heading shown above the plot.
    pub title: String,
    /// Full-width panels span both grid columns.
    pub full_width: bool,
    pub traces: Vec<Json>,
    pub layout: Json,
}

/// Builds the six chart specs in page order: bar, histogram, time series,
/// pie, scatter, Pareto.
pub fn build_charts(data: &SalesData, font_family: &str) -> Result<Vec<ChartSpec>> {
    Ok(vec![
        bar_chart(&data.bar_hist, font_family)?,
        histogram_chart(&data.bar_hist, font_family)?,
        timeseries_chart(&data.timeseries, font_family)?,
        pie_chart(&data.pie, font_family)?,
        scatter_chart(&data.scatter, font_family)?,
        pareto_chart(&data.pareto, font_family)?,
    ])
}

/// Shared layout base: margins, font, and comma-grouped tick labels.
fn base_layout(font_family: &str) -> Json {
    json!({
        "margin": { "l": 40, "r": 10, "t": 30, "b": 40 },
        "font": { "family": font_family, "size": 12 },
        "separators": ",.",
    })
}

/// Monthly total sales as a bar chart.
pub fn bar_chart(table: &Table, font_family: &str) -> Result<ChartSpec> {
    let x = table.strings(COL_MONTH_LABEL)?;
    let y = table.numbers(COL_TOTAL_SALES)?;

    let mut layout = base_layout(font_family);
    layout["xaxis"] = json!({ "title": "월" });
    layout["yaxis"] = json!({ "title": "총 매출" });

    Ok(ChartSpec {
        id: "bar".to_string(),
        title: "월별 총 매출 (바차트)".to_string(),
        full_width: false,
        traces: vec![json!({
            "type": "bar",
            "x": x,
            "y": y,
            "hovertemplate": "%{x}<br>매출: %{y:,}원<extra></extra>",
        })],
        layout,
    })
}

/// Distribution of total sales, fixed at 8 bins.
pub fn histogram_chart(table: &Table, font_family: &str) -> Result<ChartSpec> {
    let x = table.numbers(COL_TOTAL_SALES)?;

    let mut layout = base_layout(font_family);
    layout["xaxis"] = json!({ "title": "총 매출" });
    layout["yaxis"] = json!({ "title": "빈도" });

    Ok(ChartSpec {
        id: "hist".to_string(),
        title: "총 매출 분포 (히스토그램)".to_string(),
        full_width: false,
        traces: vec![json!({
            "type": "histogram",
            "x": x,
            "nbinsx": 8,
            "hovertemplate": "매출: %{x:,}원 (빈도 %{y})<extra></extra>",
        })],
        layout,
    })
}

/// Per-product monthly sales: one lines+markers trace per value column, with
/// a horizontal legend above the plot.
pub fn timeseries_chart(table: &Table, font_family: &str) -> Result<ChartSpec> {
    let x = table.strings(COL_MONTH_LABEL)?;

    let mut traces = Vec::new();
    for column in series_columns(table) {
        let y = table.numbers(&column)?;
        traces.push(json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": column,
            "x": x,
            "y": y,
            "hovertemplate": format!("%{{x}}<br>{column}: %{{y:,}}원<extra></extra>"),
        }));
    }

    let mut layout = base_layout(font_family);
    layout["xaxis"] = json!({ "title": "월" });
    layout["yaxis"] = json!({ "title": "매출" });
    layout["legend"] = json!({ "orientation": "h", "x": 0, "y": 1.12 });

    Ok(ChartSpec {
        id: "timeseries".to_string(),
        title: "제품별 월별 매출 (시계열)".to_string(),
        full_width: true,
        traces,
        layout,
    })
}

/// First-quarter sales share as a donut pie; labels come from the sheet's
/// leading label column.
pub fn pie_chart(table: &Table, font_family: &str) -> Result<ChartSpec> {
    let values = table.numbers(COL_Q1_SALES)?;
    let labels: Vec<String> = table
        .rows
        .iter()
        .map(|row| row.first().map(Value::display).unwrap_or_default())
        .collect();

    let mut layout = base_layout(font_family);
    layout["showlegend"] = json!(false);

    Ok(ChartSpec {
        id: "pie".to_string(),
        title: "1분기 제품별 매출 비율 (파이차트)".to_string(),
        full_width: false,
        traces: vec![json!({
            "type": "pie",
            "labels": labels,
            "values": values,
            "hole": 0.3,
            "textinfo": "label+percent",
            "hovertemplate": "%{label}<br>%{value:,}원<extra></extra>",
        })],
        layout,
    })
}

/// Product A sales against cost, unconnected markers only.
pub fn scatter_chart(table: &Table, font_family: &str) -> Result<ChartSpec> {
    let x = table.numbers(COL_PRODUCT_A_SALES)?;
    let y = table.numbers(COL_COST)?;

    let mut layout = base_layout(font_family);
    layout["xaxis"] = json!({ "title": "제품 A 매출" });
    layout["yaxis"] = json!({ "title": "비용" });

    Ok(ChartSpec {
        id: "scatter".to_string(),
        title: "제품 A 매출 vs 비용 (산점도)".to_string(),
        full_width: false,
        traces: vec![json!({
            "type": "scatter",
            "mode": "markers",
            "x": x,
            "y": y,
            "hovertemplate": "매출 %{x:,}원<br>비용 %{y:,}원<extra></extra>",
        })],
        layout,
    })
}

/// Department sales bars with the cumulative-percentage line on a secondary
/// axis pinned to [0, 110].
pub fn pareto_chart(table: &Table, font_family: &str) -> Result<ChartSpec> {
    let rows = pareto::derive(table)?;

    let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    let amounts: Vec<f64> = rows.iter().map(|r| r.amount).collect();
    let cumulative: Vec<f64> = rows.iter().map(|r| r.cumulative_pct).collect();

    let mut layout = base_layout(font_family);
    layout["margin"] = json!({ "l": 40, "r": 40, "t": 30, "b": 40 });
    layout["xaxis"] = json!({ "title": "부서" });
    layout["yaxis"] = json!({ "title": "매출" });
    layout["yaxis2"] = json!({
        "title": "누적 비율(%)",
        "overlaying": "y",
        "side": "right",
        "range": [0, 110],
    });
    layout["legend"] = json!({ "orientation": "h", "x": 0, "y": 1.12 });

    Ok(ChartSpec {
        id: "pareto".to_string(),
        title: "부서별 매출과 누적비율 (파레토)".to_string(),
        full_width: true,
        traces: vec![
            json!({
                "type": "bar",
                "name": "매출",
                "x": categories,
                "y": amounts,
                "hovertemplate": "%{x}<br>매출 %{y:,}원<extra></extra>",
            }),
            json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": "누적 비율",
                "yaxis": "y2",
                "x": categories,
                "y": cumulative,
                "hovertemplate": "%{x}<br>누적 %{y:.1f}%<extra></extra>",
            }),
        ],
        layout,
    })
}
