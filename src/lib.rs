/*!
# Sales Dashboard

A single-page sales-dashboard web application, built in Rust.

## Overview

The server accepts an uploaded Excel workbook with five fixed-name sheets,
parses each into a table, and serves six chart specifications (bar,
histogram, multi-series time series, donut pie, scatter, and Pareto
bars + cumulative-percentage line) to a bundled Plotly.js page. An
optional uploaded TTF font is embedded as CSS and applied to the whole page
and every chart's text layer.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- **Technologies**: HTML, CSS, Plotly.js
- Single embedded page: upload controls, a two-column chart grid, a
  collapsed raw-data preview, and status banners. The page posts uploads
  and fetches the dashboard payload, then hands each chart spec to
  `Plotly.newPlot`.

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Ingestion - extracts the five named sheets into tables, normalizes the
    date columns into `YYYY-MM` labels, and validates every referenced
    column up front
  - Ingest Cache - memoizes parsing per distinct upload within a session
  - Chart Mapping - pure functions from tables to Plotly trace/layout JSON
  - Pareto Derivation - descending stable sort plus cumulative percentage
  - Font Injection - base64-embeds an uploaded TTF as a `@font-face` rule

## Required workbook layout

| Sheet | Required columns |
|---|---|
| 바차트_히스토그램 | 월 (date), 총 매출 |
| 시계열차트 | 월 (date), one or more numeric series columns |
| 파이차트 | leading label column, 1분기 매출 |
| 산점도 | 제품 A 매출, 비용 |
| 파레토차트 | 부서, 매출 |

## Modules

- **table**: tabular data model (`Table`, `Value`) and display formatting
- **ingest**: workbook parsing, validation, date normalization, memoization
- **pareto**: Pareto sort and cumulative-percentage derivation
- **charts**: the six chart-spec builders
- **font**: font-injection side channel and fallback stack
- **dashboard**: the per-interaction render pass
- **error**: structured errors with localized user messages
- **app**: routing and handlers

## REST API Endpoints

- `GET /` - the dashboard page
- `POST /api/upload` - multipart upload (`workbook` xlsx, optional `font` ttf)
- `GET /api/dashboard` - one render pass: chart specs, previews, status
*/

pub mod app;
pub mod charts;
pub mod dashboard;
pub mod error;
pub mod font;
pub mod ingest;
pub mod pareto;
pub mod table;

/// Re-export everything from these modules to make it easier to use
pub use charts::*;
pub use dashboard::*;
pub use error::*;
pub use font::*;
pub use ingest::*;
pub use pareto::*;
pub use table::*;
