use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::dashboard::{DashboardView, render};
use crate::font::FontAsset;
use crate::ingest::IngestCache;

/// Per-session input state: the current workbook upload, the optional font
/// upload, and the memoized ingestion cache.
#[derive(Default)]
pub struct Session {
    pub workbook: Option<Vec<u8>>,
    pub font: Option<FontAsset>,
    pub cache: IngestCache,
}

pub struct AppState {
    session: Mutex<Session>,
}

#[derive(Serialize)]
struct UploadResponse {
    status: String,
    workbook: bool,
    font: bool,
}

pub async fn run(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Setup app state
    let app_state = Arc::new(AppState {
        session: Mutex::new(Session::default()),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/api/upload", post(upload))
        .route("/api/dashboard", get(dashboard))
        // TTF uploads run well past axum's 2 MB default
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    log::info!("listening on http://127.0.0.1:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> impl IntoResponse {
    // Process the multipart form data
    let mut workbook_data = Vec::new();
    let mut font_data = Vec::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or("unknown").to_string();
        let bytes = field.bytes().await.unwrap_or_default();

        match field_name.as_str() {
            "workbook" => workbook_data = bytes.to_vec(),
            "font" => font_data = bytes.to_vec(),
            _ => {}
        }
    }

    let mut session = state.session.lock().unwrap();

    // A new workbook replaces the previous upload; the ingest cache notices
    // the changed fingerprint on the next render pass.
    if !workbook_data.is_empty() {
        log::info!("workbook upload: {} bytes", workbook_data.len());
        session.workbook = Some(workbook_data);
    }
    if !font_data.is_empty() {
        log::info!("font upload: {} bytes", font_data.len());
        session.font = Some(FontAsset::new(font_data));
    }

    Json(UploadResponse {
        status: "ok".to_string(),
        workbook: session.workbook.is_some(),
        font: session.font.is_some(),
    })
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let mut session = state.session.lock().unwrap();
    let Session {
        workbook,
        font,
        cache,
    } = &mut *session;

    let view = render(workbook.as_deref(), font.as_ref(), cache);
    if view.status == "error" {
        log::warn!("render pass failed: {}", view.message);
    }

    Json(view)
}
