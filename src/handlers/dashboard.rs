// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};

use crate::{
    common::error::{AppError, PageError},
    config::AppState,
    middleware::i18n::Locale,
    services::chart_service::is_chart_file_name,
    views::index_page::render_index,
};

// GET /
// Cada requisição recarrega o CSV e regrava os quatro gráficos.
pub async fn get_index(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Html<String>, PageError> {
    let labels = locale.labels();

    let report = app_state
        .dashboard_service
        .build_report(labels)
        .await
        .map_err(|e| PageError::new(e, labels))?;
    let html = render_index(&app_state.page_template, &report, labels)
        .map_err(|e| PageError::new(e, labels))?;

    Ok(Html(html))
}

// GET /api/stats
pub async fn get_stats(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .dashboard_service
        .build_report(locale.labels())
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /static/charts/{file}
pub async fn get_chart_file(
    State(app_state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_chart_file_name(&file) {
        return Err(AppError::NotFound);
    }

    let path = app_state.config.charts_dir.join(&file);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(AppError::NotFound),
        Err(e) => return Err(anyhow::Error::new(e).context(format!("reading {:?}", path)).into()),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        bytes,
    ))
}
