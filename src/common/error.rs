use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{
    middleware::i18n::{DEFAULT_LOCALE, Labels},
    views::index_page::escape_html,
};

// --- Erros de cada etapa (carga -> agregação -> gráfico -> página) ---

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read the header row: {0}")]
    InvalidHeader(#[source] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("malformed row at line {line}: {source}")]
    MalformedRow {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("revenue out of range at line {line}")]
    RevenueOverflow { line: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("cannot aggregate an empty dataset")]
    EmptyDataset,

    #[error("aggregated totals exceed the numeric range")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid chart file name `{0}`")]
    InvalidFileName(String),

    #[error("failed to create chart directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to draw chart {}: {message}", path.display())]
    Draw { path: PathBuf, message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unresolved placeholder `{0}` in page template")]
    UnresolvedPlaceholder(String),
}

// Nosso tipo de erro da requisição. Cada etapa converte via `#[from]`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro ao carregar os dados: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("Erro de agregação: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Erro ao gerar gráfico: {0}")]
    Chart(#[from] ChartError),

    #[error("Erro no template: {0}")]
    Template(#[from] TemplateError),

    #[error("Recurso não encontrado")]
    NotFound,

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0:#}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Status HTTP e mensagem pública no idioma pedido. O erro completo
    /// (com caminhos de arquivo) só vai para o log.
    fn status_and_message(&self, labels: &Labels) -> (StatusCode, String) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, labels.error_not_found.to_string()),
            AppError::DataLoad(err) => {
                tracing::error!("Falha ao carregar o arquivo de vendas: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, data_load_message(err, labels))
            }
            AppError::Aggregation(err) => {
                tracing::error!("Falha ao agregar as vendas: {}", err);
                let message = match err {
                    AggregationError::EmptyDataset => labels.error_empty_dataset,
                    AggregationError::Overflow => labels.error_out_of_range,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    labels.error_unexpected.to_string(),
                )
            }
        }
    }
}

fn data_load_message(err: &DataLoadError, labels: &Labels) -> String {
    match err {
        DataLoadError::NotFound(_) => labels.error_data_missing.to_string(),
        DataLoadError::Io { .. } | DataLoadError::InvalidHeader(_) => {
            labels.error_data_unreadable.to_string()
        }
        DataLoadError::MissingColumn(column) => {
            format!("{}: {}", labels.error_missing_column, column)
        }
        DataLoadError::MalformedRow { line, .. } => format!("{} {}.", labels.error_bad_row, line),
        DataLoadError::RevenueOverflow { line } => {
            format!("{} ({} {})", labels.error_out_of_range, labels.error_bad_row, line)
        }
    }
}

// Rotas JSON não negociam idioma: usam o padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let labels = Labels::for_locale(DEFAULT_LOCALE);
        let (status, error_message) = self.status_and_message(labels);
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Mesma falha, mas apresentada como página HTML (rota `/`).
#[derive(Debug)]
pub struct PageError {
    pub error: AppError,
    pub labels: &'static Labels,
}

impl PageError {
    pub fn new(error: impl Into<AppError>, labels: &'static Labels) -> Self {
        Self {
            error: error.into(),
            labels,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.error.status_and_message(self.labels);
        let body = format!(
            "<!DOCTYPE html><html lang=\"{lang}\"><head><meta charset=\"utf-8\">\
             <title>{title}</title></head>\
             <body><h1>{title}</h1><p>{message}</p></body></html>",
            lang = self.labels.lang,
            title = escape_html(self.labels.error_title),
            message = escape_html(&error_message),
        );
        (status, Html(body)).into_response()
    }
}
