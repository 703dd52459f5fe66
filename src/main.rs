//src/main.rs

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;
mod views;

use crate::config::AppState;

fn app_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard::get_index))
        .route("/static/charts/{file}", get(handlers::dashboard::get_chart_file))
        .route("/api/stats", get(handlers::dashboard::get_stats))
        .route("/api/health", get(|| async { "OK" }))
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    // Inicializa o logger (RUST_LOG, padrão "info")
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");

    app_state
        .config
        .ensure_directories()
        .expect("Falha ao criar os diretórios de arquivos estáticos.");

    let addr = app_state.config.bind_addr.clone();
    let app = app_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "🚀 Servidor escutando em {}",
        listener.local_addr().map(|a| a.to_string()).unwrap_or(addr)
    );
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
