// src/config.rs

use std::{
    env,
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context;

use crate::{
    db::SalesRepository,
    services::{
        chart_service::{ChartConfig, ChartService, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH},
        dashboard_service::DashboardService,
    },
    views::index_page::BUILTIN_TEMPLATE,
};

const DEFAULT_SALES_CSV: &str = "ventas_farmacia.csv";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sales_csv: PathBuf,
    pub static_dir: PathBuf,
    pub charts_dir: PathBuf,
    pub template_path: Option<PathBuf>,
    pub bind_addr: String,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl AppConfig {
    /// Lê a configuração das variáveis de ambiente (o `.env` já deve ter
    /// sido carregado). Todas têm valor padrão.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let static_dir = PathBuf::from(
            lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        );
        let charts_dir = lookup("CHARTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| static_dir.join("charts"));

        Ok(Self {
            sales_csv: PathBuf::from(
                lookup("SALES_CSV").unwrap_or_else(|| DEFAULT_SALES_CSV.to_string()),
            ),
            static_dir,
            charts_dir,
            template_path: lookup("TEMPLATE_PATH").map(PathBuf::from),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            chart_width: parse_dimension(&lookup, "CHART_WIDTH", DEFAULT_CHART_WIDTH)?,
            chart_height: parse_dimension(&lookup, "CHART_HEIGHT", DEFAULT_CHART_HEIGHT)?,
        })
    }

    /// Configuração com todos os caminhos sob `root`.
    #[cfg(test)]
    pub fn for_root(root: &std::path::Path) -> Self {
        let static_dir = root.join(DEFAULT_STATIC_DIR);
        Self {
            sales_csv: root.join(DEFAULT_SALES_CSV),
            charts_dir: static_dir.join("charts"),
            static_dir,
            template_path: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
        }
    }

    /// Cria `static/` e `static/charts/` se ainda não existirem.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        for dir in [&self.static_dir, &self.charts_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Falha ao criar o diretório {:?}", dir))?;
        }
        Ok(())
    }

    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            width: self.chart_width,
            height: self.chart_height,
            ..ChartConfig::new(self.charts_dir.clone())
        }
    }
}

fn parse_dimension<F>(lookup: &F, key: &str, default: u32) -> anyhow::Result<u32>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => {
            let value: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} deve ser um inteiro positivo, recebido {:?}", key, raw))?;
            anyhow::ensure!(value > 0, "{} deve ser maior que zero", key);
            Ok(value)
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dashboard_service: DashboardService,
    pub page_template: Arc<str>,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::from_env()?;
        Self::from_config(config)
    }

    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let page_template: Arc<str> = match &config.template_path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Falha ao ler o template {:?}", path))?
                .into(),
            None => BUILTIN_TEMPLATE.into(),
        };

        // --- Monta o gráfico de dependências ---
        let sales_repo = SalesRepository::new(config.sales_csv.clone());
        let chart_service = ChartService::new(config.chart_config());
        let dashboard_service = DashboardService::new(sales_repo, chart_service);

        tracing::info!(
            "✅ Configuração carregada: dados em {:?}, gráficos em {:?}",
            config.sales_csv,
            config.charts_dir
        );

        Ok(Self {
            config: Arc::new(config),
            dashboard_service,
            page_template,
        })
    }
}
