// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::sales::SalesStats;

// URLs públicas dos quatro gráficos gerados na requisição
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub revenue_by_category: String,
    pub revenue_by_employee: String,
    pub quantity_by_category: String,
    pub quantity_by_employee: String,
}

// O que a página (e a rota JSON) recebe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    #[serde(flatten)]
    pub stats: SalesStats,
    pub charts: DashboardCharts,
    pub generated_at: DateTime<Utc>,
}
