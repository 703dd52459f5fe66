// src/services/dashboard_service.rs

use std::collections::BTreeMap;

use anyhow::Context;
use chrono::Utc;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    common::error::AppError,
    db::SalesRepository,
    middleware::i18n::Labels,
    models::dashboard::{DashboardCharts, DashboardReport},
    services::{
        chart_service::{ChartColor, ChartService, ChartSpec},
        stats_service,
    },
};

/// Prefixo público sob o qual o diretório de gráficos é servido.
pub const CHARTS_URL_PREFIX: &str = "/static/charts";

// Os quatro gráficos fixos da página
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardChart {
    RevenueByCategory,
    RevenueByEmployee,
    QuantityByCategory,
    QuantityByEmployee,
}

impl DashboardChart {
    pub const ALL: [DashboardChart; 4] = [
        DashboardChart::RevenueByCategory,
        DashboardChart::RevenueByEmployee,
        DashboardChart::QuantityByCategory,
        DashboardChart::QuantityByEmployee,
    ];

    pub fn filename(self) -> &'static str {
        match self {
            DashboardChart::RevenueByCategory => "ventas_categoria.png",
            DashboardChart::RevenueByEmployee => "ventas_empleado.png",
            DashboardChart::QuantityByCategory => "cantidad_categoria.png",
            DashboardChart::QuantityByEmployee => "cantidad_empleado.png",
        }
    }

    pub fn url(self) -> String {
        format!("{}/{}", CHARTS_URL_PREFIX, self.filename())
    }

    fn spec(self, labels: &Labels) -> ChartSpec {
        let (title, x_label, y_label, color) = match self {
            DashboardChart::RevenueByCategory => (
                labels.revenue_by_category,
                labels.category,
                labels.revenue_axis,
                ChartColor::SteelBlue,
            ),
            DashboardChart::RevenueByEmployee => (
                labels.revenue_by_employee,
                labels.employee,
                labels.revenue_axis,
                ChartColor::Coral,
            ),
            DashboardChart::QuantityByCategory => (
                labels.quantity_by_category,
                labels.category,
                labels.quantity_axis,
                ChartColor::LightGreen,
            ),
            DashboardChart::QuantityByEmployee => (
                labels.quantity_by_employee,
                labels.employee,
                labels.quantity_axis,
                ChartColor::Gold,
            ),
        };

        ChartSpec {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            filename: self.filename().to_string(),
            color,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DashboardService {
    repo: SalesRepository,
    chart_service: ChartService,
}

impl DashboardService {
    pub fn new(repo: SalesRepository, chart_service: ChartService) -> Self {
        Self {
            repo,
            chart_service,
        }
    }

    /// Carga -> agregação -> gráficos, numa thread de bloqueio.
    pub async fn build_report(&self, labels: &'static Labels) -> Result<DashboardReport, AppError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.generate_report(labels))
            .await
            .context("[DashboardService->build_report] blocking task join failed (panic/cancelled)")?
    }

    /// Versão síncrona: uma única passada, sem sub-etapas recuperáveis.
    pub fn generate_report(&self, labels: &Labels) -> Result<DashboardReport, AppError> {
        let dataset = self.repo.load_dataset()?;
        let stats = stats_service::aggregate(&dataset)?;
        tracing::info!(
            "Estatísticas calculadas sobre {} vendas (total: {})",
            dataset.len(),
            stats.total_revenue
        );

        for chart in DashboardChart::ALL {
            let data = match chart {
                DashboardChart::RevenueByCategory => revenue_series(&stats.revenue_by_category),
                DashboardChart::RevenueByEmployee => revenue_series(&stats.revenue_by_employee),
                DashboardChart::QuantityByCategory => quantity_series(&stats.quantity_by_category),
                DashboardChart::QuantityByEmployee => quantity_series(&stats.quantity_by_employee),
            };
            self.chart_service.render_bar_chart(&data, &chart.spec(labels))?;
        }

        Ok(DashboardReport {
            stats,
            charts: DashboardCharts {
                revenue_by_category: DashboardChart::RevenueByCategory.url(),
                revenue_by_employee: DashboardChart::RevenueByEmployee.url(),
                quantity_by_category: DashboardChart::QuantityByCategory.url(),
                quantity_by_employee: DashboardChart::QuantityByEmployee.url(),
            },
            generated_at: Utc::now(),
        })
    }
}

fn revenue_series(map: &BTreeMap<String, Decimal>) -> Vec<(String, f64)> {
    map.iter()
        .map(|(label, value)| (label.clone(), value.to_f64().unwrap_or_default()))
        .collect()
}

fn quantity_series(map: &BTreeMap<String, i64>) -> Vec<(String, f64)> {
    map.iter()
        .map(|(label, value)| (label.clone(), *value as f64))
        .collect()
}
