// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

pub const DEFAULT_LOCALE: &str = "es";
const SUPPORTED_LOCALES: [&str; 2] = ["es", "en"];

// Nosso extrator de idioma
pub struct Locale(pub String);

impl Locale {
    /// Resolve o idioma a partir do valor do header `Accept-Language`.
    /// Pega o primeiro idioma suportado; se nenhum for, usa o padrão.
    pub fn from_header(header_str: Option<&str>) -> Self {
        let lang = header_str
            .map(accept_language::parse)
            .and_then(|tags| {
                tags.iter()
                    // "pt-BR" -> split vira ["pt", "BR"] -> next() pega "pt"
                    .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
                    .find(|lang| SUPPORTED_LOCALES.contains(&lang.as_str()))
            })
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Locale(lang)
    }

    pub fn labels(&self) -> &'static Labels {
        Labels::for_locale(&self.0)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header_str = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok());

        Ok(Locale::from_header(header_str))
    }
}

// --- Textos da página e dos gráficos ---
#[derive(Debug)]
pub struct Labels {
    pub lang: &'static str,
    pub page_title: &'static str,
    pub total_revenue: &'static str,
    pub best_seller: &'static str,
    pub units: &'static str,
    pub revenue_by_category: &'static str,
    pub revenue_by_employee: &'static str,
    pub quantity_by_category: &'static str,
    pub quantity_by_employee: &'static str,
    pub category: &'static str,
    pub employee: &'static str,
    pub revenue_axis: &'static str,
    pub quantity_axis: &'static str,
    pub generated_at: &'static str,
    // Mensagens de erro mostradas ao usuário
    pub error_title: &'static str,
    pub error_data_missing: &'static str,
    pub error_data_unreadable: &'static str,
    pub error_missing_column: &'static str,
    pub error_bad_row: &'static str,
    pub error_empty_dataset: &'static str,
    pub error_out_of_range: &'static str,
    pub error_not_found: &'static str,
    pub error_unexpected: &'static str,
}

pub static ES: Labels = Labels {
    lang: "es",
    page_title: "Análisis de Ventas - Farmacia",
    total_revenue: "Ingreso Total",
    best_seller: "Producto Más Vendido",
    units: "unidades",
    revenue_by_category: "Ventas por Categoría",
    revenue_by_employee: "Ventas por Empleado",
    quantity_by_category: "Cantidad Vendida por Categoría",
    quantity_by_employee: "Cantidad Vendida por Empleado",
    category: "Categoría",
    employee: "Empleado",
    revenue_axis: "Ingresos ($)",
    quantity_axis: "Cantidad",
    generated_at: "Generado el",
    error_title: "No se pudo generar el informe",
    error_data_missing: "No se encontró el archivo de ventas.",
    error_data_unreadable: "No se pudo leer el archivo de ventas.",
    error_missing_column: "Falta la columna obligatoria",
    error_bad_row: "Fila inválida en el archivo de ventas, línea",
    error_empty_dataset: "El archivo de ventas no contiene registros.",
    error_out_of_range: "Los valores de ventas exceden el rango numérico.",
    error_not_found: "Recurso no encontrado.",
    error_unexpected: "Ocurrió un error inesperado.",
};

pub static EN: Labels = Labels {
    lang: "en",
    page_title: "Sales Analysis - Pharmacy",
    total_revenue: "Total Revenue",
    best_seller: "Best-Selling Product",
    units: "units",
    revenue_by_category: "Sales by Category",
    revenue_by_employee: "Sales by Employee",
    quantity_by_category: "Quantity Sold by Category",
    quantity_by_employee: "Quantity Sold by Employee",
    category: "Category",
    employee: "Employee",
    revenue_axis: "Revenue ($)",
    quantity_axis: "Quantity",
    generated_at: "Generated at",
    error_title: "The report could not be generated",
    error_data_missing: "The sales file was not found.",
    error_data_unreadable: "The sales file could not be read.",
    error_missing_column: "Missing required column",
    error_bad_row: "Invalid row in the sales file, line",
    error_empty_dataset: "The sales file contains no records.",
    error_out_of_range: "Sales values exceed the numeric range.",
    error_not_found: "Resource not found.",
    error_unexpected: "An unexpected error occurred.",
};

impl Labels {
    pub fn for_locale(lang: &str) -> &'static Labels {
        match lang {
            "en" => &EN,
            _ => &ES,
        }
    }
}
