// src/views/index_page.rs

use std::collections::BTreeMap;

use num_format::{Locale, ToFormattedString};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    common::error::TemplateError,
    middleware::i18n::Labels,
    models::dashboard::DashboardReport,
};

/// Template padrão, embutido no binário. `TEMPLATE_PATH` pode substituí-lo.
pub const BUILTIN_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Preenche os marcadores `{{NOME}}` do template numa única passada, então
/// valores vindos do CSV nunca são reinterpretados como marcadores.
pub fn render_index(
    template: &str,
    report: &DashboardReport,
    labels: &Labels,
) -> Result<String, TemplateError> {
    let stats = &report.stats;
    // Evita que o navegador reaproveite a imagem antiga (o caminho não muda)
    let version = report.generated_at.timestamp_millis();
    let chart_src = |url: &str| format!("{}?v={}", url, version);

    let values: Vec<(&str, String)> = vec![
        ("LANG", labels.lang.to_string()),
        ("PAGE_TITLE", escape_html(labels.page_title)),
        ("TOTAL_REVENUE_LABEL", escape_html(labels.total_revenue)),
        ("TOTAL_REVENUE", format_money(stats.total_revenue)),
        ("BEST_SELLER_LABEL", escape_html(labels.best_seller)),
        ("BEST_SELLER", escape_html(&stats.best_seller.product)),
        ("BEST_SELLER_QUANTITY", stats.best_seller.quantity.to_formatted_string(&Locale::en)),
        ("UNITS_LABEL", escape_html(labels.units)),
        ("REVENUE_BY_CATEGORY_LABEL", escape_html(labels.revenue_by_category)),
        ("REVENUE_BY_EMPLOYEE_LABEL", escape_html(labels.revenue_by_employee)),
        ("QUANTITY_BY_CATEGORY_LABEL", escape_html(labels.quantity_by_category)),
        ("QUANTITY_BY_EMPLOYEE_LABEL", escape_html(labels.quantity_by_employee)),
        ("CATEGORY_LABEL", escape_html(labels.category)),
        ("EMPLOYEE_LABEL", escape_html(labels.employee)),
        ("REVENUE_AXIS_LABEL", escape_html(labels.revenue_axis)),
        ("REVENUE_BY_CATEGORY_ROWS", money_rows(&stats.revenue_by_category)),
        ("REVENUE_BY_EMPLOYEE_ROWS", money_rows(&stats.revenue_by_employee)),
        ("CHART_REVENUE_BY_CATEGORY", escape_html(&chart_src(&report.charts.revenue_by_category))),
        ("CHART_REVENUE_BY_EMPLOYEE", escape_html(&chart_src(&report.charts.revenue_by_employee))),
        ("CHART_QUANTITY_BY_CATEGORY", escape_html(&chart_src(&report.charts.quantity_by_category))),
        ("CHART_QUANTITY_BY_EMPLOYEE", escape_html(&chart_src(&report.charts.quantity_by_employee))),
        ("GENERATED_AT_LABEL", escape_html(labels.generated_at)),
        (
            "GENERATED_AT",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
    ];

    fill_placeholders(template, &values)
}

fn fill_placeholders(template: &str, values: &[(&str, String)]) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or_else(|| TemplateError::UnresolvedPlaceholder(after_open.chars().take(32).collect()))?;
        let name = after_open[..end].trim();

        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .ok_or_else(|| TemplateError::UnresolvedPlaceholder(name.to_string()))?;
        output.push_str(value);

        rest = &after_open[end + 2..];
    }
    output.push_str(rest);

    Ok(output)
}

fn money_rows(map: &BTreeMap<String, Decimal>) -> String {
    map.iter()
        .map(|(label, value)| {
            format!(
                "<tr><td>{}</td><td class=\"amount\">${}</td></tr>",
                escape_html(label),
                format_money(*value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 1234.5 -> "1,234.50"
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let unsigned = rounded.abs();
    // |Decimal| < 2^96, sempre cabe em u128
    let integer = unsigned.trunc().to_u128().unwrap_or_default();
    let cents = (unsigned.fract() * Decimal::ONE_HUNDRED).to_u32().unwrap_or_default();

    format!("{}{}.{:02}", sign, integer.to_formatted_string(&Locale::en), cents)
}
