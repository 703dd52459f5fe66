// src/models/sales.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// --- 1. Linha do CSV ---
// Os nomes das colunas seguem o arquivo de origem (em espanhol).
#[derive(Debug, Clone, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "producto")]
    pub product: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "empleado")]
    pub employee: String,
    #[serde(rename = "precio_unitario", with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
}

// --- 2. Venda com a coluna derivada ---
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub product: String,
    pub category: String,
    pub employee: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    /// `unit_price * quantity`, calculado uma única vez na carga.
    pub revenue: Decimal,
}

impl Sale {
    /// `None` quando `unit_price * quantity` não cabe num `Decimal`.
    pub fn from_record(record: SaleRecord) -> Option<Self> {
        let revenue = record
            .unit_price
            .checked_mul(Decimal::from(record.quantity))?;
        Some(Self {
            product: record.product,
            category: record.category,
            employee: record.employee,
            unit_price: record.unit_price,
            quantity: record.quantity,
            revenue,
        })
    }
}

// --- 3. Dataset (uma requisição) ---
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    sales: Vec<Sale>,
}

impl Dataset {
    pub fn new(sales: Vec<Sale>) -> Self {
        Self { sales }
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

// --- 4. Estatísticas agregadas ---
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSeller {
    pub product: String,
    pub quantity: i64,
}

/// Resultado imutável da agregação. Os mapas iteram em ordem alfabética
/// das chaves, que também é a ordem das barras nos gráficos.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_revenue: Decimal,
    pub best_seller: BestSeller,
    pub revenue_by_category: BTreeMap<String, Decimal>,
    pub revenue_by_employee: BTreeMap<String, Decimal>,
    pub quantity_by_category: BTreeMap<String, i64>,
    pub quantity_by_employee: BTreeMap<String, i64>,
}
