// src/services/stats_service.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    common::error::AggregationError,
    models::sales::{BestSeller, Dataset, SalesStats},
};

/// Reduz o dataset às estatísticas da página.
///
/// Desempate do produto mais vendido: os produtos são percorridos em ordem
/// alfabética e o primeiro máximo vence, ou seja, entre empatados fica o de
/// menor nome.
pub fn aggregate(dataset: &Dataset) -> Result<SalesStats, AggregationError> {
    if dataset.is_empty() {
        return Err(AggregationError::EmptyDataset);
    }

    let mut total_revenue = Decimal::ZERO;
    let mut quantity_by_product: BTreeMap<String, i64> = BTreeMap::new();
    let mut revenue_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut revenue_by_employee: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut quantity_by_category: BTreeMap<String, i64> = BTreeMap::new();
    let mut quantity_by_employee: BTreeMap<String, i64> = BTreeMap::new();

    for sale in dataset.sales() {
        total_revenue = total_revenue
            .checked_add(sale.revenue)
            .ok_or(AggregationError::Overflow)?;

        accumulate(&mut quantity_by_product, &sale.product, sale.quantity, i64::checked_add)?;
        accumulate(&mut revenue_by_category, &sale.category, sale.revenue, Decimal::checked_add)?;
        accumulate(&mut revenue_by_employee, &sale.employee, sale.revenue, Decimal::checked_add)?;
        accumulate(&mut quantity_by_category, &sale.category, sale.quantity, i64::checked_add)?;
        accumulate(&mut quantity_by_employee, &sale.employee, sale.quantity, i64::checked_add)?;
    }

    let best_seller = first_maximum(&quantity_by_product).ok_or(AggregationError::EmptyDataset)?;

    Ok(SalesStats {
        total_revenue,
        best_seller,
        revenue_by_category,
        revenue_by_employee,
        quantity_by_category,
        quantity_by_employee,
    })
}

fn accumulate<T: Copy + Default>(
    totals: &mut BTreeMap<String, T>,
    key: &str,
    value: T,
    checked_add: fn(T, T) -> Option<T>,
) -> Result<(), AggregationError> {
    let total = totals.entry(key.to_string()).or_default();
    *total = checked_add(*total, value).ok_or(AggregationError::Overflow)?;
    Ok(())
}

// `Iterator::max_by_key` devolve o ÚLTIMO máximo; aqui queremos o primeiro.
fn first_maximum(quantities: &BTreeMap<String, i64>) -> Option<BestSeller> {
    let mut best: Option<(&String, i64)> = None;
    for (product, &quantity) in quantities {
        match best {
            Some((_, best_quantity)) if quantity <= best_quantity => {}
            _ => best = Some((product, quantity)),
        }
    }

    best.map(|(product, quantity)| BestSeller {
        product: product.clone(),
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::sales::{Sale, SaleRecord};

    fn sale(product: &str, category: &str, employee: &str, price: Decimal, qty: i64) -> Sale {
        Sale::from_record(SaleRecord {
            product: product.to_string(),
            category: category.to_string(),
            employee: employee.to_string(),
            unit_price: price,
            quantity: qty,
        })
        .expect("revenue fits")
    }

    fn pharmacy_dataset() -> Dataset {
        Dataset::new(vec![
            sale("Paracetamol", "Analgésicos", "Ana", dec!(2.50), 10),
            sale("Vitamina C", "Suplementos", "Luis", dec!(8.75), 3),
            sale("Ibuprofeno", "Analgésicos", "Luis", dec!(3.10), 7),
            sale("Jarabe", "Resfriado", "Marta", dec!(12.99), 2),
            sale("Paracetamol", "Analgésicos", "Marta", dec!(2.50), 4),
        ])
    }

    #[test]
    fn test_best_seller_sums_quantities() {
        let dataset = Dataset::new(vec![
            sale("A", "X", "Ana", dec!(1), 5),
            sale("B", "X", "Ana", dec!(1), 10),
            sale("B", "Y", "Luis", dec!(1), 2),
        ]);
        let stats = aggregate(&dataset).expect("stats");
        assert_eq!(
            stats.best_seller,
            BestSeller {
                product: "B".to_string(),
                quantity: 12
            }
        );
    }

    #[test]
    fn test_best_seller_tie_goes_to_first_name() {
        let dataset = Dataset::new(vec![
            sale("Zinc", "X", "Ana", dec!(1), 6),
            sale("Aspirina", "X", "Ana", dec!(1), 6),
            sale("Magnesio", "X", "Ana", dec!(1), 6),
        ]);
        let stats = aggregate(&dataset).expect("stats");
        assert_eq!(stats.best_seller.product, "Aspirina");
        assert_eq!(stats.best_seller.quantity, 6);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let result = aggregate(&Dataset::default());
        assert_eq!(result, Err(AggregationError::EmptyDataset));
    }

    #[test]
    fn test_quantity_overflow_is_an_error() {
        let dataset = Dataset::new(vec![
            sale("A", "X", "Ana", dec!(0), i64::MAX),
            sale("A", "X", "Ana", dec!(0), 1),
        ]);
        assert_eq!(aggregate(&dataset), Err(AggregationError::Overflow));
    }

    #[test]
    fn test_revenue_overflow_is_an_error() {
        let dataset = Dataset::new(vec![
            sale("A", "X", "Ana", Decimal::MAX, 1),
            sale("B", "Y", "Luis", Decimal::MAX, 1),
        ]);
        assert_eq!(aggregate(&dataset), Err(AggregationError::Overflow));
    }

    #[test]
    fn test_grouped_revenue_partitions_total() {
        let stats = aggregate(&pharmacy_dataset()).expect("stats");

        let by_category: Decimal = stats.revenue_by_category.values().copied().sum();
        let by_employee: Decimal = stats.revenue_by_employee.values().copied().sum();
        assert_eq!(by_category, stats.total_revenue);
        assert_eq!(by_employee, stats.total_revenue);
        assert_eq!(stats.total_revenue, dec!(108.93));
    }

    #[test]
    fn test_grouped_quantities_partition_total() {
        let stats = aggregate(&pharmacy_dataset()).expect("stats");

        let by_category: i64 = stats.quantity_by_category.values().sum();
        let by_employee: i64 = stats.quantity_by_employee.values().sum();
        assert_eq!(by_category, 26);
        assert_eq!(by_employee, 26);
    }

    #[test]
    fn test_revenue_and_quantity_share_keys() {
        let stats = aggregate(&pharmacy_dataset()).expect("stats");

        assert!(stats
            .revenue_by_category
            .keys()
            .eq(stats.quantity_by_category.keys()));
        assert!(stats
            .revenue_by_employee
            .keys()
            .eq(stats.quantity_by_employee.keys()));
    }

    #[test]
    fn test_group_values() {
        let stats = aggregate(&pharmacy_dataset()).expect("stats");

        assert_eq!(stats.revenue_by_category["Analgésicos"], dec!(56.70));
        assert_eq!(stats.revenue_by_employee["Luis"], dec!(47.95));
        assert_eq!(stats.quantity_by_category["Analgésicos"], 21);
        assert_eq!(stats.quantity_by_employee["Marta"], 6);
        assert_eq!(stats.best_seller.product, "Paracetamol");
        assert_eq!(stats.best_seller.quantity, 14);
        // ordem alfabética das barras
        let categories: Vec<&str> = stats.revenue_by_category.keys().map(String::as_str).collect();
        assert_eq!(categories, vec!["Analgésicos", "Resfriado", "Suplementos"]);
    }
}
