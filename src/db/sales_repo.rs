// src/db/sales_repo.rs

use std::{
    fs::File,
    io::ErrorKind,
    path::PathBuf,
};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    common::error::DataLoadError,
    models::sales::{Dataset, Sale, SaleRecord},
};

/// Colunas obrigatórias do arquivo de vendas (a ordem no arquivo é livre).
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "producto",
    "categoria",
    "empleado",
    "precio_unitario",
    "cantidad",
];

// O "repositório" aqui é só o arquivo CSV; não há banco de dados.
#[derive(Clone, Debug)]
pub struct SalesRepository {
    data_file: PathBuf,
}

impl SalesRepository {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    /// Lê o arquivo inteiro e calcula a receita de cada linha.
    /// Qualquer linha inválida invalida a carga toda.
    pub fn load_dataset(&self) -> Result<Dataset, DataLoadError> {
        let file = File::open(&self.data_file).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                DataLoadError::NotFound(self.data_file.clone())
            } else {
                DataLoadError::Io {
                    path: self.data_file.clone(),
                    source,
                }
            }
        })?;

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

        let headers = reader
            .headers()
            .map_err(DataLoadError::InvalidHeader)?
            .clone();
        check_required_columns(&headers)?;

        let mut sales = Vec::new();
        for (index, result) in reader.deserialize::<SaleRecord>().enumerate() {
            // +2: a linha 1 é o cabeçalho
            let line = index as u64 + 2;
            let record = result.map_err(|source| DataLoadError::MalformedRow { line, source })?;
            let sale = Sale::from_record(record).ok_or(DataLoadError::RevenueOverflow { line })?;
            sales.push(sale);
        }

        tracing::info!(
            "Arquivo de vendas carregado: {} linhas de {:?}",
            sales.len(),
            self.data_file
        );

        Ok(Dataset::new(sales))
    }
}

fn check_required_columns(headers: &StringRecord) -> Result<(), DataLoadError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(DataLoadError::MissingColumn(column));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal::Decimal;

    use rust_decimal_macros::dec;
    use tempfile::NamedTempFile;

    use super::*;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn test_no_file_exists() {
        let repo = SalesRepository::new("tests/data/non_existent.csv");
        let result = repo.load_dataset();
        assert!(matches!(result, Err(DataLoadError::NotFound(_))));
    }

    #[test]
    fn test_revenue_is_derived_exactly() {
        let file = csv_file(
            "producto,categoria,empleado,precio_unitario,cantidad\n\
             Ibuprofeno,Analgésicos,Ana,3.5,4\n",
        );
        let dataset = SalesRepository::new(file.path()).load_dataset().expect("dataset");

        assert_eq!(dataset.len(), 1);
        let sale = &dataset.sales()[0];
        assert_eq!(sale.product, "Ibuprofeno");
        assert_eq!(sale.unit_price, dec!(3.5));
        assert_eq!(sale.quantity, 4);
        assert_eq!(sale.revenue, dec!(14.0));
    }

    #[test]
    fn test_columns_in_any_order_and_extra_columns() {
        let file = csv_file(
            "fecha,cantidad,producto,empleado,categoria,precio_unitario\n\
             2024-01-02, 2 , Jarabe , Luis , Resfriado , 12.99\n",
        );
        let dataset = SalesRepository::new(file.path()).load_dataset().expect("dataset");

        let sale = &dataset.sales()[0];
        assert_eq!(sale.product, "Jarabe");
        assert_eq!(sale.employee, "Luis");
        assert_eq!(sale.category, "Resfriado");
        assert_eq!(sale.revenue, dec!(25.98));
    }

    #[test]
    fn test_missing_quantity_column() {
        let file = csv_file(
            "producto,categoria,empleado,precio_unitario\n\
             Ibuprofeno,Analgésicos,Ana,3.5\n",
        );
        let result = SalesRepository::new(file.path()).load_dataset();
        assert!(matches!(
            result,
            Err(DataLoadError::MissingColumn("cantidad"))
        ));
    }

    #[test]
    fn test_empty_file_is_missing_columns() {
        let file = csv_file("");
        let result = SalesRepository::new(file.path()).load_dataset();
        assert!(matches!(result, Err(DataLoadError::MissingColumn(_))));
    }

    #[test]
    fn test_header_only_loads_empty_dataset() {
        let file = csv_file("producto,categoria,empleado,precio_unitario,cantidad\n");
        let dataset = SalesRepository::new(file.path()).load_dataset().expect("dataset");
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_malformed_price_fails_whole_load() {
        let file = csv_file(
            "producto,categoria,empleado,precio_unitario,cantidad\n\
             A,X,Ana,1.0,1\n\
             B,X,Ana,abc,2\n",
        );
        let result = SalesRepository::new(file.path()).load_dataset();
        match result {
            Err(DataLoadError::MalformedRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_revenue_overflow_is_reported_with_line() {
        let file = csv_file(&format!(
            "producto,categoria,empleado,precio_unitario,cantidad\n\
             A,X,Ana,1.0,1\n\
             B,X,Ana,{},2\n",
            Decimal::MAX
        ));
        let result = SalesRepository::new(file.path()).load_dataset();
        assert!(matches!(
            result,
            Err(DataLoadError::RevenueOverflow { line: 3 })
        ));
    }

    #[test]
    fn test_max_price_without_overflow_loads() {
        let file = csv_file(&format!(
            "producto,categoria,empleado,precio_unitario,cantidad\n\
             A,X,Ana,{},1\n",
            Decimal::MAX
        ));
        let dataset = SalesRepository::new(file.path()).load_dataset().expect("dataset");
        assert_eq!(dataset.sales()[0].revenue, Decimal::MAX);
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let file = csv_file("producto\n");
        // um arquivo usado como diretório: ENOTDIR, não NotFound
        let result = SalesRepository::new(file.path().join("ventas.csv")).load_dataset();
        assert!(matches!(result, Err(DataLoadError::Io { .. })));
    }

    #[test]
    fn test_non_utf8_header_is_invalid() {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(b"producto,\xff\xfe,cantidad\nA,B,1\n").expect("write csv");
        let result = SalesRepository::new(file.path()).load_dataset();
        assert!(matches!(result, Err(DataLoadError::InvalidHeader(_))));
    }
}
