// src/services/chart_service.rs

use std::path::{Path, PathBuf};

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;
use plotters::style::{FontStyle, FontTransform};

use crate::common::error::ChartError;

// Tamanho padrão: figura 10x6 polegadas a 100 dpi
pub const DEFAULT_CHART_WIDTH: u32 = 1000;
pub const DEFAULT_CHART_HEIGHT: u32 = 600;

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub charts_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ChartConfig {
    pub fn new(charts_dir: impl Into<PathBuf>) -> Self {
        Self {
            charts_dir: charts_dir.into(),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartColor {
    SteelBlue,
    Coral,
    LightGreen,
    Gold,
}

impl ChartColor {
    fn to_rgb(self) -> RGBColor {
        match self {
            ChartColor::SteelBlue => RGBColor(70, 130, 180),
            ChartColor::Coral => RGBColor(255, 127, 80),
            ChartColor::LightGreen => RGBColor(144, 238, 144),
            ChartColor::Gold => RGBColor(255, 215, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub filename: String,
    pub color: ChartColor,
}

/// Só aceitamos nomes simples `*.png`, sem diretórios.
pub fn is_chart_file_name(name: &str) -> bool {
    !name.is_empty()
        && name.ends_with(".png")
        && name.len() > ".png".len()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[derive(Debug, Clone)]
pub struct ChartService {
    config: ChartConfig,
}

impl ChartService {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn chart_path(&self, filename: &str) -> PathBuf {
        self.config.charts_dir.join(filename)
    }

    /// Desenha um gráfico de barras (uma barra por entrada, na ordem dada) e
    /// grava o PNG em `charts_dir/filename`, sobrescrevendo o anterior.
    /// Um mapa vazio gera só os eixos e o título.
    pub fn render_bar_chart(
        &self,
        data: &[(String, f64)],
        spec: &ChartSpec,
    ) -> Result<PathBuf, ChartError> {
        if !is_chart_file_name(&spec.filename) {
            return Err(ChartError::InvalidFileName(spec.filename.clone()));
        }

        std::fs::create_dir_all(&self.config.charts_dir).map_err(|source| {
            ChartError::CreateDir {
                path: self.config.charts_dir.clone(),
                source,
            }
        })?;

        let output_path = self.chart_path(&spec.filename);

        self.draw(&output_path, data, spec)
            .map_err(|e| ChartError::Draw {
                path: output_path.clone(),
                message: e.to_string(),
            })?;

        tracing::info!("Gráfico gerado: {:?}", output_path);

        Ok(output_path)
    }

    fn draw(
        &self,
        output_path: &Path,
        data: &[(String, f64)],
        spec: &ChartSpec,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (y_min, y_max) = value_range(data);
        // Com zero barras ainda precisamos de um segmento para os eixos
        let segments = data.len().max(1);

        let root = BitMapBackend::new(output_path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                &spec.title,
                ("sans-serif", 28).into_font().style(FontStyle::Bold),
            )
            .margin(20)
            .x_label_area_size(120)
            .y_label_area_size(90)
            .build_cartesian_2d((0..segments).into_segmented(), y_min..y_max)?;

        let text_color = RGBColor(40, 40, 40);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_labels(segments)
            .y_labels(10)
            .light_line_style(ShapeStyle::from(&WHITE))
            .bold_line_style(ShapeStyle::from(&BLACK.mix(0.3)))
            .axis_desc_style(("sans-serif", 18).into_font().color(&text_color))
            .x_label_style(
                ("sans-serif", 14)
                    .into_font()
                    .transform(FontTransform::Rotate90)
                    .color(&text_color),
            )
            .y_label_style(("sans-serif", 14).into_font().color(&text_color))
            .x_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(index) => data
                    .get(*index)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|value| format_axis_value(*value))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(spec.color.to_rgb().filled())
                .margin(12)
                .data(data.iter().enumerate().map(|(index, (_, value))| (index, *value))),
        )?;

        root.present()?;
        Ok(())
    }
}

// Eixo Y sempre inclui o zero, com 10% de folga acima (ou abaixo).
fn value_range(data: &[(String, f64)]) -> (f64, f64) {
    let max_val = data.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let min_val = data.iter().map(|(_, v)| *v).fold(0.0_f64, f64::min);

    let top = if max_val > 0.0 { max_val * 1.1 } else { 0.0 };
    let bottom = if min_val < 0.0 { min_val * 1.1 } else { 0.0 };

    if top == bottom {
        (0.0, 1.0)
    } else {
        (bottom, top)
    }
}

// 12500.0 -> "12,500"; valores pequenos mantêm duas casas.
fn format_axis_value(value: f64) -> String {
    if value.abs() < 10.0 && value.fract() != 0.0 {
        return format!("{:.2}", value);
    }

    (value.round() as i64).to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn spec(filename: &str) -> ChartSpec {
        ChartSpec {
            title: "Ventas por Categoría".to_string(),
            x_label: "Categoría".to_string(),
            y_label: "Ingresos ($)".to_string(),
            filename: filename.to_string(),
            color: ChartColor::SteelBlue,
        }
    }

    #[test]
    fn test_render_writes_png_at_stable_path() {
        let dir = tempdir().expect("tempdir");
        let service = ChartService::new(ChartConfig::new(dir.path().join("charts")));

        let first = vec![("Pharmacy".to_string(), 100.0), ("Grocery".to_string(), 50.0)];
        let path = service
            .render_bar_chart(&first, &spec("ventas_categoria.png"))
            .expect("render chart");
        assert_eq!(path, dir.path().join("charts").join("ventas_categoria.png"));
        let first_bytes = std::fs::read(&path).expect("read chart");
        assert!(first_bytes.starts_with(&[0x89, b'P', b'N', b'G']));

        let second = vec![("Pharmacy".to_string(), 10.0), ("Grocery".to_string(), 500.0)];
        let second_path = service
            .render_bar_chart(&second, &spec("ventas_categoria.png"))
            .expect("render chart again");
        assert_eq!(second_path, path);
        let second_bytes = std::fs::read(&second_path).expect("read chart");
        assert_ne!(first_bytes, second_bytes);
    }

    #[test]
    fn test_render_empty_mapping() {
        let dir = tempdir().expect("tempdir");
        let service = ChartService::new(ChartConfig::new(dir.path()));

        let path = service
            .render_bar_chart(&[], &spec("vacio.png"))
            .expect("render empty chart");
        assert!(path.exists());
    }

    #[test]
    fn test_rejects_path_like_file_names() {
        let dir = tempdir().expect("tempdir");
        let service = ChartService::new(ChartConfig::new(dir.path()));

        let result = service.render_bar_chart(&[], &spec("../fuera.png"));
        assert!(matches!(result, Err(ChartError::InvalidFileName(_))));
    }

    #[test]
    fn test_custom_size_and_color() {
        let dir = tempdir().expect("tempdir");
        let service = ChartService::new(ChartConfig {
            width: 400,
            height: 300,
            ..ChartConfig::new(dir.path())
        });
        let mut custom = spec("pequeno.png");
        custom.color = ChartColor::Gold;

        let path = service
            .render_bar_chart(&[("Única".to_string(), 3.0)], &custom)
            .expect("render chart");
        assert!(path.ends_with("pequeno.png"));
    }

    #[test]
    fn test_chart_file_names() {
        assert!(is_chart_file_name("ventas_empleado.png"));
        assert!(!is_chart_file_name("ventas.svg"));
        assert!(!is_chart_file_name(".png"));
        assert!(!is_chart_file_name("../x.png"));
        assert!(!is_chart_file_name("a/b.png"));
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[]), (0.0, 1.0));
        let (low, high) = value_range(&[("a".to_string(), 100.0)]);
        assert_eq!(low, 0.0);
        assert!((high - 110.0).abs() < 1e-9);
        let (low, _) = value_range(&[("a".to_string(), -10.0), ("b".to_string(), 5.0)]);
        assert!((low + 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(12500.0), "12,500");
        assert_eq!(format_axis_value(0.0), "0");
        assert_eq!(format_axis_value(-1234.0), "-1,234");
        assert_eq!(format_axis_value(2.5), "2.50");
    }
}
