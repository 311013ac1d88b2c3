//! Analysis configuration.
//!
//! Everything the renderers and exporter need (column names, colours, axis
//! scale, output file names) lives here and is passed in explicitly. The
//! defaults reproduce the stock analysis; a YAML file can override any part.

use crate::error::{ParetoError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub source: SourceConfig,
    pub chart: ChartConfig,
    pub export: ExportConfig,
    /// Cumulative share (percent) that defines the vital few.
    pub vital_few_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            chart: ChartConfig::default(),
            export: ExportConfig::default(),
            vital_few_threshold: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub sheet: String,
    pub supplier_column: String,
    pub nonconforming_column: String,
    pub delivered_column: String,
    pub delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sheet: "Entrada".to_string(),
            supplier_column: "Fornecedor".to_string(),
            nonconforming_column: "Não Conformes".to_string(),
            delivered_column: "Entregues".to_string(),
            delimiter: ',',
        }
    }
}

impl SourceConfig {
    pub fn required_columns(&self) -> [&str; 3] {
        [
            self.supplier_column.as_str(),
            self.nonconforming_column.as_str(),
            self.delivered_column.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub bar_color: String,
    pub line_color: String,
    pub text_color: String,
    pub background: String,
    /// Upper bound of the cumulative axis; above 100 to leave headroom.
    pub secondary_axis_max: f64,
    /// Draw the raw nonconforming count above each bar.
    pub annotate_counts: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_color: "#134883".to_string(),
            line_color: "#F8AC2E".to_string(),
            text_color: "#6E7274".to_string(),
            background: "#FFFFFF".to_string(),
            secondary_axis_max: 105.0,
            annotate_counts: false,
            width: 1000,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub chart_file: String,
    pub series_file: String,
    pub summary_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Analise_Pareto".to_string(),
            chart_file: "pareto_graph.svg".to_string(),
            series_file: "pareto_series.json".to_string(),
            summary_file: "summary.json".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn table_file(&self) -> String {
        format!("{}.csv", self.sheet_name)
    }
}

impl AnalysisConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if !(self.vital_few_threshold > 0.0 && self.vital_few_threshold <= 100.0) {
            return Err(ParetoError::Config(format!(
                "vital_few_threshold must be in (0, 100], got {}",
                self.vital_few_threshold
            )));
        }
        if !(self.chart.secondary_axis_max.is_finite() && self.chart.secondary_axis_max >= 100.0) {
            return Err(ParetoError::Config(format!(
                "chart.secondary_axis_max must be at least 100, got {}",
                self.chart.secondary_axis_max
            )));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ParetoError::Config("chart dimensions must be non-zero".to_string()));
        }
        let cols = self.source.required_columns();
        if cols.iter().any(|c| c.trim().is_empty()) {
            return Err(ParetoError::Config("column names must not be empty".to_string()));
        }
        if cols[0] == cols[1] || cols[0] == cols[2] || cols[1] == cols[2] {
            return Err(ParetoError::Config("column names must be distinct".to_string()));
        }
        if !self.source.delimiter.is_ascii() {
            return Err(ParetoError::Config("delimiter must be an ASCII character".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_analysis() {
        let config = AnalysisConfig::default();
        assert_eq!(config.source.sheet, "Entrada");
        assert_eq!(
            config.source.required_columns(),
            ["Fornecedor", "Não Conformes", "Entregues"]
        );
        assert_eq!(config.chart.bar_color, "#134883");
        assert_eq!(config.chart.line_color, "#F8AC2E");
        assert_eq!(config.chart.secondary_axis_max, 105.0);
        assert_eq!(config.export.table_file(), "Analise_Pareto.csv");
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
source:
  sheet: Input
  delimiter: ";"
chart:
  annotate_counts: true
"#;
        let config = AnalysisConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.source.sheet, "Input");
        assert_eq!(config.source.delimiter, ';');
        assert_eq!(config.source.supplier_column, "Fornecedor");
        assert!(config.chart.annotate_counts);
        assert_eq!(config.vital_few_threshold, 80.0);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = AnalysisConfig::from_yaml_str("vital_few_threshold: 150").unwrap_err();
        assert!(matches!(err, ParetoError::Config(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = AnalysisConfig::from_yaml_str("colour: red").unwrap_err();
        assert!(matches!(err, ParetoError::Yaml(_)));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let yaml = "source:\n  delivered_column: Fornecedor\n";
        assert!(AnalysisConfig::from_yaml_str(yaml).is_err());
    }
}
