use crate::chart::{render_svg, ChartSeries};
use crate::config::AnalysisConfig;
use crate::error::{ParetoError, Result};
use crate::types::{ExportRow, RankedTable, ReportRow};
use crate::util::{format_count, format_percent, format_rate};
use crate::Analysis;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn report_rows(table: &RankedTable) -> Vec<ReportRow> {
    table
        .entries()
        .iter()
        .map(|e| ReportRow {
            supplier: e.supplier_name.clone(),
            nonconforming: format_count(e.nonconforming_count),
            delivered: format_count(e.delivered_count),
            rate: format_rate(e.nonconformance_rate),
            individual: format_percent(e.individual_share),
            cumulative: format_percent(e.cumulative_share),
        })
        .collect()
}

pub fn export_rows(table: &RankedTable) -> Vec<ExportRow> {
    table
        .entries()
        .iter()
        .map(|e| ExportRow {
            supplier: e.supplier_name.clone(),
            nonconforming: e.nonconforming_count,
            delivered: e.delivered_count,
            rate: e.nonconformance_rate,
            individual: e.individual_share,
            cumulative: e.cumulative_share,
        })
        .collect()
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub table: PathBuf,
    pub chart: PathBuf,
    pub series: PathBuf,
    pub summary: PathBuf,
}

#[derive(Serialize)]
struct SummaryFile<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    sheet: &'a str,
    #[serde(flatten)]
    summary: &'a crate::types::ParetoSummary,
}

/// Write the full report into `dir`: the ranked sheet as CSV, the chart as
/// SVG, the chart series as JSON and the summary as JSON.
///
/// Any failure is wrapped in [`ParetoError::Export`] naming `dir`.
pub fn export_report(dir: &Path, analysis: &Analysis, config: &AnalysisConfig) -> Result<ExportedFiles> {
    let files = write_report(dir, analysis, config).map_err(|e| ParetoError::export(dir, e))?;
    info!(dir = %dir.display(), "exported report");
    Ok(files)
}

fn write_report(dir: &Path, analysis: &Analysis, config: &AnalysisConfig) -> Result<ExportedFiles> {
    std::fs::create_dir_all(dir)?;
    let files = ExportedFiles {
        table: dir.join(config.export.table_file()),
        chart: dir.join(&config.export.chart_file),
        series: dir.join(&config.export.series_file),
        summary: dir.join(&config.export.summary_file),
    };

    write_csv(&files.table, &export_rows(&analysis.table))?;

    let series = ChartSeries::from_table(&analysis.table, &config.chart);
    std::fs::write(&files.chart, render_svg(&series, &config.chart))?;
    write_json(&files.series, &series)?;

    let summary = SummaryFile {
        generated_at: chrono::Utc::now(),
        sheet: &config.export.sheet_name,
        summary: &analysis.summary,
    };
    write_json(&files.summary, &summary)?;
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranker::rank;
    use crate::types::SupplierRecord;

    fn table() -> RankedTable {
        rank(&[
            SupplierRecord {
                supplier_name: "Acme".into(),
                nonconforming_count: 1500.0,
                delivered_count: 120_000.0,
            },
            SupplierRecord {
                supplier_name: "Beta".into(),
                nonconforming_count: 500.0,
                delivered_count: 0.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn report_rows_format_counts_and_percentages() {
        let rows = report_rows(&table());
        assert_eq!(rows[0].nonconforming, "1,500");
        assert_eq!(rows[0].delivered, "120,000");
        assert_eq!(rows[0].rate, "1.25%");
        assert_eq!(rows[0].individual, "75.00%");
        assert_eq!(rows[1].rate, "n/a");
        assert_eq!(rows[1].cumulative, "100.00%");
    }

    #[test]
    fn render_table_uses_headers_and_limits_rows() {
        let rendered = render_table(&report_rows(&table()), 1);
        assert!(rendered.contains("Fornecedor"));
        assert!(rendered.contains("% Acumulada"));
        assert!(rendered.contains("Acme"));
        assert!(!rendered.contains("Beta"));
        assert_eq!(render_table::<ReportRow>(&[], 5), "(no rows)");
    }

    #[test]
    fn csv_export_keeps_raw_numbers_and_blank_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        write_csv(&path, &export_rows(&table())).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Fornecedor,Não Conformes,Entregues,Taxa NC (%),% Individual,% Acumulada")
        );
        assert_eq!(lines.next(), Some("Acme,1500.0,120000.0,1.25,75.0,75.0"));
        assert_eq!(lines.next(), Some("Beta,500.0,0.0,,25.0,100.0"));
    }

    #[test]
    fn unwritable_output_dir_is_export_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();

        let analysis = crate::analyze(&[crate::types::RawRow::new("A", "1", "2")], 80.0).unwrap();
        let err = export_report(&blocker, &analysis, &AnalysisConfig::default()).unwrap_err();
        match &err {
            ParetoError::Export { dir, source } => {
                assert_eq!(dir, &blocker);
                assert!(matches!(**source, ParetoError::Io(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.hint("Entrada", &["Fornecedor"]).contains("output directory"));
    }

    #[test]
    fn report_rows_keep_huge_counts() {
        let table = rank(&[SupplierRecord {
            supplier_name: "Huge".into(),
            nonconforming_count: 1e19,
            delivered_count: 1e21,
        }])
        .unwrap();
        let rows = report_rows(&table);
        assert_eq!(rows[0].nonconforming, "10,000,000,000,000,000,000");
        assert_eq!(rows[0].rate, "1.00%");
    }
}
