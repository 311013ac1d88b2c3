use serde::Serialize;
use tabled::Tabled;

/// One row as read from the source sheet, before any coercion.
///
/// Cells are kept as text; `None` means the cell was absent or empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub supplier: Option<String>,
    pub nonconforming: Option<String>,
    pub delivered: Option<String>,
}

impl RawRow {
    pub fn new(supplier: &str, nonconforming: &str, delivered: &str) -> Self {
        let cell = |s: &str| Some(s.to_string());
        Self {
            supplier: cell(supplier),
            nonconforming: cell(nonconforming),
            delivered: cell(delivered),
        }
    }
}

/// A row that passed validation. Duplicated supplier names are distinct rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierRecord {
    pub supplier_name: String,
    pub nonconforming_count: f64,
    pub delivered_count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub supplier_name: String,
    pub nonconforming_count: f64,
    pub delivered_count: f64,
    /// `None` when `delivered_count` is zero or the rate overflows.
    pub nonconformance_rate: Option<f64>,
    pub individual_share: f64,
    pub cumulative_share: f64,
}

/// Entries ordered by `nonconforming_count` descending, input order kept on ties.
///
/// Only the ranker builds one; once built it is read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTable {
    entries: Vec<RankedEntry>,
    total_nonconforming: f64,
}

impl RankedTable {
    pub(crate) fn new(entries: Vec<RankedEntry>, total_nonconforming: f64) -> Self {
        Self {
            entries,
            total_nonconforming,
        }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_nonconforming(&self) -> f64 {
        self.total_nonconforming
    }

    pub fn supplier_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.supplier_name.as_str()).collect()
    }

    pub fn nonconforming_counts(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.nonconforming_count).collect()
    }

    pub fn individual_shares(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.individual_share).collect()
    }

    pub fn cumulative_shares(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.cumulative_share).collect()
    }
}

/// Console rendering of a ranked entry.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ReportRow {
    #[serde(rename = "Fornecedor")]
    #[tabled(rename = "Fornecedor")]
    pub supplier: String,
    #[serde(rename = "Não Conformes")]
    #[tabled(rename = "Não Conformes")]
    pub nonconforming: String,
    #[serde(rename = "Entregues")]
    #[tabled(rename = "Entregues")]
    pub delivered: String,
    #[serde(rename = "Taxa NC (%)")]
    #[tabled(rename = "Taxa NC (%)")]
    pub rate: String,
    #[serde(rename = "% Individual")]
    #[tabled(rename = "% Individual")]
    pub individual: String,
    #[serde(rename = "% Acumulada")]
    #[tabled(rename = "% Acumulada")]
    pub cumulative: String,
}

/// Exported sheet row: raw numbers, blank rate cell when undefined.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ExportRow {
    #[serde(rename = "Fornecedor")]
    pub supplier: String,
    #[serde(rename = "Não Conformes")]
    pub nonconforming: f64,
    #[serde(rename = "Entregues")]
    pub delivered: f64,
    #[serde(rename = "Taxa NC (%)")]
    pub rate: Option<f64>,
    #[serde(rename = "% Individual")]
    pub individual: f64,
    #[serde(rename = "% Acumulada")]
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoSummary {
    pub total_suppliers: usize,
    pub total_nonconforming: f64,
    pub total_delivered: f64,
    /// Overall nonconformance rate; `None` when nothing was delivered or it overflows.
    pub overall_rate: Option<f64>,
    pub undefined_rate_rows: usize,
    pub vital_few_threshold: f64,
    pub vital_few_count: usize,
    pub vital_few: Vec<String>,
}
