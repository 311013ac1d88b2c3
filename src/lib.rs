//! Supplier Pareto analysis.
//!
//! Raw rows are validated into [`types::SupplierRecord`]s, ranked by
//! nonconforming count into a [`types::RankedTable`] with individual and
//! cumulative shares, and summarised. Rendering and export live in
//! [`chart`] and [`output`] and take their styling from [`config`].
//!
//! ```
//! use pareto_report::{analyze, types::RawRow};
//!
//! let rows = vec![
//!     RawRow::new("X", "10", "100"),
//!     RawRow::new("Y", "30", "100"),
//!     RawRow::new("Z", "5", "50"),
//! ];
//! let analysis = analyze(&rows, 80.0).unwrap();
//! assert_eq!(analysis.table.supplier_names(), ["Y", "X", "Z"]);
//! assert_eq!(analysis.summary.vital_few, ["Y", "X"]);
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod ranker;
pub mod types;
pub mod util;
pub mod validate;

pub use error::{ParetoError, Result};

use types::{ParetoSummary, RankedTable, RawRow};
use validate::ValidationReport;

/// Everything one run produces. Built in full or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub validation: ValidationReport,
    pub table: RankedTable,
    pub summary: ParetoSummary,
}

/// Validate, rank and summarise `rows`.
pub fn analyze(rows: &[RawRow], vital_few_threshold: f64) -> Result<Analysis> {
    let (records, validation) = validate::validate(rows)?;
    let table = ranker::rank(&records)?;
    let summary = ranker::summarize(&table, vital_few_threshold);
    Ok(Analysis {
        validation,
        table,
        summary,
    })
}
