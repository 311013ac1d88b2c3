use crate::error::{ParetoError, Result};
use crate::types::{RawRow, SupplierRecord};
use crate::util::parse_count;
use tracing::{debug, info};

/// What validation kept and why the rest was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub missing_name: usize,
    pub invalid_numbers: usize,
}

impl ValidationReport {
    pub fn dropped_rows(&self) -> usize {
        self.missing_name + self.invalid_numbers
    }
}

/// Map raw rows onto [`SupplierRecord`]s.
///
/// A row survives iff it has a non-blank supplier name and both counts
/// coerce. Invalid counts drop the row rather than defaulting to zero.
/// Returns [`ParetoError::EmptyData`] when nothing survives.
pub fn validate(rows: &[RawRow]) -> Result<(Vec<SupplierRecord>, ValidationReport)> {
    let mut report = ValidationReport {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let name = match row.supplier.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n,
            _ => {
                debug!(row = idx + 1, "dropping row without supplier name");
                report.missing_name += 1;
                continue;
            }
        };
        let counts = (
            parse_count(row.nonconforming.as_deref()),
            parse_count(row.delivered.as_deref()),
        );
        let (Some(nonconforming_count), Some(delivered_count)) = counts else {
            debug!(
                row = idx + 1,
                supplier = name,
                nonconforming = ?row.nonconforming,
                delivered = ?row.delivered,
                "dropping row with non-numeric counts"
            );
            report.invalid_numbers += 1;
            continue;
        };
        records.push(SupplierRecord {
            supplier_name: name.to_string(),
            nonconforming_count,
            delivered_count,
        });
    }

    report.valid_rows = records.len();
    info!(
        total = report.total_rows,
        valid = report.valid_rows,
        dropped = report.dropped_rows(),
        "validated source rows"
    );
    if records.is_empty() {
        return Err(ParetoError::EmptyData);
    }
    Ok((records, report))
}
