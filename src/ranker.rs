use crate::error::{ParetoError, Result};
use crate::types::{ParetoSummary, RankedEntry, RankedTable, SupplierRecord};
use crate::util::percent_of;
use tracing::{info, warn};

const SHARE_TOLERANCE: f64 = 1e-9;

/// Rank suppliers by nonconforming count and annotate their shares.
///
/// The sort is stable, so equal counts keep their input order. A zero
/// delivered count leaves that row's rate undefined but does not affect
/// ranking. A zero nonconforming total makes every share undefined and is
/// reported as [`ParetoError::UndefinedShare`]; a total that overflows `f64`
/// is reported as [`ParetoError::ShareOverflow`].
pub fn rank(records: &[SupplierRecord]) -> Result<RankedTable> {
    if records.is_empty() {
        return Err(ParetoError::EmptyData);
    }

    let total: f64 = records.iter().map(|r| r.nonconforming_count).sum();
    if total == 0.0 {
        warn!(rows = records.len(), "nonconforming total is zero");
        return Err(ParetoError::UndefinedShare);
    }
    if !total.is_finite() {
        warn!(rows = records.len(), "nonconforming total overflows");
        return Err(ParetoError::ShareOverflow);
    }

    let mut sorted: Vec<&SupplierRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.nonconforming_count.total_cmp(&a.nonconforming_count));

    let mut running = 0.0;
    let mut undefined_rates = 0usize;
    let entries: Vec<RankedEntry> = sorted
        .into_iter()
        .map(|r| {
            let nonconformance_rate = percent_of(r.nonconforming_count, r.delivered_count);
            if nonconformance_rate.is_none() {
                undefined_rates += 1;
            }
            let individual_share = r.nonconforming_count / total * 100.0;
            running += individual_share;
            RankedEntry {
                supplier_name: r.supplier_name.clone(),
                nonconforming_count: r.nonconforming_count,
                delivered_count: r.delivered_count,
                nonconformance_rate,
                individual_share,
                cumulative_share: running,
            }
        })
        .collect();

    if entries
        .iter()
        .any(|e| !(e.individual_share.is_finite() && e.cumulative_share.is_finite()))
    {
        return Err(ParetoError::ShareOverflow);
    }
    if undefined_rates > 0 {
        warn!(rows = undefined_rates, "nonconformance rate undefined or out of range");
    }
    info!(suppliers = entries.len(), total_nonconforming = total, "ranked suppliers");
    Ok(RankedTable::new(entries, total))
}

/// Headline figures for a ranked table.
///
/// The vital few is the shortest leading run of suppliers whose cumulative
/// share reaches `threshold` percent.
pub fn summarize(table: &RankedTable, threshold: f64) -> ParetoSummary {
    let entries = table.entries();
    let total_delivered: f64 = entries.iter().map(|e| e.delivered_count).sum();
    let vital_few_count = entries
        .iter()
        .position(|e| e.cumulative_share + SHARE_TOLERANCE >= threshold)
        .map_or(entries.len(), |i| i + 1);

    ParetoSummary {
        total_suppliers: entries.len(),
        total_nonconforming: table.total_nonconforming(),
        total_delivered,
        overall_rate: percent_of(table.total_nonconforming(), total_delivered),
        undefined_rate_rows: entries.iter().filter(|e| e.nonconformance_rate.is_none()).count(),
        vital_few_threshold: threshold,
        vital_few_count,
        vital_few: entries
            .iter()
            .take(vital_few_count)
            .map(|e| e.supplier_name.clone())
            .collect(),
    }
}
