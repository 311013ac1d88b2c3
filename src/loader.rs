use crate::config::SourceConfig;
use crate::error::{ParetoError, Result};
use crate::types::RawRow;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read the source sheet at `path`.
///
/// A file is taken as the sheet itself. A directory is treated as a workbook
/// and must contain `<sheet>.csv`.
pub fn load_source(path: &Path, source: &SourceConfig) -> Result<Vec<RawRow>> {
    let sheet_path = resolve_sheet(path, source)?;
    info!(path = %sheet_path.display(), sheet = %source.sheet, "loading source");
    let file = File::open(&sheet_path)?;
    read_source(file, source)
}

fn resolve_sheet(path: &Path, source: &SourceConfig) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }
    let candidate = path.join(format!("{}.csv", source.sheet));
    if candidate.is_file() {
        Ok(candidate)
    } else {
        let missing = source.required_columns().iter().map(|c| c.to_string()).collect();
        Err(ParetoError::malformed(source.sheet.clone(), missing))
    }
}

/// Read a sheet from any reader, mapping the configured columns onto [`RawRow`].
pub fn read_source<R: Read>(reader: R, source: &SourceConfig) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .delimiter(source.delimiter as u8)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let [supplier_idx, nonconforming_idx, delivered_idx] = locate_columns(&headers, source)?;

    let mut rows = Vec::new();
    let mut unreadable = 0usize;
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // Keep the row so validation accounts for it; it has no usable cells.
                debug!(error = %e, "unreadable source row");
                unreadable += 1;
                rows.push(RawRow::default());
                continue;
            }
        };
        rows.push(RawRow {
            supplier: cell(&record, supplier_idx),
            nonconforming: cell(&record, nonconforming_idx),
            delivered: cell(&record, delivered_idx),
        });
    }
    info!(rows = rows.len(), unreadable, "read source rows");
    Ok(rows)
}

fn locate_columns(headers: &StringRecord, source: &SourceConfig) -> Result<[usize; 3]> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let required = source.required_columns();
    let found = required.map(find);
    let missing: Vec<String> = required
        .iter()
        .zip(found.iter())
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    match found {
        [Some(a), Some(b), Some(c)] => Ok([a, b, c]),
        _ => Err(ParetoError::malformed(source.sheet.clone(), missing)),
    }
}

fn cell(record: &StringRecord, idx: usize) -> Option<String> {
    let v = record.get(idx)?.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}
