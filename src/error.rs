//! Error taxonomy for the Pareto pipeline.
//!
//! Validation and ranking failures are deterministic for a given input, so
//! nothing here is retried: every variant propagates straight to the caller.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ParetoError>;

#[derive(Debug, Error)]
pub enum ParetoError {
    /// The source lacks the expected sheet or columns.
    #[error("sheet '{sheet}' is missing required column(s): {}", .missing.join(", "))]
    MalformedSource { sheet: String, missing: Vec<String> },

    /// No row survived validation.
    #[error("no valid data found: every row is missing a supplier name or has non-numeric counts")]
    EmptyData,

    /// Data is valid but the nonconforming total is zero.
    #[error("total nonconforming count is zero: individual and cumulative shares are undefined")]
    UndefinedShare,

    /// The nonconforming total is too large to represent, so shares cannot be computed.
    #[error("total nonconforming count overflows: individual and cumulative shares are undefined")]
    ShareOverflow,

    /// Writing the report failed; the analysis itself succeeded.
    #[error("cannot write report to {}: {source}", .dir.display())]
    Export {
        dir: PathBuf,
        source: Box<ParetoError>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ParetoError {
    pub fn malformed(sheet: impl Into<String>, missing: Vec<String>) -> Self {
        Self::MalformedSource {
            sheet: sheet.into(),
            missing,
        }
    }

    pub fn export(dir: &Path, source: ParetoError) -> Self {
        Self::Export {
            dir: dir.to_path_buf(),
            source: Box::new(source),
        }
    }

    /// Guidance shown to the user below the error line.
    pub fn hint(&self, sheet: &str, columns: &[&str]) -> String {
        let cols = columns
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ");
        match self {
            Self::MalformedSource { .. } | Self::EmptyData => format!(
                "The input needs a sheet named '{sheet}' with the columns {cols}."
            ),
            Self::UndefinedShare => {
                "All suppliers have zero nonconforming units; there is nothing to rank.".to_string()
            }
            Self::ShareOverflow => {
                "Nonconforming counts are too large to total; check the count column for bad values."
                    .to_string()
            }
            Self::Export { dir, .. } => format!(
                "Check that the output directory '{}' can be created and written to.",
                dir.display()
            ),
            _ => format!("Check that the input has a sheet named '{sheet}' with the columns {cols}."),
        }
    }

    pub fn exit_status(&self) -> u8 {
        match self {
            Self::MalformedSource { .. } => 2,
            Self::EmptyData => 3,
            Self::UndefinedShare | Self::ShareOverflow => 4,
            _ => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}
