use std::path::PathBuf;

use crm_model::{MappingDocument, RowRecord, SourceSample};
use crm_validate::{EditImpact, ValidationReport};

/// Outcome of `generate`.
#[derive(Debug)]
pub struct GenerateResult {
    pub doc: MappingDocument,
    /// Warnings only; documents with errors never get this far.
    pub report: ValidationReport,
    pub output: PathBuf,
    pub provider: &'static str,
    pub model: String,
}

/// Outcome of `check`.
#[derive(Debug)]
pub struct CheckResult {
    pub doc: MappingDocument,
    pub report: ValidationReport,
}

/// Outcome of `edit`.
#[derive(Debug)]
pub struct EditResult {
    pub doc: MappingDocument,
    pub rule_number: u32,
    pub impact: EditImpact,
    pub report: ValidationReport,
    pub output: PathBuf,
}

/// Outcome of `transform`.
#[derive(Debug)]
pub struct TransformResult {
    pub doc: MappingDocument,
    /// The records that were sent for transformation.
    pub source: SourceSample,
    pub rows: Vec<RowRecord>,
    pub output: Option<PathBuf>,
}
