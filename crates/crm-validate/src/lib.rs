//! Validation for column-mapping documents.
//!
//! [`validate`] checks a [`MappingDocument`] against every structural and
//! summary invariant and returns a [`ValidationReport`]; it never mutates
//! the document. The [`consistency`] module keeps a summary in step with
//! single-rule edits.

pub mod checks;
pub mod consistency;
pub mod issue;

use std::collections::BTreeSet;

use crm_model::MappingDocument;
use tracing::debug;

pub use consistency::{Bucket, EditImpact, MappingStats, diff_after_edit, stats};
pub use issue::{Invariant, Issue, Severity, ValidationReport};

/// Optional upstream facts the document is checked against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    /// Field names present in the source sample.
    pub source_fields: Option<&'a BTreeSet<String>>,
    /// Header columns of the target sample.
    pub target_columns: Option<&'a [String]>,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_fields(mut self, source_fields: &'a BTreeSet<String>) -> Self {
        self.source_fields = Some(source_fields);
        self
    }

    pub fn with_target_columns(mut self, target_columns: &'a [String]) -> Self {
        self.target_columns = Some(target_columns);
        self
    }
}

/// Check a document against every invariant.
///
/// Source references and target coverage are only checked when the context
/// supplies the corresponding sample facts.
pub fn validate(doc: &MappingDocument, ctx: &ValidationContext) -> ValidationReport {
    let mappings = &doc.column_mappings;
    let mut issues = Vec::new();

    issues.extend(checks::numbering::check(mappings));
    issues.extend(checks::targets::check(mappings));
    if let Some(declared) = ctx.target_columns {
        issues.extend(checks::targets::check_coverage(mappings, declared));
    }
    issues.extend(checks::summary::check(mappings, &doc.summary));
    issues.extend(checks::attention::check(mappings));
    issues.extend(checks::rules::check(mappings));
    if let Some(known) = ctx.source_fields {
        issues.extend(checks::references::check(mappings, known));
    }

    let report = ValidationReport { issues };
    debug!(
        rules = mappings.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validated mapping document"
    );
    report
}

/// Validate without upstream sample facts.
pub fn validate_document(doc: &MappingDocument) -> ValidationReport {
    validate(doc, &ValidationContext::new())
}
