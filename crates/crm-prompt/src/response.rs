//! Rule generation response parsing.

use crm_model::MappingDocument;
use crm_validate::{ValidationContext, validate};
use tracing::{info, warn};

use crate::error::{ResponseError, Result};
use crate::fence::strip_fence;

/// Parse and validate a rule generation response.
pub fn parse_response(raw: &str) -> Result<MappingDocument> {
    parse_response_with(raw, &ValidationContext::new())
}

/// Parse a response and validate it against the upstream samples.
///
/// Warnings are logged; only error-severity issues reject the document.
/// The document is never repaired.
pub fn parse_response_with(raw: &str, ctx: &ValidationContext) -> Result<MappingDocument> {
    let body = strip_fence(raw)?;
    if body.is_empty() {
        return Err(ResponseError::malformed("empty response", raw));
    }

    let doc: MappingDocument = serde_json::from_str(body)
        .map_err(|e| ResponseError::malformed(format!("not a mapping document: {e}"), raw))?;

    let report = validate(&doc, ctx);
    for issue in report.warnings() {
        warn!(invariant = %issue.invariant, rules = ?issue.rule_numbers, "{}", issue.message);
    }
    match report.into_result() {
        Ok(_) => {
            info!(
                rules = doc.column_mappings.len(),
                review_required = doc.summary.review_required.len(),
                "parsed mapping document"
            );
            Ok(doc)
        }
        Err(issues) => {
            info!(errors = issues.len(), "mapping document rejected");
            Err(ResponseError::InvariantViolation { issues })
        }
    }
}
