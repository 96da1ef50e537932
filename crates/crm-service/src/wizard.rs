//! The generate and transform steps of the mapping wizard.
//!
//! Each step builds its request, submits it to a [`CompletionService`] and
//! parses the answer. Nothing is retried; a failed step can be re-run from
//! scratch.

use crm_model::{CrmTarget, MappingDocument, RowRecord, SourceSample, TargetSchema};
use crm_prompt::{
    DEFAULT_PREVIEW_ROWS, build_request, build_transform_request, parse_response_with,
    parse_transform_response,
};
use crm_validate::{ValidationContext, validate_document};
use tracing::{Instrument, debug, info, info_span};

use crate::client::CompletionService;
use crate::error::WizardError;
use crate::redact::redact_value;

/// Inputs of the rule generation step.
#[derive(Debug, Clone, Copy)]
pub struct GenerationInput<'a> {
    pub source: &'a SourceSample,
    pub target: &'a TargetSchema,
    pub crm: &'a CrmTarget,
}

impl<'a> GenerationInput<'a> {
    pub fn new(source: &'a SourceSample, target: &'a TargetSchema, crm: &'a CrmTarget) -> Self {
        Self {
            source,
            target,
            crm,
        }
    }
}

/// Ask the service for mapping rules and validate them against both samples.
pub async fn generate_rules<S>(
    service: &S,
    input: &GenerationInput<'_>,
) -> Result<MappingDocument, WizardError>
where
    S: CompletionService + ?Sized,
{
    let span = info_span!(
        "generate_rules",
        provider = service.provider_name(),
        model = service.model_name(),
        crm = %input.crm,
    );

    let request = build_request(input.source, input.target, input.crm);
    span.in_scope(|| debug!(request = redact_value(&request), "generation request"));
    let raw = service.submit(&request).instrument(span.clone()).await?;

    let _guard = span.enter();
    debug!(response = redact_value(&raw), "service response");
    let fields = input.source.field_names();
    let ctx = ValidationContext::new()
        .with_source_fields(&fields)
        .with_target_columns(input.target.columns());
    let doc = parse_response_with(&raw, &ctx)?;
    info!(
        rules = doc.column_mappings.len(),
        review_required = doc.summary.review_required.len(),
        "mapping rules generated"
    );
    Ok(doc)
}

/// Apply a finished document to `source` and return the transformed rows.
///
/// The document must validate cleanly first.
pub async fn execute_transformation<S>(
    service: &S,
    doc: &MappingDocument,
    source: &SourceSample,
) -> Result<Vec<RowRecord>, WizardError>
where
    S: CompletionService + ?Sized,
{
    let report = validate_document(doc);
    if report.has_errors() {
        let issues = report.errors().cloned().collect();
        return Err(WizardError::InvalidDocument { issues });
    }

    let span = info_span!(
        "execute_transformation",
        provider = service.provider_name(),
        rules = doc.column_mappings.len(),
        records = source.records().len(),
    );
    let request = build_transform_request(doc, source);
    span.in_scope(|| debug!(request = redact_value(&request), "transformation request"));
    let raw = service.submit(&request).instrument(span.clone()).await?;

    let _guard = span.enter();
    debug!(response = redact_value(&raw), "service response");
    let rows = parse_transform_response(&raw, doc)?;
    info!(rows = rows.len(), "transformation finished");
    Ok(rows)
}

/// Run the transformation on the first [`DEFAULT_PREVIEW_ROWS`] records.
pub async fn preview_transformation<S>(
    service: &S,
    doc: &MappingDocument,
    source: &SourceSample,
) -> Result<Vec<RowRecord>, WizardError>
where
    S: CompletionService + ?Sized,
{
    execute_transformation(service, doc, &source.head(DEFAULT_PREVIEW_ROWS)).await
}
