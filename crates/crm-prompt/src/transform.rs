//! Transformation execution request and response handling.
//!
//! The finalized rules and the source data go out as one instruction text;
//! the answer comes back as CSV (or, tolerated, a JSON array of flat
//! objects) whose columns are exactly the document's target columns.

use std::collections::BTreeSet;

use crm_model::{MappingDocument, RowRecord, SourceSample};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ResponseError, Result};
use crate::fence::strip_fence;

/// Source records sent for a before/after preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 3;

/// Build the request applying `doc` to `source`.
pub fn build_transform_request(doc: &MappingDocument, source: &SourceSample) -> String {
    let rules = doc.ordered_rules();
    // Plain derived structs always serialize.
    let rules_json = serde_json::to_string_pretty(&rules).unwrap_or_default();
    let columns: Vec<&str> = doc.target_columns();

    let mut out = String::with_capacity(rules_json.len() + source.raw().len() + 1024);
    out.push_str(
        "Using the following rules, generate a CSV file with the specified columns and transformations.\n",
    );
    out.push_str(&rules_json);
    out.push_str("\n\nThe final output should be a CSV file with the following columns, in this order:\n");
    for column in &columns {
        out.push_str("  - ");
        out.push_str(column);
        out.push('\n');
    }
    out.push_str(
        "Each column should be populated according to the rules defined, applying any necessary \
         transformations or combinations as specified. Static rules write the same value on every \
         row and Blank rules leave the column empty.\n",
    );
    out.push_str("\nHere is the source data in JSON format:\n");
    out.push_str(source.raw());
    out.push_str(
        "\n\nReturn only the CSV content: a header row followed by one row per source record. \
         Do not include explanations or markdown code fences.\n",
    );

    debug!(
        rules = rules.len(),
        source_records = source.records().len(),
        request_len = out.len(),
        "built transformation request"
    );
    out
}

/// Parse transformed rows. Every row has exactly the document's target
/// columns.
pub fn parse_transform_response(raw: &str, doc: &MappingDocument) -> Result<Vec<RowRecord>> {
    let body = strip_fence(raw)?;
    if body.is_empty() {
        return Err(ResponseError::malformed("empty transformation response", raw));
    }
    let expected: BTreeSet<&str> = doc.target_columns().into_iter().collect();

    let rows = if body.starts_with('[') {
        parse_json_rows(body, raw, &expected)?
    } else {
        parse_csv_rows(body, raw, &expected)?
    };

    info!(rows = rows.len(), columns = expected.len(), "parsed transformed rows");
    Ok(rows)
}

fn parse_csv_rows(body: &str, raw: &str, expected: &BTreeSet<&str>) -> Result<Vec<RowRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ResponseError::malformed(format!("unreadable CSV header: {e}"), raw))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_columns(headers.iter().map(String::as_str), raw, expected)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            ResponseError::malformed(format!("unreadable CSV row {}: {e}", index + 1), raw)
        })?;
        let row: RowRecord = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn parse_json_rows(body: &str, raw: &str, expected: &BTreeSet<&str>) -> Result<Vec<RowRecord>> {
    let items: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| ResponseError::malformed(format!("not a JSON array of rows: {e}"), raw))?;

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(ResponseError::malformed(
                format!("row {} is not an object", index + 1),
                raw,
            ));
        };
        check_columns(map.keys().map(String::as_str), raw, expected)?;
        let row: RowRecord = map
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::Null => String::new(),
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn check_columns<'a>(
    found: impl Iterator<Item = &'a str>,
    raw: &str,
    expected: &BTreeSet<&str>,
) -> Result<()> {
    let mut seen = BTreeSet::new();
    for column in found {
        if !seen.insert(column) {
            return Err(ResponseError::malformed(
                format!("column '{column}' appears more than once"),
                raw,
            ));
        }
    }
    if seen != *expected {
        let missing: Vec<&str> = expected.difference(&seen).copied().collect();
        let extra: Vec<&str> = seen.difference(expected).copied().collect();
        return Err(ResponseError::malformed(
            format!(
                "columns do not match the mapping (missing: [{}], unexpected: [{}])",
                missing.join(", "),
                extra.join(", ")
            ),
            raw,
        ));
    }
    Ok(())
}
