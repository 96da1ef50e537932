//! Reading samples and mapping documents, writing documents and rows.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use crm_model::{MappingDocument, RowRecord, SourceSample, TargetSchema, ordered_values};
use tracing::debug;

/// Read the source export sample (JSON array of flat records).
pub fn read_source(path: &Path) -> Result<SourceSample> {
    let text = read_text(path)?;
    let sample = SourceSample::parse(&text)
        .with_context(|| format!("parse source sample {}", path.display()))?;
    debug!(
        path = %path.display(),
        records = sample.records().len(),
        fields = sample.field_names().len(),
        "source sample loaded"
    );
    Ok(sample)
}

/// Read the target import sample (CSV header plus example rows).
pub fn read_target(path: &Path) -> Result<TargetSchema> {
    let text = read_text(path)?;
    let schema = TargetSchema::parse(&text)
        .with_context(|| format!("parse target sample {}", path.display()))?;
    debug!(path = %path.display(), columns = schema.columns().len(), "target sample loaded");
    Ok(schema)
}

/// Read a saved mapping document.
///
/// Only the shape is checked here; invariants are left to the caller.
pub fn read_document(path: &Path) -> Result<MappingDocument> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("parse mapping document {}", path.display()))
}

/// Save a mapping document as pretty-printed JSON.
pub fn write_document(path: &Path, doc: &MappingDocument) -> Result<()> {
    let mut json = serde_json::to_string_pretty(doc).context("serialize mapping document")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), rules = doc.column_mappings.len(), "mapping document saved");
    Ok(())
}

/// Write transformed rows as CSV with the document's target columns as header.
pub fn write_rows<W: Write>(writer: W, doc: &MappingDocument, rows: &[RowRecord]) -> Result<()> {
    let columns = doc.target_columns();
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&columns).context("write CSV header")?;
    for row in rows {
        out.write_record(ordered_values(row, &columns))
            .context("write CSV row")?;
    }
    out.flush().context("flush CSV output")?;
    Ok(())
}

/// Write transformed rows to a CSV file.
pub fn write_rows_file(path: &Path, doc: &MappingDocument, rows: &[RowRecord]) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_rows(file, doc, rows).with_context(|| format!("write {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
