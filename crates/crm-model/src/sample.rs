//! Source and target samples uploaded by the operator.
//!
//! Both samples keep their original text so they can be embedded verbatim
//! in generation requests.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::SampleError;

/// Sample of the originating donation export (JSON records).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSample {
    raw: String,
    records: Vec<Map<String, Value>>,
}

impl SourceSample {
    /// Parse a JSON array of objects, or a single object.
    pub fn parse(text: &str) -> Result<Self, SampleError> {
        let value: Value = serde_json::from_str(text)?;
        let records = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(map) => Ok(map),
                    _ => Err(SampleError::NotARecord { index }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(map) => vec![map],
            _ => return Err(SampleError::NotARecord { index: 0 }),
        };
        if records.is_empty() {
            return Err(SampleError::Empty);
        }
        Ok(Self {
            raw: text.trim().to_string(),
            records,
        })
    }

    /// Build a sample from already-parsed records.
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let raw = Value::Array(records.iter().cloned().map(Value::Object).collect()).to_string();
        Self { raw, records }
    }

    /// Original text, trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn records(&self) -> &[Map<String, Value>] {
        &self.records
    }

    /// Union of keys across all records.
    pub fn field_names(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect()
    }

    /// First `limit` records as a new sample.
    pub fn head(&self, limit: usize) -> SourceSample {
        if limit >= self.records.len() {
            return self.clone();
        }
        Self::from_records(self.records[..limit].to_vec())
    }

    /// Record values rendered as display strings, keyed by field name.
    pub fn display_value(record: &Map<String, Value>, field: &str) -> String {
        match record.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Sample of the CRM import format (CSV with a header row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSchema {
    raw: String,
    columns: Vec<String>,
}

impl TargetSchema {
    /// Parse the header row of a CSV sample.
    pub fn parse(text: &str) -> Result<Self, SampleError> {
        let text = text.trim_start_matches('\u{feff}');
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if columns.iter().all(String::is_empty) {
            return Err(SampleError::EmptyHeader);
        }
        let mut seen = BTreeSet::new();
        for column in &columns {
            if column.is_empty() {
                return Err(SampleError::EmptyHeader);
            }
            if !seen.insert(column.as_str()) {
                return Err(SampleError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self {
            raw: text.trim().to_string(),
            columns,
        })
    }

    /// Build a schema from a bare column list.
    pub fn from_columns(columns: Vec<String>) -> Self {
        Self {
            raw: columns.join(","),
            columns,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Header columns in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_set(&self) -> BTreeSet<String> {
        self.columns.iter().cloned().collect()
    }
}
