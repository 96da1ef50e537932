//! Source field references must exist in the uploaded source sample.

use std::collections::BTreeSet;

use crm_model::ColumnMapping;

use crate::issue::{Invariant, Issue};

pub fn check(mappings: &[ColumnMapping], known_fields: &BTreeSet<String>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for mapping in mappings {
        let unknown: Vec<&str> = mapping
            .source_fields
            .iter()
            .map(String::as_str)
            .filter(|f| !f.trim().is_empty() && !known_fields.contains(*f))
            .collect();
        if !unknown.is_empty() {
            issues.push(Issue::error(
                Invariant::SourceReference,
                vec![mapping.rule_number],
                format!(
                    "rule for '{}' reads unknown source field(s): {}",
                    mapping.target_column,
                    unknown.join(", ")
                ),
            ));
        }
    }
    issues
}
