//! Static and Blank rules carry no source data and must stay flagged.

use crm_model::ColumnMapping;

use crate::issue::{Invariant, Issue};

pub fn check(mappings: &[ColumnMapping]) -> Vec<Issue> {
    mappings
        .iter()
        .filter(|m| m.rule_type.is_sourceless() && !m.needs_attention)
        .map(|m| {
            Issue::error(
                Invariant::SourcelessAttention,
                vec![m.rule_number],
                format!(
                    "{} rule for '{}' must be flagged for review",
                    m.rule_type, m.target_column
                ),
            )
        })
        .collect()
}
