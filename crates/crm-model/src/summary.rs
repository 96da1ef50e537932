//! Derived summary computation.

use crate::mapping::{ColumnMapping, ConfidenceBreakdown, MappingSummary, RulesByType};

/// Derive the summary block from a rule list.
///
/// This is the authoritative computation: it is used both to check an
/// incoming document and to regenerate `summary` after local edits.
pub fn recompute_summary(mappings: &[ColumnMapping], target_crm: impl Into<String>) -> MappingSummary {
    let mut rules_by_type = RulesByType::default();
    let mut confidence_breakdown = ConfidenceBreakdown::default();
    let mut review_required = Vec::new();

    for mapping in mappings {
        rules_by_type.increment(mapping.rule_type);
        confidence_breakdown.increment(mapping.confidence);
        if mapping.needs_attention {
            confidence_breakdown.needs_attention_count += 1;
            review_required.push(mapping.rule_number);
        }
    }
    review_required.sort_unstable();

    MappingSummary {
        total_target_columns: mappings.len(),
        total_rules_generated: mappings.len(),
        target_crm: target_crm.into(),
        rules_by_type,
        confidence_breakdown,
        review_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{Confidence, RuleType};

    fn rule(n: u32, rule_type: RuleType, confidence: Confidence, flag: bool) -> ColumnMapping {
        ColumnMapping {
            rule_number: n,
            target_column: format!("Col{n}"),
            rule_type,
            source_fields: vec![],
            transformation_logic: String::new(),
            confidence,
            needs_attention: flag,
            notes: String::new(),
        }
    }

    #[test]
    fn counts_types_confidence_and_attention() {
        let mappings = vec![
            rule(3, RuleType::Static, Confidence::Low, true),
            rule(1, RuleType::Copy, Confidence::High, false),
            rule(2, RuleType::Copy, Confidence::Medium, true),
        ];
        let summary = recompute_summary(&mappings, "Admire");

        assert_eq!(summary.total_target_columns, 3);
        assert_eq!(summary.total_rules_generated, 3);
        assert_eq!(summary.target_crm, "Admire");
        assert_eq!(summary.rules_by_type.copy, 2);
        assert_eq!(summary.rules_by_type.static_value, 1);
        assert_eq!(summary.rules_by_type.total(), 3);
        assert_eq!(summary.confidence_breakdown.high_confidence, 1);
        assert_eq!(summary.confidence_breakdown.medium_confidence, 1);
        assert_eq!(summary.confidence_breakdown.low_confidence, 1);
        assert_eq!(summary.confidence_breakdown.needs_attention_count, 2);
        assert_eq!(summary.review_required, vec![2, 3]);
    }

    #[test]
    fn empty_list_yields_zero_summary() {
        let summary = recompute_summary(&[], "");
        assert_eq!(summary.total_target_columns, 0);
        assert!(summary.review_required.is_empty());
        assert_eq!(summary.confidence_breakdown.confidence_total(), 0);
    }
}
