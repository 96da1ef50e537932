//! Declared summary checks.
//!
//! The declared summary is compared bucket by bucket against what the rule
//! list actually contains.

use crm_model::{ColumnMapping, Confidence, MappingSummary, RuleType, recompute_summary};

use super::join_numbers;
use crate::issue::{Invariant, Issue};

pub fn check(mappings: &[ColumnMapping], declared: &MappingSummary) -> Vec<Issue> {
    let actual = recompute_summary(mappings, declared.target_crm.clone());
    let mut issues = Vec::new();

    check_totals(mappings.len(), declared, &mut issues);

    for rule_type in RuleType::ALL {
        let expected = actual.rules_by_type.get(rule_type);
        let found = declared.rules_by_type.get(rule_type);
        if expected != found {
            issues.push(Issue::error(
                Invariant::RulesByType,
                numbers_where(mappings, |m| m.rule_type == rule_type),
                format!(
                    "rules_by_type.{rule_type} declares {found} but {expected} rule(s) have type {rule_type}"
                ),
            ));
        }
    }

    for confidence in Confidence::ALL {
        let expected = actual.confidence_breakdown.get(confidence);
        let found = declared.confidence_breakdown.get(confidence);
        if expected != found {
            issues.push(Issue::error(
                Invariant::ConfidenceBreakdown,
                numbers_where(mappings, |m| m.confidence == confidence),
                format!(
                    "{} confidence declares {found} but {expected} rule(s) are {confidence}",
                    confidence.as_str().to_lowercase()
                ),
            ));
        }
    }

    let flagged = actual.review_required;
    let declared_count = declared.confidence_breakdown.needs_attention_count;
    if declared_count != flagged.len() {
        issues.push(Issue::error(
            Invariant::NeedsAttentionCount,
            flagged.clone(),
            format!(
                "needs_attention_count declares {declared_count} but {} rule(s) are flagged",
                flagged.len()
            ),
        ));
    }

    if declared.review_required != flagged {
        let mut offending: Vec<u32> = flagged
            .iter()
            .filter(|n| !declared.review_required.contains(n))
            .chain(
                declared
                    .review_required
                    .iter()
                    .filter(|n| !flagged.contains(n)),
            )
            .copied()
            .collect();
        let message = if offending.is_empty() {
            offending = declared.review_required.clone();
            "review_required must list flagged rules once each in ascending order".to_string()
        } else {
            format!(
                "review_required is [{}] but flagged rules are [{}]",
                join_numbers(&declared.review_required),
                join_numbers(&flagged)
            )
        };
        issues.push(Issue::error(Invariant::ReviewRequired, offending, message));
    }

    issues
}

fn check_totals(count: usize, declared: &MappingSummary, issues: &mut Vec<Issue>) {
    if declared.total_target_columns != count {
        issues.push(Issue::error(
            Invariant::SummaryTotals,
            vec![],
            format!(
                "total_target_columns declares {} but there are {count} rules",
                declared.total_target_columns
            ),
        ));
    }
    if declared.total_rules_generated != count {
        issues.push(Issue::error(
            Invariant::SummaryTotals,
            vec![],
            format!(
                "total_rules_generated declares {} but there are {count} rules",
                declared.total_rules_generated
            ),
        ));
    }
}

fn numbers_where<F>(mappings: &[ColumnMapping], predicate: F) -> Vec<u32>
where
    F: Fn(&ColumnMapping) -> bool,
{
    mappings
        .iter()
        .filter(|m| predicate(m))
        .map(|m| m.rule_number)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(n: u32, rule_type: RuleType) -> ColumnMapping {
        ColumnMapping {
            rule_number: n,
            target_column: format!("Column {n}"),
            rule_type,
            source_fields: vec![],
            transformation_logic: String::new(),
            confidence: Confidence::Medium,
            needs_attention: rule_type.is_sourceless(),
            notes: String::new(),
        }
    }

    #[test]
    fn consistent_summary_passes() {
        let mappings = vec![rule(1, RuleType::Copy), rule(2, RuleType::Static)];
        let summary = recompute_summary(&mappings, "Virtuous");
        assert!(check(&mappings, &summary).is_empty());
    }

    #[test]
    fn unsorted_review_list_is_rejected() {
        let mappings = vec![rule(1, RuleType::Blank), rule(2, RuleType::Static)];
        let mut summary = recompute_summary(&mappings, "");
        summary.review_required = vec![2, 1];
        let issues = check(&mappings, &summary);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].invariant, Invariant::ReviewRequired);
        assert_eq!(issues[0].rule_numbers, vec![1, 2]);
    }

    #[test]
    fn wrong_totals_and_attention_count() {
        let mappings = vec![rule(1, RuleType::Blank)];
        let mut summary = recompute_summary(&mappings, "");
        summary.total_rules_generated = 2;
        summary.confidence_breakdown.needs_attention_count = 0;
        let issues = check(&mappings, &summary);
        let invariants: Vec<Invariant> = issues.iter().map(|i| i.invariant).collect();
        assert_eq!(
            invariants,
            vec![Invariant::SummaryTotals, Invariant::NeedsAttentionCount]
        );
    }
}
