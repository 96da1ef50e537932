//! Per-rule shape checks: source arity, logic text and static values.

use crm_model::{ColumnMapping, RuleType, static_value};

use crate::issue::{Invariant, Issue};

pub fn check(mappings: &[ColumnMapping]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for mapping in mappings {
        check_arity(mapping, &mut issues);
        check_logic(mapping, &mut issues);
    }
    issues
}

fn check_arity(mapping: &ColumnMapping, issues: &mut Vec<Issue>) {
    let count = mapping.source_fields.len();
    if !mapping.rule_type.accepts_source_count(count) {
        let expected = match mapping.rule_type.source_arity() {
            (0, Some(0)) => "no source fields",
            (1, Some(1)) => "exactly one source field",
            _ => "at least one source field",
        };
        issues.push(Issue::error(
            Invariant::SourceFieldArity,
            vec![mapping.rule_number],
            format!(
                "{} rule for '{}' takes {expected}, found {count}",
                mapping.rule_type, mapping.target_column
            ),
        ));
    }
    if mapping.source_fields.iter().any(|f| f.trim().is_empty()) {
        issues.push(Issue::error(
            Invariant::SourceFieldArity,
            vec![mapping.rule_number],
            format!("rule for '{}' names a blank source field", mapping.target_column),
        ));
    }
}

fn check_logic(mapping: &ColumnMapping, issues: &mut Vec<Issue>) {
    let logic_empty = mapping.transformation_logic.trim().is_empty();

    if mapping.rule_type == RuleType::Static {
        let value_empty = logic_empty || static_value(mapping).is_some_and(|v| v.trim().is_empty());
        if value_empty {
            issues.push(Issue::warning(
                Invariant::StaticValue,
                vec![mapping.rule_number],
                format!("static rule for '{}' has an empty value", mapping.target_column),
            ));
        }
        return;
    }

    if !logic_empty {
        return;
    }
    let message = format!(
        "{} rule for '{}' has no transformation logic",
        mapping.rule_type, mapping.target_column
    );
    if mapping.rule_type.is_trivial() {
        issues.push(Issue::warning(
            Invariant::TransformationLogic,
            vec![mapping.rule_number],
            message,
        ));
    } else {
        issues.push(Issue::error(
            Invariant::TransformationLogic,
            vec![mapping.rule_number],
            message,
        ));
    }
}
