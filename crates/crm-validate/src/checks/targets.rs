//! Target column checks.

use std::collections::{BTreeMap, BTreeSet};

use crm_model::ColumnMapping;

use crate::issue::{Invariant, Issue};

/// Target columns must be non-empty and unique.
pub fn check(mappings: &[ColumnMapping]) -> Vec<Issue> {
    let mut issues = Vec::new();

    let empty: Vec<u32> = mappings
        .iter()
        .filter(|m| m.target_column.trim().is_empty())
        .map(|m| m.rule_number)
        .collect();
    if !empty.is_empty() {
        issues.push(Issue::error(
            Invariant::TargetColumnNonEmpty,
            empty,
            "rule has an empty target column",
        ));
    }

    let mut by_target: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for mapping in mappings {
        if mapping.target_column.trim().is_empty() {
            continue;
        }
        by_target
            .entry(mapping.target_column.as_str())
            .or_default()
            .push(mapping.rule_number);
    }
    for (target, numbers) in by_target {
        if numbers.len() > 1 {
            issues.push(Issue::error(
                Invariant::TargetColumnUnique,
                numbers,
                format!("target column '{target}' is mapped more than once"),
            ));
        }
    }

    issues
}

/// Every declared target column has a rule, and no rule targets a column
/// outside the declared header.
pub fn check_coverage(mappings: &[ColumnMapping], declared: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let declared_set: BTreeSet<&str> = declared.iter().map(String::as_str).collect();
    let mapped: BTreeSet<&str> = mappings.iter().map(|m| m.target_column.as_str()).collect();

    let uncovered: Vec<&str> = declared
        .iter()
        .map(String::as_str)
        .filter(|column| !mapped.contains(column))
        .collect();
    if !uncovered.is_empty() {
        issues.push(Issue::error(
            Invariant::TargetCoverage,
            vec![],
            format!("target columns without a rule: {}", uncovered.join(", ")),
        ));
    }

    let undeclared: Vec<&ColumnMapping> = mappings
        .iter()
        .filter(|m| !m.target_column.trim().is_empty())
        .filter(|m| !declared_set.contains(m.target_column.as_str()))
        .collect();
    if !undeclared.is_empty() {
        let names: Vec<&str> = undeclared.iter().map(|m| m.target_column.as_str()).collect();
        issues.push(Issue::error(
            Invariant::TargetCoverage,
            undeclared.iter().map(|m| m.rule_number).collect(),
            format!(
                "rules target columns missing from the target sample: {}",
                names.join(", ")
            ),
        ));
    }

    issues
}
