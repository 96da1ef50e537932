//! Rule numbering checks.
//!
//! Rule numbers must be unique and run 1..N, where N is the rule count.

use std::collections::BTreeMap;

use crm_model::ColumnMapping;

use super::join_numbers;
use crate::issue::{Invariant, Issue};

pub fn check(mappings: &[ColumnMapping]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for mapping in mappings {
        *counts.entry(mapping.rule_number).or_default() += 1;
    }

    let duplicates: Vec<u32> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(number, _)| *number)
        .collect();
    if !duplicates.is_empty() {
        issues.push(Issue::error(
            Invariant::RuleNumberUnique,
            duplicates.clone(),
            format!("duplicate rule numbers: {}", join_numbers(&duplicates)),
        ));
    }

    let n = u32::try_from(mappings.len()).unwrap_or(u32::MAX);
    let out_of_range: Vec<u32> = counts
        .keys()
        .copied()
        .filter(|number| *number == 0 || *number > n)
        .collect();
    let missing: Vec<u32> = (1..=n).filter(|number| !counts.contains_key(number)).collect();

    if !out_of_range.is_empty() {
        issues.push(Issue::error(
            Invariant::RuleNumberContiguous,
            out_of_range.clone(),
            format!(
                "rule numbers outside 1..{n}: {}",
                join_numbers(&out_of_range)
            ),
        ));
    }
    if !missing.is_empty() {
        issues.push(Issue::error(
            Invariant::RuleNumberContiguous,
            missing.clone(),
            format!("rule numbers missing from 1..{n}: {}", join_numbers(&missing)),
        ));
    }

    issues
}
