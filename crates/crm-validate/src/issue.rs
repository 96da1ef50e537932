//! Validation issue types.
//!
//! Every issue names the invariant it breaks and the rule numbers involved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Invariant a mapping document must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invariant {
    /// Rule numbers are positive and unique.
    RuleNumberUnique,
    /// Rule numbers run 1..N without gaps.
    RuleNumberContiguous,
    /// Target columns are non-empty.
    TargetColumnNonEmpty,
    /// One rule per target column.
    TargetColumnUnique,
    /// Every declared target column has a rule and no rule targets an
    /// undeclared column.
    TargetCoverage,
    /// `total_target_columns == total_rules_generated == |columnMappings|`.
    SummaryTotals,
    /// `rules_by_type` matches the rule list.
    RulesByType,
    /// Confidence buckets match the rule list.
    ConfidenceBreakdown,
    /// `needs_attention_count` matches the flagged rules.
    NeedsAttentionCount,
    /// `review_required` is exactly the sorted flagged rule numbers.
    ReviewRequired,
    /// Static and Blank rules are flagged for review.
    SourcelessAttention,
    /// Source field count fits the rule type.
    SourceFieldArity,
    /// Source fields exist in the source sample.
    SourceReference,
    /// Transformation logic is present.
    TransformationLogic,
    /// Static rules carry a value.
    StaticValue,
}

impl Invariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Invariant::RuleNumberUnique => "rule_number_unique",
            Invariant::RuleNumberContiguous => "rule_number_contiguous",
            Invariant::TargetColumnNonEmpty => "target_column_non_empty",
            Invariant::TargetColumnUnique => "target_column_unique",
            Invariant::TargetCoverage => "target_coverage",
            Invariant::SummaryTotals => "summary_totals",
            Invariant::RulesByType => "rules_by_type",
            Invariant::ConfidenceBreakdown => "confidence_breakdown",
            Invariant::NeedsAttentionCount => "needs_attention_count",
            Invariant::ReviewRequired => "review_required",
            Invariant::SourcelessAttention => "sourceless_attention",
            Invariant::SourceFieldArity => "source_field_arity",
            Invariant::SourceReference => "source_reference",
            Invariant::TransformationLogic => "transformation_logic",
            Invariant::StaticValue => "static_value",
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the document.
    Error,
    /// Should be reviewed; never blocks.
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub invariant: Invariant,
    pub severity: Severity,
    /// Offending rule numbers, ascending.
    pub rule_numbers: Vec<u32>,
    pub message: String,
}

impl Issue {
    pub fn error(invariant: Invariant, rule_numbers: Vec<u32>, message: impl Into<String>) -> Self {
        Self::new(invariant, Severity::Error, rule_numbers, message)
    }

    pub fn warning(
        invariant: Invariant,
        rule_numbers: Vec<u32>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(invariant, Severity::Warning, rule_numbers, message)
    }

    fn new(
        invariant: Invariant,
        severity: Severity,
        mut rule_numbers: Vec<u32>,
        message: impl Into<String>,
    ) -> Self {
        rule_numbers.sort_unstable();
        rule_numbers.dedup();
        Self {
            invariant,
            severity,
            rule_numbers,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)?;
        if !self.rule_numbers.is_empty() {
            let numbers: Vec<String> = self.rule_numbers.iter().map(u32::to_string).collect();
            write!(f, " (rules {})", numbers.join(", "))?;
        }
        Ok(())
    }
}

/// Outcome of validating one mapping document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// True when no issue blocks the document.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    /// Issues for one invariant.
    pub fn for_invariant(&self, invariant: Invariant) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.invariant == invariant)
            .collect()
    }

    /// Split into the blocking issues, or the warnings when valid.
    pub fn into_result(self) -> Result<Vec<Issue>, Vec<Issue>> {
        if self.has_errors() {
            Err(self.issues.into_iter().filter(Issue::is_error).collect())
        } else {
            Ok(self.issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_and_result() {
        let report = ValidationReport {
            issues: vec![
                Issue::error(Invariant::RulesByType, vec![3, 1, 3], "mismatch"),
                Issue::warning(Invariant::StaticValue, vec![5], "empty static value"),
            ],
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.is_valid());
        assert_eq!(report.issues[0].rule_numbers, vec![1, 3]);
        assert_eq!(
            report.issues[0].to_string(),
            "[rules_by_type] mismatch (rules 1, 3)"
        );

        let errors = report.into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].invariant, Invariant::RulesByType);
    }

    #[test]
    fn warnings_only_report_is_valid() {
        let report = ValidationReport {
            issues: vec![Issue::warning(Invariant::TransformationLogic, vec![2], "empty")],
        };
        assert!(report.is_valid());
        assert_eq!(report.into_result().unwrap().len(), 1);
    }
}
