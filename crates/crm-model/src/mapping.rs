//! Column mapping rules and the mapping-set document.
//!
//! The JSON shape mirrors what the rule generator is asked to return: a
//! `columnMappings` array of snake_case rule objects plus a declared
//! `summary` block that must agree with the rules.

use serde::{Deserialize, Serialize};

use crate::enums::{Confidence, RuleType};
use crate::summary::recompute_summary;

/// One target-column transformation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Position of the rule, contiguous from 1.
    pub rule_number: u32,
    /// Destination CRM column receiving the value.
    pub target_column: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Source fields read by the rule, in order.
    #[serde(default)]
    pub source_fields: Vec<String>,
    /// Concrete description of the transformation.
    pub transformation_logic: String,
    pub confidence: Confidence,
    /// Rule needs human review before production use.
    pub needs_attention: bool,
    #[serde(default)]
    pub notes: String,
}

impl ColumnMapping {
    /// Operator-facing label for the sources ("a", or "a + b").
    pub fn source_label(&self) -> String {
        self.source_fields.join(" + ")
    }
}

/// Count of rules per [`RuleType`].
///
/// Every type key is required and unknown keys are rejected, so a summary
/// using another vocabulary fails to parse instead of counting as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesByType {
    #[serde(rename = "Copy")]
    pub copy: usize,
    #[serde(rename = "Reformat")]
    pub reformat: usize,
    #[serde(rename = "Concatenate")]
    pub concatenate: usize,
    #[serde(rename = "Extract")]
    pub extract: usize,
    #[serde(rename = "Static")]
    pub static_value: usize,
    #[serde(rename = "Blank")]
    pub blank: usize,
}

impl RulesByType {
    pub fn get(&self, rule_type: RuleType) -> usize {
        *self.slot(rule_type)
    }

    pub fn increment(&mut self, rule_type: RuleType) {
        *self.slot_mut(rule_type) += 1;
    }

    pub fn decrement(&mut self, rule_type: RuleType) {
        let slot = self.slot_mut(rule_type);
        *slot = slot.saturating_sub(1);
    }

    pub fn total(&self) -> usize {
        RuleType::ALL.iter().map(|t| self.get(*t)).sum()
    }

    fn slot(&self, rule_type: RuleType) -> &usize {
        match rule_type {
            RuleType::Copy => &self.copy,
            RuleType::Reformat => &self.reformat,
            RuleType::Concatenate => &self.concatenate,
            RuleType::Extract => &self.extract,
            RuleType::Static => &self.static_value,
            RuleType::Blank => &self.blank,
        }
    }

    fn slot_mut(&mut self, rule_type: RuleType) -> &mut usize {
        match rule_type {
            RuleType::Copy => &mut self.copy,
            RuleType::Reformat => &mut self.reformat,
            RuleType::Concatenate => &mut self.concatenate,
            RuleType::Extract => &mut self.extract,
            RuleType::Static => &mut self.static_value,
            RuleType::Blank => &mut self.blank,
        }
    }
}

/// Confidence counts plus the number of flagged rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceBreakdown {
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub needs_attention_count: usize,
}

impl ConfidenceBreakdown {
    pub fn get(&self, confidence: Confidence) -> usize {
        match confidence {
            Confidence::High => self.high_confidence,
            Confidence::Medium => self.medium_confidence,
            Confidence::Low => self.low_confidence,
        }
    }

    pub fn increment(&mut self, confidence: Confidence) {
        *self.slot_mut(confidence) += 1;
    }

    pub fn decrement(&mut self, confidence: Confidence) {
        let slot = self.slot_mut(confidence);
        *slot = slot.saturating_sub(1);
    }

    /// Sum of the three confidence buckets.
    pub fn confidence_total(&self) -> usize {
        self.high_confidence + self.medium_confidence + self.low_confidence
    }

    fn slot_mut(&mut self, confidence: Confidence) -> &mut usize {
        match confidence {
            Confidence::High => &mut self.high_confidence,
            Confidence::Medium => &mut self.medium_confidence,
            Confidence::Low => &mut self.low_confidence,
        }
    }
}

/// Declared aggregate over the rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub total_target_columns: usize,
    pub total_rules_generated: usize,
    #[serde(default)]
    pub target_crm: String,
    pub rules_by_type: RulesByType,
    pub confidence_breakdown: ConfidenceBreakdown,
    /// Rule numbers flagged for review, ascending.
    pub review_required: Vec<u32>,
}

/// Full mapping-set document as exchanged with the rule generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(rename = "columnMappings")]
    pub column_mappings: Vec<ColumnMapping>,
    pub summary: MappingSummary,
}

impl MappingDocument {
    /// Build a document whose summary is derived from `column_mappings`.
    pub fn new(column_mappings: Vec<ColumnMapping>, target_crm: impl Into<String>) -> Self {
        let summary = recompute_summary(&column_mappings, target_crm);
        Self {
            column_mappings,
            summary,
        }
    }

    /// Rule with the given number, if any.
    pub fn rule(&self, rule_number: u32) -> Option<&ColumnMapping> {
        self.column_mappings
            .iter()
            .find(|m| m.rule_number == rule_number)
    }

    /// Rule for the given target column, if any.
    pub fn rule_for_target(&self, target_column: &str) -> Option<&ColumnMapping> {
        self.column_mappings
            .iter()
            .find(|m| m.target_column == target_column)
    }

    /// Rules in canonical `rule_number` order.
    pub fn ordered_rules(&self) -> Vec<&ColumnMapping> {
        let mut rules: Vec<&ColumnMapping> = self.column_mappings.iter().collect();
        rules.sort_by_key(|m| m.rule_number);
        rules
    }

    /// Target column names in canonical rule order.
    pub fn target_columns(&self) -> Vec<&str> {
        self.ordered_rules()
            .into_iter()
            .map(|m| m.target_column.as_str())
            .collect()
    }

    /// Replace the declared summary with one derived from the rules.
    #[must_use]
    pub fn with_recomputed_summary(mut self) -> Self {
        self.summary = recompute_summary(&self.column_mappings, self.summary.target_crm.clone());
        self
    }
}
