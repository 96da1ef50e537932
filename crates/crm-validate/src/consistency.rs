//! Summary consistency across rule edits.
//!
//! [`stats`] derives the aggregate view of a document. [`diff_after_edit`]
//! describes how one rule edit moves the summary buckets, so a caller can
//! keep an incremental summary without recounting every rule.

use std::collections::BTreeMap;
use std::fmt;

use crm_model::{ColumnMapping, Confidence, MappingDocument, MappingSummary, RuleType};
use serde::Serialize;

/// Aggregate counts for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingStats {
    /// Rule count per type, every type present.
    pub by_type: BTreeMap<RuleType, usize>,
    /// Rule count per confidence level, every level present.
    pub by_confidence: BTreeMap<Confidence, usize>,
    /// Flagged rule numbers, ascending.
    pub attention_list: Vec<u32>,
}

impl MappingStats {
    pub fn total(&self) -> usize {
        self.by_type.values().sum()
    }
}

pub fn stats(doc: &MappingDocument) -> MappingStats {
    let mut by_type: BTreeMap<RuleType, usize> = RuleType::ALL.iter().map(|t| (*t, 0)).collect();
    let mut by_confidence: BTreeMap<Confidence, usize> =
        Confidence::ALL.iter().map(|c| (*c, 0)).collect();
    let mut attention_list = Vec::new();

    for mapping in &doc.column_mappings {
        *by_type.entry(mapping.rule_type).or_default() += 1;
        *by_confidence.entry(mapping.confidence).or_default() += 1;
        if mapping.needs_attention {
            attention_list.push(mapping.rule_number);
        }
    }
    attention_list.sort_unstable();

    MappingStats {
        by_type,
        by_confidence,
        attention_list,
    }
}

/// A summary counter touched by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bucket {
    Type(RuleType),
    Confidence(Confidence),
    NeedsAttention,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Type(rule_type) => write!(f, "rules_by_type.{rule_type}"),
            Bucket::Confidence(confidence) => {
                write!(f, "{}_confidence", confidence.as_str().to_lowercase())
            }
            Bucket::NeedsAttention => write!(f, "needs_attention_count"),
        }
    }
}

/// Summary changes caused by replacing one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditImpact {
    pub decremented: Vec<Bucket>,
    pub incremented: Vec<Bucket>,
    pub review_removed: Option<u32>,
    pub review_added: Option<u32>,
}

impl EditImpact {
    /// True when the edit leaves every counter and the review list alone.
    pub fn is_empty(&self) -> bool {
        self.decremented.is_empty()
            && self.incremented.is_empty()
            && self.review_removed.is_none()
            && self.review_added.is_none()
    }

    /// Update `summary` in place. Applied to a summary that matched the
    /// document before the edit, the result matches it after.
    pub fn apply(&self, summary: &mut MappingSummary) {
        for bucket in &self.decremented {
            match bucket {
                Bucket::Type(rule_type) => summary.rules_by_type.decrement(*rule_type),
                Bucket::Confidence(confidence) => {
                    summary.confidence_breakdown.decrement(*confidence);
                }
                Bucket::NeedsAttention => {
                    let count = &mut summary.confidence_breakdown.needs_attention_count;
                    *count = count.saturating_sub(1);
                }
            }
        }
        for bucket in &self.incremented {
            match bucket {
                Bucket::Type(rule_type) => summary.rules_by_type.increment(*rule_type),
                Bucket::Confidence(confidence) => {
                    summary.confidence_breakdown.increment(*confidence);
                }
                Bucket::NeedsAttention => summary.confidence_breakdown.needs_attention_count += 1,
            }
        }
        if let Some(number) = self.review_removed {
            summary.review_required.retain(|n| *n != number);
        }
        if let Some(number) = self.review_added
            && let Err(position) = summary.review_required.binary_search(&number)
        {
            summary.review_required.insert(position, number);
        }
    }
}

/// Describe how replacing `before` with `after` moves the summary.
pub fn diff_after_edit(before: &ColumnMapping, after: &ColumnMapping) -> EditImpact {
    let mut impact = EditImpact::default();

    if before.rule_type != after.rule_type {
        impact.decremented.push(Bucket::Type(before.rule_type));
        impact.incremented.push(Bucket::Type(after.rule_type));
    }
    if before.confidence != after.confidence {
        impact.decremented.push(Bucket::Confidence(before.confidence));
        impact.incremented.push(Bucket::Confidence(after.confidence));
    }
    match (before.needs_attention, after.needs_attention) {
        (true, false) => impact.decremented.push(Bucket::NeedsAttention),
        (false, true) => impact.incremented.push(Bucket::NeedsAttention),
        _ => {}
    }

    let renumbered = before.rule_number != after.rule_number;
    if before.needs_attention && (!after.needs_attention || renumbered) {
        impact.review_removed = Some(before.rule_number);
    }
    if after.needs_attention && (!before.needs_attention || renumbered) {
        impact.review_added = Some(after.rule_number);
    }

    impact
}
