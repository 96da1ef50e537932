//! Error types for local rule edits.

use thiserror::Error;

use crate::enums::RuleType;

/// An edit would produce a rule violating a type-specific constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditError {
    /// Wrong number of source fields for the chosen rule type.
    #[error("{rule_type} rule needs {expected} source field(s), got {found}")]
    SourceFieldCount {
        rule_type: RuleType,
        expected: &'static str,
        found: usize,
    },

    /// A selected source field is blank.
    #[error("{rule_type} rule has a blank source field")]
    BlankSourceField { rule_type: RuleType },

    /// A selected source field is not present in the source sample.
    #[error("Source field not found: {0}")]
    UnknownSourceField(String),

    /// No rule with this number exists in the document.
    #[error("Rule not found: {0}")]
    RuleNotFound(u32),

    /// Static and Blank rules always need review.
    #[error("Rule {rule_number} is a {rule_type} rule and must stay flagged for review")]
    AttentionRequired {
        rule_number: u32,
        rule_type: RuleType,
    },
}

impl EditError {
    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::SourceFieldCount { rule_type, .. } => Some(match rule_type {
                RuleType::Copy | RuleType::Reformat => "Select exactly one source field.",
                RuleType::Concatenate | RuleType::Extract => "Select at least one source field.",
                RuleType::Static | RuleType::Blank => "Static and Blank rules take no source fields.",
            }),
            Self::BlankSourceField { .. } => Some("Pick a field from the source sample."),
            Self::UnknownSourceField(_) => {
                Some("Check the field name against the uploaded source sample.")
            }
            Self::RuleNotFound(_) => None,
            Self::AttentionRequired { .. } => {
                Some("Change the rule type if the value should come from source data.")
            }
        }
    }
}

/// Result type alias for edit operations.
pub type Result<T> = std::result::Result<T, EditError>;

/// An uploaded sample could not be read.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SampleError {
    /// The source sample is not valid JSON.
    #[error("Source sample is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A source sample item is not a flat record.
    #[error("Source sample item {index} is not an object")]
    NotARecord { index: usize },

    /// The source sample holds no records.
    #[error("Source sample contains no records")]
    Empty,

    /// The target sample could not be read as CSV.
    #[error("Target sample is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The target sample header has a blank column name.
    #[error("Target sample header has a blank column")]
    EmptyHeader,

    /// The target sample header repeats a column.
    #[error("Target sample header repeats column '{0}'")]
    DuplicateColumn(String),
}
