//! Closed enumerations shared by the rule model.
//!
//! These values travel over the wire exactly as spelled here (`"Copy"`,
//! `"High"`, ...), so the serde representation is the variant name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transformation category applied to produce a target column's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleType {
    /// Keep the data exactly the same and map it to the new column name.
    Copy,
    /// Reformat dates, casing, phone numbers or currency to match the CRM.
    Reformat,
    /// Combine multiple fields into one.
    Concatenate,
    /// Map part of one or more fields to the target.
    Extract,
    /// Same hardcoded value for every record.
    Static,
    /// Leave the target column empty.
    Blank,
}

impl RuleType {
    /// All rule types in canonical display order.
    pub const ALL: [RuleType; 6] = [
        RuleType::Copy,
        RuleType::Reformat,
        RuleType::Concatenate,
        RuleType::Extract,
        RuleType::Static,
        RuleType::Blank,
    ];

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Copy => "Copy",
            RuleType::Reformat => "Reformat",
            RuleType::Concatenate => "Concatenate",
            RuleType::Extract => "Extract",
            RuleType::Static => "Static",
            RuleType::Blank => "Blank",
        }
    }

    /// Short operator-facing description of the rule type.
    pub fn description(&self) -> &'static str {
        match self {
            RuleType::Copy => "Keep the data exactly the same and map to new column name",
            RuleType::Reformat => {
                "Reformat data such as date, time, casing, phone number to match CRM requirements"
            }
            RuleType::Concatenate => "Combine multiple fields into one",
            RuleType::Extract => "Map part of one field to a new field",
            RuleType::Static => "Set to static value",
            RuleType::Blank => "Leave this field empty",
        }
    }

    /// Returns true for rule types that never read a source field.
    ///
    /// These rules always need human review.
    pub fn is_sourceless(&self) -> bool {
        matches!(self, RuleType::Static | RuleType::Blank)
    }

    /// Returns the accepted number of source fields as `(min, max)`.
    pub fn source_arity(&self) -> (usize, Option<usize>) {
        match self {
            RuleType::Copy | RuleType::Reformat => (1, Some(1)),
            RuleType::Concatenate | RuleType::Extract => (1, None),
            RuleType::Static | RuleType::Blank => (0, Some(0)),
        }
    }

    /// Returns true if `count` source fields is acceptable for this type.
    pub fn accepts_source_count(&self, count: usize) -> bool {
        let (min, max) = self.source_arity();
        count >= min && max.is_none_or(|max| count <= max)
    }

    /// Returns true if an empty `transformation_logic` is tolerable.
    pub fn is_trivial(&self) -> bool {
        matches!(self, RuleType::Copy | RuleType::Static | RuleType::Blank)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = String;

    /// Parse a rule type (case-insensitive). "Leave Blank" is accepted
    /// because that is how the edit dialog labels it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "COPY" => Ok(RuleType::Copy),
            "REFORMAT" => Ok(RuleType::Reformat),
            "CONCATENATE" => Ok(RuleType::Concatenate),
            "EXTRACT" => Ok(RuleType::Extract),
            "STATIC" => Ok(RuleType::Static),
            "BLANK" | "LEAVE BLANK" => Ok(RuleType::Blank),
            _ => Err(format!("Unknown rule type: {s}")),
        }
    }
}

/// How sure the generator was about a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const ALL: [Confidence; 3] = [Confidence::High, Confidence::Medium, Confidence::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Confidence::High),
            "MEDIUM" => Ok(Confidence::Medium),
            "LOW" => Ok(Confidence::Low),
            _ => Err(format!("Unknown confidence: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_type_from_str() {
        assert_eq!("copy".parse::<RuleType>().unwrap(), RuleType::Copy);
        assert_eq!(
            "CONCATENATE".parse::<RuleType>().unwrap(),
            RuleType::Concatenate
        );
        assert_eq!("Leave Blank".parse::<RuleType>().unwrap(), RuleType::Blank);
        assert!("hardcode".parse::<RuleType>().is_err());
    }

    #[test]
    fn test_source_arity() {
        assert!(RuleType::Copy.accepts_source_count(1));
        assert!(!RuleType::Copy.accepts_source_count(2));
        assert!(RuleType::Concatenate.accepts_source_count(5));
        assert!(!RuleType::Extract.accepts_source_count(0));
        assert!(RuleType::Blank.accepts_source_count(0));
        assert!(!RuleType::Static.accepts_source_count(1));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&RuleType::Concatenate).unwrap();
        assert_eq!(json, "\"Concatenate\"");
        let confidence: Confidence = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(confidence, Confidence::Medium);
        assert!(serde_json::from_str::<Confidence>("\"medium\"").is_err());
    }
}
