//! Operator edits to individual rules.
//!
//! Edits never mutate in place: [`apply_edit`] returns a new rule and
//! [`MappingDocument::with_edit`] returns a new document with a recomputed
//! summary. When no free-text logic is supplied the transformation logic is
//! synthesized from a fixed per-type template.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::enums::RuleType;
use crate::error::{EditError, Result};
use crate::mapping::{ColumnMapping, MappingDocument};

/// Separator used by Concatenate rules when none is given.
pub const DEFAULT_SEPARATOR: &str = ", ";

const STATIC_PREFIX: &str = "Set to static value: \"";

/// Per-type parameters that feed the logic template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Concatenate separator (defaults to [`DEFAULT_SEPARATOR`]).
    pub separator: Option<String>,
    /// Static value written to every record.
    pub static_value: Option<String>,
    /// Reformat category such as `date`, `phone` or `currency`.
    pub format_kind: Option<String>,
    /// Reformat pattern such as `MM/DD/YYYY`.
    pub format_pattern: Option<String>,
}

/// A requested change to one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub rule_type: RuleType,
    pub source_fields: Vec<String>,
    pub options: TemplateOptions,
    /// Free-text logic; blank text counts as not supplied.
    pub explicit_logic: Option<String>,
    /// Keep the rule flagged because the edit relies on an assumption.
    pub flag_assumption: bool,
}

impl EditRequest {
    pub fn new(rule_type: RuleType, source_fields: Vec<String>) -> Self {
        Self {
            rule_type,
            source_fields,
            options: TemplateOptions::default(),
            explicit_logic: None,
            flag_assumption: false,
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.separator = Some(separator.into());
        self
    }

    #[must_use]
    pub fn with_static_value(mut self, value: impl Into<String>) -> Self {
        self.options.static_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, kind: Option<String>, pattern: Option<String>) -> Self {
        self.options.format_kind = kind;
        self.options.format_pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_logic(mut self, logic: impl Into<String>) -> Self {
        self.explicit_logic = Some(logic.into());
        self
    }

    #[must_use]
    pub fn flagged(mut self, flag: bool) -> Self {
        self.flag_assumption = flag;
        self
    }
}

/// Render the deterministic logic text for a rule.
pub fn template_logic(
    rule_type: RuleType,
    source_fields: &[String],
    target_column: &str,
    options: &TemplateOptions,
) -> String {
    let first = source_fields.first().map(String::as_str).unwrap_or_default();
    let joined = source_fields.join(", ");
    match rule_type {
        RuleType::Copy => format!("Copy {first} directly to {target_column}"),
        RuleType::Reformat => {
            if let Some(pattern) = non_blank(options.format_pattern.as_deref()) {
                format!("Convert {first} to {pattern} format")
            } else if let Some(kind) = non_blank(options.format_kind.as_deref()) {
                format!("Convert {first} to {kind} format")
            } else {
                format!("Reformat {first} for {target_column}")
            }
        }
        RuleType::Concatenate => {
            let separator = options.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
            format!("Combine {joined} with separator \"{separator}\"")
        }
        RuleType::Extract => format!("Extract portions from {joined}"),
        RuleType::Static => {
            let value = options.static_value.as_deref().unwrap_or_default();
            format!("{STATIC_PREFIX}{value}\"")
        }
        RuleType::Blank => format!("Leave {target_column} blank"),
    }
}

/// Recover the value of a Static rule from its templated logic.
///
/// Returns `None` for other rule types or free-text logic.
pub fn static_value(mapping: &ColumnMapping) -> Option<&str> {
    if mapping.rule_type != RuleType::Static {
        return None;
    }
    mapping
        .transformation_logic
        .strip_prefix(STATIC_PREFIX)?
        .strip_suffix('"')
}

/// Check the source field list against the rule type's arity.
pub fn check_source_fields(rule_type: RuleType, source_fields: &[String]) -> Result<()> {
    if !rule_type.accepts_source_count(source_fields.len()) {
        let expected = match rule_type.source_arity() {
            (0, Some(0)) => "no",
            (1, Some(1)) => "exactly one",
            _ => "one or more",
        };
        return Err(EditError::SourceFieldCount {
            rule_type,
            expected,
            found: source_fields.len(),
        });
    }
    if source_fields.iter().any(|f| f.trim().is_empty()) {
        return Err(EditError::BlankSourceField { rule_type });
    }
    Ok(())
}

/// Produce the updated rule for an edit.
///
/// `needs_attention` becomes `true` for Static/Blank rules or when the
/// caller flags an assumption, and `false` otherwise.
pub fn apply_edit(mapping: &ColumnMapping, edit: &EditRequest) -> Result<ColumnMapping> {
    check_source_fields(edit.rule_type, &edit.source_fields)?;

    let transformation_logic = match non_blank(edit.explicit_logic.as_deref()) {
        Some(logic) => logic.to_string(),
        None => template_logic(
            edit.rule_type,
            &edit.source_fields,
            &mapping.target_column,
            &edit.options,
        ),
    };

    if sets_empty_static(edit) {
        warn!(
            rule_number = mapping.rule_number,
            target_column = %mapping.target_column,
            "static rule has an empty value"
        );
    }

    debug!(
        rule_number = mapping.rule_number,
        from = %mapping.rule_type,
        to = %edit.rule_type,
        "applied rule edit"
    );

    Ok(ColumnMapping {
        rule_type: edit.rule_type,
        source_fields: edit.source_fields.clone(),
        transformation_logic,
        needs_attention: edit.rule_type.is_sourceless() || edit.flag_assumption,
        ..mapping.clone()
    })
}

/// Like [`apply_edit`], also requiring every source field to exist in
/// `known_fields`.
pub fn apply_edit_checked(
    mapping: &ColumnMapping,
    edit: &EditRequest,
    known_fields: &BTreeSet<String>,
) -> Result<ColumnMapping> {
    if let Some(unknown) = edit
        .source_fields
        .iter()
        .find(|f| !known_fields.contains(f.as_str()))
    {
        return Err(EditError::UnknownSourceField(unknown.clone()));
    }
    apply_edit(mapping, edit)
}

impl MappingDocument {
    /// Return a copy of the document with one rule edited and the summary
    /// recomputed.
    pub fn with_edit(&self, rule_number: u32, edit: &EditRequest) -> Result<MappingDocument> {
        self.replace_rule(rule_number, |mapping| apply_edit(mapping, edit))
    }

    /// Like [`MappingDocument::with_edit`], also requiring every source field
    /// to exist in `known_fields`.
    pub fn with_edit_checked(
        &self,
        rule_number: u32,
        edit: &EditRequest,
        known_fields: &BTreeSet<String>,
    ) -> Result<MappingDocument> {
        self.replace_rule(rule_number, |mapping| {
            apply_edit_checked(mapping, edit, known_fields)
        })
    }

    /// Return a copy of the document with the rule's review flag cleared.
    pub fn with_attention_cleared(&self, rule_number: u32) -> Result<MappingDocument> {
        self.replace_rule(rule_number, |mapping| {
            if mapping.rule_type.is_sourceless() {
                return Err(EditError::AttentionRequired {
                    rule_number,
                    rule_type: mapping.rule_type,
                });
            }
            Ok(ColumnMapping {
                needs_attention: false,
                ..mapping.clone()
            })
        })
    }

    fn replace_rule<F>(&self, rule_number: u32, update: F) -> Result<MappingDocument>
    where
        F: FnOnce(&ColumnMapping) -> Result<ColumnMapping>,
    {
        let index = self
            .column_mappings
            .iter()
            .position(|m| m.rule_number == rule_number)
            .ok_or(EditError::RuleNotFound(rule_number))?;
        let updated = update(&self.column_mappings[index])?;

        let mut column_mappings = self.column_mappings.clone();
        column_mappings[index] = updated;
        Ok(MappingDocument::new(
            column_mappings,
            self.summary.target_crm.clone(),
        ))
    }
}

/// A Static edit with neither a value nor usable logic of its own.
fn sets_empty_static(edit: &EditRequest) -> bool {
    edit.rule_type == RuleType::Static
        && non_blank(edit.options.static_value.as_deref()).is_none()
        && non_blank(edit.explicit_logic.as_deref()).is_none()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
