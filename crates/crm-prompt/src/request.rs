//! Rule generation request text.
//!
//! The request is a fixed template with both samples embedded verbatim.
//! Building it has no side effects, so a failed generation can always be
//! retried by rebuilding.

use std::fmt::Write as _;

use crm_model::{CrmTarget, RuleType, SourceSample, TargetSchema};
use tracing::debug;

const PREAMBLE: &str = "\
You are an expert at analyzing donation data and generating column mappings for CRM imports.
Analyze the source donation export and the target CRM import format below, then produce exactly one transformation rule for every target column.";

const RULES: &str = "\
MAPPING RULES:
- Number rules sequentially starting at 1 with no gaps, following the target column order.
- Produce exactly one rule per target column. Do not skip, merge or invent target columns.
- Only use source field names that appear in the source data.
- Copy and Reformat read exactly one source field. Concatenate and Extract read one or more. Static and Blank read none.
- Static and Blank rules always set \"needs_attention\": true.
- Set \"needs_attention\": true for any other rule that relies on an assumption, and explain the assumption in \"notes\".
- Describe the concrete transformation in \"transformation_logic\", using real values from the source data.

CONFIDENCE:
- High: the source field is an exact or obvious match.
- Medium: the match is clear but a transformation or judgment call is involved.
- Low: no clear source; the rule is a best guess.";

const CLOSING: &str = "\
Return only the raw JSON object. Do not include explanations, prose or markdown code fences.";

/// Build the rule generation request for the given samples.
pub fn build_request(source: &SourceSample, target: &TargetSchema, crm: &CrmTarget) -> String {
    let mut out = String::with_capacity(4096 + source.raw().len() + target.raw().len());

    out.push_str(PREAMBLE);
    out.push_str("\n\nSOURCE DATA (JSON):\n");
    out.push_str(source.raw());
    out.push_str("\n\nTARGET FORMAT (CSV):\n");
    out.push_str(target.raw());

    out.push_str("\n\nTARGET COLUMNS:\n");
    for (index, column) in target.columns().iter().enumerate() {
        let _ = writeln!(out, "{}. {column}", index + 1);
    }

    out.push_str("\nRULE TYPES:\n");
    for rule_type in RuleType::ALL {
        let _ = writeln!(out, "{rule_type} - {}", rule_type.description());
        out.push_str(example_rule(rule_type));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(RULES);
    out.push_str("\n\nOUTPUT FORMAT:\n");
    out.push_str(&output_skeleton(crm));

    let guidance = crm.guidance();
    if !guidance.is_empty() {
        out.push_str("\n\nCRM FORMATTING GUIDANCE:\n");
        out.push_str(guidance);
    }

    out.push_str("\n\n");
    out.push_str(CLOSING);
    out.push('\n');

    debug!(
        crm = %crm,
        target_columns = target.columns().len(),
        source_records = source.records().len(),
        request_len = out.len(),
        "built rule generation request"
    );
    out
}

/// Example rule object in the exact wire shape.
fn example_rule(rule_type: RuleType) -> &'static str {
    match rule_type {
        RuleType::Copy => {
            r#"{"rule_number": 1, "target_column": "Email", "type": "Copy", "source_fields": ["email"], "transformation_logic": "Copy email directly to Email", "confidence": "High", "needs_attention": false, "notes": ""}"#
        }
        RuleType::Reformat => {
            r#"{"rule_number": 2, "target_column": "Gift Date", "type": "Reformat", "source_fields": ["createdAt"], "transformation_logic": "Convert createdAt from 2025-03-14T10:22:00Z to MM/DD/YYYY format (03/14/2025)", "confidence": "Medium", "needs_attention": false, "notes": ""}"#
        }
        RuleType::Concatenate => {
            r#"{"rule_number": 3, "target_column": "Address", "type": "Concatenate", "source_fields": ["address", "address2"], "transformation_logic": "Combine address, address2 with separator \", \"", "confidence": "High", "needs_attention": false, "notes": ""}"#
        }
        RuleType::Extract => {
            r#"{"rule_number": 4, "target_column": "Last Name", "type": "Extract", "source_fields": ["name"], "transformation_logic": "Take the last word of name, dropping titles such as Mr./Mrs.", "confidence": "Medium", "needs_attention": true, "notes": "Assumes the last word is the family name"}"#
        }
        RuleType::Static => {
            r#"{"rule_number": 5, "target_column": "Source Code", "type": "Static", "source_fields": [], "transformation_logic": "Set to static value: \"ONLINE2025\"", "confidence": "Low", "needs_attention": true, "notes": "Confirm the source code with the operator"}"#
        }
        RuleType::Blank => {
            r#"{"rule_number": 6, "target_column": "Middle Name", "type": "Blank", "source_fields": [], "transformation_logic": "Leave Middle Name blank", "confidence": "Low", "needs_attention": true, "notes": "No source field holds a middle name"}"#
        }
    }
}

fn output_skeleton(crm: &CrmTarget) -> String {
    let target_crm = serde_json::Value::String(crm.display_name().to_string());
    format!(
        r#"{{
  "columnMappings": [ one rule object per target column, shaped as above ],
  "summary": {{
    "total_target_columns": <number of target columns>,
    "total_rules_generated": <number of rules>,
    "target_crm": {target_crm},
    "rules_by_type": {{"Copy": 0, "Reformat": 0, "Concatenate": 0, "Extract": 0, "Static": 0, "Blank": 0}},
    "confidence_breakdown": {{
      "high_confidence": 0,
      "medium_confidence": 0,
      "low_confidence": 0,
      "needs_attention_count": 0
    }},
    "review_required": [ rule numbers with needs_attention true, ascending ]
  }}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_rules_parse_as_column_mappings() {
        for rule_type in RuleType::ALL {
            let mapping: crm_model::ColumnMapping =
                serde_json::from_str(example_rule(rule_type)).unwrap();
            assert_eq!(mapping.rule_type, rule_type);
            assert!(rule_type.accepts_source_count(mapping.source_fields.len()));
            if rule_type.is_sourceless() {
                assert!(mapping.needs_attention);
            }
        }
    }

    #[test]
    fn skeleton_names_the_crm() {
        let skeleton = output_skeleton(&CrmTarget::RaisersEdge);
        assert!(skeleton.contains(r#""target_crm": "Raiser's Edge""#));
    }
}
