//! Tests for crm-model document types and edits.

use crm_model::{
    ColumnMapping, Confidence, ConfidenceBreakdown, EditError, EditRequest, MappingDocument,
    MappingSummary, RuleType, recompute_summary,
};
use proptest::prelude::*;

fn mapping(n: u32, target: &str, rule_type: RuleType, fields: &[&str]) -> ColumnMapping {
    ColumnMapping {
        rule_number: n,
        target_column: target.to_string(),
        rule_type,
        source_fields: fields.iter().map(|f| f.to_string()).collect(),
        transformation_logic: format!("{rule_type} into {target}"),
        confidence: Confidence::High,
        needs_attention: rule_type.is_sourceless(),
        notes: String::new(),
    }
}

fn sample_document() -> MappingDocument {
    MappingDocument::new(
        vec![
            mapping(1, "Email", RuleType::Copy, &["email"]),
            mapping(2, "Address", RuleType::Concatenate, &["address", "address2"]),
            mapping(3, "Source Code", RuleType::Static, &[]),
            mapping(4, "Middle Name", RuleType::Blank, &[]),
        ],
        "Salesforce",
    )
}

#[test]
fn document_uses_wire_key_names() {
    let json = serde_json::to_value(sample_document()).expect("serialize document");
    assert!(json.get("columnMappings").is_some());
    let first = &json["columnMappings"][0];
    assert_eq!(first["type"], "Copy");
    assert_eq!(first["source_fields"][0], "email");
    assert_eq!(json["summary"]["rules_by_type"]["Static"], 1);
    assert_eq!(json["summary"]["confidence_breakdown"]["needs_attention_count"], 2);
    assert_eq!(json["summary"]["review_required"], serde_json::json!([3, 4]));
}

#[test]
fn document_parses_without_optional_keys() {
    let json = r#"{
        "columnMappings": [{
            "rule_number": 1,
            "target_column": "Email",
            "type": "Copy",
            "source_fields": ["email"],
            "transformation_logic": "Copy email directly to Email",
            "confidence": "High",
            "needs_attention": false
        }],
        "summary": {
            "total_target_columns": 1,
            "total_rules_generated": 1,
            "rules_by_type": {
                "Copy": 1, "Reformat": 0, "Concatenate": 0,
                "Extract": 0, "Static": 0, "Blank": 0
            },
            "confidence_breakdown": {
                "high_confidence": 1,
                "medium_confidence": 0,
                "low_confidence": 0,
                "needs_attention_count": 0
            },
            "review_required": []
        }
    }"#;
    let doc: MappingDocument = serde_json::from_str(json).expect("parse document");
    assert_eq!(doc.column_mappings[0].notes, "");
    assert_eq!(doc.summary.rules_by_type.blank, 0);
    assert_eq!(doc.summary.target_crm, "");
}

fn summary_json(rules_by_type: &str) -> String {
    format!(
        r#"{{
        "total_target_columns": 1,
        "total_rules_generated": 1,
        "rules_by_type": {rules_by_type},
        "confidence_breakdown": {{
            "high_confidence": 1, "medium_confidence": 0,
            "low_confidence": 0, "needs_attention_count": 0
        }},
        "review_required": []
    }}"#
    )
}

#[test]
fn rules_by_type_rejects_unknown_keys() {
    let json = summary_json(
        r#"{"Copy": 1, "Reformat": 0, "Concatenate": 0, "Extract": 0,
            "Static": 0, "Blank": 0, "Hardcode": 4}"#,
    );
    let err = serde_json::from_str::<MappingSummary>(&json).unwrap_err();
    assert!(err.to_string().contains("Hardcode"), "{err}");
}

#[test]
fn rules_by_type_requires_every_type() {
    let json = summary_json(r#"{"Copy": 1}"#);
    let err = serde_json::from_str::<MappingSummary>(&json).unwrap_err();
    assert!(err.to_string().contains("missing field"), "{err}");
}

#[test]
fn confidence_breakdown_rejects_unknown_keys() {
    let json = r#"{"high_confidence": 1, "medium_confidence": 0, "low_confidence": 0,
        "needs_attention_count": 0, "very_high_confidence": 2}"#;
    assert!(serde_json::from_str::<ConfidenceBreakdown>(json).is_err());
}

#[test]
fn unknown_rule_type_fails_to_parse() {
    let json = r#"{"rule_number":1,"target_column":"A","type":"hardcode",
        "source_fields":[],"transformation_logic":"x","confidence":"High","needs_attention":true}"#;
    assert!(serde_json::from_str::<ColumnMapping>(json).is_err());
}

#[test]
fn with_edit_recomputes_summary() {
    let doc = sample_document();
    let edit = EditRequest::new(
        RuleType::Concatenate,
        vec!["city".to_string(), "state".to_string()],
    );
    let edited = doc.with_edit(4, &edit).expect("edit blank rule");

    // The original value is untouched.
    assert_eq!(doc.rule(4).unwrap().rule_type, RuleType::Blank);

    let rule = edited.rule(4).unwrap();
    assert_eq!(rule.rule_type, RuleType::Concatenate);
    assert!(!rule.needs_attention);
    assert_eq!(edited.summary.rules_by_type.blank, 0);
    assert_eq!(edited.summary.rules_by_type.concatenate, 2);
    assert_eq!(edited.summary.review_required, vec![3]);
    assert_eq!(edited.summary.target_crm, "Salesforce");
    assert_eq!(edited.column_mappings.len(), doc.column_mappings.len());
}

#[test]
fn with_edit_on_missing_rule_fails() {
    let edit = EditRequest::new(RuleType::Blank, vec![]);
    let err = sample_document().with_edit(99, &edit).unwrap_err();
    assert_eq!(err, EditError::RuleNotFound(99));
}

#[test]
fn checked_edit_rejects_fields_missing_from_the_sample() {
    let known = ["email", "zip"].map(String::from).into_iter().collect();
    let edit = EditRequest::new(RuleType::Copy, vec!["postal".to_string()]);
    let err = sample_document()
        .with_edit_checked(1, &edit, &known)
        .unwrap_err();
    assert_eq!(err, EditError::UnknownSourceField("postal".to_string()));

    let edit = EditRequest::new(RuleType::Copy, vec!["zip".to_string()]);
    let doc = sample_document()
        .with_edit_checked(1, &edit, &known)
        .expect("known field");
    assert_eq!(doc.rule(1).unwrap().source_fields, vec!["zip"]);
}

#[test]
fn clearing_attention_on_static_rule_is_rejected() {
    let doc = sample_document();
    let err = doc.with_attention_cleared(3).unwrap_err();
    assert!(matches!(err, EditError::AttentionRequired { rule_number: 3, .. }));
    assert!(err.suggestion().is_some());
}

#[test]
fn clearing_attention_on_flagged_copy_rule() {
    let mut doc = sample_document();
    doc.column_mappings[0].needs_attention = true;
    let doc = doc.with_recomputed_summary();
    assert_eq!(doc.summary.review_required, vec![1, 3, 4]);

    let cleared = doc.with_attention_cleared(1).expect("clear attention");
    assert!(!cleared.rule(1).unwrap().needs_attention);
    assert_eq!(cleared.summary.review_required, vec![3, 4]);
}

#[test]
fn target_columns_follow_rule_order() {
    let mut doc = sample_document();
    doc.column_mappings.reverse();
    assert_eq!(
        doc.target_columns(),
        vec!["Email", "Address", "Source Code", "Middle Name"]
    );
    assert_eq!(doc.rule_for_target("Address").unwrap().rule_number, 2);
    assert_eq!(doc.rule(2).unwrap().source_label(), "address + address2");
}

fn arb_rule_type() -> impl Strategy<Value = RuleType> {
    prop::sample::select(RuleType::ALL.to_vec())
}

fn arb_confidence() -> impl Strategy<Value = Confidence> {
    prop::sample::select(Confidence::ALL.to_vec())
}

proptest! {
    #[test]
    fn summary_buckets_always_sum_to_rule_count(
        specs in prop::collection::vec((arb_rule_type(), arb_confidence(), any::<bool>()), 0..40)
    ) {
        let mappings: Vec<ColumnMapping> = specs
            .iter()
            .enumerate()
            .map(|(i, (rule_type, confidence, flag))| ColumnMapping {
                rule_number: i as u32 + 1,
                target_column: format!("Column {i}"),
                rule_type: *rule_type,
                source_fields: vec![],
                transformation_logic: String::new(),
                confidence: *confidence,
                needs_attention: *flag,
                notes: String::new(),
            })
            .collect();
        let summary = recompute_summary(&mappings, "Virtuous");

        prop_assert_eq!(summary.total_target_columns, mappings.len());
        prop_assert_eq!(summary.rules_by_type.total(), mappings.len());
        prop_assert_eq!(summary.confidence_breakdown.confidence_total(), mappings.len());
        prop_assert_eq!(
            summary.confidence_breakdown.needs_attention_count,
            summary.review_required.len()
        );
        prop_assert!(summary.review_required.windows(2).all(|w| w[0] < w[1]));
    }
}
