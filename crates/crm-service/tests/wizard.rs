//! Wizard flow tests against a scripted completion service.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crm_model::{CrmTarget, EditRequest, RuleType, SourceSample, TargetSchema};
use crm_prompt::ResponseError;
use crm_service::{
    CompletionService, GenerationInput, ServiceError, WizardError, execute_transformation,
    generate_rules, preview_transformation,
};
use crm_service::redact::REDACTED_VALUE;
use crm_validate::Invariant;
use tracing_subscriber::fmt::MakeWriter;

/// Replays canned responses and records every prompt it receives.
struct ScriptedService {
    responses: Mutex<Vec<Result<String, ServiceError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedService {
    fn new(responses: Vec<Result<String, ServiceError>>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn submit(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(ServiceError::EmptyResponse { provider: "Scripted" }))
    }

    fn provider_name(&self) -> &'static str {
        "Scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-1"
    }
}

const SOURCE: &str = r#"[
  {"email": "jsmith@email.com", "city": "Springfield", "state": "IL", "amount": "$250.00"},
  {"email": "jane@email.com", "city": "Peoria", "state": "IL", "amount": "$1,000.00"},
  {"email": "ann@email.com", "city": "Chicago", "state": "IL", "amount": "$75.00"},
  {"email": "lee@email.com", "city": "Urbana", "state": "IL", "amount": "$20.00"}
]"#;

const TARGET: &str = "Email,Address,Gift Amount\njane@email.com,\"Peoria, IL\",1000.00\n";

const RULES: &str = r#"{
  "columnMappings": [
    {"rule_number": 1, "target_column": "Email", "type": "Copy", "source_fields": ["email"], "transformation_logic": "Copy email directly to Email", "confidence": "High", "needs_attention": false, "notes": ""},
    {"rule_number": 2, "target_column": "Address", "type": "Blank", "source_fields": [], "transformation_logic": "Leave Address blank", "confidence": "Low", "needs_attention": true, "notes": "No street address in the export"},
    {"rule_number": 3, "target_column": "Gift Amount", "type": "Reformat", "source_fields": ["amount"], "transformation_logic": "Strip $ and commas from amount", "confidence": "High", "needs_attention": false, "notes": ""}
  ],
  "summary": {
    "total_target_columns": 3,
    "total_rules_generated": 3,
    "target_crm": "Virtuous",
    "rules_by_type": {"Copy": 1, "Reformat": 1, "Concatenate": 0, "Extract": 0, "Static": 0, "Blank": 1},
    "confidence_breakdown": {"high_confidence": 2, "medium_confidence": 0, "low_confidence": 1, "needs_attention_count": 1},
    "review_required": [2]
  }
}"#;

fn samples() -> (SourceSample, TargetSchema) {
    (
        SourceSample::parse(SOURCE).unwrap(),
        TargetSchema::parse(TARGET).unwrap(),
    )
}

#[tokio::test]
async fn generate_then_edit_then_transform() {
    let (source, target) = samples();
    let crm = CrmTarget::Virtuous;
    let service = ScriptedService::new(vec![
        Ok(format!("```json\n{RULES}\n```")),
        Ok("```csv\nEmail,Address,Gift Amount\njsmith@email.com,\"Springfield, IL\",250.00\n```"
            .to_string()),
    ]);

    let doc = generate_rules(&service, &GenerationInput::new(&source, &target, &crm))
        .await
        .expect("generate rules");
    assert_eq!(doc.summary.review_required, vec![2]);

    let edit = EditRequest::new(
        RuleType::Concatenate,
        vec!["city".to_string(), "state".to_string()],
    );
    let doc = doc.with_edit(2, &edit).expect("edit address rule");
    assert!(doc.summary.review_required.is_empty());

    let rows = execute_transformation(&service, &doc, &source.head(1))
        .await
        .expect("transform");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Address"], "Springfield, IL");

    let prompts = service.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("Virtuous formatting:"));
    assert!(prompts[1].contains("Combine city, state with separator \\\", \\\"\""));
}

#[tokio::test]
async fn generated_rules_must_cover_the_target_sample() {
    let (source, _) = samples();
    let target = TargetSchema::parse("Email,Address,Gift Amount,Gift Date\n").unwrap();
    let crm = CrmTarget::Other("other".to_string());
    let service = ScriptedService::replying(RULES);

    let err = generate_rules(&service, &GenerationInput::new(&source, &target, &crm))
        .await
        .unwrap_err();
    let WizardError::Response(ResponseError::InvariantViolation { issues }) = err else {
        panic!("expected invariant violation, got {err:?}");
    };
    assert_eq!(issues[0].invariant, Invariant::TargetCoverage);
}

#[tokio::test]
async fn service_failure_is_surfaced_verbatim() {
    let (source, target) = samples();
    let crm = CrmTarget::Salesforce;
    let service = ScriptedService::new(vec![Err(ServiceError::Status {
        provider: "Scripted",
        status: 500,
        body: "upstream unavailable".to_string(),
    })]);

    let err = generate_rules(&service, &GenerationInput::new(&source, &target, &crm))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WizardError::Service(ServiceError::Status { status: 500, .. })
    ));
    assert_eq!(service.prompts().len(), 1);
}

#[tokio::test]
async fn invalid_document_is_not_submitted() {
    let (source, _) = samples();
    let mut doc: crm_model::MappingDocument = serde_json::from_str(RULES).unwrap();
    doc.column_mappings[1].needs_attention = false;
    let service = ScriptedService::new(vec![]);

    let err = execute_transformation(&service, &doc, &source)
        .await
        .unwrap_err();
    let WizardError::InvalidDocument { issues } = err else {
        panic!("expected invalid document, got {err:?}");
    };
    assert!(issues.iter().any(|i| i.invariant == Invariant::SourcelessAttention));
    assert!(service.prompts().is_empty());
}

#[tokio::test]
async fn preview_sends_three_records() {
    let (source, _) = samples();
    let doc: crm_model::MappingDocument = serde_json::from_str(RULES).unwrap();
    let service = ScriptedService::replying("Email,Address,Gift Amount\na@b.org,,1.00\n");

    let rows = preview_transformation(&service, &doc, &source)
        .await
        .expect("preview");
    assert_eq!(rows[0]["Address"], "");

    let prompts = service.prompts();
    assert!(prompts[0].contains("ann@email.com"));
    assert!(!prompts[0].contains("lee@email.com"));
}

#[tokio::test]
async fn boxed_service_is_usable() {
    let (source, target) = samples();
    let crm = CrmTarget::Virtuous;
    let service: Box<dyn CompletionService> = Box::new(ScriptedService::replying(RULES));

    let doc = generate_rules(&service, &GenerationInput::new(&source, &target, &crm))
        .await
        .expect("generate with boxed service");
    assert_eq!(doc.column_mappings.len(), 3);
    assert_eq!(service.model_name(), "scripted-1");
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn request_and_response_are_logged_redacted() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let _default = tracing::subscriber::set_default(subscriber);

    let (source, target) = samples();
    let crm = CrmTarget::Virtuous;
    let service = ScriptedService::replying(RULES);
    generate_rules(&service, &GenerationInput::new(&source, &target, &crm))
        .await
        .expect("generate rules");

    let text = logs.text();
    assert!(text.contains("generation request"), "{text}");
    assert!(text.contains("service response"), "{text}");
    assert!(text.contains(REDACTED_VALUE), "{text}");
    assert!(!text.contains("jsmith@email.com"), "{text}");
    assert!(!text.contains("Strip $ and commas"), "{text}");
}
