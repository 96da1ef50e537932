use std::fs;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Runtime;
use tracing::{debug, info, info_span};

use crm_cli::files::{read_document, read_source, read_target, write_document, write_rows_file};
use crm_cli::logging::redact_value;
use crm_model::{EditRequest, SourceSample};
use crm_prompt::build_request;
use crm_service::{
    CompletionService, GenerationInput, ServiceConfig, execute_transformation, generate_rules,
};
use crm_validate::{ValidationContext, diff_after_edit, validate, validate_document};

use crate::cli::{CheckArgs, EditArgs, GenerateArgs, PromptArgs, ServiceArgs, TransformArgs};
use crate::summary::print_crms;
use crate::types::{CheckResult, EditResult, GenerateResult, TransformResult};

pub fn run_crms() -> Result<()> {
    print_crms();
    Ok(())
}

pub fn run_prompt(args: &PromptArgs) -> Result<()> {
    let source = read_source(&args.samples.source)?;
    let target = read_target(&args.samples.target)?;
    let request = build_request(&source, &target, &args.samples.crm);
    match &args.output {
        Some(path) => {
            fs::write(path, &request).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), bytes = request.len(), "request written");
        }
        None => println!("{request}"),
    }
    Ok(())
}

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    let span = info_span!("generate", crm = %args.samples.crm);
    let _guard = span.enter();

    let source = read_source(&args.samples.source)?;
    let target = read_target(&args.samples.target)?;
    debug!(source = redact_value(source.raw()), "source sample");
    let service = build_service(&args.service)?;

    let input = GenerationInput::new(&source, &target, &args.samples.crm);
    let start = Instant::now();
    let progress = spinner(format!(
        "Generating mapping rules with {} ({})",
        service.provider_name(),
        service.model_name()
    ));
    let outcome = runtime()?.block_on(generate_rules(service.as_ref(), &input));
    progress.finish_and_clear();
    let doc = outcome?;
    info!(
        rules = doc.column_mappings.len(),
        duration_ms = start.elapsed().as_millis(),
        "generation finished"
    );

    let fields = source.field_names();
    let ctx = ValidationContext::new()
        .with_source_fields(&fields)
        .with_target_columns(target.columns());
    let report = validate(&doc, &ctx);
    write_document(&args.output, &doc)?;

    Ok(GenerateResult {
        doc,
        report,
        output: args.output.clone(),
        provider: service.provider_name(),
        model: service.model_name().to_string(),
    })
}

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let doc = read_document(&args.document)?;
    let source = args.source.as_deref().map(read_source).transpose()?;
    let target = args.target.as_deref().map(read_target).transpose()?;

    let fields = source.as_ref().map(SourceSample::field_names);
    let mut ctx = ValidationContext::new();
    if let Some(fields) = &fields {
        ctx = ctx.with_source_fields(fields);
    }
    if let Some(target) = &target {
        ctx = ctx.with_target_columns(target.columns());
    }
    let report = validate(&doc, &ctx);
    info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "document checked"
    );
    Ok(CheckResult { doc, report })
}

pub fn run_edit(args: &EditArgs) -> Result<EditResult> {
    let span = info_span!("edit", rule = args.rule);
    let _guard = span.enter();

    let before = read_document(&args.document)?;
    let after = if args.clear_attention {
        before.with_attention_cleared(args.rule)?
    } else {
        let edit = edit_request(args)?;
        match &args.source {
            Some(path) => {
                let source = read_source(path)?;
                before.with_edit_checked(args.rule, &edit, &source.field_names())?
            }
            None => before.with_edit(args.rule, &edit)?,
        }
    };

    let impact = before
        .rule(args.rule)
        .zip(after.rule(args.rule))
        .map(|(old, new)| diff_after_edit(old, new))
        .unwrap_or_default();
    debug!(?impact, "summary adjusted");

    let report = validate_document(&after);
    let output = args.output.clone().unwrap_or_else(|| args.document.clone());
    write_document(&output, &after)?;

    Ok(EditResult {
        doc: after,
        rule_number: args.rule,
        impact,
        report,
        output,
    })
}

pub fn run_transform(args: &TransformArgs) -> Result<TransformResult> {
    let doc = read_document(&args.document)?;
    let source = read_source(&args.source)?;
    let source = if args.all {
        source
    } else {
        source.head(args.rows)
    };
    let span = info_span!("transform", records = source.records().len(), all = args.all);
    let _guard = span.enter();

    let service = build_service(&args.service)?;
    let progress = spinner(format!(
        "Transforming {} record(s) with {}",
        source.records().len(),
        service.provider_name()
    ));
    let outcome = runtime()?.block_on(execute_transformation(service.as_ref(), &doc, &source));
    progress.finish_and_clear();
    let rows = outcome?;

    if let Some(path) = &args.output {
        write_rows_file(path, &doc, &rows)?;
        info!(path = %path.display(), rows = rows.len(), "rows written");
    }
    Ok(TransformResult {
        doc,
        source,
        rows,
        output: args.output.clone(),
    })
}

fn edit_request(args: &EditArgs) -> Result<EditRequest> {
    let rule_type = args
        .rule_type
        .context("--type is required unless --clear-attention is given")?;
    let mut edit = EditRequest::new(rule_type, args.fields.clone())
        .with_format(args.format_kind.clone(), args.format_pattern.clone())
        .flagged(args.flag);
    if let Some(separator) = &args.separator {
        edit = edit.with_separator(separator);
    }
    if let Some(value) = &args.static_value {
        edit = edit.with_static_value(value);
    }
    if let Some(logic) = &args.logic {
        edit = edit.with_logic(logic);
    }
    Ok(edit)
}

/// Service configuration from flags, falling back to the provider's API key
/// environment variable.
fn service_config(args: &ServiceArgs) -> ServiceConfig {
    let provider = args.provider;
    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var(provider.api_key_env()).ok())
        .unwrap_or_default();
    let mut config = ServiceConfig::new(provider, api_key).with_max_tokens(args.max_tokens);
    if let Some(model) = &args.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

fn build_service(args: &ServiceArgs) -> Result<Box<dyn CompletionService>> {
    let config = service_config(args);
    debug!(?config, "service configured");
    Ok(config.build()?)
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
fn spinner(message: String) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        progress.set_style(style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
