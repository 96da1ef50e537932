//! CLI argument definitions for the CRM mapper.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use crm_model::{CrmTarget, RuleType};
use crm_service::{DEFAULT_MAX_TOKENS, Provider};

#[derive(Parser)]
#[command(
    name = "crm-mapper",
    version,
    about = "Map donation exports onto CRM import formats",
    long_about = "Generate, review and apply column-mapping rules that turn a \
                  donation platform export into a CRM import file.\n\n\
                  Rules are drafted by a completion service, checked against \
                  the mapping invariants, edited locally and then executed on \
                  the source records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow donor records, prompts and service responses in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the rule generation request without contacting a service.
    Prompt(PromptArgs),

    /// Ask a completion service for mapping rules and save them.
    Generate(GenerateArgs),

    /// Check a mapping document against the mapping invariants.
    Check(CheckArgs),

    /// Edit one rule of a mapping document.
    Edit(EditArgs),

    /// Apply a mapping document to source records.
    Transform(TransformArgs),

    /// List the CRMs with built-in formatting guidance.
    Crms,
}

/// The two uploaded samples and the destination CRM.
#[derive(Args)]
pub struct SampleArgs {
    /// Source export sample: a JSON array of flat records.
    #[arg(long = "source", value_name = "JSON")]
    pub source: PathBuf,

    /// Target import sample: CSV header plus example rows.
    #[arg(long = "target", value_name = "CSV")]
    pub target: PathBuf,

    /// Destination CRM (salesforce, raisers-edge, virtuous, admire,
    /// everyaction, or any other name).
    #[arg(long = "crm", value_name = "CRM", default_value = "other")]
    pub crm: CrmTarget,
}

/// Completion service selection.
#[derive(Args)]
pub struct ServiceArgs {
    /// Completion provider (openai or anthropic).
    #[arg(
        long = "provider",
        env = "CRM_MAPPER_PROVIDER",
        default_value = "openai"
    )]
    pub provider: Provider,

    /// Model name (defaults to the provider's default model).
    #[arg(long = "model", env = "CRM_MAPPER_MODEL")]
    pub model: Option<String>,

    /// API key (defaults to OPENAI_API_KEY or ANTHROPIC_API_KEY).
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Override the provider's API base URL.
    #[arg(long = "base-url", env = "CRM_MAPPER_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Output token budget per request.
    #[arg(long = "max-tokens", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Whole-request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Args)]
pub struct PromptArgs {
    #[command(flatten)]
    pub samples: SampleArgs,

    /// Write the request to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub samples: SampleArgs,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Where to save the mapping document.
    #[arg(long = "output", value_name = "PATH", default_value = "mapping.json")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Mapping document to check.
    #[arg(value_name = "MAPPING")]
    pub document: PathBuf,

    /// Also check source field references against this sample.
    #[arg(long = "source", value_name = "JSON")]
    pub source: Option<PathBuf>,

    /// Also check target coverage against this sample.
    #[arg(long = "target", value_name = "CSV")]
    pub target: Option<PathBuf>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Mapping document to edit.
    #[arg(value_name = "MAPPING")]
    pub document: PathBuf,

    /// Rule number to edit.
    #[arg(long = "rule", value_name = "N")]
    pub rule: u32,

    /// New rule type.
    #[arg(
        long = "type",
        value_name = "TYPE",
        required_unless_present = "clear_attention"
    )]
    pub rule_type: Option<RuleType>,

    /// Source field feeding the rule (repeat for Concatenate and Extract).
    #[arg(long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Concatenate separator.
    #[arg(long = "separator", value_name = "TEXT")]
    pub separator: Option<String>,

    /// Value written by a Static rule.
    #[arg(long = "value", value_name = "TEXT")]
    pub static_value: Option<String>,

    /// Reformat category (date, phone, currency, ...).
    #[arg(long = "format-kind", value_name = "KIND")]
    pub format_kind: Option<String>,

    /// Reformat pattern such as MM/DD/YYYY.
    #[arg(long = "format-pattern", value_name = "PATTERN")]
    pub format_pattern: Option<String>,

    /// Free-text transformation logic (replaces the generated template).
    #[arg(long = "logic", value_name = "TEXT")]
    pub logic: Option<String>,

    /// Keep the rule flagged for review.
    #[arg(long = "flag")]
    pub flag: bool,

    /// Mark the rule as reviewed instead of changing it.
    #[arg(
        long = "clear-attention",
        conflicts_with_all = [
            "rule_type",
            "fields",
            "separator",
            "static_value",
            "format_kind",
            "format_pattern",
            "logic",
            "flag",
            "source",
        ]
    )]
    pub clear_attention: bool,

    /// Require edited source fields to exist in this sample.
    #[arg(long = "source", value_name = "JSON")]
    pub source: Option<PathBuf>,

    /// Save the edited document here instead of overwriting MAPPING.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct TransformArgs {
    /// Mapping document to execute.
    #[arg(value_name = "MAPPING")]
    pub document: PathBuf,

    /// Source records to transform.
    #[arg(long = "source", value_name = "JSON")]
    pub source: PathBuf,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Transform every record instead of a preview.
    #[arg(long = "all")]
    pub all: bool,

    /// Number of records in the preview.
    #[arg(long = "rows", default_value_t = crm_prompt::DEFAULT_PREVIEW_ROWS, conflicts_with = "all")]
    pub rows: usize,

    /// Write the transformed rows to a CSV file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_parses_repeated_fields() {
        let cli = Cli::try_parse_from([
            "crm-mapper",
            "edit",
            "mapping.json",
            "--rule",
            "5",
            "--type",
            "Concatenate",
            "--field",
            "address",
            "--field",
            "address2",
            "--separator",
            " ",
        ])
        .unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.rule_type, Some(RuleType::Concatenate));
        assert_eq!(args.fields, vec!["address", "address2"]);
        assert_eq!(args.separator.as_deref(), Some(" "));
    }

    #[test]
    fn edit_needs_a_type_unless_clearing_attention() {
        assert!(
            Cli::try_parse_from(["crm-mapper", "edit", "m.json", "--rule", "2"]).is_err()
        );
        assert!(
            Cli::try_parse_from([
                "crm-mapper",
                "edit",
                "m.json",
                "--rule",
                "2",
                "--clear-attention"
            ])
            .is_ok()
        );
    }

    #[test]
    fn clear_attention_rejects_edit_options() {
        let base = ["crm-mapper", "edit", "m.json", "--rule", "2", "--clear-attention"];
        for extra in [
            &["--value", "ONLINE"][..],
            &["--separator", " "],
            &["--format-kind", "date"],
            &["--format-pattern", "MM/DD/YYYY"],
            &["--source", "s.json"],
            &["--field", "email"],
            &["--flag"],
        ] {
            let args = base.iter().chain(extra).copied();
            let kind = Cli::try_parse_from(args).err().map(|err| err.kind());
            assert_eq!(
                kind,
                Some(clap::error::ErrorKind::ArgumentConflict),
                "{extra:?}"
            );
        }
    }

    #[test]
    fn unknown_crm_is_kept_verbatim() {
        let cli = Cli::try_parse_from([
            "crm-mapper",
            "prompt",
            "--source",
            "s.json",
            "--target",
            "t.csv",
            "--crm",
            "Bloomerang",
        ])
        .unwrap();
        let Command::Prompt(args) = cli.command else {
            panic!("expected prompt");
        };
        assert_eq!(args.samples.crm, CrmTarget::Other("Bloomerang".to_string()));
    }

    #[test]
    fn preview_rows_conflict_with_all() {
        let result = Cli::try_parse_from([
            "crm-mapper",
            "transform",
            "m.json",
            "--source",
            "s.json",
            "--all",
            "--rows",
            "5",
        ]);
        assert!(result.is_err());
    }
}
