//! Completion service clients and the wizard flow built on them.
//!
//! The core never constructs a client itself: callers build one from a
//! [`ServiceConfig`] (or supply their own [`CompletionService`]) and pass
//! it into the [`wizard`] steps.

pub mod anthropic;
pub mod client;
pub mod config;
pub mod error;
pub mod openai;
pub mod redact;
pub mod wizard;

pub use anthropic::AnthropicService;
pub use client::CompletionService;
pub use config::{DEFAULT_MAX_TOKENS, Provider, ServiceConfig};
pub use error::{Result, ServiceError, WizardError};
pub use openai::OpenAiService;
pub use wizard::{GenerationInput, execute_transformation, generate_rules, preview_transformation};
