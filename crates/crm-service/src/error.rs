//! Service and wizard errors.

use crm_model::{EditError, SampleError};
use crm_prompt::ResponseError;
use crm_validate::Issue;
use thiserror::Error;

/// The completion service could not produce a response.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ServiceError {
    /// The provider answered with a non-success HTTP status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The request never completed (connection, TLS, timeout, decoding).
    #[error("Request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered without any text content.
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    /// No API key was configured.
    #[error("No API key configured for {provider}")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    /// The service configuration is unusable.
    #[error("Invalid service configuration: {0}")]
    Config(String),
}

impl ServiceError {
    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Status { status: 401 | 403, .. } => {
                Some("Check that the API key is valid for this provider.".to_string())
            }
            Self::Status { status: 429, .. } => {
                Some("The provider is rate limiting requests; wait and retry.".to_string())
            }
            Self::Status { .. } | Self::EmptyResponse { .. } => None,
            Self::Transport { .. } => {
                Some("Check network access and the configured base URL.".to_string())
            }
            Self::MissingApiKey { env_var, .. } => {
                Some(format!("Set {env_var} or pass --api-key."))
            }
            Self::Config(_) => None,
        }
    }
}

/// Result type alias for service calls.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Any failure along the generate, edit and transform flow.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WizardError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    /// The document must validate before it is executed.
    #[error("Mapping document breaks {} invariant(s) and cannot be executed", .issues.len())]
    InvalidDocument { issues: Vec<Issue> },
}
