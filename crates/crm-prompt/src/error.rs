//! Response parsing errors.

use crm_validate::Issue;
use thiserror::Error;

/// The service response could not be turned into a usable value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResponseError {
    /// The text is not in the expected shape. `raw` holds the full
    /// response for diagnostics.
    #[error("Malformed response: {message}")]
    Malformed { message: String, raw: String },

    /// The document parsed but breaks mapping invariants.
    #[error("Response breaks {} mapping invariant(s)", .issues.len())]
    InvariantViolation { issues: Vec<Issue> },
}

impl ResponseError {
    pub fn malformed(message: impl Into<String>, raw: &str) -> Self {
        Self::Malformed {
            message: message.into(),
            raw: raw.to_string(),
        }
    }

    /// The raw response text, for malformed responses.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Malformed { raw, .. } => Some(raw),
            Self::InvariantViolation { .. } => None,
        }
    }

    /// Blocking issues, for invariant violations.
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::InvariantViolation { issues } => issues,
            Self::Malformed { .. } => &[],
        }
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => {
                "Re-run generation; the service did not return the requested format."
            }
            Self::InvariantViolation { .. } => {
                "Re-run generation or fix the listed rules before continuing."
            }
        }
    }
}

/// Result type alias for response parsing.
pub type Result<T> = std::result::Result<T, ResponseError>;
