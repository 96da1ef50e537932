//! Column-mapping rule model for donation export transformations.
//!
//! A [`MappingDocument`] holds one [`ColumnMapping`] per target CRM column
//! plus a declared [`MappingSummary`]. Summaries are always derivable with
//! [`recompute_summary`]; edits go through [`apply_edit`] and return new
//! values.

pub mod crm;
pub mod edit;
pub mod enums;
pub mod error;
pub mod mapping;
pub mod record;
pub mod sample;
pub mod summary;

pub use crm::CrmTarget;
pub use edit::{
    DEFAULT_SEPARATOR, EditRequest, TemplateOptions, apply_edit, apply_edit_checked,
    check_source_fields, static_value, template_logic,
};
pub use enums::{Confidence, RuleType};
pub use error::{EditError, Result, SampleError};
pub use mapping::{
    ColumnMapping, ConfidenceBreakdown, MappingDocument, MappingSummary, RulesByType,
};
pub use record::{RowRecord, ordered_values};
pub use sample::{SourceSample, TargetSchema};
pub use summary::recompute_summary;
