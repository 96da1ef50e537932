//! Requests to and responses from the completion service.
//!
//! - [`build_request`] renders the rule generation request.
//! - [`parse_response`] turns the answer into a validated
//!   [`MappingDocument`](crm_model::MappingDocument).
//! - [`build_transform_request`] and [`parse_transform_response`] apply a
//!   finished document to source data.

pub mod error;
pub mod fence;
pub mod request;
pub mod response;
pub mod transform;

pub use error::{ResponseError, Result};
pub use fence::{ALLOWED_TAGS, strip_fence};
pub use request::build_request;
pub use response::{parse_response, parse_response_with};
pub use transform::{DEFAULT_PREVIEW_ROWS, build_transform_request, parse_transform_response};
