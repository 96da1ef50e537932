//! Shared pieces of the `crm-mapper` binary.

pub mod files;
pub mod logging;
