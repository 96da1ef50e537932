//! Invariant checks, one module per concern.

pub mod attention;
pub mod numbering;
pub mod references;
pub mod rules;
pub mod summary;
pub mod targets;

/// Render a list of rule numbers for messages.
pub(crate) fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
