//! Code-fence stripping for service responses.
//!
//! A response may be wrapped in one triple-backtick fence, optionally
//! tagged `json`, `csv` or `plaintext` (tags are case-sensitive). Any other
//! wrapping is malformed.

use crate::error::{ResponseError, Result};

const FENCE: &str = "```";

/// Tags accepted after an opening fence. The empty tag is a bare fence.
pub const ALLOWED_TAGS: [&str; 4] = ["", "json", "csv", "plaintext"];

/// Return the payload inside an optional fence, trimmed.
///
/// Unfenced text is returned trimmed, so the function is idempotent on
/// clean input.
pub fn strip_fence(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        if trimmed.ends_with(FENCE) {
            return Err(ResponseError::malformed(
                "closing code fence without an opening fence",
                raw,
            ));
        }
        return Ok(trimmed);
    };

    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let (tag, body) = rest.split_at(tag_len);
    if !ALLOWED_TAGS.contains(&tag) {
        return Err(ResponseError::malformed(
            format!("unsupported code fence tag '{tag}'"),
            raw,
        ));
    }

    let Some(inner) = body.strip_suffix(FENCE) else {
        return Err(ResponseError::malformed("unterminated code fence", raw));
    };
    Ok(inner.trim())
}
