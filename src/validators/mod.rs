/// Input normalization and validation helpers for the workflow layer
///
/// Workflows re-check their preconditions here even though the presentation
/// layer validates forms upstream; nothing below the workflow layer trusts
/// its caller.
use validator::Validate;

use crate::error::{AppError, Result};

/// Maximum length of a document key at the remote store.
const MAX_IDENTIFIER_LEN: usize = 36;

/// Normalize an externally supplied account id into a valid document key.
///
/// Strips every character outside `[A-Za-z0-9-_.]`, truncates to 36
/// characters, and prefixes with `u` (dropping the overflowing last
/// character) when the result does not start with an ASCII alphanumeric.
/// Total, deterministic, and idempotent on its own output.
pub fn sanitize_identifier(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .take(MAX_IDENTIFIER_LEN)
        .collect();

    match cleaned.chars().next() {
        Some(first) if first.is_ascii_alphanumeric() => cleaned,
        _ => {
            let mut prefixed = String::with_capacity(MAX_IDENTIFIER_LEN);
            prefixed.push('u');
            prefixed.extend(cleaned.chars().take(MAX_IDENTIFIER_LEN - 1));
            prefixed
        }
    }
}

/// Parse a comma-separated tag string into an ordered, de-duplicated set.
///
/// Whitespace around each tag is stripped and empty segments are dropped,
/// so `"a,b, c"` and `""` become `["a","b","c"]` and `[]`.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Run derive-based validation on a workflow input, mapping the first
/// failure into [`AppError::Validation`] before any remote call is made.
pub fn check<T: Validate>(input: &T) -> Result<()> {
    let Err(errors) = input.validate() else {
        return Ok(());
    };

    let field_errors = errors.field_errors();
    let (field, message) = field_errors
        .iter()
        .next()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|err| err.message.as_ref())
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| "invalid value".to_string());
            ((*field).to_string(), message)
        })
        .unwrap_or_else(|| ("input".to_string(), "invalid value".to_string()));

    Err(AppError::Validation { field, message })
}
