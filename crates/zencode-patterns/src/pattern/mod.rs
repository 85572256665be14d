//! Candidate-pattern construction from a prefix-stripped line remainder.

use crate::errors::PatternError;
use crate::quote::replace_quotes_with_sentinel;

/// Filler words optionally following the phase keyword, tried in this
/// priority order; only the first match is stripped (`spec.md` §4.2 step 5).
const FILLERS: [&str; 5] = ["when ", "then ", "given ", "and ", "that "];

/// Strips at most one leading filler word from an already-lowercased string.
fn strip_filler_prefix(s: &str) -> &str {
    for filler in FILLERS {
        if let Some(rest) = s.strip_prefix(filler) {
            return rest;
        }
    }
    s
}

/// Builds the candidate pattern used for registry lookup from the portion of
/// a line remaining after its phase keyword has been removed by
/// [`split_prefix`](crate::split_prefix).
///
/// Every quoted literal is replaced by the `''` sentinel, the result is
/// lowercased, and a single leading filler word (`that`, a repeated phase
/// keyword, and so on) is stripped.
///
/// # Errors
/// Returns [`PatternError::UnterminatedQuote`] for malformed quoting.
///
/// # Examples
/// ```
/// use zencode_patterns::{split_prefix, candidate_pattern};
/// let (_, rest) = split_prefix("Given that I am known as 'Alice'").unwrap();
/// assert_eq!(candidate_pattern(rest).unwrap(), "i am known as ''");
/// ```
pub fn candidate_pattern(rest_after_prefix: &str) -> Result<String, PatternError> {
    let sentinelled = replace_quotes_with_sentinel(rest_after_prefix)?;
    let lowered = sentinelled.to_lowercase();
    Ok(strip_filler_prefix(&lowered).to_string())
}
