//! Lexing of ASCII single-quoted literals out of a `ZenDSL` line.
//!
//! Quotes never nest and there are no escape sequences (`spec.md` §6): a `'`
//! always either opens or closes a span, alternating as the line is scanned
//! left to right.

use crate::errors::PatternError;
use std::ops::Range;

/// Byte ranges of each quoted span, in source order, *excluding* the quote
/// characters themselves.
///
/// # Errors
/// Returns [`PatternError::UnterminatedQuote`] if an opening `'` has no
/// matching closing `'` before the end of the line.
///
/// # Examples
/// ```
/// use zencode_patterns::quoted_spans;
/// let spans = quoted_spans("I am known as 'Alice'").unwrap();
/// assert_eq!(spans, vec![15..20]);
/// ```
pub fn quoted_spans(line: &str) -> Result<Vec<Range<usize>>, PatternError> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (idx, ch) in line.char_indices() {
        if ch != '\'' {
            continue;
        }
        match open.take() {
            Some(start) => spans.push(start..idx),
            None => open = Some(idx + 1),
        }
    }
    if let Some(start) = open {
        return Err(PatternError::UnterminatedQuote(start - 1));
    }
    Ok(spans)
}

/// Extracts the quoted literals from `line` in source order, replacing
/// interior whitespace with underscores (`spec.md` §4.2 step 6: "arguments
/// never contain whitespace").
///
/// # Errors
/// Returns [`PatternError::UnterminatedQuote`] for malformed quoting.
///
/// # Examples
/// ```
/// use zencode_patterns::extract_quoted_args;
/// let args = extract_quoted_args("Given I have 'a secret key'").unwrap();
/// assert_eq!(args, vec!["a_secret_key".to_string()]);
/// ```
pub fn extract_quoted_args(line: &str) -> Result<Vec<String>, PatternError> {
    let spans = quoted_spans(line)?;
    Ok(spans
        .into_iter()
        .map(|span| {
            line.get(span)
                .unwrap_or_default()
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect()
        })
        .collect())
}

/// Replaces every quoted span in `line` with the sentinel `''`, leaving the
/// rest of the line untouched.
///
/// # Errors
/// Returns [`PatternError::UnterminatedQuote`] for malformed quoting.
///
/// # Examples
/// ```
/// use zencode_patterns::replace_quotes_with_sentinel;
/// let out = replace_quotes_with_sentinel("I am known as 'Alice'").unwrap();
/// assert_eq!(out, "I am known as ''");
/// ```
pub fn replace_quotes_with_sentinel(line: &str) -> Result<String, PatternError> {
    let spans = quoted_spans(line)?;
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0usize;
    for span in spans {
        let quote_start = span.start - 1;
        let quote_end = span.end + 1;
        out.push_str(line.get(cursor..quote_start).unwrap_or_default());
        out.push_str("''");
        cursor = quote_end;
    }
    out.push_str(line.get(cursor..).unwrap_or_default());
    Ok(out)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests assert on panics to surface failures directly")]
mod tests {
    use super::*;

    #[test]
    fn finds_multiple_spans() {
        let spans = quoted_spans("pickin 'section' 'field'").unwrap();
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn errors_on_unterminated_quote() {
        let err = quoted_spans("I am known as 'Alice").unwrap_err();
        assert_eq!(err, PatternError::UnterminatedQuote(14));
    }

    #[test]
    fn extracts_args_with_underscored_spaces() {
        let args = extract_quoted_args("draft 'hello world'").unwrap();
        assert_eq!(args, vec!["hello_world".to_string()]);
    }

    #[test]
    fn replaces_multiple_quotes_with_sentinel() {
        let out = replace_quotes_with_sentinel("pickin 'section' 'field'").unwrap();
        assert_eq!(out, "pickin '' ''");
    }

    #[test]
    fn leaves_unquoted_line_untouched() {
        let out = replace_quotes_with_sentinel("I create the keypair").unwrap();
        assert_eq!(out, "I create the keypair");
    }
}
