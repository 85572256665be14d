//! Error types shared by the pattern parsing modules.

use thiserror::Error;

/// Errors surfaced while lexing quoted literals out of a `ZenDSL` line.
///
/// # Examples
/// ```
/// use zencode_patterns::PatternError;
/// let err = PatternError::UnterminatedQuote(7);
/// assert_eq!(err.to_string(), "unterminated quote starting at byte 7 (zero-based)");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `'` was opened but never closed before the end of the line.
    #[error("unterminated quote starting at byte {0} (zero-based)")]
    UnterminatedQuote(usize),
}
