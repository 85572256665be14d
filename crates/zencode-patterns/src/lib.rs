//! Shared line-parsing utilities for `ZenDSL`.
//!
//! The crate exposes the leading-keyword vocabulary, the quoted-literal
//! lexer, and the candidate-pattern normalizer used by the line parser
//! (`spec.md` §4.2) to turn a raw script line into a phase prefix, an
//! ordered list of argument strings, and a pattern string suitable for
//! registry lookup.

mod errors;
mod keyword;
pub mod pattern;
mod quote;

pub use errors::PatternError;
pub use keyword::{Prefix, UnknownPrefix, split_prefix};
pub use pattern::candidate_pattern;
pub use quote::{extract_quoted_args, quoted_spans, replace_quotes_with_sentinel};
