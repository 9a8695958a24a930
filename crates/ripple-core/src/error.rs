//! The error type shared by every Ripple crate.
//!
//! One enum, one kind per failure mode named in the wire/runtime
//! contract. Callers match on the variant, never on a message string.

use std::fmt;

/// Errors that can arise anywhere in the Ripple stack: wire decode,
/// schema compilation, URL parsing, or runtime/provider failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed provider URL (`scheme://target?k=v`).
    #[error("malformed url: {0}")]
    Url(String),

    /// The URL names a scheme with no registered provider.
    #[error("no provider registered for scheme {0:?}")]
    NoProvider(String),

    /// A provider's `create`/`publish`/`handle`/fd-ready call failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The code generator rejected a schema.
    #[error("schema error at {span}: {message}")]
    Schema { span: SourceSpan, message: String },

    /// Encoding would write past the caller-supplied buffer.
    #[error("encode overflow: {attempted} bytes requested, {available} available")]
    EncodeOverflow { attempted: usize, available: usize },

    /// Decoding ran off the end of the buffer.
    #[error("decode truncated: needed {needed} bytes, {available} available")]
    DecodeTruncated { needed: usize, available: usize },

    /// The frame's 8-byte hash prefix didn't match the expected type hash.
    #[error("hash mismatch: expected {expected:#018x}, got {actual:#018x}")]
    HashMismatch { expected: i64, actual: i64 },

    /// `unsubscribe` was called with an id the registry has never issued,
    /// or one that has already been removed.
    #[error("no such subscription")]
    NotFound,

    /// A subscribe pattern failed to compile as an extended regex.
    #[error("invalid subscription pattern {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A decoded `i32` didn't match any discriminant of the named
    /// generated enum.
    #[error("{type_name}: {value} is not a known enum value")]
    UnknownEnumValue { type_name: &'static str, value: i32 },
}

/// A 1-indexed line/column into a schema source file.
///
/// Carried on [`Error::Schema`] so a generator CLI (out of scope here)
/// has what it needs to print a `file:line:col` diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

// `regex::Error` isn't available unless the `regex` crate is a dependency of
// this crate too; it is, so that `Error::Regex` can be constructed here and
// matched uniformly across `ripple-runtime`.
