//! Shared primitives for the Ripple pub/sub stack: the wire codec, the
//! type-hash algorithm, the error type, and provider URL parsing.
//!
//! Everything in this crate is generated-code-facing or runtime-facing
//! plumbing with no schema or transport logic of its own — see
//! `ripple-schema`, `ripple-codegen`, and `ripple-runtime` for those.

pub mod error;
pub mod hash;
pub mod url;
pub mod wire;

pub use error::{Error, SourceSpan};
pub use hash::TypeHash;
pub use url::ParsedUrl;
pub use wire::Codec;
