//! The code emitter (§4.D): turns a validated `ripple_schema::Schema`
//! into the Rust source a struct's/enum's wire, hash, and pub/sub glue
//! routines are built from.

pub mod emit;

pub use emit::emit_schema;
