//! Integration tests exercising the full stack: schema parsing and
//! validation, code generation fidelity against the checked-in
//! `ripple-chat-types` fixture, the wire codec, the type hash, the
//! subscription registry, and the runtime facade.

mod chat_pipeline;
mod hash;
mod registry_dispatch;
mod runtime;
mod wire;
