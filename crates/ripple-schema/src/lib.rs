//! The `.ripple` IDL: the structural model, a hand-written parser, the
//! four schema validation rules, and the compile-time hash seed that
//! feeds `ripple-codegen`'s emitted `TypeHash` impls.

pub mod model;
pub mod parser;
pub mod seed;
pub mod validate;

pub use model::{Constant, ConstValue, Dimension, EnumDef, Member, Schema, StructDef, TypeDescriptor};
pub use parser::parse;
pub use validate::validate;
