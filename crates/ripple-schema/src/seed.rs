//! Computes the compile-time seed half of §4.C's type hash: folding a
//! struct's member names/shapes and constant name+values (or an
//! enum's value name+numbers) into the 64-bit accumulator
//! `ripple-codegen` bakes into each emitted `TypeHash::TYPE_SEED`.

use ripple_core::hash::{fold_seed, FOLD_SEED};

use crate::model::{ConstValue, Dimension, EnumDef, StructDef, TypeDescriptor};

/// The compile-time seed for a struct: member names and type+dimension
/// shapes, then constant names and values, folded in declaration
/// order. Nested struct hashes are *not* included here — that
/// composition happens at runtime-of-codegen via
/// `TypeHash::hash_recursive`.
pub fn struct_seed(s: &StructDef) -> u64 {
    let mut acc = FOLD_SEED;
    for member in &s.members {
        acc = fold_seed(acc, member.name.as_bytes());
        acc = fold_seed(acc, shape_code(&member.type_descriptor, &member.dimensions).as_bytes());
    }
    for constant in &s.constants {
        acc = fold_seed(acc, constant.name.as_bytes());
        acc = fold_seed(acc, &const_value_bytes(&constant.value));
    }
    acc
}

/// The seed for an enum: its values' names and numbers, in
/// declaration order. An enum never recurses — its hash *is* its
/// seed.
pub fn enum_seed(e: &EnumDef) -> u64 {
    let mut acc = FOLD_SEED;
    for (name, value) in &e.values {
        acc = fold_seed(acc, name.as_bytes());
        acc = fold_seed(acc, &value.to_be_bytes());
    }
    acc
}

fn shape_code(type_descriptor: &TypeDescriptor, dimensions: &[Dimension]) -> String {
    let mut code = match type_descriptor {
        TypeDescriptor::User(name) => format!("user:{name}"),
        other => other.keyword().expect("primitive has a keyword").to_string(),
    };
    for dim in dimensions {
        match dim {
            Dimension::Const(n) => code.push_str(&format!("[{n}]")),
            Dimension::Var(field) => code.push_str(&format!("[${field}]")),
        }
    }
    code
}

fn const_value_bytes(value: &ConstValue) -> Vec<u8> {
    match value {
        ConstValue::Int(n) => n.to_be_bytes().to_vec(),
        ConstValue::Float(f) => f.to_be_bytes().to_vec(),
    }
}
