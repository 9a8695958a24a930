//! The four validation rules from §4.B, run once over a fully parsed
//! [`Schema`] (so forward references between structs in the same file
//! resolve correctly — see the parser's module doc).
//!
//! Every rule below on failure returns `ripple_core::Error::Schema`
//! carrying the offending declaration's [`ripple_core::SourceSpan`].

use std::collections::HashSet;

use ripple_core::Error;

use crate::model::{ConstValue, Dimension, Schema, StructDef, TypeDescriptor};

const RESERVED_NAMES: &[&str] = &["byte", "boolean", "string"];

/// Runs every validation rule over `schema`, returning the first
/// violation found. A second schema sourced from an `include` (out of
/// scope for the parser here, since this crate parses a single file)
/// would be passed alongside `schema` in `peers` so user-type
/// references can resolve across files; callers with only one file
/// pass an empty slice.
pub fn validate(schema: &Schema, peers: &[&Schema]) -> Result<(), Error> {
    check_reserved_names(schema)?;
    check_constants(schema)?;
    for s in &schema.structs {
        check_var_dimensions(s)?;
        check_user_type_references(schema, peers, s)?;
    }
    check_no_composition_cycles(schema, peers)?;
    Ok(())
}

fn reserved_violation(name: &str, span: ripple_core::SourceSpan) -> Error {
    Error::Schema {
        span,
        message: format!("{name:?} is a reserved name (byte, boolean, string)"),
    }
}

fn check_reserved_names(schema: &Schema) -> Result<(), Error> {
    for s in &schema.structs {
        let bare = bare_name(&s.qualified_name);
        if RESERVED_NAMES.contains(&bare) {
            return Err(reserved_violation(bare, s.span));
        }
        for m in &s.members {
            if RESERVED_NAMES.contains(&m.name.as_str()) {
                return Err(reserved_violation(&m.name, m.span));
            }
        }
        for c in &s.constants {
            if RESERVED_NAMES.contains(&c.name.as_str()) {
                return Err(reserved_violation(&c.name, c.span));
            }
        }
    }
    for e in &schema.enums {
        let bare = bare_name(&e.qualified_name);
        if RESERVED_NAMES.contains(&bare) {
            return Err(reserved_violation(bare, e.span));
        }
        for (name, _) in &e.values {
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(reserved_violation(name, e.span));
            }
        }
    }
    Ok(())
}

fn bare_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn check_constants(schema: &Schema) -> Result<(), Error> {
    for s in &schema.structs {
        for c in &s.constants {
            let ok = match (&c.type_descriptor, &c.value) {
                (TypeDescriptor::I8 | TypeDescriptor::I16 | TypeDescriptor::I32 | TypeDescriptor::I64, ConstValue::Int(_)) => true,
                (TypeDescriptor::Byte, ConstValue::Int(n)) => (0..=255).contains(n),
                (TypeDescriptor::Bool, ConstValue::Int(n)) => *n == 0 || *n == 1,
                (TypeDescriptor::F32 | TypeDescriptor::F64, ConstValue::Float(_) | ConstValue::Int(_)) => true,
                _ => false,
            };
            if !ok {
                return Err(Error::Schema {
                    span: c.span,
                    message: format!(
                        "constant {:?} has a value that doesn't match its declared type",
                        c.name
                    ),
                });
            }
        }
    }
    Ok(())
}

fn check_var_dimensions(s: &StructDef) -> Result<(), Error> {
    for (idx, member) in s.members.iter().enumerate() {
        for dim in &member.dimensions {
            let Dimension::Var(field_name) = dim else {
                continue;
            };
            let earlier = s.members[..idx].iter().find(|m| &m.name == field_name);
            match earlier {
                Some(m) if m.type_descriptor.is_integer() => {}
                Some(_) => {
                    return Err(Error::Schema {
                        span: member.span,
                        message: format!(
                            "array dimension {field_name:?} on member {:?} must name an integer field",
                            member.name
                        ),
                    })
                }
                None => {
                    return Err(Error::Schema {
                        span: member.span,
                        message: format!(
                            "array dimension {field_name:?} on member {:?} must name a field declared earlier in the same struct",
                            member.name
                        ),
                    })
                }
            }
        }
    }
    Ok(())
}

fn resolve_user_type<'a>(schema: &'a Schema, peers: &[&'a Schema], name: &str) -> Option<UserTypeRef<'a>> {
    if let Some(s) = schema.find_struct(name).or_else(|| schema.find_struct(&format!("{}.{}", schema.package, name))) {
        return Some(UserTypeRef::Struct(s));
    }
    if schema.find_enum(name).or_else(|| schema.find_enum(&format!("{}.{}", schema.package, name))).is_some() {
        return Some(UserTypeRef::Enum);
    }
    for peer in peers {
        let qualified = format!("{}.{}", peer.package, name);
        if let Some(s) = peer.find_struct(name).or_else(|| peer.find_struct(&qualified)) {
            return Some(UserTypeRef::Struct(s));
        }
        if peer.find_enum(name).or_else(|| peer.find_enum(&qualified)).is_some() {
            return Some(UserTypeRef::Enum);
        }
    }
    None
}

enum UserTypeRef<'a> {
    Struct(&'a StructDef),
    Enum,
}

fn check_user_type_references(schema: &Schema, peers: &[&Schema], s: &StructDef) -> Result<(), Error> {
    for member in &s.members {
        if let TypeDescriptor::User(name) = &member.type_descriptor {
            if resolve_user_type(schema, peers, name).is_none() {
                return Err(Error::Schema {
                    span: member.span,
                    message: format!("member {:?} references unknown type {name:?}", member.name),
                });
            }
        }
    }
    Ok(())
}

/// Cycle detection through value (non-pointer) composition: struct A
/// cannot contain struct B as a by-value member if B (transitively)
/// contains A. Enums never participate since they carry no nested
/// user-type members.
fn check_no_composition_cycles(schema: &Schema, peers: &[&Schema]) -> Result<(), Error> {
    for s in &schema.structs {
        let mut stack = HashSet::new();
        walk_composition(schema, peers, s, &mut stack)?;
    }
    Ok(())
}

fn walk_composition<'a>(
    schema: &'a Schema,
    peers: &[&'a Schema],
    s: &'a StructDef,
    stack: &mut HashSet<&'a str>,
) -> Result<(), Error> {
    if !stack.insert(&s.qualified_name) {
        return Err(Error::Schema {
            span: s.span,
            message: format!("{:?} is composed of itself through a cycle of value members", s.qualified_name),
        });
    }
    for member in &s.members {
        if let TypeDescriptor::User(name) = &member.type_descriptor {
            if let Some(UserTypeRef::Struct(nested)) = resolve_user_type(schema, peers, name) {
                walk_composition(schema, peers, nested, stack)?;
            }
        }
    }
    stack.remove(s.qualified_name.as_str());
    Ok(())
}
