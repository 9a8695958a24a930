//! The structural types a parsed `.ripple` file is built from (§3 of
//! the wire contract: Type descriptor, Dimension, Member, Struct,
//! Enum), plus the `Schema` container the parser produces and the
//! emitter consumes.

use ripple_core::SourceSpan;

/// One of the primitive wire types, or a reference to a user-defined
/// struct/enum named by its dotted `package.Name` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Byte,
    String,
    User(String),
}

impl TypeDescriptor {
    /// The keyword this primitive is spelled with in `.ripple` source,
    /// or `None` for [`TypeDescriptor::User`].
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Bool => Some("boolean"),
            Self::I8 => Some("i8"),
            Self::I16 => Some("i16"),
            Self::I32 => Some("i32"),
            Self::I64 => Some("i64"),
            Self::F32 => Some("f32"),
            Self::F64 => Some("f64"),
            Self::Byte => Some("byte"),
            Self::String => Some("string"),
            Self::User(_) => None,
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "boolean" => Self::Bool,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "byte" => Self::Byte,
            "string" => Self::String,
            _ => return None,
        })
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }
}

/// An array dimension: a literal size, or the name of a sibling
/// integer field carrying the runtime length. Order matters — a
/// member's `dimensions` list is read outer-to-inner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dimension {
    Const(u32),
    Var(String),
}

/// One field of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub type_descriptor: TypeDescriptor,
    pub dimensions: Vec<Dimension>,
    pub span: SourceSpan,
}

impl Member {
    pub fn is_scalar(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// A literal constant value, typed by the constant's declared
/// primitive type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
}

/// A `const TYPE NAME = VALUE;` declaration inside a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub type_descriptor: TypeDescriptor,
    pub value: ConstValue,
    pub span: SourceSpan,
}

/// A parsed `struct` declaration. Member order is wire order —
/// reordering members changes both the encoded layout and the hash.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub qualified_name: String,
    pub members: Vec<Member>,
    pub constants: Vec<Constant>,
    pub span: SourceSpan,
}

/// A parsed `enum` declaration. Wire representation is always `i32`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub qualified_name: String,
    pub values: Vec<(String, i32)>,
    pub span: SourceSpan,
}

/// Everything a single `.ripple` source file declares: its package
/// name plus every struct and enum defined in it, in declaration
/// order. This is the unit the validator and emitter operate over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub package: String,
    pub structs: Vec<StructDef>,
    pub enums: Vec<EnumDef>,
}

impl Schema {
    /// Looks up a struct or enum declared in this schema by its
    /// unqualified name (the validator resolves a bare `Name` member
    /// type against the enclosing package first).
    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.qualified_name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.qualified_name == name)
    }
}
