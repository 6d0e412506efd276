//! Closed set of property kinds understood by the codec
//!
//! `TypeKind` is the single dispatch point for the serializer and the mutator:
//! both match exhaustively on it, so adding a kind forces every consumer to
//! decide how to handle it.

mod ids;

use std::fmt::Display;

pub use ids::{ClassId, EnumId, StructId};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::constants::{KEYWORD_ARRAY, KEYWORD_MAP, KEYWORD_SET, POINTER_SUFFIX};

/// Shape of a reflected value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// Fixed-width integer
    Integer {
        /// Width in bits (8, 16, 32 or 64)
        width:  u8,
        /// Whether negative values are representable
        signed: bool,
    },
    /// IEEE floating point number
    FloatingPoint {
        /// Width in bits (32 or 64)
        width: u8,
    },
    /// Boolean flag
    Boolean,
    /// Plain string
    String,
    /// Interned identity string
    Name,
    /// Localizable display string
    Text,
    /// Enumeration stored as its numeric value
    Enum {
        /// Enum in the host registry
        enum_id: EnumId,
    },
    /// Reference to another object in the graph
    ObjectRef {
        /// Class the reference is constrained to
        class_id: ClassId,
    },
    /// Value-type aggregate with named fields
    Struct {
        /// Struct in the host registry
        struct_id: StructId,
    },
    /// Ordered, growable sequence
    Array {
        /// Element kind
        element: Box<Self>,
    },
    /// Unordered collection of unique elements
    Set {
        /// Element kind
        element: Box<Self>,
    },
    /// Key/value collection
    Map {
        /// Key kind, never a container
        key:   Box<Self>,
        /// Value kind
        value: Box<Self>,
    },
}

impl TypeKind {
    /// Create an `Array` of `element`
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Create a `Set` of `element`
    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::Set {
            element: Box::new(element),
        }
    }

    /// Create a `Map` from `key` to `value`
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key:   Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create an `ObjectRef` constrained to `class_id`
    #[must_use]
    pub fn object_ref(class_id: impl Into<ClassId>) -> Self {
        Self::ObjectRef {
            class_id: class_id.into(),
        }
    }

    /// Create a `Struct` of `struct_id`
    #[must_use]
    pub fn structure(struct_id: impl Into<StructId>) -> Self {
        Self::Struct {
            struct_id: struct_id.into(),
        }
    }

    /// Create an `Enum` of `enum_id`
    #[must_use]
    pub fn enumeration(enum_id: impl Into<EnumId>) -> Self {
        Self::Enum {
            enum_id: enum_id.into(),
        }
    }

    /// Array, set or map
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Array { .. } | Self::Set { .. } | Self::Map { .. })
    }

    /// Kinds whose values have a natural string form usable as a JSON object key
    #[must_use]
    pub const fn is_string_like(&self) -> bool {
        matches!(self, Self::String | Self::Name | Self::Text | Self::Enum { .. })
    }

    /// Container shape of this kind
    #[must_use]
    pub const fn container(&self) -> ContainerType {
        match self {
            Self::Array { .. } => ContainerType::Array,
            Self::Set { .. } => ContainerType::Set,
            Self::Map { .. } => ContainerType::Map,
            _ => ContainerType::None,
        }
    }
}

/// Renders the canonical signature; `Resolver::resolve` maps it back to an equal kind
/// for every integer width of 8, 16, 32 or 64 bits. Other widths render as
/// `int{width}`/`uint{width}` for diagnostics only.
impl Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer { width, signed } => match ScalarKeyword::for_integer(*width, *signed) {
                Some(keyword) => write!(f, "{keyword}"),
                None if *signed => write!(f, "int{width}"),
                None => write!(f, "uint{width}"),
            },
            Self::FloatingPoint { width } if *width <= 32 => write!(f, "{}", ScalarKeyword::Float),
            Self::FloatingPoint { .. } => write!(f, "{}", ScalarKeyword::Double),
            Self::Boolean => write!(f, "{}", ScalarKeyword::Bool),
            Self::String => write!(f, "{}", ScalarKeyword::String),
            Self::Name => write!(f, "{}", ScalarKeyword::Name),
            Self::Text => write!(f, "{}", ScalarKeyword::Text),
            Self::Enum { enum_id } => write!(f, "{enum_id}"),
            Self::ObjectRef { class_id } => write!(f, "{class_id}{POINTER_SUFFIX}"),
            Self::Struct { struct_id } => write!(f, "{struct_id}"),
            Self::Array { element } => write!(f, "{KEYWORD_ARRAY}<{element}>"),
            Self::Set { element } => write!(f, "{KEYWORD_SET}<{element}>"),
            Self::Map { key, value } => write!(f, "{KEYWORD_MAP}<{key},{value}>"),
        }
    }
}

/// Container shape of a resolved type, as an editor pin type would report it
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, AsRefStr)]
pub enum ContainerType {
    /// Not a container
    None,
    /// `Array<T>`
    Array,
    /// `Set<T>`
    Set,
    /// `Map<K,V>`
    Map,
}

/// Fixed keyword table of scalar type signatures
///
/// Keywords are case-sensitive. The aliases (`uint8`, `int`, `long`) are
/// accepted on input but never produced on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, AsRefStr, EnumString, EnumIter)]
pub enum ScalarKeyword {
    /// Signed 8-bit integer
    #[strum(to_string = "int8")]
    Int8,
    /// Unsigned 8-bit integer
    #[strum(to_string = "byte", serialize = "uint8")]
    Byte,
    /// Signed 16-bit integer
    #[strum(to_string = "int16")]
    Int16,
    /// Unsigned 16-bit integer
    #[strum(to_string = "uint16")]
    UInt16,
    /// Signed 32-bit integer
    #[strum(to_string = "int32", serialize = "int")]
    Int32,
    /// Unsigned 32-bit integer
    #[strum(to_string = "uint32")]
    UInt32,
    /// Signed 64-bit integer
    #[strum(to_string = "int64", serialize = "long")]
    Int64,
    /// Unsigned 64-bit integer
    #[strum(to_string = "uint64")]
    UInt64,
    /// 32-bit float
    #[strum(to_string = "float")]
    Float,
    /// 64-bit float
    #[strum(to_string = "double")]
    Double,
    /// Boolean
    #[strum(to_string = "bool")]
    Bool,
    /// Plain string
    #[strum(to_string = "string")]
    String,
    /// Interned name
    #[strum(to_string = "name")]
    Name,
    /// Localizable text
    #[strum(to_string = "text")]
    Text,
}

impl ScalarKeyword {
    /// The `TypeKind` this keyword denotes
    #[must_use]
    pub const fn kind(self) -> TypeKind {
        match self {
            Self::Int8 => TypeKind::Integer {
                width:  8,
                signed: true,
            },
            Self::Byte => TypeKind::Integer {
                width:  8,
                signed: false,
            },
            Self::Int16 => TypeKind::Integer {
                width:  16,
                signed: true,
            },
            Self::UInt16 => TypeKind::Integer {
                width:  16,
                signed: false,
            },
            Self::Int32 => TypeKind::Integer {
                width:  32,
                signed: true,
            },
            Self::UInt32 => TypeKind::Integer {
                width:  32,
                signed: false,
            },
            Self::Int64 => TypeKind::Integer {
                width:  64,
                signed: true,
            },
            Self::UInt64 => TypeKind::Integer {
                width:  64,
                signed: false,
            },
            Self::Float => TypeKind::FloatingPoint { width: 32 },
            Self::Double => TypeKind::FloatingPoint { width: 64 },
            Self::Bool => TypeKind::Boolean,
            Self::String => TypeKind::String,
            Self::Name => TypeKind::Name,
            Self::Text => TypeKind::Text,
        }
    }

    /// Keyword for an integer of the given shape, if the table has one
    #[must_use]
    pub const fn for_integer(width: u8, signed: bool) -> Option<Self> {
        match (width, signed) {
            (8, true) => Some(Self::Int8),
            (8, false) => Some(Self::Byte),
            (16, true) => Some(Self::Int16),
            (16, false) => Some(Self::UInt16),
            (32, true) => Some(Self::Int32),
            (32, false) => Some(Self::UInt32),
            (64, true) => Some(Self::Int64),
            (64, false) => Some(Self::UInt64),
            _ => None,
        }
    }
}

/// Output of the type-name resolver
///
/// Produced fresh per resolution; carries no identity beyond its structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Resolved kind, including registry identifiers
    pub kind:      TypeKind,
    /// Canonical signature of `kind`
    pub signature: String,
}

impl TypeDescriptor {
    /// Wrap a kind, computing its canonical signature
    #[must_use]
    pub fn new(kind: TypeKind) -> Self {
        let signature = kind.to_string();
        Self { kind, signature }
    }

    /// Container shape of the descriptor
    #[must_use]
    pub const fn container(&self) -> ContainerType { self.kind.container() }

    /// Innermost element kind: the element of arrays and sets, the value of maps
    #[must_use]
    pub fn terminal(&self) -> &TypeKind {
        let mut kind = &self.kind;
        loop {
            match kind {
                TypeKind::Array { element } | TypeKind::Set { element } => kind = element,
                TypeKind::Map { value, .. } => kind = value,
                _ => return kind,
            }
        }
    }

    /// Key kind for map descriptors
    #[must_use]
    pub fn map_key(&self) -> Option<&TypeKind> {
        match &self.kind {
            TypeKind::Map { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<TypeKind> for TypeDescriptor {
    fn from(kind: TypeKind) -> Self { Self::new(kind) }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.signature)
    }
}
