//! The injected object-model capability
//!
//! The serializer and mutator never touch host storage directly. Everything they
//! know about the object graph comes through [`ObjectModel`]: schema lookups
//! (fields of a class or struct, enumerators of an enum), slot access addressed by
//! [`SlotRef`], container growth, and object construction and loading.

mod slot;

pub use slot::{ObjectHandle, ReflectedValue, SlotRef, SlotStep};
use strum::AsRefStr;

use crate::type_descriptor::{ClassId, EnumId, StructId, TypeKind};

/// A declared field of a class or struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name as it appears in paths and encoded output
    pub name:                String,
    /// Declared kind
    pub kind:                TypeKind,
    /// Runtime-only field, never persisted
    pub transient:           bool,
    /// Field excluded when the owner is duplicated
    pub duplicate_transient: bool,
}

impl FieldInfo {
    /// A persisted field
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transient: false,
            duplicate_transient: false,
        }
    }

    /// Mark the field transient
    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Mark the field duplicate-transient
    #[must_use]
    pub const fn duplicate_transient(mut self) -> Self {
        self.duplicate_transient = true;
        self
    }

    /// Whether the serializer leaves this field out
    #[must_use]
    pub const fn skipped_when_encoding(&self) -> bool { self.transient || self.duplicate_transient }
}

/// One named value of an enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    /// Symbolic name, optionally qualified as `EType::Name`
    pub name:  String,
    /// Numeric value
    pub value: i64,
}

/// Enumerators of an enum, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    /// Enum in the host registry
    pub id:          EnumId,
    /// Declared enumerators
    pub enumerators: Vec<Enumerator>,
}

impl EnumInfo {
    /// Symbolic name of `value`, if it is a known enumerator
    #[must_use]
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.enumerators
            .iter()
            .find(|enumerator| enumerator.value == value)
            .map(|enumerator| enumerator.name.as_str())
    }

    /// Numeric value of a symbolic name
    ///
    /// Qualified (`EColor::Red`) and unqualified (`Red`) spellings match each other.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i64> {
        let wanted = unqualified(name);
        self.enumerators
            .iter()
            .find(|enumerator| enumerator.name == name || unqualified(&enumerator.name) == wanted)
            .map(|enumerator| enumerator.value)
    }

    /// Whether `value` is a declared enumerator value
    #[must_use]
    pub fn contains_value(&self, value: i64) -> bool { self.name_of(value).is_some() }
}

fn unqualified(name: &str) -> &str { name.rsplit("::").next().unwrap_or(name) }

/// Scalar payload read from or written to a leaf slot
#[derive(Debug, Clone, PartialEq, AsRefStr)]
pub enum PropertyValue {
    /// Any integer width, sign-extended
    Integer(i64),
    /// Any float width
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Plain string
    String(String),
    /// Interned name
    Name(String),
    /// Localizable text
    Text(String),
    /// Numeric enum value, possibly outside the declared enumerators
    Enum(i64),
    /// Object reference; `None` is the null reference
    Object(Option<ObjectHandle>),
}

/// Host object graph as seen by the codec
///
/// Slot access methods return `None` or `false` when the slot does not exist or the
/// payload does not match the slot's kind; the caller turns that into a diagnostic.
pub trait ObjectModel {
    /// Fields of a class, inherited fields first
    fn class_fields(&self, class: &ClassId) -> Option<Vec<FieldInfo>>;

    /// Fields of a struct
    fn struct_fields(&self, id: &StructId) -> Option<Vec<FieldInfo>>;

    /// Enumerators of an enum
    fn enum_info(&self, id: &EnumId) -> Option<EnumInfo>;

    /// Whether `class` is `ancestor` or derives from it
    fn is_child_of(&self, class: &ClassId, ancestor: &ClassId) -> bool;

    /// Runtime class of an object
    fn class_of(&self, object: ObjectHandle) -> Option<ClassId>;

    /// Durable identity (path) string of an object
    fn object_identity(&self, object: ObjectHandle) -> Option<String>;

    /// Read a leaf slot
    fn read(&self, slot: &SlotRef) -> Option<PropertyValue>;

    /// Write a leaf slot
    fn write(&mut self, slot: &SlotRef, value: PropertyValue) -> bool;

    /// Number of elements (or map entries) in a container slot
    fn container_len(&self, slot: &SlotRef) -> Option<usize>;

    /// Grow an array or set slot to at least `len` default-constructed elements of `element`
    fn grow_container(&mut self, slot: &SlotRef, element: &TypeKind, len: usize) -> bool;

    /// Default-construct a new object of `class`
    fn instantiate(&mut self, class: &ClassId) -> Option<ObjectHandle>;

    /// Load an existing object of `class` (or a subclass) by identity
    fn load_object(&self, class: &ClassId, identity: &str) -> Option<ObjectHandle>;

    /// Notify the host that `object` was modified through a path write
    fn mark_modified(&mut self, _object: ObjectHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collision_channel() -> EnumInfo {
        EnumInfo {
            id:          EnumId::from("ECollisionChannel"),
            enumerators: vec![
                Enumerator {
                    name:  "ECollisionChannel::WorldStatic".to_string(),
                    value: 0,
                },
                Enumerator {
                    name:  "ECollisionChannel::Pawn".to_string(),
                    value: 3,
                },
            ],
        }
    }

    #[test]
    fn test_enum_name_lookup_ignores_qualification() {
        let info = collision_channel();
        assert_eq!(info.value_of("Pawn"), Some(3));
        assert_eq!(info.value_of("ECollisionChannel::Pawn"), Some(3));
        assert_eq!(info.value_of("Vehicle"), None);
        assert_eq!(info.name_of(0), Some("ECollisionChannel::WorldStatic"));
        assert!(!info.contains_value(7));
    }

    #[test]
    fn test_transient_fields_are_skipped() {
        let field = FieldInfo::new("Cache", TypeKind::Boolean).duplicate_transient();
        assert!(field.skipped_when_encoding());
        assert!(!FieldInfo::new("Health", TypeKind::Boolean).skipped_when_encoding());
    }
}
