//! Addresses of storage slots inside a host object graph

use std::fmt::Display;

use crate::type_descriptor::TypeKind;

/// Host-assigned identity of an object in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    /// Wrap a raw host identifier
    #[must_use]
    pub const fn new(raw: u64) -> Self { Self(raw) }

    /// The raw host identifier
    #[must_use]
    pub const fn raw(self) -> u64 { self.0 }
}

impl Display for ObjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "#{}", self.0) }
}

/// One step from a slot to one of its children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotStep {
    /// Named field of an object or struct
    Field(String),
    /// Positional element of an array or set
    Element(usize),
    /// Key of the n-th map entry
    MapKey(usize),
    /// Value of the n-th map entry
    MapValue(usize),
}

/// Opaque address of a storage slot: an object plus the steps from its fields down
///
/// A `SlotRef` borrows nothing from the host. The host re-walks the steps on every
/// access, so a slot can be held while the host is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotRef {
    object: ObjectHandle,
    steps:  Vec<SlotStep>,
}

impl SlotRef {
    /// The field-set of `object` itself
    #[must_use]
    pub const fn root(object: ObjectHandle) -> Self {
        Self {
            object,
            steps: Vec::new(),
        }
    }

    /// Object owning the slot
    #[must_use]
    pub const fn object(&self) -> ObjectHandle { self.object }

    /// Steps from the object's field-set to the slot
    #[must_use]
    pub fn steps(&self) -> &[SlotStep] { &self.steps }

    /// Child slot for a named field
    #[must_use]
    pub fn field(&self, name: &str) -> Self { self.child(SlotStep::Field(name.to_string())) }

    /// Child slot for a container element
    #[must_use]
    pub fn element(&self, index: usize) -> Self { self.child(SlotStep::Element(index)) }

    /// Child slot for the key of a map entry
    #[must_use]
    pub fn map_key(&self, index: usize) -> Self { self.child(SlotStep::MapKey(index)) }

    /// Child slot for the value of a map entry
    #[must_use]
    pub fn map_value(&self, index: usize) -> Self { self.child(SlotStep::MapValue(index)) }

    fn child(&self, step: SlotStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            object: self.object,
            steps,
        }
    }
}

impl Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.object)?;
        for step in &self.steps {
            match step {
                SlotStep::Field(name) => write!(f, ".{name}")?,
                SlotStep::Element(index) => write!(f, "[{index}]")?,
                SlotStep::MapKey(index) => write!(f, "{{key {index}}}")?,
                SlotStep::MapValue(index) => write!(f, "{{value {index}}}")?,
            }
        }
        Ok(())
    }
}

/// A typed view of one storage slot
///
/// The kind is fixed when the view is created and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedValue {
    slot: SlotRef,
    kind: TypeKind,
}

impl ReflectedValue {
    /// Pair a slot with its kind
    #[must_use]
    pub const fn new(slot: SlotRef, kind: TypeKind) -> Self { Self { slot, kind } }

    /// Slot address
    #[must_use]
    pub const fn slot(&self) -> &SlotRef { &self.slot }

    /// Kind of the stored value
    #[must_use]
    pub const fn kind(&self) -> &TypeKind { &self.kind }

    /// View of a named field of this struct or object slot
    #[must_use]
    pub fn field(&self, name: &str, kind: TypeKind) -> Self { Self::new(self.slot.field(name), kind) }

    /// View of a container element of this slot
    #[must_use]
    pub fn element(&self, index: usize, kind: TypeKind) -> Self {
        Self::new(self.slot.element(index), kind)
    }
}
