//! Storage tree behind every object of a [`MemoryModel`](super::MemoryModel)

use std::mem::discriminant;

use crate::reflection::{PropertyValue, SlotStep};

/// A stored value: a leaf payload or an aggregate of stored values
#[derive(Debug, Clone, PartialEq)]
pub(super) enum StoredValue {
    Scalar(PropertyValue),
    /// Named fields in declaration order
    Struct(Vec<(String, Self)>),
    /// Array or set elements
    List(Vec<Self>),
    /// Map entries in insertion order
    Map(Vec<(Self, Self)>),
}

impl StoredValue {
    fn child(&self, step: &SlotStep) -> Option<&Self> {
        match (self, step) {
            (Self::Struct(fields), SlotStep::Field(name)) => {
                fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
            },
            (Self::List(elements), SlotStep::Element(index)) => elements.get(*index),
            (Self::Map(entries), SlotStep::MapKey(index)) => entries.get(*index).map(|(key, _)| key),
            (Self::Map(entries), SlotStep::MapValue(index)) => entries.get(*index).map(|(_, value)| value),
            _ => None,
        }
    }

    fn child_mut(&mut self, step: &SlotStep) -> Option<&mut Self> {
        match (self, step) {
            (Self::Struct(fields), SlotStep::Field(name)) => fields
                .iter_mut()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            (Self::List(elements), SlotStep::Element(index)) => elements.get_mut(*index),
            (Self::Map(entries), SlotStep::MapKey(index)) => entries.get_mut(*index).map(|(key, _)| key),
            (Self::Map(entries), SlotStep::MapValue(index)) => {
                entries.get_mut(*index).map(|(_, value)| value)
            },
            _ => None,
        }
    }

    /// Follow `steps` down from this value
    pub(super) fn descend(&self, steps: &[SlotStep]) -> Option<&Self> {
        steps.iter().try_fold(self, |value, step| value.child(step))
    }

    /// Follow `steps` down from this value, mutably
    pub(super) fn descend_mut(&mut self, steps: &[SlotStep]) -> Option<&mut Self> {
        steps.iter().try_fold(self, |value, step| value.child_mut(step))
    }

    /// Element or entry count of a container
    pub(super) const fn len(&self) -> Option<usize> {
        match self {
            Self::List(elements) => Some(elements.len()),
            Self::Map(entries) => Some(entries.len()),
            Self::Scalar(_) | Self::Struct(_) => None,
        }
    }

    /// Replace a leaf payload with one of the same variant
    pub(super) fn assign(&mut self, value: PropertyValue) -> bool {
        match self {
            Self::Scalar(current) if discriminant(current) == discriminant(&value) => {
                *current = value;
                true
            },
            _ => false,
        }
    }
}
