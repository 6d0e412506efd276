//! Property codec: encodes reflected objects into a JSON value tree
//!
//! Encoding never fails. A field that cannot be encoded (unknown struct, unreadable
//! slot, non-finite float) is left out of its object with a `warn` diagnostic;
//! a container element that cannot be encoded becomes `null` so positions are kept.
//!
//! Object references expand inline only when the referenced object's class is on the
//! configured allow-list and the object is not already being encoded further up the
//! stack. Every other reference encodes as the object's identity string.

use serde_json::{Map, Number, Value};
use tracing::{trace, warn};

use crate::config::CodecConfig;
use crate::constants::{MAP_ENTRY_KEY, MAP_ENTRY_VALUE};
use crate::reflection::{FieldInfo, ObjectHandle, ObjectModel, PropertyValue, ReflectedValue, SlotRef};
use crate::type_descriptor::{EnumId, TypeKind};

/// Encodes objects and values of a host graph
pub struct PropertySerializer<'a, H: ObjectModel + ?Sized> {
    host:   &'a H,
    config: &'a CodecConfig,
}

impl<'a, H: ObjectModel + ?Sized> PropertySerializer<'a, H> {
    /// Create a serializer over `host`
    #[must_use]
    pub const fn new(host: &'a H, config: &'a CodecConfig) -> Self { Self { host, config } }

    /// Encode every persisted field of `object`
    ///
    /// An object without a known class encodes as `null`.
    #[must_use]
    pub fn encode_object(&self, object: ObjectHandle) -> Value {
        let mut visiting = Vec::new();
        self.encode_object_fields(object, &mut visiting)
    }

    /// Encode a single value; `None` when it cannot be encoded
    #[must_use]
    pub fn encode_value(&self, value: &ReflectedValue) -> Option<Value> {
        let mut visiting = vec![value.slot().object()];
        self.encode_slot(value.slot(), value.kind(), &mut visiting)
    }

    /// Encode `object` as compact JSON text
    #[must_use]
    pub fn to_json_string(&self, object: ObjectHandle) -> String { self.encode_object(object).to_string() }

    fn encode_object_fields(&self, object: ObjectHandle, visiting: &mut Vec<ObjectHandle>) -> Value {
        let Some(class) = self.host.class_of(object) else {
            warn!(object = %object, "Object has no class; encoding as null");
            return Value::Null;
        };
        let Some(fields) = self.host.class_fields(&class) else {
            warn!(object = %object, class_id = %class, "Unknown class; encoding as null");
            return Value::Null;
        };

        visiting.push(object);
        let encoded = self.encode_fields(&SlotRef::root(object), &fields, visiting);
        visiting.pop();
        Value::Object(encoded)
    }

    fn encode_fields(
        &self,
        owner: &SlotRef,
        fields: &[FieldInfo],
        visiting: &mut Vec<ObjectHandle>,
    ) -> Map<String, Value> {
        let mut encoded = Map::new();
        for field in fields {
            if field.skipped_when_encoding() {
                trace!(field = %field.name, "Skipping transient field");
                continue;
            }
            let slot = owner.field(&field.name);
            match self.encode_slot(&slot, &field.kind, visiting) {
                Some(value) => {
                    encoded.insert(field.name.clone(), value);
                },
                None => warn!(field = %field.name, kind = %field.kind, slot = %slot, "Omitting field"),
            }
        }
        encoded
    }

    fn encode_slot(&self, slot: &SlotRef, kind: &TypeKind, visiting: &mut Vec<ObjectHandle>) -> Option<Value> {
        match kind {
            TypeKind::Integer { .. } => match self.read(slot, kind)? {
                PropertyValue::Integer(value) => Some(Value::from(value)),
                other => Self::mismatch(slot, kind, &other),
            },
            TypeKind::FloatingPoint { .. } => match self.read(slot, kind)? {
                PropertyValue::Float(value) => Number::from_f64(value).map(Value::Number),
                other => Self::mismatch(slot, kind, &other),
            },
            TypeKind::Boolean => match self.read(slot, kind)? {
                PropertyValue::Bool(value) => Some(Value::Bool(value)),
                other => Self::mismatch(slot, kind, &other),
            },
            TypeKind::String | TypeKind::Name | TypeKind::Text => match self.read(slot, kind)? {
                PropertyValue::String(value) | PropertyValue::Name(value) | PropertyValue::Text(value) => {
                    Some(Value::String(value))
                },
                other => Self::mismatch(slot, kind, &other),
            },
            TypeKind::Enum { enum_id } => match self.read(slot, kind)? {
                PropertyValue::Enum(value) => Some(self.encode_enum(enum_id, value)),
                other => Self::mismatch(slot, kind, &other),
            },
            TypeKind::ObjectRef { .. } => match self.read(slot, kind)? {
                PropertyValue::Object(None) => Some(Value::Null),
                PropertyValue::Object(Some(object)) => self.encode_reference(object, visiting),
                other => Self::mismatch(slot, kind, &other),
            },
            TypeKind::Struct { struct_id } => {
                let Some(fields) = self.host.struct_fields(struct_id) else {
                    warn!(struct_id = %struct_id, slot = %slot, "Unknown struct");
                    return None;
                };
                Some(Value::Object(self.encode_fields(slot, &fields, visiting)))
            },
            TypeKind::Array { element } | TypeKind::Set { element } => {
                let len = self.len(slot)?;
                let elements = (0..len)
                    .map(|index| {
                        self.encode_slot(&slot.element(index), element, visiting)
                            .unwrap_or_else(|| {
                                warn!(slot = %slot, index, "Encoding element as null");
                                Value::Null
                            })
                    })
                    .collect();
                Some(Value::Array(elements))
            },
            TypeKind::Map { key, value } => self.encode_map(slot, key, value, visiting),
        }
    }

    /// String-like keys produce an object, any other key kind an array of entries
    fn encode_map(
        &self,
        slot: &SlotRef,
        key: &TypeKind,
        value: &TypeKind,
        visiting: &mut Vec<ObjectHandle>,
    ) -> Option<Value> {
        let len = self.len(slot)?;
        let mut entries = Vec::with_capacity(len);
        for index in 0..len {
            let (Some(encoded_key), Some(encoded_value)) = (
                self.encode_slot(&slot.map_key(index), key, visiting),
                self.encode_slot(&slot.map_value(index), value, visiting),
            ) else {
                warn!(slot = %slot, index, "Omitting map entry");
                continue;
            };
            entries.push((encoded_key, encoded_value));
        }

        if key.is_string_like() {
            let object = entries
                .into_iter()
                .map(|(key, value)| match key {
                    Value::String(key) => (key, value),
                    other => (other.to_string(), value),
                })
                .collect();
            Some(Value::Object(object))
        } else {
            let pairs = entries
                .into_iter()
                .map(|(key, value)| {
                    let mut pair = Map::new();
                    pair.insert(MAP_ENTRY_KEY.to_string(), key);
                    pair.insert(MAP_ENTRY_VALUE.to_string(), value);
                    Value::Object(pair)
                })
                .collect();
            Some(Value::Array(pairs))
        }
    }

    /// Known enumerators encode by name, anything else as the raw number
    fn encode_enum(&self, enum_id: &EnumId, value: i64) -> Value {
        let Some(info) = self.host.enum_info(enum_id) else {
            warn!(enum_id = %enum_id, value, "Unknown enum; encoding raw value");
            return Value::from(value);
        };
        info.name_of(value)
            .map_or_else(|| Value::from(value), |name| Value::String(name.to_string()))
    }

    fn encode_reference(&self, object: ObjectHandle, visiting: &mut Vec<ObjectHandle>) -> Option<Value> {
        let expand = !visiting.contains(&object)
            && self
                .host
                .class_of(object)
                .is_some_and(|class| self.config.is_detail_class(self.host, &class));
        if expand {
            return Some(self.encode_object_fields(object, visiting));
        }

        let identity = self.host.object_identity(object);
        if identity.is_none() {
            warn!(object = %object, "Referenced object has no identity");
        }
        identity.map(Value::String)
    }

    fn read(&self, slot: &SlotRef, kind: &TypeKind) -> Option<PropertyValue> {
        let value = self.host.read(slot);
        if value.is_none() {
            warn!(slot = %slot, kind = %kind, "Slot is unreadable");
        }
        value
    }

    fn len(&self, slot: &SlotRef) -> Option<usize> {
        let len = self.host.container_len(slot);
        if len.is_none() {
            warn!(slot = %slot, "Container length is unavailable");
        }
        len
    }

    fn mismatch(slot: &SlotRef, kind: &TypeKind, value: &PropertyValue) -> Option<Value> {
        warn!(slot = %slot, kind = %kind, payload = value.as_ref(), "Slot holds a payload of another kind");
        None
    }
}

#[cfg(test)]
mod tests;
