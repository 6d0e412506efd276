//! In-memory reflected object graph
//!
//! [`MemoryModel`] is a complete host for the codec: it owns a schema of classes
//! (with single inheritance), structs and enums, plus an arena of objects whose
//! storage is a tree of stored values. It implements both [`ObjectModel`] and
//! [`TypeRegistry`], so it can resolve signatures, be encoded and be mutated.
//!
//! Build one programmatically with [`MemoryModel::define_struct`],
//! [`MemoryModel::define_enum`], [`MemoryModel::define_class`] and
//! [`MemoryModel::spawn`], or from a JSON schema document with
//! [`MemoryModel::from_schema_json`].

#[cfg(test)]
pub(crate) mod fixture;
mod schema;
mod stored_value;

use std::collections::BTreeMap;

use error_stack::Report;
use stored_value::StoredValue;
use tracing::{debug, trace, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::reflection::{EnumInfo, Enumerator, FieldInfo, ObjectHandle, ObjectModel, PropertyValue, SlotRef};
use crate::resolver::TypeRegistry;
use crate::type_descriptor::{ClassId, EnumId, StructId, TypeKind};

/// Package that default-constructed objects are named under
const TRANSIENT_PACKAGE: &str = "/Engine/Transient";

#[derive(Debug, Clone)]
struct ClassDef {
    parent: Option<ClassId>,
    fields: Vec<FieldInfo>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    class:    ClassId,
    identity: String,
    value:    StoredValue,
}

/// An object graph held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryModel {
    structs:       BTreeMap<StructId, Vec<FieldInfo>>,
    enums:         BTreeMap<EnumId, EnumInfo>,
    classes:       BTreeMap<ClassId, ClassDef>,
    objects:       BTreeMap<ObjectHandle, StoredObject>,
    modifications: BTreeMap<ObjectHandle, usize>,
    next_handle:   u64,
}

impl MemoryModel {
    /// An empty model
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register (or replace) a struct
    pub fn define_struct(&mut self, id: impl Into<StructId>, fields: Vec<FieldInfo>) {
        let id = id.into();
        debug!(struct_id = %id, fields = fields.len(), "Defining struct");
        self.structs.insert(id, fields);
    }

    /// Register (or replace) an enum from `(name, value)` pairs
    pub fn define_enum<N: Into<String>>(
        &mut self,
        id: impl Into<EnumId>,
        enumerators: impl IntoIterator<Item = (N, i64)>,
    ) {
        let id = id.into();
        let enumerators = enumerators
            .into_iter()
            .map(|(name, value)| Enumerator {
                name: name.into(),
                value,
            })
            .collect();
        debug!(enum_id = %id, "Defining enum");
        self.enums.insert(id.clone(), EnumInfo { id, enumerators });
    }

    /// Register (or replace) a class deriving from `parent`
    ///
    /// The parent must already be defined and must not be the class itself or one of
    /// its descendants.
    pub fn define_class(
        &mut self,
        id: impl Into<ClassId>,
        parent: Option<ClassId>,
        fields: Vec<FieldInfo>,
    ) -> ConfigResult<()> {
        let id = id.into();
        if let Some(parent) = &parent {
            if !self.classes.contains_key(parent) {
                return Err(Report::new(ConfigError::Schema(format!(
                    "class '{id}' derives from undefined class '{parent}'"
                ))));
            }
            if self.is_child_of(parent, &id) {
                return Err(Report::new(ConfigError::Schema(format!(
                    "class '{id}' cannot derive from its own descendant '{parent}'"
                ))));
            }
        }
        debug!(class_id = %id, parent = ?parent, fields = fields.len(), "Defining class");
        self.classes.insert(id, ClassDef { parent, fields });
        Ok(())
    }

    /// Create a default-constructed object of `class` with the given identity
    pub fn spawn(&mut self, class: impl Into<ClassId>, identity: impl Into<String>) -> ConfigResult<ObjectHandle> {
        let class = class.into();
        let identity = identity.into();
        if self.objects.values().any(|object| object.identity == identity) {
            return Err(Report::new(ConfigError::Schema(format!(
                "an object with identity '{identity}' already exists"
            ))));
        }
        let Some(fields) = self.class_fields(&class) else {
            return Err(Report::new(ConfigError::Schema(format!(
                "cannot spawn undefined class '{class}'"
            ))));
        };

        let value = self.default_fields(&fields, &mut Vec::new());
        let handle = ObjectHandle::new(self.next_handle);
        self.next_handle += 1;
        debug!(object = %handle, class_id = %class, identity = %identity, "Spawned object");
        self.objects.insert(
            handle,
            StoredObject {
                class,
                identity,
                value,
            },
        );
        Ok(handle)
    }

    /// Append an entry to a map slot
    ///
    /// Both payloads must match the map's key and value kinds.
    pub fn insert_map_entry(&mut self, slot: &SlotRef, key: PropertyValue, value: PropertyValue) -> bool {
        match self.stored_mut(slot) {
            Some(StoredValue::Map(entries)) => {
                entries.push((StoredValue::Scalar(key), StoredValue::Scalar(value)));
                true
            },
            _ => false,
        }
    }

    /// How many times `object` was reported modified
    #[must_use]
    pub fn modification_count(&self, object: ObjectHandle) -> usize {
        self.modifications.get(&object).copied().unwrap_or_default()
    }

    /// Every object, in creation order
    pub fn objects(&self) -> impl Iterator<Item = ObjectHandle> + '_ { self.objects.keys().copied() }

    fn stored(&self, slot: &SlotRef) -> Option<&StoredValue> {
        self.objects
            .get(&slot.object())
            .and_then(|object| object.value.descend(slot.steps()))
    }

    fn stored_mut(&mut self, slot: &SlotRef) -> Option<&mut StoredValue> {
        self.objects
            .get_mut(&slot.object())
            .and_then(|object| object.value.descend_mut(slot.steps()))
    }

    fn default_fields(&self, fields: &[FieldInfo], visiting: &mut Vec<StructId>) -> StoredValue {
        StoredValue::Struct(
            fields
                .iter()
                .map(|field| (field.name.clone(), self.default_value(&field.kind, visiting)))
                .collect(),
        )
    }

    /// Default value for a kind; `visiting` guards against structs that contain themselves
    fn default_value(&self, kind: &TypeKind, visiting: &mut Vec<StructId>) -> StoredValue {
        match kind {
            TypeKind::Integer { .. } => StoredValue::Scalar(PropertyValue::Integer(0)),
            TypeKind::FloatingPoint { .. } => StoredValue::Scalar(PropertyValue::Float(0.0)),
            TypeKind::Boolean => StoredValue::Scalar(PropertyValue::Bool(false)),
            TypeKind::String => StoredValue::Scalar(PropertyValue::String(String::new())),
            TypeKind::Name => StoredValue::Scalar(PropertyValue::Name(String::new())),
            TypeKind::Text => StoredValue::Scalar(PropertyValue::Text(String::new())),
            TypeKind::Enum { enum_id } => {
                let first = self
                    .enums
                    .get(enum_id)
                    .and_then(|info| info.enumerators.first())
                    .map_or(0, |enumerator| enumerator.value);
                StoredValue::Scalar(PropertyValue::Enum(first))
            },
            TypeKind::ObjectRef { .. } => StoredValue::Scalar(PropertyValue::Object(None)),
            TypeKind::Struct { struct_id } => {
                if visiting.contains(struct_id) {
                    warn!(struct_id = %struct_id, "Struct contains itself; leaving nested value empty");
                    return StoredValue::Struct(Vec::new());
                }
                let Some(fields) = self.structs.get(struct_id) else {
                    warn!(struct_id = %struct_id, "Unknown struct; leaving value empty");
                    return StoredValue::Struct(Vec::new());
                };
                visiting.push(struct_id.clone());
                let value = self.default_fields(fields, visiting);
                visiting.pop();
                value
            },
            TypeKind::Array { .. } | TypeKind::Set { .. } => StoredValue::List(Vec::new()),
            TypeKind::Map { .. } => StoredValue::Map(Vec::new()),
        }
    }
}

impl TypeRegistry for MemoryModel {
    fn find_struct(&self, name: &str) -> Option<StructId> {
        self.structs
            .get_key_value(name)
            .map(|(id, _)| id.clone())
            .or_else(|| self.structs.keys().find(|id| id.short_name() == name).cloned())
    }

    fn find_enum(&self, name: &str) -> Option<EnumId> {
        self.enums
            .get_key_value(name)
            .map(|(id, _)| id.clone())
            .or_else(|| self.enums.keys().find(|id| id.short_name() == name).cloned())
    }

    fn find_class(&self, name: &str) -> Option<ClassId> {
        self.classes
            .get_key_value(name)
            .map(|(id, _)| id.clone())
            .or_else(|| self.classes.keys().find(|id| id.short_name() == name).cloned())
    }
}

impl ObjectModel for MemoryModel {
    fn class_fields(&self, class: &ClassId) -> Option<Vec<FieldInfo>> {
        let mut chain = Vec::new();
        let mut current = Some(class);
        while let Some(id) = current {
            let def = self.classes.get(id)?;
            chain.push(def);
            current = def.parent.as_ref();
        }
        Some(
            chain
                .into_iter()
                .rev()
                .flat_map(|def| def.fields.iter().cloned())
                .collect(),
        )
    }

    fn struct_fields(&self, id: &StructId) -> Option<Vec<FieldInfo>> { self.structs.get(id).cloned() }

    fn enum_info(&self, id: &EnumId) -> Option<EnumInfo> { self.enums.get(id).cloned() }

    fn is_child_of(&self, class: &ClassId, ancestor: &ClassId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.classes.get(id).and_then(|def| def.parent.as_ref());
        }
        false
    }

    fn class_of(&self, object: ObjectHandle) -> Option<ClassId> {
        self.objects.get(&object).map(|object| object.class.clone())
    }

    fn object_identity(&self, object: ObjectHandle) -> Option<String> {
        self.objects.get(&object).map(|object| object.identity.clone())
    }

    fn read(&self, slot: &SlotRef) -> Option<PropertyValue> {
        match self.stored(slot)? {
            StoredValue::Scalar(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn write(&mut self, slot: &SlotRef, value: PropertyValue) -> bool {
        trace!(slot = %slot, value = ?value, "Writing slot");
        self.stored_mut(slot).is_some_and(|stored| stored.assign(value))
    }

    fn container_len(&self, slot: &SlotRef) -> Option<usize> { self.stored(slot)?.len() }

    fn grow_container(&mut self, slot: &SlotRef, element: &TypeKind, len: usize) -> bool {
        let current = match self.stored(slot) {
            Some(StoredValue::List(elements)) => elements.len(),
            _ => return false,
        };
        let defaults: Vec<StoredValue> = (current..len)
            .map(|_| self.default_value(element, &mut Vec::new()))
            .collect();
        match self.stored_mut(slot) {
            Some(StoredValue::List(elements)) => {
                elements.extend(defaults);
                true
            },
            _ => false,
        }
    }

    fn instantiate(&mut self, class: &ClassId) -> Option<ObjectHandle> {
        let identity = format!("{TRANSIENT_PACKAGE}.{}_{}", class.short_name(), self.next_handle);
        match self.spawn(class.clone(), identity) {
            Ok(handle) => Some(handle),
            Err(report) => {
                warn!(class_id = %class, error = %report.current_context(), "Failed to instantiate object");
                None
            },
        }
    }

    fn load_object(&self, class: &ClassId, identity: &str) -> Option<ObjectHandle> {
        self.objects
            .iter()
            .find(|(_, object)| object.identity == identity && self.is_child_of(&object.class, class))
            .map(|(handle, _)| *handle)
    }

    fn mark_modified(&mut self, object: ObjectHandle) {
        debug!(object = %object, "Object marked modified");
        *self.modifications.entry(object).or_default() += 1;
    }
}

#[cfg(test)]
mod tests;
