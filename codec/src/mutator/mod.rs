//! Path-based mutator
//!
//! Writes one leaf addressed by a dotted [`PropertyPath`], one recursion step per
//! segment. How a segment is read depends on the kind of the value it is applied to:
//!
//! - object or struct: the segment names a field
//! - array or set: the segment is an index; the container grows with default
//!   elements when the index is past its end, up to
//!   [`MAX_AUTO_GROW_INDEX`](crate::constants::MAX_AUTO_GROW_INDEX)
//! - null object reference: a default instance of the referenced class is created
//!   before descending
//! - leaf: the path must end here and the raw string is parsed for the leaf's kind
//! - map: rejected
//!
//! A path that ends on a struct applies the raw string as a struct literal
//! (`X=1.0,Y=2.0`), in which each key is set independently and failing keys are
//! skipped.

mod property_path;
mod value_parser;

use error_stack::{Report, ResultExt};
pub use property_path::PropertyPath;
use tracing::{debug, warn};
pub use value_parser::{parse_bool, parse_enum, parse_float, parse_integer, parse_leaf};

use crate::constants::{LITERAL_KEY_SEPARATOR, LITERAL_PAIR_SEPARATOR, MAX_AUTO_GROW_INDEX, NULL_OBJECT_LITERAL};
use crate::error::{MutationError, MutationResult};
use crate::reflection::{FieldInfo, ObjectHandle, ObjectModel, PropertyValue, ReflectedValue, SlotRef};
use crate::type_descriptor::{ClassId, TypeKind};

/// Keys of a struct literal, split by outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralOutcome {
    /// Keys whose values were written, in literal order
    pub applied: Vec<String>,
    /// Keys that failed and were left unchanged, in literal order
    pub skipped: Vec<String>,
}

impl LiteralOutcome {
    /// Whether every key was applied
    #[must_use]
    pub const fn is_complete(&self) -> bool { self.skipped.is_empty() }
}

/// Writes values into a host graph by property path
pub struct PropertyMutator<'a, H: ObjectModel + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: ObjectModel + ?Sized> PropertyMutator<'a, H> {
    /// Create a mutator over `host`
    #[must_use]
    pub const fn new(host: &'a mut H) -> Self { Self { host } }

    /// Set the value addressed by `path` below the fields of `root`
    ///
    /// On success the host is told once that `root` was modified.
    pub fn set(&mut self, root: ObjectHandle, path: &PropertyPath, raw: &str) -> MutationResult<()> {
        self.visit_object(root, path, 0, raw)
            .attach_with(|| format!("Path: {path}"))
            .attach_with(|| format!("Value: {raw}"))?;
        self.host.mark_modified(root);
        Ok(())
    }

    /// Parse `path` and [`set`](Self::set) it
    pub fn set_str(&mut self, root: ObjectHandle, path: &str, raw: &str) -> MutationResult<()> {
        let path = PropertyPath::parse(path)?;
        self.set(root, &path, raw)
    }

    /// Set the value addressed by `path` below an arbitrary value
    ///
    /// The object owning `value` is reported modified on success.
    pub fn set_in(&mut self, value: &ReflectedValue, path: &PropertyPath, raw: &str) -> MutationResult<()> {
        self.visit(value, path, 0, raw)
            .attach_with(|| format!("Path: {path}"))
            .attach_with(|| format!("Value: {raw}"))?;
        self.host.mark_modified(value.slot().object());
        Ok(())
    }

    /// Apply a `key=value,...` literal to the fields of a struct value
    ///
    /// Pairs without `=` are ignored. Keys that fail are logged and reported in
    /// [`LiteralOutcome::skipped`]; the remaining keys are still applied.
    pub fn set_struct_literal(&mut self, value: &ReflectedValue, literal: &str) -> MutationResult<LiteralOutcome> {
        let outcome = self.apply_literal(value, literal)?;
        if !outcome.applied.is_empty() {
            self.host.mark_modified(value.slot().object());
        }
        Ok(outcome)
    }

    fn apply_literal(&mut self, value: &ReflectedValue, literal: &str) -> MutationResult<LiteralOutcome> {
        if !matches!(value.kind(), TypeKind::Struct { .. }) {
            return Err(Report::new(MutationError::UnsupportedKind {
                kind: value.kind().to_string(),
            })
            .attach("Struct literals apply to struct values only"));
        }

        let mut outcome = LiteralOutcome::default();
        for pair in literal.split(LITERAL_PAIR_SEPARATOR) {
            let Some((key, raw)) = pair.split_once(LITERAL_KEY_SEPARATOR) else {
                debug!(pair, "Ignoring struct literal pair without '='");
                continue;
            };
            let key = key.trim();
            let raw = raw.trim();
            let result =
                PropertyPath::from_segments([key]).and_then(|path| self.visit(value, &path, 0, raw));
            match result {
                Ok(()) => outcome.applied.push(key.to_string()),
                Err(report) => {
                    warn!(key, raw, error = %report.current_context(), "Skipping struct literal key");
                    outcome.skipped.push(key.to_string());
                },
            }
        }
        Ok(outcome)
    }

    /// One recursion step: `index` segments of `path` are already consumed
    fn visit(&mut self, value: &ReflectedValue, path: &PropertyPath, index: usize, raw: &str) -> MutationResult<()> {
        let kind = value.kind();
        debug!(segment = index, path_len = path.len(), kind = %kind, slot = %value.slot(), "Mutation step");

        match kind {
            TypeKind::Integer { .. }
            | TypeKind::FloatingPoint { .. }
            | TypeKind::Boolean
            | TypeKind::String
            | TypeKind::Name
            | TypeKind::Text
            | TypeKind::Enum { .. } => {
                if index < path.len() {
                    return Err(Report::new(MutationError::CannotDescend {
                        path: path.prefix(index),
                        kind: kind.to_string(),
                    }));
                }
                let parsed = parse_leaf(&*self.host, kind, raw)?;
                self.write(value.slot(), parsed)
            },
            TypeKind::ObjectRef { class_id } => {
                if index == path.len() {
                    return self.assign_reference(value.slot(), class_id, raw);
                }
                let object = self.vivify(value.slot(), class_id)?;
                self.visit_object(object, path, index, raw)
            },
            TypeKind::Struct { struct_id } => {
                if index == path.len() {
                    let outcome = self.apply_literal(value, raw)?;
                    if outcome.applied.is_empty() {
                        return Err(Report::new(MutationError::invalid_value(
                            raw,
                            format_args!("struct literal for {struct_id}"),
                        )));
                    }
                    return Ok(());
                }
                let fields = self
                    .host
                    .struct_fields(struct_id)
                    .ok_or_else(|| Report::new(MutationError::slot_unavailable(value.slot())))
                    .attach_with(|| format!("Unknown struct: {struct_id}"))?;
                self.visit_field(value.slot(), struct_id.as_str(), &fields, path, index, raw)
            },
            TypeKind::Array { element } | TypeKind::Set { element } => {
                let Some(segment) = path.segment(index) else {
                    return Err(Report::new(MutationError::PathExhausted {
                        path: path.to_string(),
                        kind: kind.to_string(),
                    }));
                };
                let index_invalid = || {
                    Report::new(MutationError::IndexInvalid {
                        segment: segment.to_string(),
                    })
                };
                let position: usize = segment.parse().map_err(|_| index_invalid())?;
                let len = position
                    .checked_add(1)
                    .filter(|_| position <= MAX_AUTO_GROW_INDEX)
                    .ok_or_else(|| {
                        index_invalid().attach(format!("Maximum index: {MAX_AUTO_GROW_INDEX}"))
                    })?;
                self.ensure_len(value.slot(), element, len)?;
                self.visit(&value.element(position, (**element).clone()), path, index + 1, raw)
            },
            TypeKind::Map { .. } => Err(Report::new(MutationError::UnsupportedKind {
                kind: kind.to_string(),
            })
            .attach(format!("Path: {}", path.prefix(index)))),
        }
    }

    fn visit_object(&mut self, object: ObjectHandle, path: &PropertyPath, index: usize, raw: &str) -> MutationResult<()> {
        let root = SlotRef::root(object);
        let class = self
            .host
            .class_of(object)
            .ok_or_else(|| Report::new(MutationError::slot_unavailable(&root)))?;
        let fields = self
            .host
            .class_fields(&class)
            .ok_or_else(|| Report::new(MutationError::slot_unavailable(&root)))
            .attach_with(|| format!("Unknown class: {class}"))?;
        self.visit_field(&root, class.as_str(), &fields, path, index, raw)
    }

    /// Match the next segment against `fields`, exactly first and then ignoring ASCII case
    fn visit_field(
        &mut self,
        owner: &SlotRef,
        owner_name: &str,
        fields: &[FieldInfo],
        path: &PropertyPath,
        index: usize,
        raw: &str,
    ) -> MutationResult<()> {
        let Some(segment) = path.segment(index) else {
            return Err(Report::new(MutationError::PathExhausted {
                path: path.to_string(),
                kind: owner_name.to_string(),
            }));
        };
        let field = fields
            .iter()
            .find(|field| field.name == segment)
            .or_else(|| fields.iter().find(|field| field.name.eq_ignore_ascii_case(segment)))
            .ok_or_else(|| {
                Report::new(MutationError::FieldNotFound {
                    field: segment.to_string(),
                    owner: owner_name.to_string(),
                })
            })?;
        let child = ReflectedValue::new(owner.field(&field.name), field.kind.clone());
        self.visit(&child, path, index + 1, raw)
    }

    /// `None` or an empty string clears the reference; anything else is loaded by identity
    fn assign_reference(&mut self, slot: &SlotRef, class_id: &ClassId, raw: &str) -> MutationResult<()> {
        let identity = raw.trim();
        if identity.is_empty() || identity == NULL_OBJECT_LITERAL {
            return self.write(slot, PropertyValue::Object(None));
        }
        let object = self.host.load_object(class_id, identity).ok_or_else(|| {
            Report::new(MutationError::ObjectNotFound {
                class:    class_id.to_string(),
                identity: identity.to_string(),
            })
        })?;
        self.write(slot, PropertyValue::Object(Some(object)))
    }

    /// Object behind a reference slot, instantiating one when the reference is null
    fn vivify(&mut self, slot: &SlotRef, class_id: &ClassId) -> MutationResult<ObjectHandle> {
        match self.host.read(slot) {
            Some(PropertyValue::Object(Some(object))) => Ok(object),
            Some(PropertyValue::Object(None)) => {
                let object = self
                    .host
                    .instantiate(class_id)
                    .ok_or_else(|| Report::new(MutationError::slot_unavailable(slot)))
                    .attach_with(|| format!("Cannot instantiate {class_id}"))?;
                self.write(slot, PropertyValue::Object(Some(object)))?;
                debug!(slot = %slot, object = %object, class_id = %class_id, "Auto-vivified null reference");
                Ok(object)
            },
            _ => Err(Report::new(MutationError::slot_unavailable(slot))),
        }
    }

    /// Grow a container so it holds at least `len` elements
    fn ensure_len(&mut self, slot: &SlotRef, element: &TypeKind, len: usize) -> MutationResult<()> {
        let current = self
            .host
            .container_len(slot)
            .ok_or_else(|| Report::new(MutationError::slot_unavailable(slot)))?;
        if current >= len {
            return Ok(());
        }
        if !self.host.grow_container(slot, element, len) {
            return Err(Report::new(MutationError::slot_unavailable(slot))
                .attach(format!("Cannot grow from {current} to {len} elements")));
        }
        debug!(slot = %slot, from = current, to = len, "Grew container");
        Ok(())
    }

    fn write(&mut self, slot: &SlotRef, value: PropertyValue) -> MutationResult<()> {
        if self.host.write(slot, value) {
            Ok(())
        } else {
            Err(Report::new(MutationError::slot_unavailable(slot)))
        }
    }
}
