//! JSON schema documents for [`MemoryModel`]
//!
//! ```json
//! {
//!   "enums":   [{ "name": "EDoorState", "enumerators": [{ "name": "Closed" }, { "name": "Open" }] }],
//!   "structs": [{ "name": "Vector", "fields": [{ "name": "X", "type": "float" }] }],
//!   "classes": [{ "name": "/Script/Game.Door", "parent": null,
//!                 "fields": [{ "name": "Hinges", "type": "Array<Vector>" }] }],
//!   "objects": [{ "class": "/Script/Game.Door", "identity": "/Game/Maps/Main.Door_1" }]
//! }
//! ```
//!
//! Field types are signature strings. Names are registered before any signature
//! is resolved, so fields may refer to types declared later in the document.

use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;
use tracing::debug;

use super::{ClassDef, MemoryModel};
use crate::error::{ConfigError, ConfigResult};
use crate::reflection::{EnumInfo, Enumerator, FieldInfo};
use crate::resolver::Resolver;
use crate::type_descriptor::{ClassId, EnumId, StructId};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    #[serde(default)]
    enums:   Vec<EnumDocument>,
    #[serde(default)]
    structs: Vec<StructDocument>,
    #[serde(default)]
    classes: Vec<ClassDocument>,
    #[serde(default)]
    objects: Vec<ObjectDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumDocument {
    name:        String,
    enumerators: Vec<EnumeratorDocument>,
}

/// An enumerator without a value takes the previous value plus one, starting at zero
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumeratorDocument {
    name:  String,
    value: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructDocument {
    name:   String,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassDocument {
    name:   String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDocument {
    name:                String,
    #[serde(rename = "type")]
    signature:           String,
    #[serde(default)]
    transient:           bool,
    #[serde(default)]
    duplicate_transient: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectDocument {
    class:    String,
    identity: String,
}

impl MemoryModel {
    /// Build a model from a JSON schema document
    pub fn from_schema_json(json: &str) -> ConfigResult<Self> {
        let document: SchemaDocument =
            serde_json::from_str(json).map_err(|e| Report::new(ConfigError::Parse(e.to_string())))?;
        Self::from_document(document)
    }

    /// Build a model from a JSON schema file
    pub fn from_schema_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Report::new(ConfigError::Io(e.to_string())))
            .attach_with(|| format!("Path: {}", path.display()))?;
        Self::from_schema_json(&json).attach_with(|| format!("Path: {}", path.display()))
    }

    fn from_document(document: SchemaDocument) -> ConfigResult<Self> {
        let mut model = Self::new();

        // Names first, so signatures can refer to anything in the document
        for enum_doc in document.enums {
            let id = EnumId::from(enum_doc.name);
            let mut next = 0_i64;
            let enumerators = enum_doc
                .enumerators
                .into_iter()
                .map(|enumerator| {
                    let value = enumerator.value.unwrap_or(next);
                    next = value.saturating_add(1);
                    Enumerator {
                        name: enumerator.name,
                        value,
                    }
                })
                .collect();
            model.enums.insert(id.clone(), EnumInfo { id, enumerators });
        }
        for struct_doc in &document.structs {
            model
                .structs
                .insert(StructId::from(struct_doc.name.as_str()), Vec::new());
        }
        for class_doc in &document.classes {
            model.classes.insert(
                ClassId::from(class_doc.name.as_str()),
                ClassDef {
                    parent: None,
                    fields: Vec::new(),
                },
            );
        }

        let structs = document
            .structs
            .into_iter()
            .map(|struct_doc| {
                let fields = model.resolve_fields(&struct_doc.name, &struct_doc.fields)?;
                Ok((StructId::from(struct_doc.name), fields))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        let classes = document
            .classes
            .into_iter()
            .map(|class_doc| {
                let fields = model.resolve_fields(&class_doc.name, &class_doc.fields)?;
                let parent = class_doc
                    .parent
                    .map(|parent| {
                        model
                            .classes
                            .get_key_value(parent.as_str())
                            .map(|(id, _)| id.clone())
                            .ok_or_else(|| {
                                Report::new(ConfigError::Schema(format!(
                                    "class '{}' derives from undefined class '{parent}'",
                                    class_doc.name
                                )))
                            })
                    })
                    .transpose()?;
                Ok((ClassId::from(class_doc.name), ClassDef { parent, fields }))
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        model.structs.extend(structs);
        model.classes.extend(classes);
        model.check_class_hierarchy()?;

        for object in document.objects {
            model.spawn(object.class, object.identity)?;
        }

        debug!(
            structs = model.structs.len(),
            enums = model.enums.len(),
            classes = model.classes.len(),
            objects = model.objects.len(),
            "Loaded schema document"
        );
        Ok(model)
    }

    fn resolve_fields(&self, owner: &str, fields: &[FieldDocument]) -> ConfigResult<Vec<FieldInfo>> {
        let resolver = Resolver::new(self);
        fields
            .iter()
            .map(|field| {
                let descriptor = resolver
                    .resolve(&field.signature)
                    .change_context_lazy(|| {
                        ConfigError::Schema(format!("field '{}' of '{owner}' has an unresolvable type", field.name))
                    })?;
                Ok(FieldInfo {
                    name:                field.name.clone(),
                    kind:                descriptor.kind,
                    transient:           field.transient,
                    duplicate_transient: field.duplicate_transient,
                })
            })
            .collect()
    }

    /// Every parent chain must end without revisiting a class
    fn check_class_hierarchy(&self) -> ConfigResult<()> {
        for start in self.classes.keys() {
            let mut current = self.classes.get(start).and_then(|def| def.parent.as_ref());
            let mut steps = 0_usize;
            while let Some(id) = current {
                steps += 1;
                if id == start || steps > self.classes.len() {
                    return Err(Report::new(ConfigError::Schema(format!(
                        "class '{start}' is its own ancestor"
                    ))));
                }
                current = self.classes.get(id).and_then(|def| def.parent.as_ref());
            }
        }
        Ok(())
    }
}
