//! Reflection-driven property codec
//!
//! Three operations over a runtime-reflected object graph supplied by a host through
//! the [`ObjectModel`] trait:
//!
//! - [`Resolver`] turns type signatures such as `Map<string,Array<Vector>>` or `AActor*` into
//!   [`TypeDescriptor`]s
//! - [`PropertySerializer`] encodes an object into a [`serde_json::Value`] tree
//! - [`PropertyMutator`] writes one leaf addressed by a dotted path such as `Items.3.Name`,
//!   growing containers and instantiating null object references on the way
//!
//! [`MemoryModel`] is a complete in-memory host, loadable from a JSON schema document.
//!
//! ```
//! use property_codec::{CodecConfig, MemoryModel, PropertyMutator, PropertySerializer};
//!
//! let schema = r#"{
//!     "structs": [{ "name": "Vector", "fields": [
//!         { "name": "X", "type": "float" }, { "name": "Y", "type": "float" }
//!     ] }],
//!     "classes": [{ "name": "/Script/Game.Marker", "fields": [{ "name": "Offset", "type": "Vector" }] }],
//!     "objects": [{ "class": "/Script/Game.Marker", "identity": "/Game/Maps/Main.Marker_1" }]
//! }"#;
//! let mut model = MemoryModel::from_schema_json(schema).map_err(|e| e.to_string())?;
//! let marker = model.objects().next().ok_or("no objects")?;
//!
//! PropertyMutator::new(&mut model)
//!     .set_str(marker, "Offset.Y", "3.5")
//!     .map_err(|e| e.to_string())?;
//!
//! let config = CodecConfig::default();
//! let json = PropertySerializer::new(&model, &config).to_json_string(marker);
//! assert_eq!(json, r#"{"Offset":{"X":0.0,"Y":3.5}}"#);
//! assert_eq!(model.modification_count(marker), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod memory;
pub mod mutator;
pub mod reflection;
pub mod resolver;
pub mod serializer;
pub mod support;
pub mod type_descriptor;

pub use config::CodecConfig;
pub use error::{ConfigError, ConfigResult, MutationError, MutationResult, TypeError, TypeResult};
pub use memory::MemoryModel;
pub use mutator::{LiteralOutcome, PropertyMutator, PropertyPath};
pub use reflection::{
    EnumInfo, Enumerator, FieldInfo, ObjectHandle, ObjectModel, PropertyValue, ReflectedValue, SlotRef, SlotStep,
};
pub use resolver::{LenientResolution, ParameterSpec, Resolver, TypeRegistry, split_type_and_name};
pub use serializer::PropertySerializer;
pub use type_descriptor::{ClassId, ContainerType, EnumId, ScalarKeyword, StructId, TypeDescriptor, TypeKind};
