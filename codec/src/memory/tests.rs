//! Tests for the in-memory object graph

#![allow(clippy::unwrap_used, reason = "test assertions")]

use super::fixture::{ACTOR_CLASS, BACK_DOOR, DOOR_CLASS, FRONT_DOOR, LAMP, class, door_model, handle};
use super::*;

#[test]
fn test_schema_registers_every_name() {
    let model = door_model();
    assert_eq!(model.find_struct("Vector"), Some(StructId::from("Vector")));
    assert_eq!(model.find_enum("EDoorState"), Some(EnumId::from("EDoorState")));
    assert_eq!(model.find_class("Door"), Some(ClassId::from(DOOR_CLASS)));
    assert_eq!(model.find_class(ACTOR_CLASS), Some(ClassId::from(ACTOR_CLASS)));
    assert_eq!(model.objects().count(), 3);
}

#[test]
fn test_inherited_fields_come_first() {
    let model = door_model();
    let fields = model.class_fields(&class(DOOR_CLASS)).unwrap();
    let names: Vec<_> = fields.iter().take(4).map(|field| field.name.as_str()).collect();
    assert_eq!(names, vec!["Label", "Cache", "Owner", "State"]);
    assert!(fields[1].transient);
    assert_eq!(fields[2].kind, TypeKind::object_ref(ACTOR_CLASS));
}

#[test]
fn test_enumerator_values_follow_their_predecessor() {
    let model = door_model();
    let info = model.enum_info(&EnumId::from("EDoorState")).unwrap();
    let values: Vec<_> = info.enumerators.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![0, 1, 5]);
}

#[test]
fn test_class_hierarchy() {
    let model = door_model();
    assert!(model.is_child_of(&class(DOOR_CLASS), &class(ACTOR_CLASS)));
    assert!(!model.is_child_of(&class(ACTOR_CLASS), &class(DOOR_CLASS)));
}

#[test]
fn test_load_object_respects_class() {
    let model = door_model();
    let lamp = handle(&model, LAMP);
    assert_eq!(model.load_object(&class(ACTOR_CLASS), LAMP), Some(lamp));
    assert_eq!(model.load_object(&class(DOOR_CLASS), LAMP), None);
    assert!(model.load_object(&class(DOOR_CLASS), FRONT_DOOR).is_some());
    assert_eq!(model.object_identity(handle(&model, BACK_DOOR)).as_deref(), Some(BACK_DOOR));
}

#[test]
fn test_write_requires_matching_payload() {
    let mut model = door_model();
    let slot = SlotRef::root(handle(&model, FRONT_DOOR)).field("Hinge").field("Y");
    assert!(model.write(&slot, PropertyValue::Float(3.5)));
    assert_eq!(model.read(&slot), Some(PropertyValue::Float(3.5)));
    assert!(!model.write(&slot, PropertyValue::Bool(true)));
    assert!(model.read(&SlotRef::root(handle(&model, FRONT_DOOR)).field("Hinge")).is_none());
}

#[test]
fn test_grow_container_default_constructs_elements() {
    let mut model = door_model();
    let items = SlotRef::root(handle(&model, FRONT_DOOR)).field("Items");
    assert_eq!(model.container_len(&items), Some(0));
    assert!(model.grow_container(&items, &TypeKind::structure("Item"), 3));
    assert_eq!(model.container_len(&items), Some(3));
    assert_eq!(
        model.read(&items.element(1).field("Name")),
        Some(PropertyValue::String(String::new()))
    );
    assert!(!model.grow_container(&items.element(0), &TypeKind::Boolean, 1));
}

#[test]
fn test_instantiate_names_object_under_transient_package() {
    let mut model = door_model();
    let door = model.instantiate(&class(DOOR_CLASS)).unwrap();
    let identity = model.object_identity(door).unwrap();
    assert!(identity.starts_with("/Engine/Transient.Door_"), "{identity}");
    assert_eq!(
        model.read(&SlotRef::root(door).field("State")),
        Some(PropertyValue::Enum(0))
    );
    assert!(model.instantiate(&class("/Script/Game.Missing")).is_none());
}

#[test]
fn test_define_class_rejects_undefined_parent() {
    let mut model = MemoryModel::new();
    let error = model
        .define_class("Child", Some(ClassId::from("Parent")), Vec::new())
        .unwrap_err();
    assert!(matches!(error.current_context(), ConfigError::Schema(_)));
}

#[test]
fn test_programmatic_definition() {
    let mut model = MemoryModel::new();
    model.define_enum("EMode", [("Off", 0), ("On", 1)]);
    model.define_struct("Pair", vec![FieldInfo::new("Left", TypeKind::Boolean)]);
    model
        .define_class(
            "Widget",
            None,
            vec![
                FieldInfo::new("Pair", TypeKind::structure("Pair")),
                FieldInfo::new("Mode", TypeKind::enumeration("EMode")),
            ],
        )
        .unwrap();
    let widget = model.spawn("Widget", "/Game/UI.Widget_0").unwrap();
    assert_eq!(
        model.read(&SlotRef::root(widget).field("Pair").field("Left")),
        Some(PropertyValue::Bool(false))
    );
    assert!(model.spawn("Widget", "/Game/UI.Widget_0").is_err());
}

#[test]
fn test_schema_errors() {
    let unresolvable = r#"{ "structs": [{ "name": "S", "fields": [{ "name": "F", "type": "Bogus" }] }] }"#;
    let error = MemoryModel::from_schema_json(unresolvable).unwrap_err();
    assert!(matches!(error.current_context(), ConfigError::Schema(_)));

    let unknown_key = r#"{ "structures": [] }"#;
    let error = MemoryModel::from_schema_json(unknown_key).unwrap_err();
    assert!(matches!(error.current_context(), ConfigError::Parse(_)));

    let cycle = r#"{ "classes": [
        { "name": "A", "parent": "B" },
        { "name": "B", "parent": "A" }
    ] }"#;
    let error = MemoryModel::from_schema_json(cycle).unwrap_err();
    assert!(matches!(error.current_context(), ConfigError::Schema(_)));
}

#[test]
fn test_schema_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(&path, r#"{ "classes": [{ "name": "Thing" }] }"#).unwrap();
    let model = MemoryModel::from_schema_file(&path).unwrap();
    assert_eq!(model.find_class("Thing"), Some(ClassId::from("Thing")));

    let error = MemoryModel::from_schema_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(error.current_context(), ConfigError::Io(_)));
}

#[test]
fn test_self_containing_struct_terminates() {
    let schema = r#"{
        "structs": [{ "name": "Node", "fields": [{ "name": "Next", "type": "Node" }] }],
        "classes": [{ "name": "Holder", "fields": [{ "name": "Root", "type": "Node" }] }],
        "objects": [{ "class": "Holder", "identity": "/Game/Holder" }]
    }"#;
    let model = MemoryModel::from_schema_json(schema).unwrap();
    let holder = model.objects().next().unwrap();
    assert!(model.read(&SlotRef::root(holder).field("Root").field("Next")).is_none());
}
