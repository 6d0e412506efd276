//! Tests for the property codec

#![allow(clippy::unwrap_used, reason = "test assertions")]

use serde_json::json;

use super::*;
use crate::memory::MemoryModel;
use crate::memory::fixture::{ACTOR_CLASS, BACK_DOOR, DOOR_CLASS, FRONT_DOOR, LAMP, door_model, handle};

fn encode(model: &MemoryModel, config: &CodecConfig, identity: &str) -> Value {
    PropertySerializer::new(model, config).encode_object(handle(model, identity))
}

fn link(model: &mut MemoryModel, from: &str, field: &str, to: &str) {
    let target = handle(model, to);
    let slot = SlotRef::root(handle(model, from)).field(field);
    assert!(model.write(&slot, PropertyValue::Object(Some(target))));
}

#[test]
fn test_struct_fields_encode_in_declaration_order() {
    let mut model = door_model();
    let hinge_y = SlotRef::root(handle(&model, FRONT_DOOR)).field("Hinge").field("Y");
    assert!(model.write(&hinge_y, PropertyValue::Float(3.5)));

    let encoded = encode(&model, &CodecConfig::default(), FRONT_DOOR);
    assert_eq!(encoded["Hinge"], json!({ "X": 0.0, "Y": 3.5, "Z": 0.0 }));

    let keys: Vec<_> = encoded.as_object().unwrap().keys().take(4).cloned().collect();
    assert_eq!(keys, vec!["Label", "Owner", "State", "Hinge"]);
}

#[test]
fn test_transient_fields_are_omitted() {
    let mut model = door_model();
    let items = SlotRef::root(handle(&model, FRONT_DOOR)).field("Items");
    assert!(model.grow_container(&items, &TypeKind::structure("Item"), 1));

    let encoded = encode(&model, &CodecConfig::default(), FRONT_DOOR);
    let object = encoded.as_object().unwrap();
    assert!(!object.contains_key("Cache"));
    assert!(!object.contains_key("Duplicate"));
    assert_eq!(encoded["Items"], json!([{ "Name": "", "Count": 0 }]));
}

#[test]
fn test_scalar_kinds() {
    let mut model = door_model();
    let door = SlotRef::root(handle(&model, FRONT_DOOR));
    assert!(model.write(&door.field("Level"), PropertyValue::Integer(200)));
    assert!(model.write(&door.field("Serial"), PropertyValue::Integer(-9_000_000_000)));
    assert!(model.write(&door.field("Title"), PropertyValue::Text("Front".to_string())));

    let encoded = encode(&model, &CodecConfig::default(), FRONT_DOOR);
    assert_eq!(encoded["Level"], json!(200));
    assert_eq!(encoded["Serial"], json!(-9_000_000_000_i64));
    assert_eq!(encoded["Weight"], json!(0.0));
    assert_eq!(encoded["Title"], json!("Front"));
    assert_eq!(encoded["Stats"], json!({ "A": 0, "B": false, "C": 0 }));
}

#[test]
fn test_enum_encodes_by_name_or_raw_value() {
    let mut model = door_model();
    let state = SlotRef::root(handle(&model, FRONT_DOOR)).field("State");
    assert!(model.write(&state, PropertyValue::Enum(5)));
    assert_eq!(
        encode(&model, &CodecConfig::default(), FRONT_DOOR)["State"],
        json!("EDoorState::Locked")
    );

    assert!(model.write(&state, PropertyValue::Enum(42)));
    assert_eq!(encode(&model, &CodecConfig::default(), FRONT_DOOR)["State"], json!(42));
}

#[test]
fn test_reference_outside_allow_list_is_identity_string() {
    let mut model = door_model();
    link(&mut model, FRONT_DOOR, "Partner", BACK_DOOR);

    let encoded = encode(&model, &CodecConfig::default(), FRONT_DOOR);
    assert_eq!(encoded["Partner"], json!(BACK_DOOR));
    assert_eq!(encoded["Owner"], Value::Null);
}

#[test]
fn test_allow_listed_reference_expands_inline() {
    let mut model = door_model();
    link(&mut model, FRONT_DOOR, "Owner", LAMP);
    let lamp_label = SlotRef::root(handle(&model, LAMP)).field("Label");
    assert!(model.write(&lamp_label, PropertyValue::String("Lamp".to_string())));

    let config = CodecConfig::with_detail_classes([ACTOR_CLASS]);
    let encoded = encode(&model, &config, FRONT_DOOR);
    assert_eq!(encoded["Owner"], json!({ "Label": "Lamp", "Owner": null }));
}

#[test]
fn test_reference_cycle_falls_back_to_identity() {
    let mut model = door_model();
    link(&mut model, FRONT_DOOR, "Partner", BACK_DOOR);
    link(&mut model, BACK_DOOR, "Partner", FRONT_DOOR);

    let config = CodecConfig::with_detail_classes([DOOR_CLASS]);
    let encoded = encode(&model, &config, FRONT_DOOR);
    assert_eq!(encoded["Partner"]["Label"], json!(""));
    assert_eq!(encoded["Partner"]["Partner"], json!(FRONT_DOOR));
}

#[test]
fn test_self_reference_is_identity_even_when_allow_listed() {
    let mut model = door_model();
    link(&mut model, FRONT_DOOR, "Partner", FRONT_DOOR);

    let config = CodecConfig::with_detail_classes([DOOR_CLASS]);
    assert_eq!(encode(&model, &config, FRONT_DOOR)["Partner"], json!(FRONT_DOOR));
}

#[test]
fn test_containers() {
    let mut model = door_model();
    let door = SlotRef::root(handle(&model, FRONT_DOOR));
    let grid = door.field("Grid");
    let int32 = TypeKind::Integer { width: 32, signed: true };
    assert!(model.grow_container(&grid, &TypeKind::array(int32.clone()), 2));
    assert!(model.grow_container(&grid.element(1), &int32, 2));
    assert!(model.write(&grid.element(1).element(1), PropertyValue::Integer(7)));
    let tags = door.field("Tags");
    assert!(model.grow_container(&tags, &TypeKind::Name, 1));
    assert!(model.write(&tags.element(0), PropertyValue::Name("Wooden".to_string())));

    let encoded = encode(&model, &CodecConfig::default(), FRONT_DOOR);
    assert_eq!(encoded["Grid"], json!([[], [0, 7]]));
    assert_eq!(encoded["Tags"], json!(["Wooden"]));
}

#[test]
fn test_map_encoding_depends_on_key_kind() {
    let mut model = door_model();
    let door = SlotRef::root(handle(&model, FRONT_DOOR));
    assert!(model.insert_map_entry(
        &door.field("Scores"),
        PropertyValue::String("alice".to_string()),
        PropertyValue::Integer(3)
    ));
    assert!(model.insert_map_entry(
        &door.field("ById"),
        PropertyValue::Integer(7),
        PropertyValue::String("seven".to_string())
    ));

    let encoded = encode(&model, &CodecConfig::default(), FRONT_DOOR);
    assert_eq!(encoded["Scores"], json!({ "alice": 3 }));
    assert_eq!(encoded["ById"], json!([{ "key": 7, "value": "seven" }]));
}

#[test]
fn test_non_finite_float_is_omitted() {
    let mut model = door_model();
    let weight = SlotRef::root(handle(&model, FRONT_DOOR)).field("Weight");
    assert!(model.write(&weight, PropertyValue::Float(f64::NAN)));

    let encoded = encode(&model, &CodecConfig::default(), FRONT_DOOR);
    assert!(!encoded.as_object().unwrap().contains_key("Weight"));
    assert!(encoded.as_object().unwrap().contains_key("Title"));
}

#[test]
fn test_encode_value_and_json_text() {
    let model = door_model();
    let config = CodecConfig::default();
    let serializer = PropertySerializer::new(&model, &config);
    let label = ReflectedValue::new(
        SlotRef::root(handle(&model, LAMP)).field("Label"),
        TypeKind::String,
    );
    assert_eq!(serializer.encode_value(&label), Some(json!("")));

    let missing = ReflectedValue::new(SlotRef::root(handle(&model, LAMP)).field("Nope"), TypeKind::Boolean);
    assert_eq!(serializer.encode_value(&missing), None);

    assert_eq!(
        serializer.to_json_string(handle(&model, LAMP)),
        r#"{"Label":"","Owner":null}"#
    );
}
