//! Shared object graph for serializer and mutator tests

#![allow(clippy::expect_used, reason = "test fixture")]

use super::MemoryModel;
use crate::reflection::ObjectHandle;
use crate::resolver::TypeRegistry;
use crate::type_descriptor::ClassId;

pub(crate) const ACTOR_CLASS: &str = "/Script/Game.Actor";
pub(crate) const DOOR_CLASS: &str = "/Script/Game.Door";
pub(crate) const FRONT_DOOR: &str = "/Game/Maps/Main.FrontDoor";
pub(crate) const BACK_DOOR: &str = "/Game/Maps/Main.BackDoor";
pub(crate) const LAMP: &str = "/Game/Maps/Main.Lamp";

const SCHEMA: &str = r#"{
    "enums": [
        { "name": "EDoorState", "enumerators": [
            { "name": "EDoorState::Closed" },
            { "name": "EDoorState::Open" },
            { "name": "EDoorState::Locked", "value": 5 }
        ] }
    ],
    "structs": [
        { "name": "Vector", "fields": [
            { "name": "X", "type": "float" },
            { "name": "Y", "type": "float" },
            { "name": "Z", "type": "float" }
        ] },
        { "name": "Item", "fields": [
            { "name": "Name", "type": "string" },
            { "name": "Count", "type": "int32" },
            { "name": "Scratch", "type": "int32", "transient": true }
        ] },
        { "name": "Stats", "fields": [
            { "name": "A", "type": "int32" },
            { "name": "B", "type": "bool" },
            { "name": "C", "type": "int32" }
        ] }
    ],
    "classes": [
        { "name": "/Script/Game.Actor", "fields": [
            { "name": "Label", "type": "string" },
            { "name": "Cache", "type": "bool", "transient": true },
            { "name": "Owner", "type": "Actor*" }
        ] },
        { "name": "/Script/Game.Door", "parent": "/Script/Game.Actor", "fields": [
            { "name": "State", "type": "EDoorState" },
            { "name": "Hinge", "type": "Vector" },
            { "name": "Items", "type": "Array<Item>" },
            { "name": "Grid", "type": "Array<Array<int32>>" },
            { "name": "Tags", "type": "Set<name>" },
            { "name": "Scores", "type": "Map<string,int32>" },
            { "name": "ById", "type": "Map<int32,string>" },
            { "name": "Level", "type": "byte" },
            { "name": "Serial", "type": "int64" },
            { "name": "Weight", "type": "double" },
            { "name": "Title", "type": "text" },
            { "name": "Stats", "type": "Stats" },
            { "name": "Partner", "type": "Door*" },
            { "name": "Duplicate", "type": "int32", "duplicate_transient": true }
        ] }
    ],
    "objects": [
        { "class": "/Script/Game.Door", "identity": "/Game/Maps/Main.FrontDoor" },
        { "class": "/Script/Game.Door", "identity": "/Game/Maps/Main.BackDoor" },
        { "class": "/Script/Game.Actor", "identity": "/Game/Maps/Main.Lamp" }
    ]
}"#;

/// Doors, an actor, and every kind of field
pub(crate) fn door_model() -> MemoryModel { MemoryModel::from_schema_json(SCHEMA).expect("fixture schema loads") }

/// Handle of the object with the given identity
pub(crate) fn handle(model: &MemoryModel, identity: &str) -> ObjectHandle {
    use crate::reflection::ObjectModel;

    let class = model.find_class(ACTOR_CLASS).expect("actor class is defined");
    model
        .load_object(&class, identity)
        .expect("fixture object exists")
}

/// Class id of `name`
pub(crate) fn class(name: &str) -> ClassId { ClassId::from(name) }
