use crate::definition::DefId;
use crate::definition::Definition;
use crate::definition::PeerId;
use crate::definition::Reference;
use crate::schema::Member;
use crate::schema::Schema;
use crate::value::Value;

fn calculator_schema() -> Schema {
    Schema::builder("Calculator")
        .method("add")
        .method("reset")
        .property("version")
        .property_mut("precision")
        .build()
}

#[test]
fn test_schema_preserves_declaration_order() {
    let schema = calculator_schema();
    let names: Vec<&str> = schema.members().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["add", "reset", "version", "precision"]);
}

#[test]
fn test_schema_property_is_implicitly_readonly() {
    let schema = calculator_schema();
    assert!(schema.member("version").unwrap().is_readonly());
    assert!(!schema.member("precision").unwrap().is_readonly());
    assert!(schema.member("add").unwrap().is_method());
}

#[test]
fn test_schema_redeclaration_replaces_in_place() {
    let schema = Schema::builder("Thing")
        .property("mode")
        .method("poke")
        .property_mut("mode")
        .build();

    // Upgraded to writable, but still first in declaration order.
    let names: Vec<&str> = schema.members().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["mode", "poke"]);
    assert_eq!(
        schema.member("mode"),
        Some(&Member::Property { readonly: false })
    );
}

#[test]
fn test_definition_carries_schema_members() {
    let def = Definition::new(DefId(7), PeerId::new("P1"), calculator_schema(), None);

    assert_eq!(def.id(), DefId(7));
    assert_eq!(def.peer_id().as_str(), "P1");
    assert_eq!(def.name(), "Calculator");
    assert_eq!(def.parent_id(), None);
    assert_eq!(def.member("add"), Some(&Member::Method));
    assert_eq!(def.member("nope"), None);
}

#[test]
fn test_reference_is_a_bare_handle() {
    let def = Definition::new(DefId(7), PeerId::new("P1"), calculator_schema(), None);
    let reference = def.reference();
    assert_eq!(reference.def_id(), DefId(7));

    // Copy semantics: handles are value types.
    let copied = reference;
    assert_eq!(copied, reference);
}

#[test]
fn test_value_conversions() {
    assert_eq!(Value::from(42i64), Value::Int(42));
    assert_eq!(Value::from("hi"), Value::Str("hi".into()));
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(
        Value::from(Reference::new(DefId(3))),
        Value::Reference(Reference::new(DefId(3)))
    );
}

#[test]
fn test_value_accessors() {
    assert_eq!(Value::from("hi").as_str(), Some("hi"));
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from(42i64).as_int(), Some(42));

    // Accessors never coerce across variants.
    assert_eq!(Value::Int(1).as_str(), None);
    assert_eq!(Value::Int(1).as_bool(), None);
    assert_eq!(Value::Unit.as_int(), None);
}

#[test]
fn test_value_capability_variants() {
    assert!(Value::Reference(Reference::new(DefId(1))).is_capability());
    assert!(Value::Definitions(vec![]).is_capability());
    assert!(!Value::Int(1).is_capability());
    // A reference nested in a plain list is data, not a capability.
    assert!(!Value::List(vec![Value::Reference(Reference::new(DefId(1)))]).is_capability());
}

#[test]
fn test_definition_serde_round_trip() {
    let def = Definition::new(DefId(7), PeerId::new("P1"), calculator_schema(), Some(DefId(2)));
    let json = serde_json::to_string(&def).unwrap();
    let back: Definition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, def);
}
