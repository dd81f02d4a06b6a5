/* Reflector tests: strategy semantics on hand-built return slots */

use abi_reflect::{BindingError, ReflectError, Reflector, Value, WireError};
use abi_types::{
    CompositeRef, PrimitiveKind, ResolvedField, ResolvedType, ResolvedVariant, TypeCatalog,
};

fn prim(kind: PrimitiveKind) -> ResolvedType {
    ResolvedType::primitive(kind)
}

fn undelegation() -> ResolvedType {
    ResolvedType::NamedRecord { name: "Undelegation".to_string() }
}

fn salsa_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::default();
    catalog.records.insert(
        "Undelegation".to_string(),
        vec![
            ResolvedField { name: "amount".to_string(), field_type: prim(PrimitiveKind::BigUint) },
            ResolvedField { name: "unbond_epoch".to_string(), field_type: prim(PrimitiveKind::U64) },
        ],
    );
    catalog.enums.insert(
        "State".to_string(),
        vec![
            ResolvedVariant { name: "Inactive".to_string(), discriminant: 0 },
            ResolvedVariant { name: "Active".to_string(), discriminant: 1 },
        ],
    );
    catalog
}

/* nested Undelegation: 4-byte length + amount bytes, then 8-byte epoch */
fn encode_undelegation(amount: u8, epoch: u64) -> Vec<u8> {
    let mut out = vec![0, 0, 0, 1, amount];
    out.extend(epoch.to_be_bytes());
    out
}

#[test]
fn u64_output_reads_eight_bytes_big_endian() {
    let catalog = salsa_catalog();
    let reflector = Reflector::new(&catalog);
    let slots = vec![vec![0, 0, 0, 0, 0, 0, 0x0a, 0x8c]];

    let values = reflector
        .decode_outputs("getUnbondPeriod", &[prim(PrimitiveKind::U64)], &slots)
        .unwrap();
    assert_eq!(values, vec![Value::Unsigned { value: 2700 }]);
}

#[test]
fn list_of_big_uint_is_one_value_per_slot() {
    let catalog = salsa_catalog();
    let reflector = Reflector::new(&catalog);
    let output = ResolvedType::list(prim(PrimitiveKind::BigUint));
    let slots = vec![vec![0x01], vec![], vec![0x01, 0x00]];

    let values = reflector.decode_outputs("getRewardAmounts", &[output], &slots).unwrap();
    let elements = values[0].elements().unwrap();
    let decoded: Vec<&str> = elements.iter().filter_map(Value::as_str).collect();
    assert_eq!(decoded, vec!["1", "0", "256"]);
}

#[test]
fn record_list_stops_before_trailing_garbage() {
    let catalog = salsa_catalog();
    let reflector = Reflector::new(&catalog);

    let mut slot = Vec::new();
    for (amount, epoch) in [(5u8, 100u64), (6, 101), (7, 102)] {
        slot.extend(encode_undelegation(amount, epoch));
    }
    slot.extend([0x00, 0x00, 0x01]);

    let values = reflector
        .decode_outputs("getUserUndelegations", &[ResolvedType::list(undelegation())], &[slot])
        .unwrap();
    let elements = values[0].elements().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[2].field("unbond_epoch").and_then(Value::as_u64), Some(102));
}

#[test]
fn variadic_multi_decodes_in_strides() {
    let catalog = salsa_catalog();
    let reflector = Reflector::new(&catalog);
    let output = ResolvedType::MultiVariadic {
        composite: CompositeRef {
            name: "ComplexType0".to_string(),
            members: vec![prim(PrimitiveKind::TokenIdentifier), prim(PrimitiveKind::U64)],
        },
    };
    let slots = vec![
        b"SEGLD-3ad2d0".to_vec(),
        vec![0x05],
        b"WEGLD-bd4d79".to_vec(),
        vec![0x01, 0x00],
    ];

    let values = reflector.decode_outputs("getTokenBalances", &[output], &slots).unwrap();
    let elements = values[0].elements().unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].field("var0").and_then(Value::as_str), Some("SEGLD-3ad2d0"));
    assert_eq!(elements[0].field("var1").and_then(Value::as_u64), Some(5));
    assert_eq!(elements[1].field("var0").and_then(Value::as_str), Some("WEGLD-bd4d79"));
    assert_eq!(elements[1].field("var1").and_then(Value::as_u64), Some(256));
}

#[test]
fn scalar_enum_aborts_on_unknown_discriminant() {
    let catalog = salsa_catalog();
    let reflector = Reflector::new(&catalog);
    let output = ResolvedType::NamedEnum { name: "State".to_string() };

    let ok = reflector.decode_outputs("getState", &[output.clone()], &[vec![1]]).unwrap();
    assert_eq!(
        ok[0],
        Value::Enum { type_name: "State".to_string(), variant: "Active".to_string(), discriminant: 1 }
    );

    let err = reflector.decode_outputs("getState", &[output], &[vec![9]]).unwrap_err();
    match err {
        ReflectError::Binding(BindingError::InvalidWireResponse { source, .. }) => {
            assert_eq!(source, WireError::UnknownDiscriminant { type_name: "State".to_string(), value: 9 });
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn several_outputs_use_consecutive_slots() {
    let catalog = salsa_catalog();
    let reflector = Reflector::new(&catalog);
    let outputs = vec![prim(PrimitiveKind::BigUint), prim(PrimitiveKind::U64)];
    let slots = vec![vec![0x03, 0xe8], vec![0x2a]];

    let values = reflector.decode_outputs("getReserveInfo", &outputs, &slots).unwrap();
    assert_eq!(values[0], Value::BigInteger { value: "1000".to_string() });
    assert_eq!(values[1], Value::Unsigned { value: 42 });
}

#[test]
fn undeclared_type_is_rejected_before_decoding() {
    let catalog = TypeCatalog::default();
    let reflector = Reflector::new(&catalog);
    let err = reflector
        .decode_outputs("getUserUndelegations", &[ResolvedType::list(undelegation())], &[])
        .unwrap_err();
    assert!(matches!(err, ReflectError::UnknownType { ref type_name, .. } if type_name == "Undelegation"));
}

#[test]
fn value_serializes_with_kind_tag() {
    let value = Value::Unsigned { value: 7 };
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#"{"kind":"unsigned","value":7}"#);
}
