//! 字段类型解析、转换与验证测试

use chrono::{FixedOffset, TimeZone};
use rat_rowbind::{
    DataValue, FieldType, FromDataValue, RowBindError, boolean_field, integer_field, string_field,
    text_field,
};

#[test]
fn test_parse_known_type_names() {
    assert!(matches!(
        FieldType::parse("string").unwrap(),
        FieldType::String { .. }
    ));
    assert!(matches!(
        FieldType::parse("int").unwrap(),
        FieldType::Integer { .. }
    ));
    assert!(matches!(
        FieldType::parse("bool").unwrap(),
        FieldType::Boolean
    ));
    assert!(matches!(FieldType::parse("text").unwrap(), FieldType::Text));
    assert!(matches!(FieldType::parse("json").unwrap(), FieldType::Json));
    assert!(matches!(
        FieldType::parse("array").unwrap(),
        FieldType::Array { .. }
    ));
}

#[test]
fn test_parse_unknown_type_name_fails_fast() {
    let result = FieldType::parse("tuple_of_doom");
    assert!(matches!(result, Err(RowBindError::ConfigError { .. })));
}

#[test]
fn test_storage_type_mapping() {
    assert_eq!(FieldType::parse("string").unwrap().storage_type(), "TEXT");
    assert_eq!(FieldType::Text.storage_type(), "TEXT");
    assert_eq!(
        FieldType::parse("integer").unwrap().storage_type(),
        "INTEGER"
    );
    assert_eq!(FieldType::Boolean.storage_type(), "INTEGER");
    assert_eq!(FieldType::parse("float").unwrap().storage_type(), "REAL");
    assert_eq!(FieldType::Bytes.storage_type(), "BLOB");
    assert_eq!(FieldType::Json.storage_type(), "TEXT");
}

#[test]
fn test_serialize_boolean_to_integer() {
    let serialized = FieldType::Boolean.serialize(&DataValue::Bool(true)).unwrap();
    assert_eq!(serialized, DataValue::Int(1));
    let serialized = FieldType::Boolean
        .serialize(&DataValue::Bool(false))
        .unwrap();
    assert_eq!(serialized, DataValue::Int(0));
}

#[test]
fn test_serialize_array_to_json_text() {
    let field_type = FieldType::Array {
        item_type: Box::new(FieldType::Integer {
            min_value: None,
            max_value: None,
        }),
    };
    let value = DataValue::Array(vec![DataValue::Int(1), DataValue::Int(2)]);
    let serialized = field_type.serialize(&value).unwrap();
    assert_eq!(serialized, DataValue::String("[1,2]".to_string()));
}

#[test]
fn test_serialize_datetime_to_rfc3339() {
    let dt = FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
        .unwrap();
    let serialized = FieldType::DateTime
        .serialize(&DataValue::DateTime(dt))
        .unwrap();
    assert_eq!(
        serialized,
        DataValue::String("2024-05-01T12:30:00+08:00".to_string())
    );
}

#[test]
fn test_serialize_type_mismatch_fails() {
    let result = FieldType::Boolean.serialize(&DataValue::String("yes".to_string()));
    assert!(matches!(
        result,
        Err(RowBindError::SerializationError { .. })
    ));

    let result = FieldType::Text.serialize(&DataValue::Int(5));
    assert!(matches!(
        result,
        Err(RowBindError::SerializationError { .. })
    ));
}

#[test]
fn test_serialize_null_passes_through() {
    assert_eq!(
        FieldType::Boolean.serialize(&DataValue::Null).unwrap(),
        DataValue::Null
    );
}

#[test]
fn test_deserialize_restores_logical_values() {
    assert_eq!(
        FieldType::Boolean.deserialize(DataValue::Int(1)),
        DataValue::Bool(true)
    );

    let array_type = FieldType::Array {
        item_type: Box::new(FieldType::Integer {
            min_value: None,
            max_value: None,
        }),
    };
    assert_eq!(
        array_type.deserialize(DataValue::String("[1,2]".to_string())),
        DataValue::Array(vec![DataValue::Int(1), DataValue::Int(2)])
    );

    let restored = FieldType::DateTime
        .deserialize(DataValue::String("2024-05-01T12:30:00+08:00".to_string()));
    assert!(matches!(restored, DataValue::DateTime(_)));

    let uuid = uuid::Uuid::new_v4();
    assert_eq!(
        FieldType::Uuid.deserialize(DataValue::String(uuid.to_string())),
        DataValue::Uuid(uuid)
    );
}

#[test]
fn test_validate_string_length_limits() {
    let field = string_field("name", Some(5), Some(2));
    assert!(field.validate(&DataValue::String("abc".to_string())).is_ok());

    let too_long = field.validate(&DataValue::String("abcdef".to_string()));
    assert!(matches!(too_long, Err(RowBindError::ValidationError { .. })));

    let too_short = field.validate(&DataValue::String("a".to_string()));
    assert!(matches!(
        too_short,
        Err(RowBindError::ValidationError { .. })
    ));
}

#[test]
fn test_validate_string_regex() {
    let field_type = FieldType::String {
        max_length: None,
        min_length: None,
        regex: Some("^[a-z]+$".to_string()),
    };
    assert!(field_type
        .validate(&DataValue::String("abc".to_string()), "slug")
        .is_ok());
    assert!(field_type
        .validate(&DataValue::String("ABC".to_string()), "slug")
        .is_err());
}

#[test]
fn test_validate_integer_range() {
    let field = integer_field("age", Some(0), Some(150));
    assert!(field.validate(&DataValue::Int(25)).is_ok());
    assert!(field.validate(&DataValue::Int(-1)).is_err());
    assert!(field.validate(&DataValue::Int(200)).is_err());
}

#[test]
fn test_validate_not_null_field() {
    let field = text_field("title").not_null();
    let result = field.validate(&DataValue::Null);
    assert!(matches!(result, Err(RowBindError::ValidationError { .. })));

    // 默认可空
    let field = text_field("title");
    assert!(field.validate(&DataValue::Null).is_ok());
}

#[test]
fn test_validate_type_mismatch() {
    let field = boolean_field("active");
    let result = field.validate(&DataValue::String("yes".to_string()));
    assert!(matches!(result, Err(RowBindError::ValidationError { .. })));
}

#[test]
fn test_from_data_value_extraction() {
    assert_eq!(i64::from_data_value(&DataValue::Int(5)).unwrap(), 5);
    assert_eq!(
        String::from_data_value(&DataValue::String("x".to_string())).unwrap(),
        "x"
    );
    assert!(bool::from_data_value(&DataValue::Int(1)).unwrap());
    assert_eq!(f64::from_data_value(&DataValue::Int(3)).unwrap(), 3.0);
    assert_eq!(
        Option::<String>::from_data_value(&DataValue::Null).unwrap(),
        None
    );
    assert!(i64::from_data_value(&DataValue::String("5".to_string())).is_err());
}
