//! 字段定义便捷函数模块
//!
//! 提供创建各种字段类型的便捷函数

use crate::model::field_types::{FieldDefinition, FieldType};

/// 便捷函数：创建整数主键字段
///
/// 主键固定命名为 id，由数据库在插入时自动分配
pub fn id_field() -> FieldDefinition {
    FieldDefinition::new(
        "id",
        FieldType::Integer {
            min_value: None,
            max_value: None,
        },
    )
    .primary_key()
}

/// 便捷函数：创建字符串字段
pub fn string_field(
    name: impl Into<String>,
    max_length: Option<usize>,
    min_length: Option<usize>,
) -> FieldDefinition {
    FieldDefinition::new(
        name,
        FieldType::String {
            max_length,
            min_length,
            regex: None,
        },
    )
}

/// 便捷函数：创建整数字段
pub fn integer_field(
    name: impl Into<String>,
    min_value: Option<i64>,
    max_value: Option<i64>,
) -> FieldDefinition {
    FieldDefinition::new(
        name,
        FieldType::Integer {
            min_value,
            max_value,
        },
    )
}

/// 便捷函数：创建浮点数字段
pub fn float_field(
    name: impl Into<String>,
    min_value: Option<f64>,
    max_value: Option<f64>,
) -> FieldDefinition {
    FieldDefinition::new(
        name,
        FieldType::Float {
            min_value,
            max_value,
        },
    )
}

/// 便捷函数：创建布尔字段
pub fn boolean_field(name: impl Into<String>) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::Boolean)
}

/// 便捷函数：创建文本字段
pub fn text_field(name: impl Into<String>) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::Text)
}

/// 便捷函数：创建日期时间字段
pub fn datetime_field(name: impl Into<String>) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::DateTime)
}

/// 便捷函数：创建UUID字段
pub fn uuid_field(name: impl Into<String>) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::Uuid)
}

/// 便捷函数：创建JSON字段
pub fn json_field(name: impl Into<String>) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::Json)
}

/// 便捷函数：创建二进制字段
pub fn bytes_field(name: impl Into<String>) -> FieldDefinition {
    FieldDefinition::new(name, FieldType::Bytes)
}

/// 便捷函数：创建数组字段
/// SQL 数据库中按 JSON 文本存储
pub fn array_field(name: impl Into<String>, item_type: FieldType) -> FieldDefinition {
    FieldDefinition::new(
        name,
        FieldType::Array {
            item_type: Box::new(item_type),
        },
    )
}
