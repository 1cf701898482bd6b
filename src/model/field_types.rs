//! 字段类型定义模块
//!
//! 定义字段的逻辑类型与元数据，并由逻辑类型推导存储类型和
//! 值转换器。逻辑类型决定三件事：DDL 中的列类型、写库前的
//! 序列化形式、读库后的还原形式

use serde::{Deserialize, Serialize};

use crate::error::RowBindResult;
use crate::types::{DataValue, json_value_to_data_value};

/// 字段逻辑类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    /// 字符串类型
    String {
        max_length: Option<usize>,
        min_length: Option<usize>,
        regex: Option<String>,
    },
    /// 整数类型
    Integer {
        min_value: Option<i64>,
        max_value: Option<i64>,
    },
    /// 浮点数类型
    Float {
        min_value: Option<f64>,
        max_value: Option<f64>,
    },
    /// 布尔类型
    Boolean,
    /// 文本类型
    Text,
    /// 日期时间类型
    DateTime,
    /// UUID类型
    Uuid,
    /// JSON类型
    Json,
    /// 二进制类型
    Bytes,
    /// 数组类型（SQL 数据库中按 JSON 文本存储）
    Array { item_type: Box<FieldType> },
}

impl FieldType {
    /// 按名称解析字段类型
    ///
    /// 未识别的类型名立即返回 ConfigError，不会推迟到首次使用
    pub fn parse(name: &str) -> RowBindResult<Self> {
        match name {
            "string" => Ok(FieldType::String {
                max_length: None,
                min_length: None,
                regex: None,
            }),
            "integer" | "int" => Ok(FieldType::Integer {
                min_value: None,
                max_value: None,
            }),
            "float" => Ok(FieldType::Float {
                min_value: None,
                max_value: None,
            }),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "text" => Ok(FieldType::Text),
            "datetime" => Ok(FieldType::DateTime),
            "uuid" => Ok(FieldType::Uuid),
            "json" => Ok(FieldType::Json),
            "bytes" => Ok(FieldType::Bytes),
            "array" => Ok(FieldType::Array {
                item_type: Box::new(FieldType::Json),
            }),
            other => Err(crate::quick_error!(
                config,
                format!("无法识别的字段类型名: {}", other)
            )),
        }
    }

    /// 推导存储类型
    pub fn storage_type(&self) -> &'static str {
        match self {
            FieldType::String { .. }
            | FieldType::Text
            | FieldType::DateTime
            | FieldType::Uuid
            | FieldType::Json
            | FieldType::Array { .. } => "TEXT",
            FieldType::Integer { .. } | FieldType::Boolean => "INTEGER",
            FieldType::Float { .. } => "REAL",
            FieldType::Bytes => "BLOB",
        }
    }

    /// 值序列化转换器：将语言层的值转换为存储形式
    ///
    /// 空值原样放行（是否允许为空由 FieldDefinition 的 nullable 决定）
    pub fn serialize(&self, value: &DataValue) -> RowBindResult<DataValue> {
        if value.is_null() {
            return Ok(DataValue::Null);
        }

        match self {
            FieldType::String { .. } | FieldType::Text => match value {
                DataValue::String(_) => Ok(value.clone()),
                other => Err(type_mismatch("字符串", other)),
            },
            FieldType::Integer { .. } => match value {
                DataValue::Int(_) => Ok(value.clone()),
                other => Err(type_mismatch("整数", other)),
            },
            FieldType::Float { .. } => match value {
                DataValue::Float(_) => Ok(value.clone()),
                DataValue::Int(i) => Ok(DataValue::Float(*i as f64)),
                other => Err(type_mismatch("浮点数", other)),
            },
            FieldType::Boolean => match value {
                // SQLite 中布尔值存储为 0/1
                DataValue::Bool(b) => Ok(DataValue::Int(i64::from(*b))),
                other => Err(type_mismatch("布尔值", other)),
            },
            FieldType::DateTime => match value {
                DataValue::DateTime(dt) => Ok(DataValue::String(dt.to_rfc3339())),
                DataValue::String(_) => Ok(value.clone()),
                other => Err(type_mismatch("日期时间", other)),
            },
            FieldType::Uuid => match value {
                DataValue::Uuid(u) => Ok(DataValue::String(u.to_string())),
                DataValue::String(_) => Ok(value.clone()),
                other => Err(type_mismatch("UUID", other)),
            },
            FieldType::Json => Ok(DataValue::String(value.to_json_value().to_string())),
            FieldType::Bytes => match value {
                DataValue::Bytes(_) => Ok(value.clone()),
                other => Err(type_mismatch("字节数组", other)),
            },
            FieldType::Array { .. } => match value {
                DataValue::Array(_) => Ok(DataValue::String(value.to_json_value().to_string())),
                other => Err(type_mismatch("数组", other)),
            },
        }
    }

    /// 值反序列化：将存储形式还原为逻辑类型的值
    ///
    /// 存储形式与逻辑类型不符时原样返回，不在读路径上报错
    pub fn deserialize(&self, value: DataValue) -> DataValue {
        if value.is_null() {
            return DataValue::Null;
        }

        match self {
            FieldType::Boolean => match value {
                DataValue::Int(i) if i == 0 || i == 1 => DataValue::Bool(i == 1),
                other => other,
            },
            FieldType::DateTime => match value {
                DataValue::String(s) => match chrono::DateTime::parse_from_rfc3339(&s) {
                    Ok(dt) => DataValue::DateTime(dt),
                    Err(_) => DataValue::String(s),
                },
                other => other,
            },
            FieldType::Uuid => match value {
                DataValue::String(s) => match uuid::Uuid::parse_str(&s) {
                    Ok(u) => DataValue::Uuid(u),
                    Err(_) => DataValue::String(s),
                },
                other => other,
            },
            FieldType::Json => match value {
                DataValue::String(s) => match serde_json::from_str::<serde_json::Value>(&s) {
                    Ok(j) => DataValue::Json(j),
                    Err(_) => DataValue::String(s),
                },
                other => other,
            },
            FieldType::Array { .. } => match value {
                DataValue::String(s) => match serde_json::from_str::<serde_json::Value>(&s) {
                    Ok(serde_json::Value::Array(arr)) => DataValue::Array(
                        arr.into_iter().map(json_value_to_data_value).collect(),
                    ),
                    _ => DataValue::String(s),
                },
                other => other,
            },
            _ => value,
        }
    }

    /// 验证字段值
    pub fn validate(&self, value: &DataValue, field_name: &str) -> RowBindResult<()> {
        // 空值跳过类型验证，是否允许为空由字段定义决定
        if value.is_null() {
            return Ok(());
        }

        match self {
            FieldType::String {
                max_length,
                min_length,
                regex,
            } => {
                let DataValue::String(s) = value else {
                    return Err(validation_mismatch(field_name, "字符串", value));
                };
                if let Some(max_len) = max_length {
                    if s.len() > *max_len {
                        return Err(crate::quick_error!(
                            validation,
                            field_name,
                            format!("字符串长度不能超过{}", max_len)
                        ));
                    }
                }
                if let Some(min_len) = min_length {
                    if s.len() < *min_len {
                        return Err(crate::quick_error!(
                            validation,
                            field_name,
                            format!("字符串长度不能少于{}", min_len)
                        ));
                    }
                }
                if let Some(pattern) = regex {
                    let regex = regex::Regex::new(pattern).map_err(|e| {
                        crate::quick_error!(
                            validation,
                            field_name,
                            format!("正则表达式无效: {}", e)
                        )
                    })?;
                    if !regex.is_match(s) {
                        return Err(crate::quick_error!(
                            validation,
                            field_name,
                            "字符串不匹配正则表达式"
                        ));
                    }
                }
                Ok(())
            }
            FieldType::Integer {
                min_value,
                max_value,
            } => {
                let DataValue::Int(i) = value else {
                    return Err(validation_mismatch(field_name, "整数", value));
                };
                if let Some(min_val) = min_value {
                    if i < min_val {
                        return Err(crate::quick_error!(
                            validation,
                            field_name,
                            format!("整数值不能小于{}", min_val)
                        ));
                    }
                }
                if let Some(max_val) = max_value {
                    if i > max_val {
                        return Err(crate::quick_error!(
                            validation,
                            field_name,
                            format!("整数值不能大于{}", max_val)
                        ));
                    }
                }
                Ok(())
            }
            FieldType::Float {
                min_value,
                max_value,
            } => {
                let f = match value {
                    DataValue::Float(f) => *f,
                    DataValue::Int(i) => *i as f64,
                    other => return Err(validation_mismatch(field_name, "浮点数", other)),
                };
                if let Some(min_val) = min_value {
                    if f < *min_val {
                        return Err(crate::quick_error!(
                            validation,
                            field_name,
                            format!("浮点数值不能小于{}", min_val)
                        ));
                    }
                }
                if let Some(max_val) = max_value {
                    if f > *max_val {
                        return Err(crate::quick_error!(
                            validation,
                            field_name,
                            format!("浮点数值不能大于{}", max_val)
                        ));
                    }
                }
                Ok(())
            }
            FieldType::Boolean => match value {
                DataValue::Bool(_) => Ok(()),
                other => Err(validation_mismatch(field_name, "布尔值", other)),
            },
            FieldType::Text => match value {
                DataValue::String(_) => Ok(()),
                other => Err(validation_mismatch(field_name, "文本", other)),
            },
            FieldType::DateTime => match value {
                DataValue::DateTime(_) | DataValue::String(_) => Ok(()),
                other => Err(validation_mismatch(field_name, "日期时间", other)),
            },
            FieldType::Uuid => match value {
                DataValue::Uuid(_) => Ok(()),
                DataValue::String(s) => uuid::Uuid::parse_str(s).map(|_| ()).map_err(|_| {
                    crate::quick_error!(
                        validation,
                        field_name,
                        format!("无效的UUID格式: '{}'", s)
                    )
                }),
                other => Err(validation_mismatch(field_name, "UUID", other)),
            },
            // JSON类型可以接受任何值
            FieldType::Json => Ok(()),
            FieldType::Bytes => match value {
                DataValue::Bytes(_) => Ok(()),
                other => Err(validation_mismatch(field_name, "字节数组", other)),
            },
            FieldType::Array { item_type } => {
                let DataValue::Array(items) = value else {
                    return Err(validation_mismatch(field_name, "数组", value));
                };
                for item in items {
                    item_type.validate(item, field_name)?;
                }
                Ok(())
            }
        }
    }
}

fn type_mismatch(expected: &str, actual: &DataValue) -> crate::error::RowBindError {
    crate::quick_error!(
        serialization,
        format!("期望{}类型，实际收到: {}", expected, actual.type_name())
    )
}

fn validation_mismatch(
    field_name: &str,
    expected: &str,
    actual: &DataValue,
) -> crate::error::RowBindError {
    crate::quick_error!(
        validation,
        field_name,
        format!("字段类型不匹配，期望{}类型，实际收到: {}", expected, actual.type_name())
    )
}

/// 字段定义
///
/// field_type 为 None 表示纯计算列：DDL 中只输出列名，不带存储类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// 字段名
    pub name: String,
    /// 字段逻辑类型
    pub field_type: Option<FieldType>,
    /// 是否允许为空
    pub nullable: bool,
    /// 默认值
    pub default: Option<DataValue>,
    /// 是否为主键
    pub primary_key: bool,
    /// 字段描述
    pub description: Option<String>,
}

impl FieldDefinition {
    /// 创建新的字段定义
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type),
            nullable: true,
            default: None,
            primary_key: false,
            description: None,
        }
    }

    /// 创建无存储类型的计算列
    pub fn virtual_column(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            nullable: true,
            default: None,
            primary_key: false,
            description: None,
        }
    }

    /// 设置为非空字段
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// 设置默认值
    pub fn default_value(mut self, value: impl Into<DataValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// 设置为主键
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// 设置字段描述
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// 推导存储类型，计算列没有存储类型
    pub fn storage_type(&self) -> Option<&'static str> {
        self.field_type.as_ref().map(|t| t.storage_type())
    }

    /// 验证字段值（空值检查 + 类型验证）
    pub fn validate(&self, value: &DataValue) -> RowBindResult<()> {
        if !self.nullable && value.is_null() {
            return Err(crate::quick_error!(
                validation,
                &self.name,
                "非空字段不能为空"
            ));
        }
        if let Some(field_type) = &self.field_type {
            field_type.validate(value, &self.name)?;
        }
        Ok(())
    }

    /// 写库前的值转换，计算列不做转换
    pub fn serialize(&self, value: &DataValue) -> RowBindResult<DataValue> {
        match &self.field_type {
            Some(field_type) => field_type.serialize(value),
            None => Ok(value.clone()),
        }
    }

    /// 读库后的值还原，计算列不做转换
    pub fn deserialize(&self, value: DataValue) -> DataValue {
        match &self.field_type {
            Some(field_type) => field_type.deserialize(value),
            None => value,
        }
    }
}
