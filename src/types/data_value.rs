//! 通用数据值类型
//!
//! 语言层的值与数据库列值之间的统一表示，所有读写路径均以
//! DataValue 为交换格式

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::RowBindResult;

/// 通用数据值类型
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    /// 空值
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 字节数组
    Bytes(Vec<u8>),
    /// 日期时间
    DateTime(DateTime<FixedOffset>),
    /// UUID
    Uuid(Uuid),
    /// JSON 值
    Json(serde_json::Value),
    /// 数组
    Array(Vec<DataValue>),
    /// 对象/文档
    Object(HashMap<String, DataValue>),
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Bytes(bytes) => write!(f, "[{} bytes]", bytes.len()),
            DataValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            DataValue::Uuid(uuid) => write!(f, "{}", uuid),
            DataValue::Json(json) => write!(f, "{}", json),
            DataValue::Array(arr) => {
                let json_str = serde_json::to_string(arr).unwrap_or_default();
                write!(f, "{}", json_str)
            }
            DataValue::Object(obj) => {
                let json_str = serde_json::to_string(obj).unwrap_or_default();
                write!(f, "{}", json_str)
            }
        }
    }
}

impl std::fmt::Debug for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug 和 Display 保持一致，显示实际值而不是类型构造函数
        write!(f, "{}", self)
    }
}

impl DataValue {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
            DataValue::Bytes(_) => "bytes",
            DataValue::DateTime(_) => "datetime",
            DataValue::Uuid(_) => "uuid",
            DataValue::Json(_) => "json",
            DataValue::Array(_) => "array",
            DataValue::Object(_) => "object",
        }
    }

    /// 判断是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// 转换为 JSON 字符串
    pub fn to_json_string(&self) -> RowBindResult<String> {
        serde_json::to_string(self).map_err(|e| {
            crate::quick_error!(serialization, format!("DataValue 转换为 JSON 失败: {}", e))
        })
    }

    /// 从 JSON 字符串解析
    pub fn from_json_string(json: &str) -> RowBindResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::quick_error!(serialization, format!("JSON 解析为 DataValue 失败: {}", e))
        })
    }

    /// 转换为 JSON 值
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Bool(b) => serde_json::Value::Bool(*b),
            DataValue::Int(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::String(s) => serde_json::Value::String(s.clone()),
            DataValue::Bytes(b) => serde_json::Value::String(BASE64.encode(b)),
            DataValue::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            DataValue::Uuid(u) => serde_json::Value::String(u.to_string()),
            DataValue::Json(j) => j.clone(),
            DataValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|item| item.to_json_value()).collect())
            }
            DataValue::Object(obj) => {
                let json_object: serde_json::Map<String, serde_json::Value> = obj
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect();
                serde_json::Value::Object(json_object)
            }
        }
    }

    /// 渲染为 SQL 字面量，用于 DDL 中的 DEFAULT 子句
    ///
    /// 字符串类值按单引号转义，数值直接输出，布尔值按 0/1 输出，
    /// 复杂类型按引号包裹的 JSON 文本输出
    pub fn to_sql_literal(&self) -> String {
        fn quote(s: &str) -> String {
            format!("'{}'", s.replace('\'', "''"))
        }

        match self {
            DataValue::Null => "NULL".to_string(),
            DataValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            DataValue::Int(i) => i.to_string(),
            DataValue::Float(f) => f.to_string(),
            DataValue::String(s) => quote(s),
            DataValue::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{:02X}", byte)).collect();
                format!("X'{}'", hex)
            }
            DataValue::DateTime(dt) => quote(&dt.to_rfc3339()),
            DataValue::Uuid(u) => quote(&u.to_string()),
            DataValue::Json(j) => quote(&j.to_string()),
            DataValue::Array(_) | DataValue::Object(_) => quote(&self.to_json_value().to_string()),
        }
    }
}

/// 将 serde_json::Value 正确转换为对应的 DataValue 类型
/// 而不是简单包装为 DataValue::Json
pub fn json_value_to_data_value(value: serde_json::Value) -> DataValue {
    match value {
        serde_json::Value::Null => DataValue::Null,
        serde_json::Value::Bool(b) => DataValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DataValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                DataValue::Float(f)
            } else {
                DataValue::Json(serde_json::Value::Number(n))
            }
        }
        serde_json::Value::String(s) => DataValue::String(s),
        serde_json::Value::Array(arr) => {
            DataValue::Array(arr.into_iter().map(json_value_to_data_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let data_object: HashMap<String, DataValue> = obj
                .into_iter()
                .map(|(k, v)| (k, json_value_to_data_value(v)))
                .collect();
            DataValue::Object(data_object)
        }
    }
}

/// JSON 字符串检测和反序列化
///
/// 以 '[' 或 '{' 开头且能成功解析为 JSON 的字符串转换为对应的
/// DataValue::Array 或 DataValue::Object，否则原样返回字符串
pub fn parse_json_string_to_data_value(value: String) -> DataValue {
    if value.starts_with('[') || value.starts_with('{') {
        match serde_json::from_str::<serde_json::Value>(&value) {
            Ok(json_value) => json_value_to_data_value(json_value),
            Err(_) => DataValue::String(value),
        }
    } else {
        DataValue::String(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<f32> for DataValue {
    fn from(value: f32) -> Self {
        DataValue::Float(value as f64)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(value: Vec<u8>) -> Self {
        DataValue::Bytes(value)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(value: DateTime<Utc>) -> Self {
        DataValue::DateTime(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for DataValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DataValue::DateTime(value)
    }
}

impl From<Uuid> for DataValue {
    fn from(value: Uuid) -> Self {
        DataValue::Uuid(value)
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        DataValue::Json(value)
    }
}

impl<T> From<Option<T>> for DataValue
where
    T: Into<DataValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DataValue::Null,
        }
    }
}

/// 从 DataValue 提取具体类型的值
///
/// link_record! 宏生成的强类型 getter 依赖此特征
pub trait FromDataValue: Sized {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self>;
}

impl FromDataValue for DataValue {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        Ok(value.clone())
    }
}

impl FromDataValue for i64 {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::Int(i) => Ok(*i),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望整数，实际为: {}", other.type_name())
            )),
        }
    }
}

impl FromDataValue for f64 {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::Float(f) => Ok(*f),
            // SQLite 对整数值的浮点列返回 INTEGER 亲和类型
            DataValue::Int(i) => Ok(*i as f64),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望浮点数，实际为: {}", other.type_name())
            )),
        }
    }
}

impl FromDataValue for bool {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::Bool(b) => Ok(*b),
            // SQLite 中布尔值存储为 0/1
            DataValue::Int(i) if *i == 0 || *i == 1 => Ok(*i == 1),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望布尔值，实际为: {}", other.type_name())
            )),
        }
    }
}

impl FromDataValue for String {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::String(s) => Ok(s.clone()),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望字符串，实际为: {}", other.type_name())
            )),
        }
    }
}

impl FromDataValue for Vec<u8> {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::Bytes(b) => Ok(b.clone()),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望字节数组，实际为: {}", other.type_name())
            )),
        }
    }
}

impl FromDataValue for DateTime<FixedOffset> {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::DateTime(dt) => Ok(*dt),
            DataValue::String(s) => DateTime::parse_from_rfc3339(s).map_err(|e| {
                crate::quick_error!(serialization, format!("日期时间解析失败: {}", e))
            }),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望日期时间，实际为: {}", other.type_name())
            )),
        }
    }
}

impl FromDataValue for Uuid {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::Uuid(u) => Ok(*u),
            DataValue::String(s) => Uuid::parse_str(s)
                .map_err(|e| crate::quick_error!(serialization, format!("UUID解析失败: {}", e))),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望UUID，实际为: {}", other.type_name())
            )),
        }
    }
}

impl FromDataValue for serde_json::Value {
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        Ok(value.to_json_value())
    }
}

impl<T> FromDataValue for Option<T>
where
    T: FromDataValue,
{
    fn from_data_value(value: &DataValue) -> RowBindResult<Self> {
        match value {
            DataValue::Null => Ok(None),
            other => Ok(Some(T::from_data_value(other)?)),
        }
    }
}
