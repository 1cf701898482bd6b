//! 通用类型定义模块

pub mod data_value;

pub use data_value::{
    DataValue, FromDataValue, json_value_to_data_value, parse_json_string_to_data_value,
};
