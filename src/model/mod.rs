//! 字段定义系统模块
//!
//! 通过字段描述符声明表结构，提供类型推导、值转换与验证功能

pub mod convenience;
pub mod field_types;

pub use convenience::*;
pub use field_types::{FieldDefinition, FieldType};
