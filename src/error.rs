//! 错误类型定义模块
//!
//! 统一的错误类型与Result别名，所有公共接口均返回 RowBindResult

use thiserror::Error;

/// rat_rowbind 统一错误类型
#[derive(Error, Debug)]
pub enum RowBindError {
    /// 访问了未在表结构中声明的字段（或已被 delete 移除的字段）
    #[error("未知字段: {field}")]
    UnknownField { field: String },

    /// 按ID打开记录时对应的行不存在
    #[error("表 {table} 中不存在 id = {id} 的记录")]
    RecordNotFound { table: String, id: i64 },

    /// 数据库连接错误
    #[error("数据库连接错误: {message}")]
    ConnectionError { message: String },

    /// 查询执行错误
    #[error("查询执行错误: {message}")]
    QueryError { message: String },

    /// 配置错误（非法的表结构定义、未知的字段类型名等）
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// 字段值验证错误
    #[error("字段 {field} 验证失败: {message}")]
    ValidationError { field: String, message: String },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    SerializationError { message: String },
}

/// 统一Result别名
pub type RowBindResult<T> = Result<T, RowBindError>;

impl From<serde_json::Error> for RowBindError {
    fn from(err: serde_json::Error) -> Self {
        RowBindError::SerializationError {
            message: err.to_string(),
        }
    }
}

/// 便捷错误构造宏
///
/// 统一各模块构造错误的写法，避免到处手写结构体字面量
#[macro_export]
macro_rules! quick_error {
    (unknown_field, $field:expr) => {
        $crate::error::RowBindError::UnknownField {
            field: $field.to_string(),
        }
    };
    (not_found, $table:expr, $id:expr) => {
        $crate::error::RowBindError::RecordNotFound {
            table: $table.to_string(),
            id: $id,
        }
    };
    (connection, $msg:expr) => {
        $crate::error::RowBindError::ConnectionError {
            message: $msg.to_string(),
        }
    };
    (query, $msg:expr) => {
        $crate::error::RowBindError::QueryError {
            message: $msg.to_string(),
        }
    };
    (config, $msg:expr) => {
        $crate::error::RowBindError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (validation, $field:expr, $msg:expr) => {
        $crate::error::RowBindError::ValidationError {
            field: $field.to_string(),
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::RowBindError::SerializationError {
            message: $msg.to_string(),
        }
    };
}
