//! rat_rowbind - 轻量级行绑定ORM库
//!
//! 以编程方式声明表结构、在关系型存储中建出对应的表，并产出
//! 与单行实时同步的"活"记录对象：字段写入先落库后改内存，
//! 字段读取走内存副本，整行读回/刷库按主键一次完成
//!
//! 日志系统由调用者自行初始化，本库不自动初始化日志

// 导出所有公共模块
pub mod adapter;
pub mod config;
pub mod error;
pub mod model;
pub mod record;
pub mod table;
pub mod types;

// 重新导出常用类型和函数
pub use adapter::{StoreAdapter, create_adapter};
pub use config::{
    ConnectionConfig, DatabaseConfig, DatabaseConfigBuilder, DatabaseConnection, DatabaseType,
    connect, sqlite_config,
};
pub use error::{RowBindError, RowBindResult};
pub use model::{
    FieldDefinition, FieldType, array_field, boolean_field, bytes_field, datetime_field,
    float_field, id_field, integer_field, json_field, string_field, text_field, uuid_field,
};
pub use record::{LinkedTable, Record};
pub use table::TableSchema;
pub use types::{DataValue, FromDataValue};

// link_record! 宏展开时需要路径可达的 paste
#[doc(hidden)]
pub use paste;

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
