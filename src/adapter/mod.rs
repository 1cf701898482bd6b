//! 数据库适配器模块
//!
//! 提供统一的存储操作接口，屏蔽不同数据库的实现差异。
//! 核心只依赖这组最小接口：建表、插入默认行、按主键读写。
//! 任何满足该契约的关系型存储都可以替换进来

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::{DatabaseConnection, DatabaseType};
use crate::error::RowBindResult;
use crate::table::TableSchema;
use crate::types::DataValue;

// 导入各个数据库适配器 (条件编译)
#[cfg(feature = "sqlite-support")]
mod sqlite;

// 条件导出适配器
#[cfg(feature = "sqlite-support")]
pub use sqlite::SqliteAdapter;

/// 存储适配器trait，定义绑定层依赖的统一存储操作接口
///
/// 存储层的任何失败原样向上传播，不做自动重试
/// （插入新行等操作不满足幂等性）
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// 按表结构建表，force=true 时不带 IF NOT EXISTS 保护
    async fn create_table(
        &self,
        connection: &DatabaseConnection,
        schema: &TableSchema,
        force: bool,
    ) -> RowBindResult<()>;

    /// 插入仅填主键的新行，返回数据库分配的自增ID
    async fn insert_defaults(
        &self,
        connection: &DatabaseConnection,
        table: &str,
    ) -> RowBindResult<i64>;

    /// 按主键更新单个字段，返回受影响的行数
    async fn update_field(
        &self,
        connection: &DatabaseConnection,
        table: &str,
        field: &str,
        value: &DataValue,
        id: i64,
    ) -> RowBindResult<u64>;

    /// 按主键整行更新，values 按声明顺序给出，返回受影响的行数
    async fn update_row(
        &self,
        connection: &DatabaseConnection,
        table: &str,
        values: &[(String, DataValue)],
        id: i64,
    ) -> RowBindResult<u64>;

    /// 按主键读取整行，结果按列名寻址；行不存在时返回 None
    async fn fetch_by_id(
        &self,
        connection: &DatabaseConnection,
        table: &str,
        id: i64,
    ) -> RowBindResult<Option<HashMap<String, DataValue>>>;

    /// 检查表是否存在
    async fn table_exists(
        &self,
        connection: &DatabaseConnection,
        table: &str,
    ) -> RowBindResult<bool>;

    /// 删除表
    async fn drop_table(&self, connection: &DatabaseConnection, table: &str)
    -> RowBindResult<()>;
}

/// 按数据库类型创建适配器
pub fn create_adapter(db_type: DatabaseType) -> RowBindResult<Box<dyn StoreAdapter>> {
    match db_type {
        DatabaseType::SQLite => {
            #[cfg(feature = "sqlite-support")]
            {
                Ok(Box::new(SqliteAdapter::new()))
            }
            #[cfg(not(feature = "sqlite-support"))]
            {
                Err(crate::quick_error!(
                    config,
                    "sqlite-support 特性未启用，无法创建SQLite适配器"
                ))
            }
        }
    }
}
