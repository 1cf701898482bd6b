//! 行绑定记录模块
//!
//! 核心的"活"记录实现：按表结构把内存中的字段映射和数据库中的
//! 一行保持同步。写路径先落库、成功后才改内存；读路径按主键整
//! 行刷新。键控访问（get/set/delete）是唯一的规范路径，
//! link_record! 宏生成的属性风格访问器只是它上面的一层语法糖

pub mod macros;

use rat_logger::warn;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::{StoreAdapter, create_adapter};
use crate::config::DatabaseConnection;
use crate::error::RowBindResult;
use crate::table::TableSchema;
use crate::types::DataValue;

/// 绑定层共享状态：表结构、连接句柄与适配器
struct LinkedInner {
    schema: TableSchema,
    connection: DatabaseConnection,
    adapter: Box<dyn StoreAdapter>,
}

/// 绑定到数据库的表，Record 的工厂
///
/// 连接句柄在由它产出的所有 Record 实例间共享。本层不提供跨实例
/// 的并发控制：两个 Record 同时改同一行时各自的 set 是互不协调的
/// 独立语句，调用方需要保证同一行只有一个写入者
#[derive(Clone)]
pub struct LinkedTable {
    inner: Arc<LinkedInner>,
}

impl LinkedTable {
    /// 绑定表结构与数据库连接
    ///
    /// 绑定时立即执行建表语句（带 IF NOT EXISTS 保护，幂等）。
    /// 表结构必须带整数主键 id，否则拒绝绑定
    pub async fn bind(
        schema: TableSchema,
        connection: DatabaseConnection,
    ) -> RowBindResult<Self> {
        if schema.primary_key().is_none() {
            return Err(crate::quick_error!(
                config,
                format!("表 {} 缺少主键字段 id，无法绑定", schema.name())
            ));
        }

        let adapter = create_adapter(connection.db_type())?;
        adapter.create_table(&connection, &schema, false).await?;

        crate::debug_log!("表 {} 绑定完成", schema.name());

        Ok(Self {
            inner: Arc::new(LinkedInner {
                schema,
                connection,
                adapter,
            }),
        })
    }

    /// 绑定的表结构
    pub fn schema(&self) -> &TableSchema {
        &self.inner.schema
    }

    /// 创建新记录
    ///
    /// 插入一个仅填主键的新行（其余列取数据库侧默认值），
    /// 取回数据库分配的ID后立即整行读回
    pub async fn create(&self) -> RowBindResult<Record> {
        let id = self
            .inner
            .adapter
            .insert_defaults(&self.inner.connection, self.inner.schema.name())
            .await?;

        crate::debug_log!("表 {} 新建记录, id = {}", self.inner.schema.name(), id);

        let mut record = Record {
            inner: Arc::clone(&self.inner),
            id,
            values: HashMap::new(),
        };
        record.read_sync().await?;
        Ok(record)
    }

    /// 打开已存在的记录
    ///
    /// 不执行插入，直接按给定ID整行读回；行不存在时返回
    /// RecordNotFound（挂在不存在的行上的句柄必然是调用方错误）
    pub async fn open(&self, id: i64) -> RowBindResult<Record> {
        let mut record = Record {
            inner: Arc::clone(&self.inner),
            id,
            values: HashMap::new(),
        };

        let row = self
            .inner
            .adapter
            .fetch_by_id(&self.inner.connection, self.inner.schema.name(), id)
            .await?;
        match row {
            Some(row) => {
                record.apply_row(row);
                Ok(record)
            }
            None => Err(crate::quick_error!(
                not_found,
                self.inner.schema.name(),
                id
            )),
        }
    }
}

/// 绑定到数据库中某一行的"活"记录
///
/// 同一行可以同时存在多个内存实例，实例间不保证一致性；
/// 需要拿到别的写入者落库的最新状态时调用 read_sync
pub struct Record {
    inner: Arc<LinkedInner>,
    id: i64,
    values: HashMap<String, DataValue>,
}

impl Record {
    /// 记录的主键ID
    pub fn id(&self) -> i64 {
        self.id
    }

    /// 当前内存中的字段映射
    pub fn values(&self) -> &HashMap<String, DataValue> {
        &self.values
    }

    /// 读取字段当前值
    ///
    /// 纯内存操作，不访问数据库。未声明的字段与已被 delete 移除的
    /// 字段统一按未知字段处理，不做隐式重读
    pub fn get(&self, key: &str) -> RowBindResult<&DataValue> {
        if !self.inner.schema.has_field(key) {
            return Err(crate::quick_error!(unknown_field, key));
        }
        self.values
            .get(key)
            .ok_or_else(|| crate::quick_error!(unknown_field, key))
    }

    /// 设置字段值
    ///
    /// 先验证并转换，随后落库（UPDATE <表> SET <列> = ? WHERE id = ?），
    /// 落库成功后才更新内存映射；落库失败时内存状态保持不变
    pub async fn set(&mut self, key: &str, value: impl Into<DataValue>) -> RowBindResult<()> {
        let field = self
            .inner
            .schema
            .field(key)
            .ok_or_else(|| crate::quick_error!(unknown_field, key))?;

        let value = value.into();
        field.validate(&value)?;
        let stored = field.serialize(&value)?;

        self.inner
            .adapter
            .update_field(
                &self.inner.connection,
                self.inner.schema.name(),
                key,
                &stored,
                self.id,
            )
            .await?;

        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// 仅更新内存中的字段值，不落库
    ///
    /// 配合 write_sync 使用，用于先在内存中累积多处修改再一次性刷库
    pub fn set_local(&mut self, key: &str, value: impl Into<DataValue>) -> RowBindResult<()> {
        if !self.inner.schema.has_field(key) {
            return Err(crate::quick_error!(unknown_field, key));
        }
        self.values.insert(key.to_string(), value.into());
        Ok(())
    }

    /// 删除字段值
    ///
    /// 将库中对应列置为 NULL（WHERE 按主键约束到恰好一行），
    /// 随后从内存映射中移除该键，是移除而不是置空。重复删除
    /// 是幂等的；删除后的 get 统一按未知字段失败
    pub async fn delete(&mut self, key: &str) -> RowBindResult<()> {
        if !self.inner.schema.has_field(key) {
            return Err(crate::quick_error!(unknown_field, key));
        }

        self.inner
            .adapter
            .update_field(
                &self.inner.connection,
                self.inner.schema.name(),
                key,
                &DataValue::Null,
                self.id,
            )
            .await?;

        self.values.remove(key);
        Ok(())
    }

    /// 整行读回：用数据库中的当前行覆盖内存中所有声明字段的值
    ///
    /// 行不存在时不报错也不清空，保留本地状态（幽灵记录），
    /// 仅记录告警；调用方需要自行识别这种情况
    pub async fn read_sync(&mut self) -> RowBindResult<()> {
        let row = self
            .inner
            .adapter
            .fetch_by_id(&self.inner.connection, self.inner.schema.name(), self.id)
            .await?;

        match row {
            Some(row) => {
                self.apply_row(row);
            }
            None => {
                warn!(
                    "表 {} 中不存在 id = {} 的行，read_sync 保留本地状态",
                    self.inner.schema.name(),
                    self.id
                );
            }
        }
        Ok(())
    }

    /// 整行刷库：一条 UPDATE 覆盖所有声明字段
    ///
    /// 用于把内存中已经漂移的状态（例如经由 set_local 的修改）
    /// 一次性推回数据库。映射中不存在的字段（已被 delete）按
    /// NULL 刷出。单条语句在存储层是原子的：要么全部列更新，
    /// 要么整条失败。调用方自行保证不会用它覆盖并发写入的状态
    pub async fn write_sync(&self) -> RowBindResult<u64> {
        let mut row: Vec<(String, DataValue)> = Vec::with_capacity(self.inner.schema.fields().len());
        for field in self.inner.schema.fields() {
            let value = match self.values.get(&field.name) {
                Some(value) => field.serialize(value)?,
                None => DataValue::Null,
            };
            row.push((field.name.clone(), value));
        }

        self.inner
            .adapter
            .update_row(&self.inner.connection, self.inner.schema.name(), &row, self.id)
            .await
    }

    /// 用一行查询结果覆盖所有声明字段的内存值（按列名取值）
    fn apply_row(&mut self, row: HashMap<String, DataValue>) {
        for field in self.inner.schema.fields() {
            if let Some(value) = row.get(&field.name) {
                let value = field.deserialize(value.clone());
                self.values.insert(field.name.clone(), value);
            }
        }
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("table", &self.inner.schema.name())
            .field("id", &self.id)
            .field("values", &self.values)
            .finish()
    }
}
