//! SQLite数据库适配器
//!
//! 使用sqlx库实现真实的SQLite数据库操作

use async_trait::async_trait;
use rat_logger::debug;
use std::collections::HashMap;

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite};

use super::StoreAdapter;
use crate::config::DatabaseConnection;
use crate::error::RowBindResult;
use crate::table::TableSchema;
use crate::types::DataValue;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// SQLite适配器
pub struct SqliteAdapter;

impl SqliteAdapter {
    /// 创建新的SQLite适配器
    pub fn new() -> Self {
        Self
    }

    /// 将sqlx的行转换为DataValue映射
    ///
    /// 只做原始类型还原，逻辑类型相关的还原（布尔、JSON、UUID等）
    /// 由绑定层按字段定义完成
    fn row_to_data_map(&self, row: &SqliteRow) -> RowBindResult<HashMap<String, DataValue>> {
        let mut map = HashMap::new();

        for column in row.columns() {
            let column_name = column.name();

            let data_value = if let Ok(value) = row.try_get::<Option<String>, _>(column_name) {
                match value {
                    Some(s) => DataValue::String(s),
                    None => DataValue::Null,
                }
            } else if let Ok(value) = row.try_get::<Option<i64>, _>(column_name) {
                match value {
                    Some(i) => DataValue::Int(i),
                    None => DataValue::Null,
                }
            } else if let Ok(value) = row.try_get::<Option<f64>, _>(column_name) {
                match value {
                    Some(f) => DataValue::Float(f),
                    None => DataValue::Null,
                }
            } else if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(column_name) {
                match value {
                    Some(bytes) => DataValue::Bytes(bytes),
                    None => DataValue::Null,
                }
            } else {
                DataValue::Null
            };

            map.insert(column_name.to_string(), data_value);
        }

        Ok(map)
    }
}

impl Default for SqliteAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// 绑定单个参数
fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q DataValue) -> SqliteQuery<'q> {
    match value {
        DataValue::Null => query.bind(Option::<String>::None),
        DataValue::Bool(b) => query.bind(i64::from(*b)),
        DataValue::Int(i) => query.bind(*i),
        DataValue::Float(f) => query.bind(*f),
        DataValue::String(s) => query.bind(s.as_str()),
        DataValue::Bytes(bytes) => query.bind(bytes.as_slice()),
        DataValue::DateTime(dt) => query.bind(dt.to_rfc3339()),
        DataValue::Uuid(uuid) => query.bind(uuid.to_string()),
        DataValue::Json(json) => query.bind(json.to_string()),
        DataValue::Array(_) | DataValue::Object(_) => query.bind(value.to_json_value().to_string()),
    }
}

#[async_trait]
impl StoreAdapter for SqliteAdapter {
    async fn create_table(
        &self,
        connection: &DatabaseConnection,
        schema: &TableSchema,
        force: bool,
    ) -> RowBindResult<()> {
        let pool = connection.sqlite_pool()?;
        let sql = schema.create_table_sql(force);

        debug!("执行SQLite建表SQL: {}", sql);

        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| crate::quick_error!(query, format!("创建SQLite表失败: {}", e)))?;

        Ok(())
    }

    async fn insert_defaults(
        &self,
        connection: &DatabaseConnection,
        table: &str,
    ) -> RowBindResult<i64> {
        let pool = connection.sqlite_pool()?;
        let sql = format!("INSERT INTO {} (id) VALUES (NULL)", table);

        debug!("执行SQLite插入SQL: {}", sql);

        let result = sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| crate::quick_error!(query, format!("执行SQLite插入失败: {}", e)))?;

        Ok(result.last_insert_rowid())
    }

    async fn update_field(
        &self,
        connection: &DatabaseConnection,
        table: &str,
        field: &str,
        value: &DataValue,
        id: i64,
    ) -> RowBindResult<u64> {
        let pool = connection.sqlite_pool()?;
        let sql = format!("UPDATE {} SET {} = ? WHERE id = ?", table, field);

        debug!("执行SQLite更新SQL: {}", sql);

        let query = bind_value(sqlx::query(&sql), value).bind(id);
        let result = query
            .execute(pool)
            .await
            .map_err(|e| crate::quick_error!(query, format!("执行SQLite更新失败: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn update_row(
        &self,
        connection: &DatabaseConnection,
        table: &str,
        values: &[(String, DataValue)],
        id: i64,
    ) -> RowBindResult<u64> {
        let pool = connection.sqlite_pool()?;

        let set_clauses: Vec<String> = values
            .iter()
            .map(|(name, _)| format!("{} = ?", name))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            table,
            set_clauses.join(", ")
        );

        debug!("执行SQLite整行更新SQL: {}", sql);

        let mut query = sqlx::query(&sql);
        for (_, value) in values {
            query = bind_value(query, value);
        }
        let result = query
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| crate::quick_error!(query, format!("执行SQLite整行更新失败: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn fetch_by_id(
        &self,
        connection: &DatabaseConnection,
        table: &str,
        id: i64,
    ) -> RowBindResult<Option<HashMap<String, DataValue>>> {
        let pool = connection.sqlite_pool()?;
        let sql = format!("SELECT * FROM {} WHERE id = ? LIMIT 1", table);

        debug!("执行SQLite根据ID查询SQL: {}", sql);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| crate::quick_error!(query, format!("执行SQLite根据ID查询失败: {}", e)))?;

        match row {
            Some(r) => Ok(Some(self.row_to_data_map(&r)?)),
            None => Ok(None),
        }
    }

    async fn table_exists(
        &self,
        connection: &DatabaseConnection,
        table: &str,
    ) -> RowBindResult<bool> {
        let pool = connection.sqlite_pool()?;
        let sql = "SELECT name FROM sqlite_master WHERE type='table' AND name=?";

        let row = sqlx::query(sql)
            .bind(table)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                crate::quick_error!(query, format!("检查SQLite表是否存在失败: {}", e))
            })?;

        Ok(row.is_some())
    }

    async fn drop_table(
        &self,
        connection: &DatabaseConnection,
        table: &str,
    ) -> RowBindResult<()> {
        let pool = connection.sqlite_pool()?;
        let sql = format!("DROP TABLE IF EXISTS {}", table);

        debug!("执行SQLite删除表SQL: {}", sql);

        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| crate::quick_error!(query, format!("删除SQLite表失败: {}", e)))?;

        Ok(())
    }
}
