//! 表结构定义与 DDL 生成
//!
//! TableSchema 是有序的字段集合：字段顺序只影响 DDL 输出，
//! 查找一律按字段名。构造完成后不可变更

use serde::{Deserialize, Serialize};

use crate::error::RowBindResult;
use crate::model::{FieldDefinition, FieldType};

/// 表结构定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl TableSchema {
    /// 创建表结构定义
    ///
    /// 构造时即验证：标识符合法性、字段名唯一性、主键约束
    /// （主键至多一个，且必须是名为 id 的整数字段）
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> RowBindResult<Self> {
        let name = name.into();
        validate_identifier(&name, "表名")?;

        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            validate_identifier(&field.name, "字段名")?;
            if !seen.insert(field.name.as_str()) {
                return Err(crate::quick_error!(
                    config,
                    format!("表 {} 中存在重复字段名: {}", name, field.name)
                ));
            }
        }

        let pk_fields: Vec<&FieldDefinition> = fields.iter().filter(|f| f.primary_key).collect();
        if pk_fields.len() > 1 {
            return Err(crate::quick_error!(
                config,
                format!("表 {} 声明了多个主键字段", name)
            ));
        }
        if let Some(pk) = pk_fields.first() {
            if pk.name != "id" {
                return Err(crate::quick_error!(
                    config,
                    format!("主键字段必须命名为 id，实际为: {}", pk.name)
                ));
            }
            if !matches!(pk.field_type, Some(FieldType::Integer { .. })) {
                return Err(crate::quick_error!(
                    config,
                    format!("表 {} 的主键 id 必须是整数类型", name)
                ));
            }
        }

        Ok(Self { name, fields })
    }

    /// 表名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按声明顺序返回所有字段
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// 字段成员测试，访问路径在触库前都要先过这一层
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// 按名称查找字段定义
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 按声明顺序返回所有字段名
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// 主键字段定义
    pub fn primary_key(&self) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.primary_key)
    }

    /// 生成建表语句
    ///
    /// force=true 时省略 IF NOT EXISTS 保护（调用方要的是全新表，
    /// 与既有同名表冲突属于数据库层错误，这里不处理）
    pub fn create_table_sql(&self, force: bool) -> String {
        let mut sql = if force {
            format!("CREATE TABLE {} (", self.name)
        } else {
            format!("CREATE TABLE IF NOT EXISTS {} (", self.name)
        };

        let columns: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                // 列定义各部分按固定顺序拼接：
                // 名称 [类型] [NOT NULL] [DEFAULT 字面量] [PRIMARY KEY]
                let mut parts = vec![field.name.clone()];
                if let Some(storage_type) = field.storage_type() {
                    parts.push(storage_type.to_string());
                }
                if !field.nullable {
                    parts.push("NOT NULL".to_string());
                }
                if let Some(default) = &field.default {
                    parts.push(format!("DEFAULT {}", default.to_sql_literal()));
                }
                if field.primary_key {
                    parts.push("PRIMARY KEY".to_string());
                }
                parts.join(" ")
            })
            .collect();

        sql.push_str(&columns.join(", "));
        sql.push(')');
        sql
    }
}

/// 验证 SQL 标识符的安全性
///
/// 标识符会被直接拼进 SQL 语句，这里禁止一切可注入字符：
/// 仅允许字母、数字、下划线，且不能以数字开头
fn validate_identifier(identifier: &str, kind: &str) -> RowBindResult<()> {
    if identifier.is_empty() {
        return Err(crate::quick_error!(config, format!("{}不能为空", kind)));
    }
    if identifier.len() > 64 {
        return Err(crate::quick_error!(
            config,
            format!("{}长度不能超过64个字符: {}", kind, identifier)
        ));
    }
    let mut chars = identifier.chars();
    let first = chars.next().unwrap_or(' ');
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(crate::quick_error!(
            config,
            format!("{}必须以字母或下划线开头: {}", kind, identifier)
        ));
    }
    if !identifier.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(crate::quick_error!(
            config,
            format!("{}包含非法字符: {}", kind, identifier)
        ));
    }
    Ok(())
}
