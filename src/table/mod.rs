//! 表结构模块
//!
//! 有序字段集合与 DDL 生成

pub mod schema;

pub use schema::TableSchema;
