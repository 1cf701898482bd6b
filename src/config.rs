//! 数据库连接配置模块
//!
//! 配置采用构建器模式。连接句柄以显式注入的方式交给绑定层，
//! 不使用全局捕获

use serde::{Deserialize, Serialize};

use crate::error::RowBindResult;

/// 支持的数据库类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseType {
    SQLite,
}

impl std::str::FromStr for DatabaseType {
    type Err = crate::error::RowBindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::SQLite),
            other => Err(crate::quick_error!(
                config,
                format!("不支持的数据库类型: {}", other)
            )),
        }
    }
}

/// 连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConnectionConfig {
    SQLite {
        path: String,
        create_if_missing: bool,
    },
}

impl ConnectionConfig {
    /// 连接配置对应的数据库类型
    pub fn db_type(&self) -> DatabaseType {
        match self {
            ConnectionConfig::SQLite { .. } => DatabaseType::SQLite,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 连接配置
    pub connection: ConnectionConfig,
    /// 连接池最大连接数
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// 创建配置构建器
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::default()
    }

    /// 数据库类型
    pub fn db_type(&self) -> DatabaseType {
        self.connection.db_type()
    }
}

/// 数据库配置构建器
#[derive(Debug, Default)]
pub struct DatabaseConfigBuilder {
    connection: Option<ConnectionConfig>,
    max_connections: Option<u32>,
}

impl DatabaseConfigBuilder {
    /// 设置连接配置
    pub fn connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = Some(connection);
        self
    }

    /// 设置连接池最大连接数
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = Some(max_connections);
        self
    }

    /// 构建配置
    pub fn build(self) -> RowBindResult<DatabaseConfig> {
        let connection = self
            .connection
            .ok_or_else(|| crate::quick_error!(config, "缺少连接配置"))?;
        let max_connections = self.max_connections.unwrap_or(5);
        if max_connections == 0 {
            return Err(crate::quick_error!(config, "最大连接数必须大于0"));
        }
        Ok(DatabaseConfig {
            connection,
            max_connections,
        })
    }
}

/// 便捷函数：创建SQLite数据库配置
pub fn sqlite_config(path: impl Into<String>) -> DatabaseConfig {
    DatabaseConfig {
        connection: ConnectionConfig::SQLite {
            path: path.into(),
            create_if_missing: true,
        },
        max_connections: 5,
    }
}

/// 原生数据库连接枚举 - 直接持有数据库连接句柄
///
/// 句柄在同一进程内的所有 Record 实例间共享。本库不提供跨实例的
/// 锁或事务隔离，同一行同时只应有一个写入者
#[derive(Debug, Clone)]
pub enum DatabaseConnection {
    #[cfg(feature = "sqlite-support")]
    SQLite(sqlx::SqlitePool),
}

impl DatabaseConnection {
    /// 连接对应的数据库类型
    pub fn db_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite-support")]
            DatabaseConnection::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// 取出SQLite连接池，连接类型不匹配时返回错误
    #[cfg(feature = "sqlite-support")]
    pub fn sqlite_pool(&self) -> RowBindResult<&sqlx::SqlitePool> {
        match self {
            DatabaseConnection::SQLite(pool) => Ok(pool),
            #[allow(unreachable_patterns)]
            _ => Err(crate::quick_error!(
                connection,
                "Invalid connection type for SQLite"
            )),
        }
    }
}

/// 建立数据库连接
pub async fn connect(config: &DatabaseConfig) -> RowBindResult<DatabaseConnection> {
    match &config.connection {
        ConnectionConfig::SQLite {
            path,
            create_if_missing,
        } => {
            #[cfg(feature = "sqlite-support")]
            {
                use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(*create_if_missing);

                // 内存库只允许单连接，多个连接会各自拿到独立的数据库
                let max_connections = if path == ":memory:" {
                    1
                } else {
                    config.max_connections
                };

                let pool = SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        crate::quick_error!(connection, format!("SQLite连接失败: {}", e))
                    })?;

                rat_logger::debug!("SQLite连接建立成功: {}", path);
                Ok(DatabaseConnection::SQLite(pool))
            }
            #[cfg(not(feature = "sqlite-support"))]
            {
                let _ = (path, create_if_missing);
                Err(crate::quick_error!(
                    config,
                    "sqlite-support 特性未启用，无法建立SQLite连接"
                ))
            }
        }
    }
}
