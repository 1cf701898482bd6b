//! 行绑定记录的端到端同步测试
//!
//! 通过第二条原生查询通道直接核对存储侧状态，
//! 验证写穿、删除置空、整行读回/刷库等语义

use rat_rowbind::{
    DataValue, DatabaseConnection, FieldType, LinkedTable, RowBindError, StoreAdapter, TableSchema,
    array_field, boolean_field, connect, id_field, integer_field, json_field, link_record,
    sqlite_config, string_field, text_field,
};
use sqlx::Row;
use tempfile::TempDir;

fn items_schema() -> TableSchema {
    TableSchema::new(
        "items",
        vec![
            id_field(),
            string_field("name", Some(100), None),
            integer_field("qty", None, None),
        ],
    )
    .unwrap()
}

async fn setup(schema: TableSchema) -> (TempDir, LinkedTable, DatabaseConnection) {
    let dir = TempDir::new().expect("创建临时目录失败");
    let path = dir.path().join("test.db");
    let config = sqlite_config(path.to_str().unwrap());
    let connection = connect(&config).await.unwrap();
    let linked = LinkedTable::bind(schema, connection.clone()).await.unwrap();
    (dir, linked, connection)
}

/// 直接查库读取 items 表某行的 name 列
async fn raw_name(connection: &DatabaseConnection, id: i64) -> Option<String> {
    let pool = connection.sqlite_pool().unwrap();
    let row = sqlx::query("SELECT name FROM items WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap();
    row.try_get("name").unwrap()
}

#[tokio::test]
async fn test_create_assigns_fresh_ids() {
    let (_dir, linked, _connection) = setup(items_schema()).await;

    let first = linked.create().await.unwrap();
    let second = linked.create().await.unwrap();

    assert!(first.id() >= 1);
    assert_ne!(first.id(), second.id());
    // 新行除主键外均为数据库侧默认值
    assert_eq!(first.get("name").unwrap(), &DataValue::Null);
    assert_eq!(first.get("id").unwrap(), &DataValue::Int(first.id()));
}

#[tokio::test]
async fn test_set_writes_through_to_store() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "widget").await.unwrap();

    // 内存副本立即可见
    assert_eq!(
        record.get("name").unwrap(),
        &DataValue::String("widget".to_string())
    );
    // 存储侧同样可见
    assert_eq!(
        raw_name(&connection, record.id()).await,
        Some("widget".to_string())
    );

    // 另一个实例按ID打开能看到写入的值
    let reopened = linked.open(record.id()).await.unwrap();
    assert_eq!(
        reopened.get("name").unwrap(),
        &DataValue::String("widget".to_string())
    );
}

#[tokio::test]
async fn test_unknown_field_access_fails_without_store_mutation() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "widget").await.unwrap();

    assert!(matches!(
        record.get("bogus"),
        Err(RowBindError::UnknownField { .. })
    ));
    assert!(matches!(
        record.set("bogus", 1i64).await,
        Err(RowBindError::UnknownField { .. })
    ));
    assert!(matches!(
        record.delete("bogus").await,
        Err(RowBindError::UnknownField { .. })
    ));

    // 失败的访问不产生任何存储侧变化
    assert_eq!(
        raw_name(&connection, record.id()).await,
        Some("widget".to_string())
    );
}

#[tokio::test]
async fn test_delete_removes_key_and_nulls_column() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "widget").await.unwrap();
    record.delete("name").await.unwrap();

    // 内存中键被移除，后续 get 统一按未知字段失败
    assert!(matches!(
        record.get("name"),
        Err(RowBindError::UnknownField { .. })
    ));
    // 存储侧列被置空
    assert_eq!(raw_name(&connection, record.id()).await, None);

    // 重复删除是幂等的
    record.delete("name").await.unwrap();

    // 显式整行读回后键重新出现，值为空
    record.read_sync().await.unwrap();
    assert_eq!(record.get("name").unwrap(), &DataValue::Null);
}

#[tokio::test]
async fn test_failed_delete_leaves_memory_unchanged() {
    let schema = TableSchema::new(
        "guarded",
        vec![
            id_field(),
            text_field("title").not_null().default_value("untitled"),
        ],
    )
    .unwrap();
    let (_dir, linked, _connection) = setup(schema).await;

    let mut record = linked.create().await.unwrap();
    record.set("title", "keep me").await.unwrap();

    // NOT NULL 列上的置空更新会被存储层拒绝
    let result = record.delete("title").await;
    assert!(matches!(result, Err(RowBindError::QueryError { .. })));

    // 存储操作失败时内存映射必须保持原状
    assert_eq!(
        record.get("title").unwrap(),
        &DataValue::String("keep me".to_string())
    );
}

#[tokio::test]
async fn test_failed_set_leaves_state_unchanged() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "widget").await.unwrap();

    // 超长字符串未通过验证，既不落库也不改内存
    let oversized = "x".repeat(200);
    let result = record.set("name", oversized).await;
    assert!(matches!(result, Err(RowBindError::ValidationError { .. })));

    assert_eq!(
        record.get("name").unwrap(),
        &DataValue::String("widget".to_string())
    );
    assert_eq!(
        raw_name(&connection, record.id()).await,
        Some("widget".to_string())
    );
}

#[tokio::test]
async fn test_open_missing_row_fails() {
    let (_dir, linked, _connection) = setup(items_schema()).await;

    let result = linked.open(9999).await;
    assert!(matches!(
        result,
        Err(RowBindError::RecordNotFound { id: 9999, .. })
    ));
}

#[tokio::test]
async fn test_read_sync_on_vanished_row_keeps_stale_state() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "widget").await.unwrap();

    // 从存储侧直接删掉这一行，记录变成幽灵
    let pool = connection.sqlite_pool().unwrap();
    sqlx::query("DELETE FROM items WHERE id = ?")
        .bind(record.id())
        .execute(pool)
        .await
        .unwrap();

    // read_sync 静默返回，本地状态保持不变
    record.read_sync().await.unwrap();
    assert_eq!(
        record.get("name").unwrap(),
        &DataValue::String("widget".to_string())
    );
}

#[tokio::test]
async fn test_write_sync_flushes_drifted_state() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set_local("name", "drifted").unwrap();
    record.set_local("qty", 7i64).unwrap();

    // 刷库前存储侧还是旧状态
    assert_eq!(raw_name(&connection, record.id()).await, None);

    let affected = record.write_sync().await.unwrap();
    assert_eq!(affected, 1);
    assert_eq!(
        raw_name(&connection, record.id()).await,
        Some("drifted".to_string())
    );

    let reopened = linked.open(record.id()).await.unwrap();
    assert_eq!(reopened.get("qty").unwrap(), &DataValue::Int(7));
}

#[tokio::test]
async fn test_write_sync_read_sync_roundtrip() {
    let (_dir, linked, _connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "widget").await.unwrap();
    record.set("qty", 42i64).await.unwrap();

    let before = record.values().clone();
    record.write_sync().await.unwrap();
    record.read_sync().await.unwrap();
    assert_eq!(record.values(), &before);
}

#[tokio::test]
async fn test_write_sync_flushes_deleted_fields_as_null() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "widget").await.unwrap();
    record.delete("name").await.unwrap();

    record.write_sync().await.unwrap();
    assert_eq!(raw_name(&connection, record.id()).await, None);
}

#[tokio::test]
async fn test_logical_type_roundtrip_through_store() {
    let schema = TableSchema::new(
        "typed",
        vec![
            id_field(),
            boolean_field("active"),
            json_field("payload"),
            array_field(
                "tags",
                FieldType::String {
                    max_length: None,
                    min_length: None,
                    regex: None,
                },
            ),
        ],
    )
    .unwrap();
    let (_dir, linked, connection) = setup(schema).await;

    let mut record = linked.create().await.unwrap();
    record.set("active", true).await.unwrap();
    record
        .set("payload", serde_json::json!({"level": 3}))
        .await
        .unwrap();
    record
        .set(
            "tags",
            DataValue::Array(vec![
                DataValue::String("vip".to_string()),
                DataValue::String("beta".to_string()),
            ]),
        )
        .await
        .unwrap();

    // 存储侧：布尔按 0/1 整数、数组按 JSON 文本落库
    let pool = connection.sqlite_pool().unwrap();
    let row = sqlx::query("SELECT active, tags FROM typed WHERE id = ?")
        .bind(record.id())
        .fetch_one(pool)
        .await
        .unwrap();
    let active: i64 = row.try_get("active").unwrap();
    let tags: String = row.try_get("tags").unwrap();
    assert_eq!(active, 1);
    assert_eq!(tags, r#"["vip","beta"]"#);

    // 重新打开后还原为逻辑类型
    let reopened = linked.open(record.id()).await.unwrap();
    assert_eq!(reopened.get("active").unwrap(), &DataValue::Bool(true));
    assert_eq!(
        reopened.get("payload").unwrap(),
        &DataValue::Json(serde_json::json!({"level": 3}))
    );
    assert_eq!(
        reopened.get("tags").unwrap(),
        &DataValue::Array(vec![
            DataValue::String("vip".to_string()),
            DataValue::String("beta".to_string()),
        ])
    );
}

#[tokio::test]
async fn test_bind_requires_primary_key() {
    let schema = TableSchema::new("nopk", vec![text_field("name")]).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let connection = connect(&sqlite_config(path.to_str().unwrap()))
        .await
        .unwrap();

    let result = LinkedTable::bind(schema, connection).await;
    assert!(matches!(result, Err(RowBindError::ConfigError { .. })));
}

#[tokio::test]
async fn test_bind_is_idempotent() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let mut record = linked.create().await.unwrap();
    record.set("name", "survivor").await.unwrap();

    // 再次绑定同一张表不会破坏已有数据（IF NOT EXISTS 保护）
    let again = LinkedTable::bind(items_schema(), connection.clone())
        .await
        .unwrap();
    let reopened = again.open(record.id()).await.unwrap();
    assert_eq!(
        reopened.get("name").unwrap(),
        &DataValue::String("survivor".to_string())
    );
}

#[tokio::test]
async fn test_table_lifecycle_through_adapter() {
    let (_dir, linked, connection) = setup(items_schema()).await;

    let adapter = rat_rowbind::create_adapter(connection.db_type()).unwrap();
    assert!(adapter.table_exists(&connection, "items").await.unwrap());

    adapter.drop_table(&connection, "items").await.unwrap();
    assert!(!adapter.table_exists(&connection, "items").await.unwrap());

    // 表没了之后按ID打开走存储错误路径
    let result = linked.open(1).await;
    assert!(result.is_err());
}

link_record! {
    /// items 表的强类型包装
    struct Item {
        name: Option<String>,
        qty: Option<i64>,
    }
}

#[tokio::test]
async fn test_linked_macro_accessors_delegate_to_keyed_path() {
    let (_dir, linked, _connection) = setup(items_schema()).await;

    let mut item = Item::from_record(linked.create().await.unwrap());
    assert_eq!(item.name().unwrap(), None);

    item.set_name(Some("widget".to_string())).await.unwrap();
    assert_eq!(item.name().unwrap(), Some("widget".to_string()));
    item.set_qty(Some(3)).await.unwrap();
    assert_eq!(item.qty().unwrap(), Some(3));

    // 宏生成的 deleter 与 Record::delete 语义一致
    item.del_name().await.unwrap();
    assert!(matches!(
        item.name(),
        Err(RowBindError::UnknownField { .. })
    ));

    // 键控路径与属性路径落在同一份映射上
    assert_eq!(item.record().get("qty").unwrap(), &DataValue::Int(3));
}
