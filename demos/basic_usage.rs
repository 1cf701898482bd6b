//! rat_rowbind 基本使用示例
//!
//! 演示声明表结构、绑定数据库、创建记录以及字段级实时同步

use rat_rowbind::{
    DataValue, LinkedTable, RowBindResult, TableSchema, connect, id_field, integer_field,
    link_record, sqlite_config, string_field, text_field,
};

link_record! {
    /// exercises 表的强类型包装
    struct Exercise {
        title: Option<String>,
        desc: Option<String>,
        lang_id: Option<i64>,
    }
}

#[tokio::main]
async fn main() -> RowBindResult<()> {
    println!("=== rat_rowbind 基本使用示例 ===");
    println!("库版本: {}", rat_rowbind::get_info());

    // 清理旧的数据库文件
    let db_path = "/tmp/rowbind_basic_usage.db";
    if std::path::Path::new(db_path).exists() {
        let _ = std::fs::remove_file(db_path);
    }

    // 1. 声明表结构
    let schema = TableSchema::new(
        "exercises",
        vec![
            id_field(),
            integer_field("lang_id", None, None),
            string_field("title", Some(200), None),
            text_field("desc"),
            text_field("solution"),
            integer_field("user_id", None, None),
        ],
    )?;
    println!("\n1. 表结构声明完成，建表语句:");
    println!("   {}", schema.create_table_sql(false));

    // 2. 连接数据库并绑定表（绑定时自动建表）
    let connection = connect(&sqlite_config(db_path)).await?;
    let exercises = LinkedTable::bind(schema, connection).await?;
    println!("\n2. 表绑定完成");

    // 3. 创建新记录，数据库分配主键
    let mut record = exercises.create().await?;
    println!("\n3. 新建记录, id = {}", record.id());

    // 4. 键控访问：每次 set 都立即写穿到数据库
    record.set("title", "两数之和").await?;
    record.set("desc", "给定一个整数数组，求和为目标值的两个下标").await?;
    record.set("lang_id", 1i64).await?;
    println!("\n4. 字段写入完成:");
    println!("   title = {:?}", record.get("title")?);
    println!("   desc  = {:?}", record.get("desc")?);

    // 5. 另开一个实例，按ID加载同一行
    let reopened = exercises.open(record.id()).await?;
    assert_eq!(
        reopened.get("title")?,
        &DataValue::String("两数之和".to_string())
    );
    println!("\n5. 按ID重新打开, title = {:?}", reopened.get("title")?);

    // 6. 属性风格访问：宏生成的访问器委托给键控路径
    let mut exercise = Exercise::from_record(exercises.create().await?);
    exercise.set_title(Some("三数之和".to_string())).await?;
    exercise.set_lang_id(Some(2)).await?;
    println!("\n6. 属性风格访问, id = {}, title = {:?}", exercise.id(), exercise.title()?);

    // 7. 删除字段：库中列置空，内存键移除
    exercise.del_title().await?;
    match exercise.title() {
        Err(e) => println!("\n7. 删除后读取 title 报错（预期行为）: {}", e),
        Ok(v) => println!("\n7. 意外读到值: {:?}", v),
    }

    // 8. 整行同步：先在内存中累积修改，再一次性刷库
    let mut batch = exercises.open(record.id()).await?;
    batch.set_local("solution", "use std::collections::HashMap;")?;
    batch.set_local("user_id", 42i64)?;
    batch.write_sync().await?;
    batch.read_sync().await?;
    println!("\n8. 整行刷库后 user_id = {:?}", batch.get("user_id")?);

    println!("\n=== 示例执行完成 ===");
    Ok(())
}
