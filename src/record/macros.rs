//! 记录相关的宏定义
//!
//! 为编译期已知的表结构生成属性风格的强类型访问器

/// 便捷宏：为一张表生成强类型记录包装
///
/// 包装持有一个 Record，按字段生成 getter / setter / deleter
/// 三件套（`title()` / `set_title()` / `del_title()`），全部委托给
/// Record 的键控访问路径，语义与 get / set / delete 完全一致。
///
/// # 示例
///
/// ```ignore
/// link_record! {
///     struct Exercise {
///         title: String,
///         lang_id: Option<i64>,
///     }
/// }
///
/// let exercise = Exercise::from_record(linked.create().await?);
/// ```
#[macro_export]
macro_rules! link_record {
    (
        $(#[$meta:meta])*
        struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            record: $crate::record::Record,
        }

        impl $name {
            /// 从已绑定的记录构造包装
            pub fn from_record(record: $crate::record::Record) -> Self {
                Self { record }
            }

            /// 拆出底层记录
            pub fn into_record(self) -> $crate::record::Record {
                self.record
            }

            /// 底层记录的只读引用
            pub fn record(&self) -> &$crate::record::Record {
                &self.record
            }

            /// 底层记录的可变引用
            pub fn record_mut(&mut self) -> &mut $crate::record::Record {
                &mut self.record
            }

            /// 记录的主键ID
            pub fn id(&self) -> i64 {
                self.record.id()
            }

            $crate::paste::paste! {
                $(
                    $(#[$field_meta])*
                    pub fn $field(&self) -> $crate::error::RowBindResult<$field_ty> {
                        let value = self.record.get(stringify!($field))?;
                        <$field_ty as $crate::types::FromDataValue>::from_data_value(value)
                    }

                    /// 写穿设置字段值，语义同 Record::set
                    pub async fn [<set_ $field>](
                        &mut self,
                        value: $field_ty,
                    ) -> $crate::error::RowBindResult<()> {
                        self.record.set(stringify!($field), value).await
                    }

                    /// 删除字段值，语义同 Record::delete
                    pub async fn [<del_ $field>](&mut self) -> $crate::error::RowBindResult<()> {
                        self.record.delete(stringify!($field)).await
                    }
                )*
            }
        }
    };
}
