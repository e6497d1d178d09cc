// ==========================================
// 表格数据导入引擎 - 列定义
// ==========================================
// 职责: 列标题 → 字段 setter + 可选转换函数 + 可选列标记
// 说明: 字段赋值通过声明期注册的 setter 完成，不做按名称的动态赋值
// ==========================================

use crate::domain::CellValue;
use crate::importer::context::ImportContext;
use std::fmt;
use std::sync::Arc;

/// 字段 setter：把（转换后的）单元格值写入记录
pub type FieldSetter<M> = Arc<dyn Fn(&mut M, CellValue) -> anyhow::Result<()> + Send + Sync>;

/// 列转换函数：原始单元格值 → 赋给字段的值
pub type ColumnTransform<M> =
    Arc<dyn Fn(CellValue, &mut ImportContext<M>) -> anyhow::Result<CellValue> + Send + Sync>;

/// 字段绑定
pub struct FieldBinding<M> {
    pub name: String,
    pub setter: FieldSetter<M>,
}

impl<M> Clone for FieldBinding<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            setter: Arc::clone(&self.setter),
        }
    }
}

// ==========================================
// ColumnDefinition - 列定义
// ==========================================
pub struct ColumnDefinition<M> {
    title: String,
    field: Option<FieldBinding<M>>,
    transform: Option<ColumnTransform<M>>,
    optional: bool,
}

impl<M> ColumnDefinition<M> {
    /// 新建列（标题在注册时去空白）
    ///
    /// 未绑定字段的列只参与表头匹配
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            field: None,
            transform: None,
            optional: false,
        }
    }

    /// 绑定字段
    pub fn field<F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        F: Fn(&mut M, CellValue) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.field = Some(FieldBinding {
            name: name.into(),
            setter: Arc::new(setter),
        });
        self
    }

    /// 设置转换函数（必须同时绑定字段）
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(CellValue, &mut ImportContext<M>) -> anyhow::Result<CellValue> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// 标记为可选列（表头中缺失不视为初始化失败）
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_ref().map(|f| f.name.as_str())
    }

    pub fn binding(&self) -> Option<&FieldBinding<M>> {
        self.field.as_ref()
    }

    pub fn transform_fn(&self) -> Option<&ColumnTransform<M>> {
        self.transform.as_ref()
    }

    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_required(&self) -> bool {
        !self.optional
    }

    pub(crate) fn trim_title(&mut self) {
        let trimmed = self.title.trim();
        if trimmed.len() != self.title.len() {
            self.title = trimmed.to_string();
        }
    }
}

impl<M> Clone for ColumnDefinition<M> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            field: self.field.clone(),
            transform: self.transform.clone(),
            optional: self.optional,
        }
    }
}

impl<M> fmt::Debug for ColumnDefinition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("title", &self.title)
            .field("field_name", &self.field_name())
            .field("has_transform", &self.has_transform())
            .field("optional", &self.optional)
            .finish()
    }
}
