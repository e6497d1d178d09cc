// ==========================================
// 表格数据导入引擎 - 导入器类型（声明式配置）
// ==========================================
// 职责: 绑定记录类型、声明列/工作表/跳过规则/构造方式/事务默认值/事件监听
// 约束: 通过 ImporterTypeBuilder 一次性构建，之后只读
// ==========================================

use crate::domain::{ImportEvent, ImportSummary, SheetSelector};
use crate::importer::column::ColumnDefinition;
use crate::importer::context::ImportContext;
use crate::importer::error::{DefinitionError, ImportError, ImportResult};
use crate::importer::events::{listener, EventPayload, EventRegistry};
use crate::importer::options::ImportOptions;
use crate::importer::session::ImportSession;
use crate::repository::{Record, RecordStore};
use crate::source::TabularSource;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// 记录构造函数（可读取当前行，用于按行查找已有记录等场景）
pub type ModelFactory<M> = Arc<dyn Fn(&ImportContext<M>) -> anyhow::Result<M> + Send + Sync>;

/// 行跳过谓词
pub type SkipPredicate<M> = Arc<dyn Fn(&ImportContext<M>) -> bool + Send + Sync>;

// ==========================================
// ImporterType - 导入器类型
// ==========================================
pub struct ImporterType<M> {
    name: String,
    parent: Option<Arc<ImporterType<M>>>,
    factory: Option<ModelFactory<M>>,
    columns: Vec<ColumnDefinition<M>>,
    sheet: Option<SheetSelector>,
    skip_predicate: Option<SkipPredicate<M>>,
    events: EventRegistry<M>,
    transactional_default: bool,
}

impl<M: Default + 'static> ImporterType<M> {
    /// 绑定记录类型，使用 `M::default()` 构造每行记录
    pub fn builder(name: impl Into<String>) -> ImporterTypeBuilder<M> {
        let mut builder = ImporterTypeBuilder::new(name.into());
        builder.model_factory(|_ctx| Ok(M::default()));
        builder
    }
}

impl<M: 'static> ImporterType<M> {
    /// 绑定记录类型，使用自定义构造函数
    pub fn builder_with_factory<F>(name: impl Into<String>, factory: F) -> ImporterTypeBuilder<M>
    where
        F: Fn(&ImportContext<M>) -> anyhow::Result<M> + Send + Sync + 'static,
    {
        let mut builder = ImporterTypeBuilder::new(name.into());
        builder.model_factory(factory);
        builder
    }

    /// 不绑定记录构造方式的共享基类型（只声明事件与跳过规则，供具体导入器继承）
    pub fn base_builder(name: impl Into<String>) -> ImporterTypeBuilder<M> {
        ImporterTypeBuilder::new(name.into())
    }
}

impl<M> ImporterType<M> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 直接父类型（None 表示直接继承自引擎根类型）
    pub fn parent(&self) -> Option<&ImporterType<M>> {
        self.parent.as_deref()
    }

    /// 已声明的列（声明顺序）
    pub fn columns(&self) -> &[ColumnDefinition<M>] {
        &self.columns
    }

    /// 按标题查找列（标题去空白后比较）
    pub fn column(&self, title: &str) -> Option<&ColumnDefinition<M>> {
        let title = title.trim();
        self.columns.iter().find(|c| c.title() == title)
    }

    /// 必需列标题（未标记 optional 的列）
    pub fn required_titles(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_required())
            .map(|c| c.title())
            .collect()
    }

    pub fn sheet(&self) -> Option<&SheetSelector> {
        self.sheet.as_ref()
    }

    pub fn skip_predicate(&self) -> Option<&SkipPredicate<M>> {
        self.skip_predicate.as_ref()
    }

    pub fn transactional_default(&self) -> bool {
        self.transactional_default
    }

    pub fn has_model_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// 自身注册的监听器（不含父类型）
    pub fn events(&self) -> &EventRegistry<M> {
        &self.events
    }

    /// 触发事件：先自身监听器，再直接父类型的监听器（祖父类型及以上不触发）
    pub(crate) fn fire(
        &self,
        event: ImportEvent,
        ctx: &mut ImportContext<M>,
        payload: &EventPayload<'_>,
    ) -> Result<(), ImportError> {
        self.events.dispatch(event, ctx, payload)?;
        if let Some(parent) = self.parent() {
            parent.events.dispatch(event, ctx, payload)?;
        }
        Ok(())
    }

    /// 触发事件且不中断：两级监听器全部执行，返回各监听器的失败
    pub(crate) fn fire_all(
        &self,
        event: ImportEvent,
        ctx: &mut ImportContext<M>,
        payload: &EventPayload<'_>,
    ) -> Vec<ImportError> {
        let mut failures = self.events.dispatch_all(event, ctx, payload);
        if let Some(parent) = self.parent() {
            failures.extend(parent.events.dispatch_all(event, ctx, payload));
        }
        failures
    }

    /// 构造当前行的记录
    pub(crate) fn new_model(&self, ctx: &ImportContext<M>) -> ImportResult<M> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| ImportError::ModelFactoryError {
                row: ctx.row_index(),
                message: format!("导入器 {} 未绑定记录构造方式", self.name),
            })?;

        factory(ctx).map_err(|e| ImportError::ModelFactoryError {
            row: ctx.row_index(),
            message: e.to_string(),
        })
    }
}

impl<M: Record> ImporterType<M> {
    /// 一次性导入：初始化失败时返回该错误（import_failed 已触发）
    pub fn import<'a>(
        &'a self,
        source: Box<dyn TabularSource + 'a>,
        store: &'a mut dyn RecordStore<M>,
        options: ImportOptions,
    ) -> ImportResult<ImportSummary> {
        let mut session = ImportSession::new(self, source, store, options);
        if let Some(err) = session.take_setup_error() {
            return Err(err);
        }
        session.import()
    }

    /// 一次性导入文件
    pub fn import_file<'a>(
        &'a self,
        path: impl AsRef<Path>,
        store: &'a mut dyn RecordStore<M>,
        options: ImportOptions,
    ) -> ImportResult<ImportSummary> {
        let mut session = ImportSession::open(self, path, store, options);
        if let Some(err) = session.take_setup_error() {
            return Err(err);
        }
        session.import()
    }
}

impl<M> fmt::Debug for ImporterType<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImporterType")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field("columns", &self.columns)
            .field("sheet", &self.sheet)
            .field("has_skip_predicate", &self.skip_predicate.is_some())
            .field("events", &self.events)
            .field("transactional_default", &self.transactional_default)
            .finish()
    }
}

// ==========================================
// ImporterTypeBuilder - 声明式构建器
// ==========================================
pub struct ImporterTypeBuilder<M> {
    inner: ImporterType<M>,
}

impl<M> fmt::Debug for ImporterTypeBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<M: 'static> ImporterTypeBuilder<M> {
    fn new(name: String) -> Self {
        Self {
            inner: ImporterType {
                name,
                parent: None,
                factory: None,
                columns: Vec::new(),
                sheet: None,
                skip_predicate: None,
                events: EventRegistry::new(),
                transactional_default: false,
            },
        }
    }

    /// 声明直接父类型
    pub fn inherits(&mut self, parent: Arc<ImporterType<M>>) -> &mut Self {
        self.inner.parent = Some(parent);
        self
    }

    /// 声明列
    ///
    /// # 错误
    /// - EmptyColumnTitle: 标题去空白后为空
    /// - DuplicateColumn: 去空白后的标题已存在
    /// - TransformWithoutField: 有转换函数但未绑定字段
    pub fn column(&mut self, mut definition: ColumnDefinition<M>) -> Result<&mut Self, DefinitionError> {
        definition.trim_title();
        let title = definition.title();

        if title.is_empty() {
            return Err(DefinitionError::EmptyColumnTitle);
        }
        if self.inner.columns.iter().any(|c| c.title() == title) {
            return Err(DefinitionError::DuplicateColumn(title.to_string()));
        }
        if definition.has_transform() && definition.field_name().is_none() {
            return Err(DefinitionError::TransformWithoutField(title.to_string()));
        }

        self.inner.columns.push(definition);
        Ok(self)
    }

    /// 声明工作表（1 起索引或名称）
    pub fn sheet(&mut self, selector: impl Into<SheetSelector>) -> &mut Self {
        self.inner.sheet = Some(selector.into());
        self
    }

    /// 声明行跳过谓词（再次声明覆盖前者）
    pub fn skip_rows_if<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&ImportContext<M>) -> bool + Send + Sync + 'static,
    {
        self.inner.skip_predicate = Some(Arc::new(predicate));
        self
    }

    /// 声明记录构造函数
    pub fn model_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(&ImportContext<M>) -> anyhow::Result<M> + Send + Sync + 'static,
    {
        self.inner.factory = Some(Arc::new(factory));
        self
    }

    /// 声明类型级事务化默认值
    pub fn transactional(&mut self, enabled: bool) -> &mut Self {
        self.inner.transactional_default = enabled;
        self
    }

    /// 注册事件监听器
    pub fn on<F>(&mut self, event: ImportEvent, f: F) -> &mut Self
    where
        F: Fn(&mut ImportContext<M>, &EventPayload<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.inner.events.register(event, listener(f));
        self
    }

    /// 按事件名注册监听器（snake_case / camelCase 均可）
    pub fn on_named<F>(&mut self, event_name: &str, f: F) -> Result<&mut Self, DefinitionError>
    where
        F: Fn(&mut ImportContext<M>, &EventPayload<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.inner.events.register_named(event_name, listener(f))?;
        Ok(self)
    }

    /// 当前已声明的列
    pub fn columns(&self) -> &[ColumnDefinition<M>] {
        &self.inner.columns
    }

    pub fn build(self) -> ImporterType<M> {
        self.inner
    }

    pub fn build_shared(self) -> Arc<ImporterType<M>> {
        Arc::new(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;

    #[derive(Debug, Default)]
    struct Contact {
        name: Option<String>,
        age: Option<i64>,
    }

    fn set_name(c: &mut Contact, v: CellValue) -> anyhow::Result<()> {
        c.name = v.into_text();
        Ok(())
    }

    #[test]
    fn test_duplicate_trimmed_title_rejected() {
        let mut builder = ImporterType::<Contact>::builder("ContactImporter");
        builder
            .column(ColumnDefinition::new("Name").field("name", set_name))
            .unwrap();

        let err = builder
            .column(ColumnDefinition::new("  Name ").field("name", set_name))
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateColumn("Name".to_string()));
        assert_eq!(builder.columns().len(), 1);
    }

    #[test]
    fn test_transform_without_field_rejected() {
        let mut builder = ImporterType::<Contact>::builder("ContactImporter");
        let err = builder
            .column(ColumnDefinition::new("Dummy").transform(|v, _ctx| Ok(v)))
            .unwrap_err();
        assert_eq!(err, DefinitionError::TransformWithoutField("Dummy".to_string()));
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut builder = ImporterType::<Contact>::builder("ContactImporter");
        let err = builder.column(ColumnDefinition::new("   ")).unwrap_err();
        assert_eq!(err, DefinitionError::EmptyColumnTitle);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let mut builder = ImporterType::<Contact>::builder("ContactImporter");
        assert!(builder.on_named("rowSuccess", |_ctx, _p| Ok(())).is_ok());
        let err = builder.on_named("row_updated", |_ctx, _p| Ok(())).unwrap_err();
        assert_eq!(err, DefinitionError::UnknownEvent("row_updated".to_string()));
    }

    #[test]
    fn test_required_titles_exclude_optional_columns() {
        let mut builder = ImporterType::<Contact>::builder("ContactImporter");
        builder
            .column(ColumnDefinition::new("Name").field("name", set_name))
            .unwrap()
            .column(ColumnDefinition::new("Manager"))
            .unwrap()
            .column(
                ColumnDefinition::new("Age")
                    .field("age", |c: &mut Contact, v| {
                        c.age = v.as_i64();
                        Ok(())
                    })
                    .optional(),
            )
            .unwrap();
        let importer = builder.build();

        assert_eq!(importer.required_titles(), vec!["Name", "Manager"]);
        assert_eq!(importer.column(" Age ").and_then(|c| c.field_name()), Some("age"));
    }

    #[test]
    fn test_declaration_reads_are_idempotent() {
        let mut builder = ImporterType::<Contact>::builder("ContactImporter");
        builder
            .column(ColumnDefinition::new("Name").field("name", set_name))
            .unwrap();
        builder.on(ImportEvent::RowSuccess, |_ctx, _p| Ok(()));
        let importer = builder.build();

        assert_eq!(importer.columns().len(), 1);
        assert_eq!(importer.columns().len(), 1);
        assert_eq!(importer.events().listeners(ImportEvent::RowSuccess).len(), 1);
        assert_eq!(importer.events().listeners(ImportEvent::RowSuccess).len(), 1);
    }

    #[test]
    fn test_base_builder_has_no_factory() {
        let base = ImporterType::<Contact>::base_builder("ContactBase").build();
        assert!(!base.has_model_factory());

        let ctx = ImportContext::new("ContactBase", None, false);
        assert!(matches!(
            base.new_model(&ctx),
            Err(ImportError::ModelFactoryError { .. })
        ));
    }

    #[test]
    fn test_parent_is_exposed() {
        let base = ImporterType::<Contact>::base_builder("ContactBase").build_shared();
        let mut builder = ImporterType::<Contact>::builder("ContactImporter");
        builder.inherits(Arc::clone(&base)).transactional(true);
        let importer = builder.build();

        assert_eq!(importer.parent().map(|p| p.name()), Some("ContactBase"));
        assert!(importer.transactional_default());
    }
}
