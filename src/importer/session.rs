// ==========================================
// 表格数据导入引擎 - 导入会话
// ==========================================
// 流程: 初始化(选表 → 定位表头) → import_started → 逐行处理 → import_finished
// 事务: 事务化会话首个行错误即回滚并终止；中止(abort)正常提交
// 约束: 每个会话只能执行一次 import
// ==========================================

use crate::domain::{
    HeaderProjection, ImportEvent, ImportSummary, Row, RowError, SessionState,
};
use crate::importer::context::ImportContext;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::events::EventPayload;
use crate::importer::header_locator::locate_header;
use crate::importer::importer_type::ImporterType;
use crate::importer::options::ImportOptions;
use crate::importer::skip_policy::should_skip;
use crate::repository::{Record, RecordStore};
use crate::source::{open_source, TabularSource};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportSession - 导入会话
// ==========================================
pub struct ImportSession<'a, M> {
    importer: &'a ImporterType<M>,
    source: Option<Box<dyn TabularSource + 'a>>,
    store: &'a mut dyn RecordStore<M>,
    header: Option<HeaderProjection>,
    ctx: ImportContext<M>,
    state: SessionState,
    setup_error: Option<ImportError>,
    session_id: Uuid,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl<'a, M: Record> ImportSession<'a, M> {
    /// 基于已打开的数据源创建会话
    ///
    /// 初始化失败不会返回错误：触发 import_failed，会话进入 SetupFailed，
    /// 之后 import() 为空操作。错误可通过 setup_error() 读取。
    pub fn new(
        importer: &'a ImporterType<M>,
        source: Box<dyn TabularSource + 'a>,
        store: &'a mut dyn RecordStore<M>,
        options: ImportOptions,
    ) -> Self {
        Self::initialize(importer, Ok(source), store, options)
    }

    /// 按路径打开文件并创建会话（扩展名可由 options.extension 覆写）
    pub fn open(
        importer: &'a ImporterType<M>,
        path: impl AsRef<Path>,
        store: &'a mut dyn RecordStore<M>,
        options: ImportOptions,
    ) -> Self {
        let path = path.as_ref();
        let source = open_source(path, options.extension.as_deref(), &options.settings)
            .map(|workbook| Box::new(workbook) as Box<dyn TabularSource + 'a>);

        if let Err(err) = &source {
            warn!(file = %path.display(), error = %err, "打开数据文件失败");
        }
        Self::initialize(importer, source, store, options)
    }

    fn initialize(
        importer: &'a ImporterType<M>,
        source: ImportResult<Box<dyn TabularSource + 'a>>,
        store: &'a mut dyn RecordStore<M>,
        options: ImportOptions,
    ) -> Self {
        let ImportOptions {
            params,
            transactional,
            settings,
            ..
        } = options;
        let transactional = transactional.resolve(importer.transactional_default());

        let mut session = Self {
            importer,
            source: None,
            store,
            header: None,
            ctx: ImportContext::new(importer.name(), params, transactional),
            state: SessionState::Uninitialized,
            setup_error: None,
            session_id: Uuid::new_v4(),
            started_at: None,
            finished_at: None,
        };

        match Self::prepare(importer, source, settings.header_scan_limit) {
            Ok((source, header)) => {
                let row_count = source.last_row().saturating_sub(header.index);
                session.ctx.header_index = header.index;
                session.ctx.row_index = header.index;
                session.ctx.row_count = row_count;
                session.source = Some(source);
                session.header = Some(header);
                session.state = SessionState::Ready;

                info!(
                    session_id = %session.session_id,
                    importer = importer.name(),
                    header_index = session.ctx.header_index,
                    row_count,
                    transactional,
                    "导入会话初始化完成"
                );
            }
            Err(err) => {
                error!(
                    session_id = %session.session_id,
                    importer = importer.name(),
                    error = %err,
                    "导入会话初始化失败"
                );
                session.ctx.row_count = 0;
                session.state = SessionState::SetupFailed;
                session.fire_logged(ImportEvent::ImportFailed, &EventPayload::Error(&err));
                session.setup_error = Some(err);
            }
        }

        session
    }

    /// 选择工作表并定位表头
    fn prepare(
        importer: &ImporterType<M>,
        source: ImportResult<Box<dyn TabularSource + 'a>>,
        scan_limit: Option<usize>,
    ) -> ImportResult<(Box<dyn TabularSource + 'a>, HeaderProjection)> {
        let mut source = source?;
        if let Some(selector) = importer.sheet() {
            if let Err(err) = source.select_sheet(selector) {
                warn!(sheet = %selector, available = ?source.sheet_names(), "工作表不存在");
                return Err(err);
            }
            debug!(sheet = %selector, "已选择工作表");
        }

        let required = importer.required_titles();
        let header = locate_header(&*source, &required, scan_limit)?;
        Ok((source, header))
    }

    // ==========================================
    // 导入主流程
    // ==========================================

    /// 执行导入
    ///
    /// # 返回
    /// - Ok(ImportSummary): 正常结束 / 中止 / 初始化失败（空操作）
    /// - Err(ImportError): 事务化导入中的首个行错误（已回滚）
    /// - Err(ImportError::InvalidState): 会话已执行过
    #[instrument(skip(self), fields(session_id = %self.session_id, importer = %self.importer.name()))]
    pub fn import(&mut self) -> ImportResult<ImportSummary> {
        match self.state {
            SessionState::Ready => {}
            SessionState::SetupFailed => {
                debug!("会话初始化失败，跳过导入");
                return Ok(self.summary());
            }
            state => return Err(ImportError::InvalidState(state.to_string())),
        }

        self.state = SessionState::Running;
        self.started_at = Some(Utc::now());
        info!(
            row_count = self.ctx.row_count,
            transactional = self.ctx.transactional,
            "开始导入"
        );
        self.fire_logged(ImportEvent::ImportStarted, &EventPayload::None);

        let outcome = self.run_batch();

        if let Err(err) = &outcome {
            self.state = SessionState::TransactionFailed;
            let message = err.to_string();
            warn!(error = %message, "事务化导入失败，已回滚");
            self.fire_logged(ImportEvent::ImportAborted, &EventPayload::Message(&message));
        } else if self.ctx.is_aborted() {
            self.state = SessionState::Aborted;
        } else {
            self.state = SessionState::Finished;
        }

        self.finished_at = Some(Utc::now());
        self.fire_logged(ImportEvent::ImportFinished, &EventPayload::None);

        info!(
            processed = self.ctx.rows_processed_count(),
            succeeded = self.ctx.rows_success_count(),
            errors = self.ctx.row_error_count(),
            state = %self.state,
            "导入结束"
        );

        outcome.map(|()| self.summary())
    }

    /// 非事务化直接逐行导入；事务化包裹在单个事务中
    fn run_batch(&mut self) -> ImportResult<()> {
        if !self.ctx.transactional {
            return self.import_rows();
        }

        self.store.begin_transaction()?;
        debug!("事务已开启");

        let result = self
            .import_rows()
            .and_then(|()| self.store.commit().map_err(ImportError::from));

        match &result {
            Ok(()) => debug!("事务已提交"),
            Err(_) => {
                if let Err(rollback_err) = self.store.rollback() {
                    error!(error = %rollback_err, "事务回滚失败");
                } else {
                    debug!("事务已回滚");
                }
            }
        }
        result
    }

    fn import_rows(&mut self) -> ImportResult<()> {
        let first = self.ctx.header_index + 1;
        let last = self.ctx.header_index + self.ctx.row_count;

        for index in first..=last {
            self.ctx.row_index = index;
            self.ctx.row = self.project_row(index);
            self.ctx.model = None;

            if should_skip(self.importer, &self.ctx) {
                debug!(row_index = index, "跳过行");
                self.fire_logged(ImportEvent::RowSkipped, &EventPayload::None);
                continue;
            }

            self.process_row()?;

            if let Some(message) = self.ctx.abort_message().map(str::to_string) {
                warn!(row_index = index, reason = %message, "导入已中止");
                self.fire_logged(ImportEvent::ImportAborted, &EventPayload::Message(&message));
                break;
            }
        }
        Ok(())
    }

    fn project_row(&self, index: usize) -> Row {
        match (&self.source, &self.header) {
            (Some(source), Some(header)) => Row::project(header, source.row(index)),
            _ => Row::default(),
        }
    }

    /// 单行处理：构建/保存 → row_success 或 row_error → row_processed
    ///
    /// 事务化时行错误向上返回，终止整批导入
    fn process_row(&mut self) -> ImportResult<()> {
        let row_index = self.ctx.row_index;

        let escalated = match self.build_and_save() {
            Ok(true) => {
                debug!(row_index, "行导入成功");
                self.fire_logged(ImportEvent::RowSuccess, &EventPayload::None);
                None
            }
            Ok(false) => None,
            Err(err) => {
                warn!(row_index, error = %err, "行导入失败");
                self.ctx.row_errors.push(RowError::new(row_index, err.to_string()));
                self.fire_logged(ImportEvent::RowError, &EventPayload::Error(&err));
                if self.ctx.transactional {
                    Some(err)
                } else {
                    None
                }
            }
        };

        self.fire_logged(ImportEvent::RowProcessed, &EventPayload::None);

        match escalated {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// 构造记录 → 列转换/赋值 → row_processing → 校验 → 保存
    ///
    /// 返回 Ok(false) 表示 row_processing 期间请求了中止，记录未保存
    fn build_and_save(&mut self) -> ImportResult<bool> {
        let importer = self.importer;
        let row_index = self.ctx.row_index;

        let model = importer.new_model(&self.ctx)?;
        self.ctx.model = Some(model);

        for column in importer.columns() {
            let Some(binding) = column.binding() else {
                continue;
            };
            let Some(cell) = self.ctx.row.get(column.title()).cloned() else {
                continue;
            };

            let value = match column.transform_fn() {
                Some(transform) => {
                    transform(cell, &mut self.ctx).map_err(|e| ImportError::TransformError {
                        row: row_index,
                        column: column.title().to_string(),
                        message: e.to_string(),
                    })?
                }
                None => cell,
            };

            if let Some(model) = self.ctx.model.as_mut() {
                (binding.setter)(model, value).map_err(|e| ImportError::FieldMappingError {
                    row: row_index,
                    field: binding.name.clone(),
                    message: e.to_string(),
                })?;
            }
        }

        importer.fire(ImportEvent::RowProcessing, &mut self.ctx, &EventPayload::None)?;

        if self.ctx.is_aborted() {
            debug!(row_index, "行处理期间请求中止，跳过保存");
            return Ok(false);
        }

        let Some(model) = self.ctx.model.as_ref() else {
            return Err(ImportError::InternalError(format!(
                "行 {} 的记录在保存前丢失",
                row_index
            )));
        };

        let problems = model.validate();
        if !problems.is_empty() {
            return Err(ImportError::ValidationError {
                row: row_index,
                messages: problems,
            });
        }

        self.store.save(model)?;
        Ok(true)
    }

    /// 触发非致命事件：两级监听器全部执行，失败逐条记录日志
    ///
    /// row_success / row_processed 监听器失败同样只记录日志，不会让 import 返回错误。
    fn fire_logged(&mut self, event: ImportEvent, payload: &EventPayload<'_>) {
        for err in self.importer.fire_all(event, &mut self.ctx, payload) {
            warn!(event = event.as_str(), error = %err, "事件监听器执行失败，已忽略");
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn importer(&self) -> &ImporterType<M> {
        self.importer
    }

    /// 初始化错误（仅 SetupFailed 时存在）
    pub fn setup_error(&self) -> Option<&ImportError> {
        self.setup_error.as_ref()
    }

    pub fn take_setup_error(&mut self) -> Option<ImportError> {
        self.setup_error.take()
    }

    pub fn context(&self) -> &ImportContext<M> {
        &self.ctx
    }

    pub fn header(&self) -> Option<&HeaderProjection> {
        self.header.as_ref()
    }

    pub fn params(&self) -> Option<&Value> {
        self.ctx.params()
    }

    pub fn is_transactional(&self) -> bool {
        self.ctx.transactional
    }

    pub fn header_index(&self) -> usize {
        self.ctx.header_index
    }

    pub fn row_index(&self) -> usize {
        self.ctx.row_index
    }

    pub fn row_count(&self) -> usize {
        self.ctx.row_count
    }

    /// 最近一次迭代的行（导入前为空）
    pub fn row(&self) -> &Row {
        &self.ctx.row
    }

    /// 最近一次构造的记录
    pub fn model(&self) -> Option<&M> {
        self.ctx.model.as_ref()
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.ctx.row_errors
    }

    pub fn rows_processed_count(&self) -> usize {
        self.ctx.rows_processed_count()
    }

    pub fn row_error_count(&self) -> usize {
        self.ctx.row_error_count()
    }

    pub fn rows_success_count(&self) -> usize {
        self.ctx.rows_success_count()
    }

    pub fn abort_message(&self) -> Option<&str> {
        self.ctx.abort_message()
    }

    pub fn summary(&self) -> ImportSummary {
        let elapsed_ms = match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        };

        ImportSummary {
            session_id: self.session_id.to_string(),
            importer: self.importer.name().to_string(),
            state: self.state,
            transactional: self.ctx.transactional,
            row_count: self.ctx.row_count,
            rows_processed: self.ctx.rows_processed_count(),
            rows_succeeded: self.ctx.rows_success_count(),
            row_errors: self.ctx.row_errors.clone(),
            abort_message: self.ctx.abort_message.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            elapsed_ms,
        }
    }
}
