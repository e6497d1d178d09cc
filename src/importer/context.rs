// ==========================================
// 表格数据导入引擎 - 行处理上下文
// ==========================================
// 职责: 转换函数 / 跳过谓词 / 事件监听器可见的会话状态
// 说明: 单槽位，当前行与当前记录每次迭代整体覆盖
// ==========================================

use crate::domain::{Row, RowError};
use serde_json::Value;

/// 导入上下文
///
/// 以显式参数传给用户闭包：读取 `row` / `params` / 计数器，修改当前记录，
/// 以及调用 [`ImportContext::abort`] 协作式中止。
#[derive(Debug)]
pub struct ImportContext<M> {
    pub(crate) importer: String,
    pub(crate) params: Option<Value>,
    pub(crate) transactional: bool,
    pub(crate) header_index: usize,
    pub(crate) row_index: usize,
    pub(crate) row_count: usize,
    pub(crate) row: Row,
    pub(crate) model: Option<M>,
    pub(crate) row_errors: Vec<RowError>,
    pub(crate) abort_message: Option<String>,
}

impl<M> ImportContext<M> {
    pub(crate) fn new(importer: &str, params: Option<Value>, transactional: bool) -> Self {
        Self {
            importer: importer.to_string(),
            params,
            transactional,
            header_index: 0,
            row_index: 0,
            row_count: 0,
            row: Row::default(),
            model: None,
            row_errors: Vec::new(),
            abort_message: None,
        }
    }

    /// 导入器类型名
    pub fn importer(&self) -> &str {
        &self.importer
    }

    /// 调用方透传参数
    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    pub fn is_transactional(&self) -> bool {
        self.transactional
    }

    /// 当前行
    pub fn row(&self) -> &Row {
        &self.row
    }

    /// 当前行号（1 起；未开始迭代时等于表头行号）
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// 表头所在行号
    pub fn header_index(&self) -> usize {
        self.header_index
    }

    /// 表头以下的行数（不受跳过影响）
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// 当前记录（仅在行处理期间存在）
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.model.as_mut()
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    /// 已访问行数（含跳过的行）
    pub fn rows_processed_count(&self) -> usize {
        self.row_index.saturating_sub(self.header_index)
    }

    pub fn row_error_count(&self) -> usize {
        self.row_errors.len()
    }

    pub fn rows_success_count(&self) -> usize {
        self.rows_processed_count()
            .saturating_sub(self.row_error_count())
    }

    /// 请求中止导入
    ///
    /// 不会立即打断当前行；当前行处理结束后迭代停止，且该行不计为行错误。
    pub fn abort(&mut self, message: impl Into<String>) {
        self.abort_message = Some(message.into());
    }

    pub fn is_aborted(&self) -> bool {
        self.abort_message.is_some()
    }

    pub fn abort_message(&self) -> Option<&str> {
        self.abort_message.as_deref()
    }
}
