// ==========================================
// 表格数据导入引擎 - 导入结果
// ==========================================
// 用途: 行错误明细与会话汇总（导入接口返回值）
// ==========================================

use crate::domain::types::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RowError - 行错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row_index: usize, // 源数据行号（1 起）
    pub message: String,  // 错误信息
}

impl RowError {
    pub fn new(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_index,
            message: message.into(),
        }
    }
}

// ==========================================
// ImportSummary - 会话汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub session_id: String,              // 会话 ID (uuid v4)
    pub importer: String,                // 导入器类型名
    pub state: SessionState,             // 最终状态
    pub transactional: bool,             // 是否事务化
    pub row_count: usize,                // 表头以下的行数
    pub rows_processed: usize,           // 已访问行数（含跳过）
    pub rows_succeeded: usize,           // 已访问 - 错误
    pub row_errors: Vec<RowError>,       // 错误明细
    pub abort_message: Option<String>,   // 中止原因
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_ms: Option<i64>,
}

impl ImportSummary {
    pub fn row_error_count(&self) -> usize {
        self.row_errors.len()
    }

    pub fn is_aborted(&self) -> bool {
        self.abort_message.is_some()
    }
}
