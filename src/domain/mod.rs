// ==========================================
// 表格数据导入引擎 - 领域层
// ==========================================
// 职责: 单元格、行投影、会话状态与事件等纯数据类型
// ==========================================

pub mod cell;
pub mod import_summary;
pub mod row;
pub mod types;

// 重导出核心类型
pub use cell::CellValue;
pub use import_summary::{ImportSummary, RowError};
pub use row::{HeaderProjection, Row};
pub use types::{ImportEvent, SessionState, SheetSelector, TransactionalOverride};
