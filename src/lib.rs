// ==========================================
// 表格数据导入引擎 - 核心库
// ==========================================
// 职责: 声明式表格导入（列映射 / 表头定位 / 行跳过 / 事件 / 事务化批量保存）
// 技术栈: Rust + calamine + csv + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格、行、事件、状态
pub mod domain;

// 数据源层 - 工作簿 / CSV / Excel
pub mod source;

// 记录存储层 - 保存与事务边界
pub mod repository;

// 导入层 - 导入器类型与导入会话
pub mod importer;

// 配置层 - 运行参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, HeaderProjection, ImportEvent, ImportSummary, Row, RowError, SessionState,
    SheetSelector, TransactionalOverride,
};

// 数据源
pub use source::{open_source, Sheet, TabularSource, Workbook};

// 记录存储
pub use repository::{
    InMemoryRecordStore, Record, RecordStore, RepositoryError, SqlRecord, SqliteRecordStore,
};

// 导入引擎
pub use importer::{
    ColumnDefinition, DefinitionError, EventPayload, ImportContext, ImportError, ImportOptions,
    ImportResult, ImportSession, ImporterType, ImporterTypeBuilder,
};

// 配置
pub use config::{ConfigManager, ImportConfigReader, ImportSettings};

// ==========================================
// 版本信息
// ==========================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "表格数据导入引擎";
