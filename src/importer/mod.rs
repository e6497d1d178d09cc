// ==========================================
// 表格数据导入引擎 - 导入层
// ==========================================
// 职责: 导入器类型声明、表头定位、逐行导入会话与生命周期事件
// 支持: 内存工作簿, CSV, Excel
// ==========================================

// 模块声明
pub mod column;
pub mod context;
pub mod error;
pub mod events;
pub mod header_locator;
pub mod importer_type;
pub mod options;
pub mod session;
pub mod skip_policy;

// 重导出核心类型
pub use column::{ColumnDefinition, ColumnTransform, FieldBinding, FieldSetter};
pub use context::ImportContext;
pub use error::{DefinitionError, ImportError, ImportResult};
pub use events::{listener, EventListener, EventPayload, EventRegistry};
pub use header_locator::locate_header;
pub use importer_type::{ImporterType, ImporterTypeBuilder, ModelFactory, SkipPredicate};
pub use options::ImportOptions;
pub use session::ImportSession;
pub use skip_policy::should_skip;
