// ==========================================
// 表格数据导入引擎 - 记录存储层
// ==========================================
// 职责: 记录持久化抽象（保存 + 事务边界），屏蔽存储细节
// 实现: 内存存储（测试/预览）, SQLite 存储
// ==========================================

pub mod error;
pub mod memory_store;
pub mod record_store;
pub mod sqlite_store;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use memory_store::InMemoryRecordStore;
pub use record_store::{Record, RecordStore};
pub use sqlite_store::{SqlRecord, SqliteRecordStore};
