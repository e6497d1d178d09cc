// ==========================================
// 表格数据导入引擎 - 记录持久化 Trait
// ==========================================
// 职责: 定义目标记录的校验与持久化接口（不包含实现）
// 红线: Repository 不含业务规则，只做保存与事务边界
// ==========================================

use crate::repository::error::RepositoryResult;

// ==========================================
// Record Trait
// ==========================================
// 用途: 每行构造出的目标记录
pub trait Record {
    /// 校验记录
    ///
    /// # 返回
    /// - 空列表: 校验通过
    /// - 非空: 校验失败信息（该行记为行错误，不会保存）
    fn validate(&self) -> Vec<String> {
        Vec::new()
    }
}

// ==========================================
// RecordStore Trait
// ==========================================
// 用途: 记录保存 + 环境事务（整个 import 期间至多一个事务）
// 实现者: InMemoryRecordStore, SqliteRecordStore
pub trait RecordStore<M> {
    /// 保存单条记录（已通过校验）
    fn save(&mut self, record: &M) -> RepositoryResult<()>;

    /// 开启事务（不支持嵌套）
    fn begin_transaction(&mut self) -> RepositoryResult<()>;

    /// 提交事务
    fn commit(&mut self) -> RepositoryResult<()>;

    /// 回滚事务，撤销事务内所有 save
    fn rollback(&mut self) -> RepositoryResult<()>;
}
