// ==========================================
// 表格数据导入引擎 - 内存记录仓储
// ==========================================
// 用途: 不依赖数据库的导入场景与单元测试
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;

/// 内存记录仓储
///
/// 事务以"开启时的记录数"为回滚点，回滚即截断
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore<M> {
    records: Vec<M>,
    transaction_mark: Option<usize>,
}

impl<M> InMemoryRecordStore<M> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            transaction_mark: None,
        }
    }

    /// 已保存的记录（含未提交事务中的记录）
    pub fn records(&self) -> &[M] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction_mark.is_some()
    }

    pub fn into_records(self) -> Vec<M> {
        self.records
    }
}

impl<M> Default for InMemoryRecordStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone> RecordStore<M> for InMemoryRecordStore<M> {
    fn save(&mut self, record: &M) -> RepositoryResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn begin_transaction(&mut self) -> RepositoryResult<()> {
        if self.transaction_mark.is_some() {
            return Err(RepositoryError::TransactionAlreadyActive);
        }
        self.transaction_mark = Some(self.records.len());
        Ok(())
    }

    fn commit(&mut self) -> RepositoryResult<()> {
        self.transaction_mark
            .take()
            .map(|_| ())
            .ok_or(RepositoryError::NoActiveTransaction)
    }

    fn rollback(&mut self) -> RepositoryResult<()> {
        let mark = self
            .transaction_mark
            .take()
            .ok_or(RepositoryError::NoActiveTransaction)?;
        self.records.truncate(mark);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_discards_records_saved_in_transaction() {
        let mut store = InMemoryRecordStore::new();
        store.save(&"before".to_string()).unwrap();

        store.begin_transaction().unwrap();
        store.save(&"inside-1".to_string()).unwrap();
        store.save(&"inside-2".to_string()).unwrap();
        store.rollback().unwrap();

        assert_eq!(store.records(), &["before".to_string()]);
        assert!(!store.in_transaction());
    }

    #[test]
    fn test_commit_keeps_records() {
        let mut store = InMemoryRecordStore::new();
        store.begin_transaction().unwrap();
        store.save(&1).unwrap();
        store.commit().unwrap();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_nested_transaction_rejected() {
        let mut store: InMemoryRecordStore<i32> = InMemoryRecordStore::new();
        store.begin_transaction().unwrap();
        assert!(matches!(
            store.begin_transaction(),
            Err(RepositoryError::TransactionAlreadyActive)
        ));
    }

    #[test]
    fn test_commit_without_transaction_fails() {
        let mut store: InMemoryRecordStore<i32> = InMemoryRecordStore::new();
        assert!(matches!(
            store.commit(),
            Err(RepositoryError::NoActiveTransaction)
        ));
    }
}
