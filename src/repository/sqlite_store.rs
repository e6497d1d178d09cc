// ==========================================
// 表格数据导入引擎 - SQLite 记录仓储实现
// ==========================================
// 职责: 通过 rusqlite 保存记录，BEGIN/COMMIT/ROLLBACK 包裹环境事务
// 红线: Repository 不含业务规则，只做数据写入
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::{Record, RecordStore};
use rusqlite::Connection;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// SqlRecord Trait
// ==========================================
// 用途: 可写入 SQLite 的目标记录
pub trait SqlRecord: Record {
    /// 插入单条记录
    ///
    /// # 返回
    /// - Ok(usize): 影响行数
    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize>;
}

// ==========================================
// SqliteRecordStore
// ==========================================
pub struct SqliteRecordStore<M> {
    conn: Arc<Mutex<Connection>>,
    in_transaction: bool,
    _record: PhantomData<fn(&M)>,
}

impl<M> SqliteRecordStore<M> {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::with_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建仓储
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self::with_connection(conn))
    }

    fn with_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            in_transaction: false,
            _record: PhantomData,
        }
    }

    /// 共享连接（便于调用方查询已导入数据）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn execute_control(&self, sql: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))
    }
}

impl<M: SqlRecord> RecordStore<M> for SqliteRecordStore<M> {
    fn save(&mut self, record: &M) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let affected = record.insert(&conn)?;
        debug!(affected = affected, in_transaction = self.in_transaction, "记录写入完成");
        Ok(())
    }

    fn begin_transaction(&mut self) -> RepositoryResult<()> {
        if self.in_transaction {
            return Err(RepositoryError::TransactionAlreadyActive);
        }
        self.execute_control("BEGIN IMMEDIATE")?;
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> RepositoryResult<()> {
        if !self.in_transaction {
            return Err(RepositoryError::NoActiveTransaction);
        }
        self.execute_control("COMMIT")?;
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> RepositoryResult<()> {
        if !self.in_transaction {
            return Err(RepositoryError::NoActiveTransaction);
        }
        // 无论 ROLLBACK 是否成功，事务标记都不再有效
        self.in_transaction = false;
        self.execute_control("ROLLBACK")
    }
}
