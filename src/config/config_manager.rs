// ==========================================
// 表格数据导入引擎 - 配置管理器
// ==========================================
// 职责: 导入配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection, table_exists};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::error::RepositoryError;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 表头扫描
    pub const HEADER_SCAN_LIMIT: &str = "import_header_scan_limit";

    // CSV
    pub const CSV_DELIMITER: &str = "import_csv_delimiter";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（必要时建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_schema()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        let manager = Self { conn };
        manager.ensure_schema()?;
        Ok(manager)
    }

    fn lock(&self) -> ImportResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()).into())
    }

    /// 创建 config_kv 表（幂等）
    fn ensure_schema(&self) -> ImportResult<()> {
        let conn = self.lock()?;
        if table_exists(&conn, "config_kv")? {
            return Ok(());
        }
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            )
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 写入配置值（scope_id='global'，已存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::debug!(config_key = key, value = value, "配置已更新");
        Ok(())
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
impl ImportConfigReader for ConfigManager {
    fn get_header_scan_limit(&self) -> ImportResult<Option<usize>> {
        let key = config_keys::HEADER_SCAN_LIMIT;
        match self.get_config_value(key)? {
            None => Ok(None),
            Some(raw) => {
                let value = raw.trim();
                if value.is_empty() {
                    return Ok(None);
                }
                let limit = value.parse::<usize>().map_err(|e| ImportError::ConfigValueError {
                    key: key.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                })?;
                // 0 表示不限制
                Ok(if limit == 0 { None } else { Some(limit) })
            }
        }
    }

    fn get_csv_delimiter(&self) -> ImportResult<u8> {
        let key = config_keys::CSV_DELIMITER;
        let raw = match self.get_config_value(key)? {
            None => return Ok(crate::config::DEFAULT_CSV_DELIMITER),
            Some(raw) => raw,
        };

        match raw.as_str() {
            "\\t" | "tab" | "\t" => Ok(b'\t'),
            s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
            _ => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message: "分隔符必须是单个 ASCII 字符".to_string(),
            }),
        }
    }
}
