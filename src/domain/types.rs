// ==========================================
// 表格数据导入引擎 - 领域类型定义
// ==========================================
// 职责: 工作表选择、事务化覆写、会话状态、生命周期事件
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 工作表选择 (Sheet Selector)
// ==========================================
// 索引从 1 开始
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{}", i),
            SheetSelector::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<usize> for SheetSelector {
    fn from(value: usize) -> Self {
        SheetSelector::Index(value)
    }
}

impl From<&str> for SheetSelector {
    fn from(value: &str) -> Self {
        SheetSelector::Name(value.to_string())
    }
}

impl From<String> for SheetSelector {
    fn from(value: String) -> Self {
        SheetSelector::Name(value)
    }
}

// ==========================================
// 事务化覆写 (Transactional Override)
// ==========================================
// 实例级覆写只能升级（开启），不能把类型默认的事务化降级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionalOverride {
    #[default]
    Unspecified,
    ForceOn,
}

impl TransactionalOverride {
    /// 与类型默认值合并
    pub fn resolve(self, type_default: bool) -> bool {
        match self {
            TransactionalOverride::ForceOn => true,
            TransactionalOverride::Unspecified => type_default,
        }
    }
}

impl From<bool> for TransactionalOverride {
    fn from(value: bool) -> Self {
        if value {
            TransactionalOverride::ForceOn
        } else {
            TransactionalOverride::Unspecified
        }
    }
}

impl From<Option<bool>> for TransactionalOverride {
    fn from(value: Option<bool>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

// ==========================================
// 会话状态 (Session State)
// ==========================================
// Uninitialized → (SetupFailed | Ready) → Running → (Finished | Aborted | TransactionFailed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Uninitialized,
    SetupFailed,
    Ready,
    Running,
    Finished,
    Aborted,
    TransactionFailed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "UNINITIALIZED",
            SessionState::SetupFailed => "SETUP_FAILED",
            SessionState::Ready => "READY",
            SessionState::Running => "RUNNING",
            SessionState::Finished => "FINISHED",
            SessionState::Aborted => "ABORTED",
            SessionState::TransactionFailed => "TRANSACTION_FAILED",
        }
    }

    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::SetupFailed
                | SessionState::Finished
                | SessionState::Aborted
                | SessionState::TransactionFailed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 生命周期事件 (Import Event)
// ==========================================
// 固定 9 种，注册未知事件名在声明期报错
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportEvent {
    RowSuccess,
    RowError,
    RowProcessing,
    RowSkipped,
    RowProcessed,
    ImportStarted,
    ImportFinished,
    ImportFailed,
    ImportAborted,
}

impl ImportEvent {
    pub const ALL: [ImportEvent; 9] = [
        ImportEvent::RowSuccess,
        ImportEvent::RowError,
        ImportEvent::RowProcessing,
        ImportEvent::RowSkipped,
        ImportEvent::RowProcessed,
        ImportEvent::ImportStarted,
        ImportEvent::ImportFinished,
        ImportEvent::ImportFailed,
        ImportEvent::ImportAborted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportEvent::RowSuccess => "row_success",
            ImportEvent::RowError => "row_error",
            ImportEvent::RowProcessing => "row_processing",
            ImportEvent::RowSkipped => "row_skipped",
            ImportEvent::RowProcessed => "row_processed",
            ImportEvent::ImportStarted => "import_started",
            ImportEvent::ImportFinished => "import_finished",
            ImportEvent::ImportFailed => "import_failed",
            ImportEvent::ImportAborted => "import_aborted",
        }
    }
}

impl fmt::Display for ImportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportEvent {
    type Err = String;

    /// 同时接受 snake_case（row_success）与 camelCase（rowSuccess）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        ImportEvent::ALL
            .iter()
            .copied()
            .find(|event| event.as_str().replace('_', "") == normalized)
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transactional_override_is_upgrade_only() {
        assert!(TransactionalOverride::from(true).resolve(false));
        assert!(TransactionalOverride::from(false).resolve(true));
        assert!(!TransactionalOverride::from(false).resolve(false));
        assert!(!TransactionalOverride::from(None).resolve(false));
    }

    #[test]
    fn test_event_names_parse_in_both_spellings() {
        assert_eq!("row_success".parse::<ImportEvent>(), Ok(ImportEvent::RowSuccess));
        assert_eq!("importAborted".parse::<ImportEvent>(), Ok(ImportEvent::ImportAborted));
        assert_eq!("rowProcessed".parse::<ImportEvent>(), Ok(ImportEvent::RowProcessed));
        assert!("row_deleted".parse::<ImportEvent>().is_err());
    }

    #[test]
    fn test_sheet_selector_conversions() {
        assert_eq!(SheetSelector::from(2), SheetSelector::Index(2));
        assert_eq!(
            SheetSelector::from("Outstanding employees"),
            SheetSelector::Name("Outstanding employees".to_string())
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::SetupFailed.is_terminal());
        assert!(SessionState::TransactionFailed.is_terminal());
        assert!(!SessionState::Ready.is_terminal());
    }
}
