// ==========================================
// 表格数据导入引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx/.xlsm/.xlsb/.xls/.ods）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 会话初始化错误 =====
    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    #[error("缺少必需列: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // ===== 行级错误 =====
    #[error("记录构造失败 (行 {row}): {message}")]
    ModelFactoryError { row: usize, message: String },

    #[error("列转换失败 (行 {row}, 列 {column}): {message}")]
    TransformError {
        row: usize,
        column: String,
        message: String,
    },

    #[error("字段赋值失败 (行 {row}, 字段 {field}): {message}")]
    FieldMappingError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("记录校验失败 (行 {row}): {}", .messages.join("; "))]
    ValidationError { row: usize, messages: Vec<String> },

    #[error("事件监听器执行失败 ({event}): {message}")]
    ListenerError { event: String, message: String },

    // ===== 持久化错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 会话状态错误 =====
    #[error("会话状态不允许导入: {0}")]
    InvalidState(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为会话初始化阶段的错误
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
                | ImportError::SheetNotFound(_)
                | ImportError::MissingColumns(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Repository(RepositoryError::from(err))
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// DefinitionError - 声明期错误
// ==========================================
// 导入器类型定义阶段（列/事件注册）即报错，不会进入导入会话
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("列标题不能为空")]
    EmptyColumnTitle,

    #[error("重复的导入列: '{0}'")]
    DuplicateColumn(String),

    #[error("列 '{0}' 声明了转换函数但未绑定字段")]
    TransformWithoutField(String),

    #[error("未知的导入事件: '{0}'")]
    UnknownEvent(String),
}
