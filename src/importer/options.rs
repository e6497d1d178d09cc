// ==========================================
// 表格数据导入引擎 - 单次导入选项
// ==========================================

use crate::config::ImportSettings;
use crate::domain::TransactionalOverride;
use serde_json::Value;

/// 单次导入选项
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// 透传给用户闭包的参数（引擎不解释）
    pub params: Option<Value>,
    /// 事务化覆写（只能把 false 升级为 true）
    pub transactional: TransactionalOverride,
    /// 运行参数
    pub settings: ImportSettings,
    /// 扩展名覆写（仅按路径打开时使用）
    pub extension: Option<String>,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn transactional(mut self, enabled: bool) -> Self {
        self.transactional = enabled.into();
        self
    }

    pub fn with_settings(mut self, settings: ImportSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}
