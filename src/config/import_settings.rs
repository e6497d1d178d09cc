// ==========================================
// 表格数据导入引擎 - 导入运行参数
// ==========================================
// 职责: 会话级运行参数（表头扫描范围、CSV 分隔符）
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认 CSV 分隔符
pub const DEFAULT_CSV_DELIMITER: u8 = b',';

/// 导入运行参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// 表头最多扫描的行数（None = 扫描全部行）
    #[serde(default)]
    pub header_scan_limit: Option<usize>,

    /// CSV 分隔符
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: u8,
}

fn default_csv_delimiter() -> u8 {
    DEFAULT_CSV_DELIMITER
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            header_scan_limit: None,
            csv_delimiter: DEFAULT_CSV_DELIMITER,
        }
    }
}

impl ImportSettings {
    pub fn with_header_scan_limit(mut self, limit: usize) -> Self {
        self.header_scan_limit = Some(limit);
        self
    }

    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }
}
