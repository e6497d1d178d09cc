// ==========================================
// 表格数据导入引擎 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入会话所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::import_settings::ImportSettings;
use crate::importer::error::ImportResult;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入会话所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait ImportConfigReader {
    /// 获取表头最多扫描的行数
    ///
    /// # 默认值
    /// - None（扫描全部行）
    fn get_header_scan_limit(&self) -> ImportResult<Option<usize>>;

    /// 获取 CSV 分隔符
    ///
    /// # 默认值
    /// - ','
    fn get_csv_delimiter(&self) -> ImportResult<u8>;

    /// 汇总为 ImportSettings
    fn load_settings(&self) -> ImportResult<ImportSettings> {
        Ok(ImportSettings {
            header_scan_limit: self.get_header_scan_limit()?,
            csv_delimiter: self.get_csv_delimiter()?,
        })
    }
}
