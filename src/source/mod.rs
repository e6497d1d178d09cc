// ==========================================
// 表格数据导入引擎 - 数据源层
// ==========================================
// 职责: 表格数据源抽象（按行号取行、选表、行数）
// 支持: 内存表, CSV, Excel (.xlsx/.xlsm/.xlsb/.xls/.ods)
// ==========================================

pub mod file_source;
pub mod workbook;

use crate::domain::{CellValue, SheetSelector};
use crate::importer::error::ImportResult;

// 重导出
pub use file_source::{open_source, CsvSource, ExcelSource};
pub use workbook::{Sheet, Workbook};

// ==========================================
// TabularSource Trait
// ==========================================
// 用途: 导入会话读取源数据的唯一接口
// 实现者: Workbook（CSV / Excel 打开后均装载为 Workbook）
pub trait TabularSource {
    /// 全部工作表名称（按顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 切换当前工作表
    ///
    /// # 返回
    /// - Err(ImportError::SheetNotFound): 索引越界或名称不存在
    fn select_sheet(&mut self, selector: &SheetSelector) -> ImportResult<()>;

    /// 读取当前工作表第 index 行（1 起）；越界返回空切片
    fn row(&self, index: usize) -> &[CellValue];

    /// 当前工作表最后一行的行号（空表为 0）
    fn last_row(&self) -> usize;
}
