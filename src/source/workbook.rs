// ==========================================
// 表格数据导入引擎 - 内存工作簿
// ==========================================
// 职责: 多工作表的内存表示，实现 TabularSource
// 说明: 默认选中第一个工作表
// ==========================================

use crate::domain::{CellValue, SheetSelector};
use crate::importer::error::{ImportError, ImportResult};
use crate::source::TabularSource;

// ==========================================
// Sheet - 工作表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// 由文本行构造（空白文本 → Empty）
    pub fn from_text_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| CellValue::from(cell.as_ref())).collect())
            .collect();
        Self::new(name, rows)
    }
}

// ==========================================
// Workbook - 工作簿
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    current: usize,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets, current: 0 }
    }

    /// 单工作表
    pub fn single(sheet: Sheet) -> Self {
        Self::new(vec![sheet])
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// 当前工作表名称
    pub fn current_sheet_name(&self) -> Option<&str> {
        self.sheets.get(self.current).map(|s| s.name.as_str())
    }

    fn current_rows(&self) -> &[Vec<CellValue>] {
        self.sheets
            .get(self.current)
            .map(|s| s.rows.as_slice())
            .unwrap_or(&[])
    }
}

impl TabularSource for Workbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn select_sheet(&mut self, selector: &SheetSelector) -> ImportResult<()> {
        let position = match selector {
            SheetSelector::Index(index) => index
                .checked_sub(1)
                .filter(|i| *i < self.sheets.len()),
            SheetSelector::Name(name) => self.sheets.iter().position(|s| &s.name == name),
        };

        match position {
            Some(position) => {
                self.current = position;
                Ok(())
            }
            None => Err(ImportError::SheetNotFound(selector.to_string())),
        }
    }

    fn row(&self, index: usize) -> &[CellValue] {
        index
            .checked_sub(1)
            .and_then(|i| self.current_rows().get(i))
            .map(|r| r.as_slice())
            .unwrap_or(&[])
    }

    fn last_row(&self) -> usize {
        self.current_rows().len()
    }
}
