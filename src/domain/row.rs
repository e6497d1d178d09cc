// ==========================================
// 表格数据导入引擎 - 行投影
// ==========================================
// 职责: 表头投影（列号 → 标题）与当前行（标题 → 单元格值）
// ==========================================

use crate::domain::cell::CellValue;
use std::collections::HashMap;

// ==========================================
// HeaderProjection - 表头投影
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderProjection {
    /// 表头所在行号（1 起）
    pub index: usize,
    /// (列号 0 起, 去空白后的标题)，空标题列不投影
    pub columns: Vec<(usize, String)>,
}

impl HeaderProjection {
    /// 由表头行单元格构建投影
    pub fn from_cells(index: usize, cells: &[CellValue]) -> Self {
        let columns = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| (col, cell.header_title()))
            .filter(|(_, title)| !title.is_empty())
            .collect();
        Self { index, columns }
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, title)| title.as_str())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles().any(|t| t == title)
    }
}

// ==========================================
// Row - 当前行
// ==========================================
// 仅在单次迭代内有效，下一行会整体覆盖
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, CellValue>,
}

impl Row {
    /// 按表头投影当前行；短行缺失的单元格补 Empty，同名标题后者覆盖前者
    pub fn project(header: &HeaderProjection, cells: &[CellValue]) -> Self {
        let mut values = HashMap::with_capacity(header.columns.len());
        for (col, title) in &header.columns {
            let value = cells.get(*col).cloned().unwrap_or_default();
            values.insert(title.clone(), value);
        }
        Self { values }
    }

    pub fn get(&self, title: &str) -> Option<&CellValue> {
        self.values.get(title)
    }

    /// 文本单元格快捷访问
    pub fn text(&self, title: &str) -> Option<&str> {
        self.get(title).and_then(CellValue::as_str)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.values.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
