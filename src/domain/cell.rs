// ==========================================
// 表格数据导入引擎 - 单元格值
// ==========================================
// 职责: 统一 CSV / Excel / 内存表的单元格表示
// 说明: 空字符串与缺失单元格统一为 Empty
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单元格值
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// 由文本构造（空白文本 → Empty）
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 仅 Text 返回字符串切片
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 转为文本（Empty → None，其余按显示格式）
    pub fn into_text(self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// 转为整数
    ///
    /// Text 按去空白后解析；Float 仅在无小数部分时转换
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            CellValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            CellValue::Text(s) => s.trim().parse::<i64>().ok(),
            CellValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// 转为浮点数
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// 转为日期（支持 YYYY-MM-DD / YYYYMMDD 文本）
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::Text(s) => {
                let s = s.trim();
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
                    .ok()
            }
            _ => None,
        }
    }

    /// 作为表头标题使用时的文本（去空白）
    pub(crate) fn header_title(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_empty() {
        assert_eq!(CellValue::from("   "), CellValue::Empty);
        assert_eq!(CellValue::from(""), CellValue::Empty);
        assert_eq!(CellValue::from("IT"), CellValue::Text("IT".to_string()));
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(CellValue::Text(" 42 ".to_string()).as_i64(), Some(42));
        assert_eq!(CellValue::Float(3.0).as_i64(), Some(3));
        assert_eq!(CellValue::Float(3.5).as_i64(), None);
        assert_eq!(CellValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::Empty.as_f64(), None);
    }

    #[test]
    fn test_date_parsing() {
        let expected = NaiveDate::from_ymd_opt(2013, 10, 25).unwrap();
        assert_eq!(CellValue::from("2013-10-25").as_date(), Some(expected));
        assert_eq!(CellValue::from("20131025").as_date(), Some(expected));
        assert_eq!(CellValue::from("yesterday").as_date(), None);
    }

    #[test]
    fn test_header_title_trims() {
        assert_eq!(CellValue::from("  Department ").header_title(), "Department");
        assert_eq!(CellValue::Empty.header_title(), "");
        assert_eq!(CellValue::Int(2024).header_title(), "2024");
    }

    #[test]
    fn test_into_text() {
        assert_eq!(CellValue::Empty.into_text(), None);
        assert_eq!(CellValue::Int(5).into_text(), Some("5".to_string()));
    }
}
