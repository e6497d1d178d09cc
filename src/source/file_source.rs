// ==========================================
// 表格数据导入引擎 - 文件数据源实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls/.ods) / CSV (.csv)
// 说明: 文件一次性装载为 Workbook，行号保持源文件中的绝对位置
// ==========================================

use crate::config::ImportSettings;
use crate::domain::CellValue;
use crate::importer::error::{ImportError, ImportResult};
use crate::source::workbook::{Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ==========================================
// CSV 数据源
// ==========================================
pub struct CsvSource;

impl CsvSource {
    /// 读取 CSV 为单工作表 Workbook（工作表名取文件名主干）
    pub fn open(path: &Path, settings: &ImportSettings) -> ImportResult<Workbook> {
        ensure_exists(path)?;

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头位置由 HeaderLocator 决定
            .flexible(true) // 允许行长度不一致
            .delimiter(settings.csv_delimiter)
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::from).collect::<Vec<_>>());
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();

        debug!(file = %path.display(), rows = rows.len(), "CSV 读取完成");
        Ok(Workbook::single(Sheet::new(name, rows)))
    }
}

// ==========================================
// Excel 数据源
// ==========================================
pub struct ExcelSource;

impl ExcelSource {
    /// 读取全部工作表
    pub fn open(path: &Path) -> ImportResult<Workbook> {
        ensure_exists(path)?;

        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name)?;
            sheets.push(Sheet::new(name, range_to_rows(&range)));
        }

        debug!(file = %path.display(), sheets = sheets.len(), "Excel 读取完成");
        Ok(Workbook::new(sheets))
    }
}

/// Range 转为绝对行列（Range 起点之前补空行/空列）
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (start_row, start_col) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Vec::new(),
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(data_row.iter().map(convert_cell));
        rows.push(cells);
    }
    rows
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(e) => CellValue::text(e.to_string()),
    }
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

// ==========================================
// 通用打开入口（根据扩展名自动选择）
// ==========================================
/// 打开表格文件
///
/// # 参数
/// - path: 文件路径
/// - extension: 扩展名覆写（文件名不带扩展名时使用）
/// - settings: 运行参数（CSV 分隔符）
pub fn open_source(
    path: &Path,
    extension: Option<&str>,
    settings: &ImportSettings,
) -> ImportResult<Workbook> {
    let ext = extension
        .map(|e| e.trim_start_matches('.').to_string())
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(str::to_string)
        })
        .unwrap_or_default()
        .to_lowercase();

    match ext.as_str() {
        "csv" => CsvSource::open(path, settings),
        e if EXCEL_EXTENSIONS.contains(&e) => ExcelSource::open(path),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}
