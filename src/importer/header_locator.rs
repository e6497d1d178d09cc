// ==========================================
// 表格数据导入引擎 - 表头定位
// ==========================================
// 职责: 自上而下扫描，找到第一行包含全部必需列标题的行
// 说明: 单元格去空白后比较；额外的列不影响匹配
// ==========================================

use crate::domain::HeaderProjection;
use crate::importer::error::{ImportError, ImportResult};
use crate::source::TabularSource;
use std::collections::HashSet;
use tracing::debug;

/// 定位表头行
///
/// # 参数
/// - source: 已选好工作表的数据源
/// - required: 必需列标题（已去空白）
/// - scan_limit: 最多扫描的行数（None 表示扫描到最后一行）
///
/// # 返回
/// - Ok(HeaderProjection): 最小的满足条件的行号及其列投影
/// - Err(ImportError::MissingColumns): 没有任何行满足条件，列出最接近的候选行缺少的标题
pub fn locate_header(
    source: &dyn TabularSource,
    required: &[&str],
    scan_limit: Option<usize>,
) -> ImportResult<HeaderProjection> {
    let last_row = source.last_row();
    let limit = scan_limit.map_or(last_row, |n| n.min(last_row));

    if required.is_empty() {
        return Ok(HeaderProjection::from_cells(1, source.row(1)));
    }

    // (行号, 命中数)
    let mut best: Option<(usize, usize)> = None;

    for index in 1..=limit {
        let cells = source.row(index);
        let titles: HashSet<String> = cells.iter().map(|c| c.header_title()).collect();
        let hits = required.iter().filter(|t| titles.contains(**t)).count();

        if hits == required.len() {
            debug!(header_index = index, "表头定位完成");
            return Ok(HeaderProjection::from_cells(index, cells));
        }
        if hits > 0 && best.map_or(true, |(_, h)| hits > h) {
            best = Some((index, hits));
        }
    }

    let missing: Vec<String> = match best {
        Some((index, _)) => {
            let titles: HashSet<String> =
                source.row(index).iter().map(|c| c.header_title()).collect();
            required
                .iter()
                .filter(|t| !titles.contains(**t))
                .map(|t| t.to_string())
                .collect()
        }
        None => required.iter().map(|t| t.to_string()).collect(),
    };

    debug!(scanned = limit, missing = ?missing, "未找到表头行");
    Err(ImportError::MissingColumns(missing))
}
