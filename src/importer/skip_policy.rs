// ==========================================
// 表格数据导入引擎 - 行跳过判定
// ==========================================
// 规则: 自身谓词 OR 直接父类型谓词（祖父类型及以上不参与）
// ==========================================

use crate::importer::context::ImportContext;
use crate::importer::importer_type::ImporterType;

/// 当前行是否跳过
pub fn should_skip<M>(importer: &ImporterType<M>, ctx: &ImportContext<M>) -> bool {
    let own = importer.skip_predicate().map_or(false, |p| p(ctx));
    own || importer
        .parent()
        .and_then(|parent| parent.skip_predicate())
        .map_or(false, |p| p(ctx))
}
