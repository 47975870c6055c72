// ==========================================
// 装饰印花车间排产系统 - 质检清单提示 (永不阻断)
// ==========================================
// 键解析: "{method}.{stage}" → camelCase 工艺别名 → 裸工序(遗留)
// 展示: 最多 3 项 + 溢出计数
// ==========================================

use crate::domain::advisory::{Advisory, AdvisoryKind};
use crate::engine::rules::RuleContext;

/// 单条提示中最多展示的检查项数
const MAX_ITEMS_SHOWN: usize = 3;

/// 质检清单提示
pub fn advise(ctx: &RuleContext<'_>) -> Vec<Advisory> {
    let Some(checklist) = ctx.config.qc_checklist_for(&ctx.job.method, ctx.stage) else {
        return Vec::new();
    };
    if !checklist.enabled || checklist.items.is_empty() {
        return Vec::new();
    }

    let shown: Vec<&str> = checklist
        .items
        .iter()
        .take(MAX_ITEMS_SHOWN)
        .map(String::as_str)
        .collect();
    let overflow = checklist.items.len().saturating_sub(MAX_ITEMS_SHOWN);

    let message = if overflow > 0 {
        format!(
            "工序 {} 质检检查点: {} (另有 {} 项)",
            ctx.stage,
            shown.join("; "),
            overflow
        )
    } else {
        format!("工序 {} 质检检查点: {}", ctx.stage, shown.join("; "))
    };

    vec![Advisory::new(AdvisoryKind::QcChecklist, message)]
}
