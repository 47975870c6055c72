// ==========================================
// 装饰印花车间排产系统 - 物料规则
// ==========================================
// 阻断: 开排前物料就绪校验 (ready/in_stock/received 以外拒绝)
// 提示: 低库存提醒 (low_stock 状态或数量达到阈值)
// ==========================================

use crate::domain::advisory::{Advisory, AdvisoryKind};
use crate::domain::types::MaterialStatus;
use crate::engine::rules::{RuleContext, RuleViolation};

/// 物料就绪校验 (阻断)
pub fn check(ctx: &RuleContext<'_>) -> Result<(), RuleViolation> {
    let Some(rules) = ctx.config.materials.as_ref() else {
        return Ok(());
    };
    if !rules.check_stock_before_scheduling {
        return Ok(());
    }

    if !ctx.job.material_status.is_ready() {
        return Err(RuleViolation::new(
            "MATERIAL_NOT_READY",
            format!(
                "任务 {} 物料状态为 {}, 未达到开排条件",
                ctx.job.job_id, ctx.job.material_status
            ),
        ));
    }

    Ok(())
}

/// 低库存提醒 (非阻断)
pub fn advise(ctx: &RuleContext<'_>) -> Vec<Advisory> {
    let Some(rules) = ctx.config.materials.as_ref() else {
        return Vec::new();
    };
    if !rules.reorder_point_warnings {
        return Vec::new();
    }

    let low_by_status = ctx.job.material_status == MaterialStatus::LowStock;
    let low_by_quantity =
        rules.low_stock_threshold > 0 && ctx.job.quantity >= rules.low_stock_threshold;

    if low_by_status || low_by_quantity {
        vec![Advisory::new(
            AdvisoryKind::LowStock,
            format!(
                "任务 {} 物料库存偏低 (状态 {}, 数量 {}), 建议补货",
                ctx.job.job_id, ctx.job.material_status, ctx.job.quantity
            ),
        )]
    } else {
        Vec::new()
    }
}
