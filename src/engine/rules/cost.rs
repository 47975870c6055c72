// ==========================================
// 装饰印花车间排产系统 - 成本优化提示 (永不阻断)
// ==========================================
// 加急附加费: 距交期 <= 加急阈值
// 小批量附加费: 数量 < 最小订单量
// 利用率提示: 当日利用率与目标偏差超过 ±5 点死区
// ==========================================

use crate::domain::advisory::{Advisory, AdvisoryKind};
use crate::engine::rules::RuleContext;

/// 利用率死区(百分点)
const UTILIZATION_DEAD_BAND_PCT: f64 = 5.0;

/// 成本优化提示集合
pub fn advise(ctx: &RuleContext<'_>) -> Vec<Advisory> {
    let Some(rules) = ctx.config.cost.as_ref() else {
        return Vec::new();
    };

    let mut advisories = Vec::new();

    // 1. 加急附加费建议
    if let (Some(threshold), Some(hours_until_due)) =
        (rules.rush_threshold_hours, ctx.hours_until_due())
    {
        if threshold > 0 && hours_until_due <= threshold as f64 {
            advisories.push(Advisory::new(
                AdvisoryKind::RushSurcharge,
                format!(
                    "距交期 {:.0} 小时, 建议收取 {:.0}% 加急附加费",
                    hours_until_due, rules.rush_surcharge_pct
                ),
            ));
        }
    }

    // 2. 小批量附加费建议
    if let Some(min_quantity) = rules.min_order_quantity {
        if min_quantity > 0 && ctx.job.quantity < min_quantity {
            advisories.push(Advisory::new(
                AdvisoryKind::SmallBatchPenalty,
                format!(
                    "数量 {} 低于最小订单量 {}, 建议收取 {:.0}% 小批量附加费",
                    ctx.job.quantity, min_quantity, rules.small_batch_penalty_pct
                ),
            ));
        }
    }

    // 3. 利用率与目标偏差提示 (±5 点死区)
    if let Some(target) = rules.target_utilization_pct {
        if target > 0.0 {
            let utilization = ctx.same_day_utilization_pct();
            let deviation = utilization - target;
            if deviation.abs() > UTILIZATION_DEAD_BAND_PCT {
                let direction = if deviation > 0.0 { "高于" } else { "低于" };
                advisories.push(Advisory::new(
                    AdvisoryKind::UtilizationHint,
                    format!(
                        "设备 {} 当日利用率 {:.0}% {}目标 {:.0}%",
                        ctx.equipment_id, utilization, direction, target
                    ),
                ));
            }
        }
    }

    advisories
}
