// ==========================================
// 装饰印花车间排产系统 - 外协触发规则 (阻断)
// ==========================================
// 产能触发: 当日设备利用率 >= 阈值 → 阻断并附首选供应商提示
// 交期触发: 距交期小时数 < 缓冲天数*24 → 阻断并附同样提示
// 单位约定: 设备 capacity 为分钟/天, 换算小时除以 60
// ==========================================

use crate::domain::advisory::{Advisory, AdvisoryKind};
use crate::engine::rules::{RuleContext, RuleViolation};

/// 外协产能触发校验
///
/// # 返回
/// - `Ok(())`: 未触发
/// - `Err((violation, advisory))`: 阻断, 附供应商提示供上层透传
pub fn check_capacity(
    ctx: &RuleContext<'_>,
) -> Result<(), (RuleViolation, Option<Advisory>)> {
    let Some(rules) = ctx.config.outsourcing.as_ref() else {
        return Ok(());
    };
    if !rules.auto_outsource_enabled || rules.capacity_threshold_pct <= 0.0 {
        return Ok(());
    }

    let utilization = ctx.same_day_utilization_pct();
    if utilization >= rules.capacity_threshold_pct {
        let violation = RuleViolation::new(
            "OUTSOURCE_CAPACITY_TRIGGER",
            format!(
                "设备 {} 当日利用率 {:.0}% 已达外协阈值 {:.0}%",
                ctx.equipment_id, utilization, rules.capacity_threshold_pct
            ),
        );
        return Err((violation, vendor_advisory(ctx)));
    }

    Ok(())
}

/// 外协交期触发校验
pub fn check_lead_time(
    ctx: &RuleContext<'_>,
) -> Result<(), (RuleViolation, Option<Advisory>)> {
    let Some(rules) = ctx.config.outsourcing.as_ref() else {
        return Ok(());
    };
    if rules.lead_time_buffer_days <= 0 {
        return Ok(());
    }
    let Some(hours_until_due) = ctx.hours_until_due() else {
        return Ok(());
    };

    let buffer_hours = (rules.lead_time_buffer_days * 24) as f64;
    if hours_until_due < buffer_hours {
        let violation = RuleViolation::new(
            "OUTSOURCE_LEAD_TIME_TRIGGER",
            format!(
                "距交期 {:.0} 小时, 低于外协交期缓冲 {} 天",
                hours_until_due, rules.lead_time_buffer_days
            ),
        );
        return Err((violation, vendor_advisory(ctx)));
    }

    Ok(())
}

/// 工艺首选供应商提示
fn vendor_advisory(ctx: &RuleContext<'_>) -> Option<Advisory> {
    let rules = ctx.config.outsourcing.as_ref()?;
    let vendors = rules.vendors_for(&ctx.job.method);
    if vendors.is_empty() {
        return None;
    }
    Some(Advisory::new(
        AdvisoryKind::OutsourcingSuggested,
        format!(
            "建议外协工艺 {}, 首选供应商: {}",
            ctx.job.method,
            vendors.join(", ")
        ),
    ))
}
