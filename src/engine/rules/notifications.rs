// ==========================================
// 装饰印花车间排产系统 - 通知规则 (永不阻断)
// ==========================================
// 交期提醒: 距交期小时数落入任一配置阈值
// 负荷提醒: 与外协产能触发同一利用率口径
// 保养提醒: 设备累计排产小时逼近保养间隔 (±2 小时容差)
// ==========================================

use crate::domain::advisory::{Advisory, AdvisoryKind};
use crate::engine::rules::RuleContext;

/// 保养提醒容差(小时)
const MAINTENANCE_TOLERANCE_HOURS: f64 = 2.0;

/// 通知提示集合
pub fn advise(ctx: &RuleContext<'_>) -> Vec<Advisory> {
    let Some(rules) = ctx.config.notifications.as_ref() else {
        return Vec::new();
    };

    let mut advisories = Vec::new();

    // 1. 交期提醒: 命中最小的满足阈值
    if let Some(hours_until_due) = ctx.hours_until_due() {
        let triggered = rules
            .due_date_warning_hours
            .iter()
            .filter(|threshold| **threshold > 0 && hours_until_due <= **threshold as f64)
            .min();
        if let Some(threshold) = triggered {
            advisories.push(Advisory::new(
                AdvisoryKind::DueDateWarning,
                format!(
                    "任务 {} 距交期仅 {:.0} 小时 (提醒阈值 {} 小时)",
                    ctx.job.job_id, hours_until_due, threshold
                ),
            ));
        }
    }

    // 2. 设备日负荷提醒
    if let Some(threshold_pct) = rules.capacity_overload_threshold_pct {
        let utilization = ctx.same_day_utilization_pct();
        if threshold_pct > 0.0 && utilization >= threshold_pct {
            advisories.push(Advisory::new(
                AdvisoryKind::CapacityOverload,
                format!(
                    "设备 {} 当日利用率 {:.0}% 超过提醒阈值 {:.0}%",
                    ctx.equipment_id, utilization, threshold_pct
                ),
            ));
        }
    }

    // 3. 保养提醒: 累计排产小时到任一保养间隔倍数的距离 <= 容差
    if let Some(interval) = rules.maintenance_interval_hours {
        if interval > 0.0 {
            let cumulative = cumulative_equipment_hours(ctx);
            if near_interval_multiple(cumulative, interval) {
                advisories.push(Advisory::new(
                    AdvisoryKind::MaintenanceDue,
                    format!(
                        "设备 {} 累计排产 {:.1} 小时, 已临近 {:.0} 小时保养间隔",
                        ctx.equipment_id, cumulative, interval
                    ),
                ));
            }
        }
    }

    advisories
}

/// 设备累计排产小时 (全量既有任务 + 候选)
fn cumulative_equipment_hours(ctx: &RuleContext<'_>) -> f64 {
    let existing: f64 = ctx
        .other_jobs_on_equipment()
        .filter_map(|other| other.schedule_window())
        .map(|(start, end)| (end - start).num_seconds() as f64 / 3600.0)
        .sum();
    existing + ctx.candidate_hours()
}

/// 累计小时到最近非零保养间隔倍数的距离是否在容差内
fn near_interval_multiple(cumulative: f64, interval: f64) -> bool {
    if cumulative <= 0.0 {
        return false;
    }
    let remainder = cumulative % interval;
    let distance = remainder.min(interval - remainder);
    // 不足一个间隔时只看上方倍数, 避免开机即提醒
    if cumulative < interval {
        interval - cumulative <= MAINTENANCE_TOLERANCE_HOURS
    } else {
        distance <= MAINTENANCE_TOLERANCE_HOURS
    }
}
