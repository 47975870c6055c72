// ==========================================
// 装饰印花车间排产系统 - 加急冲突提示 (永不阻断)
// ==========================================
// 规则: 非加急任务落位到已有"更早交期加急任务"的设备时提示
// ==========================================

use crate::domain::advisory::{Advisory, AdvisoryKind};
use crate::domain::types::Priority;
use crate::engine::rules::RuleContext;

/// 加急冲突提示
pub fn advise(ctx: &RuleContext<'_>) -> Vec<Advisory> {
    if ctx.job.priority == Priority::High {
        return Vec::new();
    }

    let candidate_due = ctx.job.due_date;
    let conflicting = ctx.other_jobs_on_equipment().find(|other| {
        if other.priority != Priority::High {
            return false;
        }
        match (other.due_date, candidate_due) {
            // 加急任务交期早于候选交期
            (Some(high_due), Some(due)) => high_due < due,
            // 候选无交期, 视为更晚
            (Some(_), None) => true,
            (None, _) => false,
        }
    });

    match conflicting {
        Some(high_job) => vec![Advisory::new(
            AdvisoryKind::RushConflict,
            format!(
                "设备 {} 上已有交期更早的加急任务 {}, 请确认排序",
                ctx.equipment_id, high_job.job_id
            ),
        )],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::config::rules::RuleConfiguration;
    use crate::domain::advisory::AdvisoryKind;
    use crate::domain::types::Priority;
    use crate::engine::rules::rush_priority;
    use crate::engine::test_support::{context, scheduled_test_job, test_job};

    fn due(hours: i64) -> Option<chrono::DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap() + Duration::hours(hours))
    }

    #[test]
    fn test_normal_job_on_rush_equipment_advised() {
        let config = RuleConfiguration::default();
        let mut job = test_job("J001");
        job.due_date = due(120);
        let mut existing = scheduled_test_job("J002", "manual_press_1", 9, 0, 10, 0);
        existing.priority = Priority::High;
        existing.due_date = due(24);
        let all_jobs = vec![job.clone(), existing];
        let ctx = context(&job, &all_jobs, &config);

        let advisories = rush_priority::advise(&ctx);
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].kind, AdvisoryKind::RushConflict);
        assert!(advisories[0].message.contains("J002"));
    }

    #[test]
    fn test_high_priority_candidate_silent() {
        let config = RuleConfiguration::default();
        let mut job = test_job("J001");
        job.priority = Priority::High;
        let mut existing = scheduled_test_job("J002", "manual_press_1", 9, 0, 10, 0);
        existing.priority = Priority::High;
        existing.due_date = due(24);
        let all_jobs = vec![job.clone(), existing];
        let ctx = context(&job, &all_jobs, &config);

        assert!(rush_priority::advise(&ctx).is_empty());
    }

    #[test]
    fn test_rush_due_later_silent() {
        let config = RuleConfiguration::default();
        let mut job = test_job("J001");
        job.due_date = due(24);
        let mut existing = scheduled_test_job("J002", "manual_press_1", 9, 0, 10, 0);
        existing.priority = Priority::High;
        existing.due_date = due(120);
        let all_jobs = vec![job.clone(), existing];
        let ctx = context(&job, &all_jobs, &config);

        assert!(rush_priority::advise(&ctx).is_empty());
    }
}
