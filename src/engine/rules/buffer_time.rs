// ==========================================
// 装饰印花车间排产系统 - 缓冲时间规则 (阻断)
// ==========================================
// 规则: 工艺配置缓冲(分钟)后, [start-buf, end+buf] 与同设备
//       任何既有任务区间半开重叠即阻断
// ==========================================

use chrono::Duration;

use crate::engine::rules::{RuleContext, RuleViolation};
use crate::engine::slot_filter::half_open_overlap;

/// 缓冲时间校验
pub fn check(ctx: &RuleContext<'_>) -> Result<(), RuleViolation> {
    let buffer_minutes = ctx.config.buffer_minutes_for(&ctx.job.method);
    if buffer_minutes <= 0 {
        return Ok(());
    }

    let buffer = Duration::minutes(buffer_minutes);
    let padded_start = ctx.candidate_start - buffer;
    let padded_end = ctx.candidate_end + buffer;

    for other in ctx.other_jobs_on_equipment() {
        let Some((other_start, other_end)) = other.schedule_window() else {
            continue;
        };
        if half_open_overlap(padded_start, padded_end, other_start, other_end) {
            return Err(RuleViolation::new(
                "BUFFER_TIME_CONFLICT",
                format!(
                    "与任务 {} 的间隔不足 {} 分钟缓冲 (设备 {})",
                    other.job_id, buffer_minutes, ctx.equipment_id
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::config::rules::{BatchingRule, RuleConfiguration};
    use crate::engine::rules::buffer_time;
    use crate::engine::test_support::{context_at, scheduled_test_job, test_job};

    fn config_buffer_15() -> RuleConfiguration {
        let mut config = RuleConfiguration::default();
        config.batching.insert(
            "screen_printing".to_string(),
            BatchingRule {
                min_batch_size: 0,
                max_batch_size: 0,
                buffer_minutes: 15,
            },
        );
        config
    }

    #[test]
    fn test_gap_below_buffer_conflicts() {
        let config = config_buffer_15();
        let job = test_job("J001");
        // 既有任务 [11:10, 12:00), 候选 [10:00, 11:00) → 间隔 10 分钟 < 15
        let existing = scheduled_test_job("J002", "manual_press_1", 11, 10, 12, 0);
        let all_jobs = vec![job.clone(), existing];

        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(&job, &all_jobs, &config, start, end);

        let violation = buffer_time::check(&ctx).unwrap_err();
        assert_eq!(violation.code, "BUFFER_TIME_CONFLICT");
    }

    #[test]
    fn test_gap_at_or_above_buffer_passes() {
        let config = config_buffer_15();
        let job = test_job("J001");
        // 既有任务 [11:20, 12:00) → 间隔 20 分钟 >= 15
        let existing = scheduled_test_job("J002", "manual_press_1", 11, 20, 12, 0);
        let all_jobs = vec![job.clone(), existing];

        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(&job, &all_jobs, &config, start, end);

        assert!(buffer_time::check(&ctx).is_ok());
    }

    #[test]
    fn test_exact_buffer_gap_passes() {
        let config = config_buffer_15();
        let job = test_job("J001");
        // 间隔恰好 15 分钟: padded_end=11:15, 既有开始 11:15 → 半开不重叠
        let existing = scheduled_test_job("J002", "manual_press_1", 11, 15, 12, 0);
        let all_jobs = vec![job.clone(), existing];

        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(&job, &all_jobs, &config, start, end);

        assert!(buffer_time::check(&ctx).is_ok());
    }

    #[test]
    fn test_other_equipment_ignored() {
        let config = config_buffer_15();
        let job = test_job("J001");
        let existing = scheduled_test_job("J002", "manual_press_2", 10, 30, 11, 30);
        let all_jobs = vec![job.clone(), existing];

        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(&job, &all_jobs, &config, start, end);

        assert!(buffer_time::check(&ctx).is_ok());
    }

    #[test]
    fn test_no_buffer_configured_noop() {
        let config = RuleConfiguration::default();
        let job = test_job("J001");
        let existing = scheduled_test_job("J002", "manual_press_1", 10, 30, 11, 30);
        let all_jobs = vec![job.clone(), existing];

        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(&job, &all_jobs, &config, start, end);

        assert!(buffer_time::check(&ctx).is_ok());
    }
}
