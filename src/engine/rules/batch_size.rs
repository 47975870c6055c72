// ==========================================
// 装饰印花车间排产系统 - 批量规则 (阻断)
// ==========================================
// 规则: 工艺配置了批量上下限时, 数量必须落在 [min, max]
// 说明: 0 表示该侧不设限
// ==========================================

use crate::engine::rules::{RuleContext, RuleViolation};

/// 批量校验
pub fn check(ctx: &RuleContext<'_>) -> Result<(), RuleViolation> {
    let Some(rule) = ctx.config.batching_for(&ctx.job.method) else {
        return Ok(());
    };

    let quantity = ctx.job.quantity;

    if rule.min_batch_size > 0 && quantity < rule.min_batch_size {
        return Err(RuleViolation::new(
            "BATCH_BELOW_MINIMUM",
            format!(
                "数量 {} 低于工艺 {} 的最小批量 {}",
                quantity, ctx.job.method, rule.min_batch_size
            ),
        ));
    }

    if rule.max_batch_size > 0 && quantity > rule.max_batch_size {
        return Err(RuleViolation::new(
            "BATCH_ABOVE_MAXIMUM",
            format!(
                "数量 {} 超过工艺 {} 的最大批量 {}",
                quantity, ctx.job.method, rule.max_batch_size
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::rules::{BatchingRule, RuleConfiguration};
    use crate::engine::rules::batch_size;
    use crate::engine::test_support::{context, test_job};

    fn config_12_144() -> RuleConfiguration {
        let mut config = RuleConfiguration::default();
        config.batching.insert(
            "screen_printing".to_string(),
            BatchingRule {
                min_batch_size: 12,
                max_batch_size: 144,
                buffer_minutes: 0,
            },
        );
        config
    }

    #[test]
    fn test_quantity_below_min_rejected() {
        let mut job = test_job("J001");
        job.quantity = 6;
        let config = config_12_144();
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        let violation = batch_size::check(&ctx).unwrap_err();
        assert_eq!(violation.code, "BATCH_BELOW_MINIMUM");
    }

    #[test]
    fn test_quantity_on_min_accepted() {
        let mut job = test_job("J001");
        job.quantity = 12;
        let config = config_12_144();
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        assert!(batch_size::check(&ctx).is_ok());
    }

    #[test]
    fn test_quantity_above_max_rejected() {
        let mut job = test_job("J001");
        job.quantity = 200;
        let config = config_12_144();
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        let violation = batch_size::check(&ctx).unwrap_err();
        assert_eq!(violation.code, "BATCH_ABOVE_MAXIMUM");
    }

    #[test]
    fn test_zero_bounds_unbounded() {
        let mut config = RuleConfiguration::default();
        config.batching.insert(
            "screen_printing".to_string(),
            BatchingRule::default(),
        );
        let mut job = test_job("J001");
        job.quantity = 9999;
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        assert!(batch_size::check(&ctx).is_ok());
    }

    #[test]
    fn test_unconfigured_method_noop() {
        let config = RuleConfiguration::default();
        let mut job = test_job("J001");
        job.quantity = 1;
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        assert!(batch_size::check(&ctx).is_ok());
    }
}
