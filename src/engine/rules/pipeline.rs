// ==========================================
// 装饰印花车间排产系统 - 规则管线编排
// ==========================================
// 执行序 (阻断, 首败即止): 批量 → 缓冲 → 物料 → 外协产能 → 外协交期
// 执行序 (提示, 永不阻断): 通知 → 加急冲突 → 成本 → 质检
// 换型缓冲: 配置后延长候选结束时间, 在提交前生效
// ==========================================

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::domain::advisory::Advisory;
use crate::engine::rules::{
    batch_size, buffer_time, cost, material, notifications, outsourcing, qc, rush_priority,
    RuleContext, RuleViolation,
};

// ==========================================
// PipelineOutcome - 管线通过结果
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub committed_end: DateTime<Utc>, // 候选结束 + 换型缓冲
    pub advisories: Vec<Advisory>,    // 非阻断提示
}

// ==========================================
// BlockedOutcome - 管线阻断结果
// ==========================================
// 说明: 外协触发阻断时仍携带供应商提示, 供上层透传给用户
#[derive(Debug, Clone)]
pub struct BlockedOutcome {
    pub violation: RuleViolation,
    pub advisories: Vec<Advisory>,
}

impl From<RuleViolation> for BlockedOutcome {
    fn from(violation: RuleViolation) -> Self {
        Self {
            violation,
            advisories: Vec::new(),
        }
    }
}

// ==========================================
// RulePipeline - 规则管线
// ==========================================
pub struct RulePipeline {
    // 无状态引擎
}

impl RulePipeline {
    pub fn new() -> Self {
        Self {}
    }

    /// 对一次排产意图执行完整规则管线
    ///
    /// # 参数
    /// - `ctx`: 校验上下文 (候选结束时间为 开始 + 解析时长)
    ///
    /// # 返回
    /// - `Ok(PipelineOutcome)`: 通过, 含调整后的提交结束时间与提示
    /// - `Err(BlockedOutcome)`: 任一阻断规则失败
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<PipelineOutcome, BlockedOutcome> {
        // ===== 阻断规则 1: 批量 =====
        batch_size::check(ctx).map_err(BlockedOutcome::from)?;

        // ===== 阻断规则 2: 缓冲时间 =====
        buffer_time::check(ctx).map_err(BlockedOutcome::from)?;

        // ===== 阻断规则 3: 物料就绪 =====
        material::check(ctx).map_err(BlockedOutcome::from)?;

        // ===== 阻断规则 4: 外协产能触发 =====
        outsourcing::check_capacity(ctx).map_err(|(violation, advisory)| BlockedOutcome {
            violation,
            advisories: advisory.into_iter().collect(),
        })?;

        // ===== 阻断规则 5: 外协交期触发 =====
        outsourcing::check_lead_time(ctx).map_err(|(violation, advisory)| BlockedOutcome {
            violation,
            advisories: advisory.into_iter().collect(),
        })?;

        // ===== 提示规则 (永不阻断) =====
        let mut advisories = Vec::new();
        advisories.extend(material::advise(ctx));
        advisories.extend(notifications::advise(ctx));
        advisories.extend(rush_priority::advise(ctx));
        advisories.extend(cost::advise(ctx));
        advisories.extend(qc::advise(ctx));

        // ===== 换型缓冲: 延长提交结束时间 =====
        let mut committed_end = ctx.candidate_end;
        if let Some(setup_minutes) = ctx.config.setup_time_minutes {
            if setup_minutes > 0 {
                committed_end += Duration::minutes(setup_minutes);
            }
        }

        debug!(
            job_id = %ctx.job.job_id,
            equipment_id = %ctx.equipment_id,
            advisories = advisories.len(),
            committed_end = %committed_end,
            "规则管线通过"
        );

        Ok(PipelineOutcome {
            committed_end,
            advisories,
        })
    }
}

impl Default for RulePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::config::rules::{
        BatchingRule, MaterialRules, OutsourcingRules, RuleConfiguration,
    };
    use crate::domain::advisory::AdvisoryKind;
    use crate::domain::types::MaterialStatus;
    use crate::engine::rules::pipeline::RulePipeline;
    use crate::engine::test_support::{context, context_at, scheduled_test_job, test_job};

    #[test]
    fn test_clean_intent_passes_with_no_advisories() {
        let pipeline = RulePipeline::new();
        let config = RuleConfiguration::default();
        let job = test_job("J001");
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        let outcome = pipeline.evaluate(&ctx).unwrap();
        assert!(outcome.advisories.is_empty());
        assert_eq!(outcome.committed_end, ctx.candidate_end);
    }

    #[test]
    fn test_first_blocking_rule_short_circuits() {
        let pipeline = RulePipeline::new();
        // 批量与物料同时违规, 应报告批量 (序号 1)
        let mut config = RuleConfiguration::default();
        config.batching.insert(
            "screen_printing".to_string(),
            BatchingRule {
                min_batch_size: 100,
                max_batch_size: 0,
                buffer_minutes: 0,
            },
        );
        config.materials = Some(MaterialRules {
            check_stock_before_scheduling: true,
            reorder_point_warnings: false,
            low_stock_threshold: 0,
        });
        let mut job = test_job("J001");
        job.quantity = 6;
        job.material_status = MaterialStatus::OutOfStock;
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        let blocked = pipeline.evaluate(&ctx).unwrap_err();
        assert_eq!(blocked.violation.code, "BATCH_BELOW_MINIMUM");
    }

    #[test]
    fn test_buffer_conflict_blocks_before_advisories() {
        let pipeline = RulePipeline::new();
        let mut config = RuleConfiguration::default();
        config.batching.insert(
            "screen_printing".to_string(),
            BatchingRule {
                min_batch_size: 0,
                max_batch_size: 0,
                buffer_minutes: 15,
            },
        );
        let job = test_job("J001");
        let existing = scheduled_test_job("J002", "manual_press_1", 11, 10, 12, 0);
        let all_jobs = vec![job.clone(), existing];
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        let ctx = context_at(&job, &all_jobs, &config, start, end);

        let blocked = pipeline.evaluate(&ctx).unwrap_err();
        assert_eq!(blocked.violation.code, "BUFFER_TIME_CONFLICT");
    }

    #[test]
    fn test_outsourcing_block_carries_vendor_advisory() {
        let pipeline = RulePipeline::new();
        let mut rules = OutsourcingRules {
            auto_outsource_enabled: false,
            capacity_threshold_pct: 0.0,
            lead_time_buffer_days: 3,
            ..OutsourcingRules::default()
        };
        rules
            .preferred_vendors
            .insert("screen_printing".to_string(), vec!["InkWorks".to_string()]);
        let config = RuleConfiguration {
            outsourcing: Some(rules),
            ..RuleConfiguration::default()
        };
        let mut job = test_job("J001");
        job.due_date =
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap() + Duration::hours(24));
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        let blocked = pipeline.evaluate(&ctx).unwrap_err();
        assert_eq!(blocked.violation.code, "OUTSOURCE_LEAD_TIME_TRIGGER");
        assert_eq!(blocked.advisories.len(), 1);
        assert_eq!(blocked.advisories[0].kind, AdvisoryKind::OutsourcingSuggested);
    }

    #[test]
    fn test_setup_buffer_extends_committed_end() {
        let pipeline = RulePipeline::new();
        let config = RuleConfiguration {
            setup_time_minutes: Some(20),
            ..RuleConfiguration::default()
        };
        let job = test_job("J001");
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        let outcome = pipeline.evaluate(&ctx).unwrap();
        assert_eq!(outcome.committed_end, ctx.candidate_end + Duration::minutes(20));
    }

    #[test]
    fn test_advisories_never_block() {
        let pipeline = RulePipeline::new();
        // 仅配置提示类规则, 全部触发也必须通过
        let config = RuleConfiguration {
            materials: Some(MaterialRules {
                check_stock_before_scheduling: false,
                reorder_point_warnings: true,
                low_stock_threshold: 1,
            }),
            ..RuleConfiguration::default()
        };
        let mut job = test_job("J001");
        job.material_status = MaterialStatus::LowStock;
        let all_jobs = vec![job.clone()];
        let ctx = context(&job, &all_jobs, &config);

        let outcome = pipeline.evaluate(&ctx).unwrap();
        assert!(!outcome.advisories.is_empty());
    }
}
