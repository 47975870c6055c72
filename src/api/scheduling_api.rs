// ==========================================
// 装饰印花车间排产系统 - 排产业务接口
// ==========================================
// 职责: 事务引擎 + 效果分发 + 自动排产的统一门面
// 语义: 变更操作同步决策, 效果 fire-and-forget 异步执行
// 红线: 本地视图为最终一致, 与持久层分叉由 refresh 收敛
// ==========================================

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::domain::equipment::{EquipmentLane, SlotBoard};
use crate::domain::job::ScheduleIntent;
use crate::engine::auto_scheduler::{AutoScheduleKey, AutoScheduler};
use crate::engine::effects::EffectDispatcher;
use crate::engine::lane_resolver::LaneResolver;
use crate::engine::slot_filter::{OperatingWindow, SlotFilter};
use crate::engine::stage_gate::StageDependencyGate;
use crate::engine::transaction::{ScheduleOutcome, SchedulingEngine, SchedulingError};
use crate::repository::{AuditSink, SchedulePersistence, StatusAutomationHook};

// ==========================================
// SchedulingApi - 排产接口门面
// ==========================================
pub struct SchedulingApi {
    engine: Arc<SchedulingEngine>,
    dispatcher: EffectDispatcher,
    auto_scheduler: AutoScheduler,
    persistence: Arc<dyn SchedulePersistence>,
    resolver: LaneResolver,
    slot_filter: SlotFilter,
}

impl SchedulingApi {
    /// 组装接口门面
    ///
    /// # 参数
    /// - `gate`: 工序依赖门控协作方
    /// - `persistence`: 持久化端口
    /// - `audit`: 审计端口
    /// - `automation`: 状态自动化钩子 (可选)
    pub fn new(
        gate: Arc<dyn StageDependencyGate>,
        persistence: Arc<dyn SchedulePersistence>,
        audit: Arc<dyn AuditSink>,
        automation: Option<Arc<dyn StatusAutomationHook>>,
    ) -> Self {
        Self {
            engine: Arc::new(SchedulingEngine::new(gate.clone())),
            dispatcher: EffectDispatcher::new(persistence.clone(), audit, automation),
            auto_scheduler: AutoScheduler::new(gate),
            persistence,
            resolver: LaneResolver::new(),
            slot_filter: SlotFilter::new(),
        }
    }

    /// 内部引擎句柄 (集成测试断言用)
    pub fn engine(&self) -> &SchedulingEngine {
        &self.engine
    }

    /// 全量刷新: 组织配置 + 任务快照
    pub async fn refresh(&self) -> Result<(), SchedulingError> {
        let config = self
            .persistence
            .fetch_org_config()
            .await
            .map_err(|e| SchedulingError::CollaboratorUnavailable(e.to_string()))?;
        self.engine.set_org_config(config);
        self.refresh_jobs().await
    }

    /// 重载任务快照 (本地视图对账入口)
    pub async fn refresh_jobs(&self) -> Result<(), SchedulingError> {
        let jobs = self
            .persistence
            .fetch_jobs(None, None)
            .await
            .map_err(|e| SchedulingError::CollaboratorUnavailable(e.to_string()))?;
        info!(jobs = jobs.len(), "任务快照刷新");
        self.engine.load_jobs(jobs);
        Ok(())
    }

    /// 排产 (拖拽/手工意图入口)
    pub async fn schedule(
        &self,
        intent: &ScheduleIntent,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let mut outcome = self.engine.schedule(intent, actor)?;
        self.dispatcher.dispatch(outcome.take_effects());
        Ok(outcome)
    }

    /// 取消排产
    pub async fn unschedule(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let mut outcome = self.engine.unschedule(job_id, actor)?;
        self.dispatcher.dispatch(outcome.take_effects());
        Ok(outcome)
    }

    /// 推进工序
    pub async fn advance_stage(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let mut outcome = self.engine.advance_stage(job_id, actor)?;
        self.dispatcher.dispatch(outcome.take_effects());
        Ok(outcome)
    }

    /// 开始生产
    pub async fn start(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let mut outcome = self.engine.start(job_id, actor)?;
        self.dispatcher.dispatch(outcome.take_effects());
        Ok(outcome)
    }

    /// 完成
    pub async fn mark_done(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let mut outcome = self.engine.mark_done(job_id, actor)?;
        self.dispatcher.dispatch(outcome.take_effects());
        Ok(outcome)
    }

    /// 阻塞开关
    pub async fn block_toggle(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let mut outcome = self.engine.block_toggle(job_id, actor)?;
        self.dispatcher.dispatch(outcome.take_effects());
        Ok(outcome)
    }

    /// 解除阻塞
    pub async fn reopen(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let mut outcome = self.engine.reopen(job_id, actor)?;
        self.dispatcher.dispatch(outcome.take_effects());
        Ok(outcome)
    }

    /// 触发一次自动排产 (按键去重)
    pub async fn auto_schedule(&self, key: &AutoScheduleKey) {
        let effects = self.auto_scheduler.run_at(key, &self.engine, Utc::now());
        self.dispatcher.dispatch(effects);
    }

    /// 解析 (工艺, 工序) 的候选通道 (只读)
    pub fn resolve_lanes(&self, method: &str, stage: &str) -> Vec<EquipmentLane> {
        let org = self.engine.org_config();
        self.resolver.resolve_lanes(method, stage, &org.equipment)
    }

    /// 单通道单日时段看板 (只读)
    pub fn slots_for_lane(
        &self,
        lane_id: &str,
        date: NaiveDate,
        window: &OperatingWindow,
    ) -> SlotBoard {
        let jobs = self.engine.jobs_snapshot();
        self.slot_filter.slots_for_lane(lane_id, &jobs, date, window)
    }
}
