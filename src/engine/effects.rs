// ==========================================
// 装饰印花车间排产系统 - 效果列表与分发器
// ==========================================
// 设计: 决策核心保持纯函数, 状态变迁附带"待执行效果"列表,
//       由分发器在决策路径之外异步执行
// 红线: 效果执行失败只记日志, 永不回传决策路径
// ==========================================

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::audit::{AuditRecord, StatusChange};
use crate::domain::types::JobStatus;
use crate::repository::{AuditSink, SchedulePersistence, StatusAutomationHook};

// ==========================================
// Effect - 待执行效果
// ==========================================
#[derive(Debug, Clone)]
pub enum Effect {
    /// 持久化落位
    PersistMove {
        job_id: String,
        stage: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        equipment_id: String,
    },
    /// 持久化取消落位 (stage 成为当前工序并清空排产字段)
    PersistUnschedule { job_id: String, stage: String },
    /// 持久化状态更新
    PersistStatus { job_id: String, status: JobStatus },
    /// 追加审计记录
    Audit(AuditRecord),
    /// 状态变更自动化钩子
    StatusAutomation(StatusChange),
}

// ==========================================
// EffectDispatcher - 效果分发器
// ==========================================
pub struct EffectDispatcher {
    persistence: Arc<dyn SchedulePersistence>,
    audit: Arc<dyn AuditSink>,
    automation: Option<Arc<dyn StatusAutomationHook>>,
}

impl EffectDispatcher {
    /// 创建分发器
    ///
    /// # 参数
    /// - `persistence`: 持久化端口
    /// - `audit`: 审计端口
    /// - `automation`: 状态自动化钩子 (可选)
    pub fn new(
        persistence: Arc<dyn SchedulePersistence>,
        audit: Arc<dyn AuditSink>,
        automation: Option<Arc<dyn StatusAutomationHook>>,
    ) -> Self {
        Self {
            persistence,
            audit,
            automation,
        }
    }

    /// fire-and-forget 分发: 每个效果一个后台任务
    ///
    /// 失败记录日志后吞掉; 本地乐观状态不回滚, 由下次刷新对账
    pub fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let persistence = Arc::clone(&self.persistence);
            let audit = Arc::clone(&self.audit);
            let automation = self.automation.clone();
            tokio::spawn(async move {
                apply_one(effect, persistence, audit, automation).await;
            });
        }
    }

    /// 同步等待全部效果执行完成 (测试与无运行时上下文用)
    pub async fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            apply_one(
                effect,
                Arc::clone(&self.persistence),
                Arc::clone(&self.audit),
                self.automation.clone(),
            )
            .await;
        }
    }
}

/// 执行单个效果, 失败只记日志
async fn apply_one(
    effect: Effect,
    persistence: Arc<dyn SchedulePersistence>,
    audit: Arc<dyn AuditSink>,
    automation: Option<Arc<dyn StatusAutomationHook>>,
) {
    let result = match &effect {
        Effect::PersistMove {
            job_id,
            stage,
            start,
            end,
            equipment_id,
        } => {
            persistence
                .move_job(job_id, stage, *start, *end, equipment_id)
                .await
        }
        Effect::PersistUnschedule { job_id, stage } => {
            persistence.unschedule_stage(job_id, stage).await
        }
        Effect::PersistStatus { job_id, status } => {
            persistence.update_status(job_id, *status).await
        }
        Effect::Audit(record) => audit.record_event(record.clone()).await,
        Effect::StatusAutomation(change) => match automation {
            Some(hook) => hook.on_status_change(change.clone()).await,
            None => {
                debug!("未配置状态自动化钩子, 跳过效果");
                Ok(())
            }
        },
    };

    if let Err(err) = result {
        // 本地视图与持久层短暂分叉, 下次刷新收敛
        warn!(error = %err, effect = ?effect, "效果执行失败 (best-effort, 不回滚)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::ScheduleAction;
    use crate::repository::{MemoryAuditSink, MemoryPersistence};
    use crate::repository::memory::PersistCall;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_apply_runs_all_effects() {
        let persistence = Arc::new(MemoryPersistence::new());
        let audit = Arc::new(MemoryAuditSink::new());
        let dispatcher = EffectDispatcher::new(
            Arc::clone(&persistence) as Arc<dyn SchedulePersistence>,
            Arc::clone(&audit) as Arc<dyn AuditSink>,
            None,
        );

        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        dispatcher
            .apply(vec![
                Effect::PersistMove {
                    job_id: "J001".to_string(),
                    stage: "print".to_string(),
                    start,
                    end,
                    equipment_id: "manual_press_1".to_string(),
                },
                Effect::Audit(AuditRecord::new("J001", ScheduleAction::Schedule)),
            ])
            .await;

        assert_eq!(persistence.recorded_calls().len(), 1);
        assert_eq!(audit.recorded().len(), 1);
        match &persistence.recorded_calls()[0] {
            PersistCall::MoveJob { job_id, .. } => assert_eq!(job_id, "J001"),
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_swallowed() {
        let persistence = Arc::new(MemoryPersistence::new());
        persistence.fail_writes(true);
        let audit = Arc::new(MemoryAuditSink::new());
        let dispatcher = EffectDispatcher::new(
            Arc::clone(&persistence) as Arc<dyn SchedulePersistence>,
            Arc::clone(&audit) as Arc<dyn AuditSink>,
            None,
        );

        // 失败不 panic, 不返回错误
        dispatcher
            .apply(vec![Effect::PersistStatus {
                job_id: "J001".to_string(),
                status: JobStatus::Scheduled,
            }])
            .await;

        assert!(persistence.recorded_calls().is_empty());
    }
}
