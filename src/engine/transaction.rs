// ==========================================
// 装饰印花车间排产系统 - 排产事务引擎
// ==========================================
// 职责: 排产/取消/推进工序/状态流转的唯一写入口
// 红线: 同一任务同一时刻至多一个在途操作 (重复操作显式 Skipped)
// 红线: schedule() 工序变更时门控 fail-closed
// 两段式提交: 同步本地变更 + 返回效果列表交分发器异步执行
// ==========================================

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::methods::MethodCatalog;
use crate::config::normalize::canonical_key;
use crate::config::org::OrgConfig;
use crate::domain::advisory::Advisory;
use crate::domain::audit::{AuditRecord, ScheduleAction, StatusChange};
use crate::domain::job::{hours_to_duration, Job, ScheduleIntent};
use crate::domain::types::JobStatus;
use crate::engine::effects::Effect;
use crate::engine::rules::pipeline::RulePipeline;
use crate::engine::rules::RuleContext;
use crate::engine::stage_gate::StageDependencyGate;

// ==========================================
// SchedulingError - 排产事务错误
// ==========================================
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("排产校验未通过: {reason}")]
    ValidationRejected { reason: String },

    #[error("任务不存在: {job_id}")]
    NotFound { job_id: String },

    #[error("协作方不可用: {0}")]
    CollaboratorUnavailable(String),
}

// ==========================================
// ScheduleOutcome - 事务结果
// ==========================================
#[derive(Debug)]
pub enum ScheduleOutcome {
    /// 已提交: 变更后的任务副本 + 提示 + 待执行效果
    Committed {
        job: Job,
        advisories: Vec<Advisory>,
        effects: Vec<Effect>,
    },
    /// 同任务已有在途操作, 本次被丢弃
    Skipped { job_id: String },
}

impl ScheduleOutcome {
    /// 提交结果中的效果列表 (Skipped 为空)
    pub fn take_effects(&mut self) -> Vec<Effect> {
        match self {
            ScheduleOutcome::Committed { effects, .. } => std::mem::take(effects),
            ScheduleOutcome::Skipped { .. } => Vec::new(),
        }
    }
}

/// 在途守卫: Drop 时释放任务锁
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    job_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.job_id);
    }
}

// ==========================================
// SchedulingEngine - 排产事务引擎
// ==========================================
pub struct SchedulingEngine {
    jobs: RwLock<HashMap<String, Job>>,
    in_flight: Mutex<HashSet<String>>,
    gate: Arc<dyn StageDependencyGate>,
    pipeline: RulePipeline,
    org: RwLock<OrgConfig>,
    catalog: RwLock<MethodCatalog>,
}

impl SchedulingEngine {
    /// 创建引擎
    ///
    /// # 参数
    /// - `gate`: 工序依赖门控协作方
    pub fn new(gate: Arc<dyn StageDependencyGate>) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            gate,
            pipeline: RulePipeline::new(),
            org: RwLock::new(OrgConfig::default()),
            catalog: RwLock::new(MethodCatalog::default()),
        }
    }

    /// 替换组织配置 (同时重建工艺目录)
    pub fn set_org_config(&self, config: OrgConfig) {
        let catalog = MethodCatalog::from_org(&config.methods);
        *self.catalog.write().unwrap_or_else(|e| e.into_inner()) = catalog;
        *self.org.write().unwrap_or_else(|e| e.into_inner()) = config;
    }

    /// 替换任务快照 (刷新对账入口)
    pub fn load_jobs(&self, jobs: Vec<Job>) {
        let map = jobs
            .into_iter()
            .map(|job| (job.job_id.clone(), job))
            .collect();
        *self.jobs.write().unwrap_or_else(|e| e.into_inner()) = map;
    }

    /// 按ID取任务副本
    pub fn job(&self, job_id: &str) -> Option<Job> {
        self.jobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(job_id)
            .cloned()
    }

    /// 全量任务快照
    pub fn jobs_snapshot(&self) -> Vec<Job> {
        self.jobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// 当前组织配置副本
    pub fn org_config(&self) -> OrgConfig {
        self.org.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// 排产 (以当前时刻为基准)
    pub fn schedule(
        &self,
        intent: &ScheduleIntent,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        self.schedule_at(intent, actor, Utc::now())
    }

    /// 排产: 校验管线 + 工序门控 + 提交
    ///
    /// # 参数
    /// - `intent`: 排产意图 (结束时间按解析时长重算)
    /// - `actor`: 操作人标识
    /// - `now`: 校验基准时刻
    ///
    /// # 返回
    /// - `Committed`: 提交成功, 含提示与待执行效果
    /// - `Skipped`: 同任务已有在途操作
    pub fn schedule_at(
        &self,
        intent: &ScheduleIntent,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let Some(_guard) = self.try_acquire(&intent.job_id) else {
            warn!(job_id = %intent.job_id, "同任务在途操作重复, 本次丢弃");
            return Ok(ScheduleOutcome::Skipped {
                job_id: intent.job_id.clone(),
            });
        };

        let all_jobs = self.jobs_snapshot();
        let job = self
            .job(&intent.job_id)
            .ok_or_else(|| SchedulingError::NotFound {
                job_id: intent.job_id.clone(),
            })?;

        if !job.status.is_schedulable() {
            return Err(SchedulingError::ValidationRejected {
                reason: format!("任务状态 {} 不可排产", job.status.as_str()),
            });
        }

        let stage_key = canonical_key(&intent.stage);

        // ===== 工序变更: 依赖门控 (fail-closed) =====
        if stage_key != canonical_key(&job.current_stage) {
            let mut probe = job.clone();
            probe.current_stage = stage_key.clone();
            let available = self
                .gate
                .available_stages(&probe, &all_jobs)
                .map_err(|e| SchedulingError::CollaboratorUnavailable(e.to_string()))?;
            if !available.contains(&stage_key) {
                return Err(SchedulingError::ValidationRejected {
                    reason: format!("工序 {} 依赖未满足", stage_key),
                });
            }
        }

        // ===== 候选窗口: 开始 + 解析时长 =====
        let candidate_end =
            intent.start + hours_to_duration(job.resolved_duration_hours(&stage_key));

        // ===== 规则管线 =====
        let org = self.org.read().unwrap_or_else(|e| e.into_inner());
        let lane = org.lane_by_id(&intent.equipment_id);
        let ctx = RuleContext {
            job: &job,
            equipment_id: &intent.equipment_id,
            stage: &stage_key,
            candidate_start: intent.start,
            candidate_end,
            all_jobs: &all_jobs,
            lane: lane.as_ref(),
            config: &org.rules,
            now,
        };
        let outcome = self.pipeline.evaluate(&ctx).map_err(|blocked| {
            warn!(
                job_id = %job.job_id,
                code = blocked.violation.code,
                "排产被阻断规则拒绝"
            );
            SchedulingError::ValidationRejected {
                reason: blocked.violation.to_string(),
            }
        })?;
        drop(org);

        // ===== 提交: 本地变更 + 效果列表 =====
        let from_status = job.status;
        let mut committed = job;
        committed.current_stage = stage_key.clone();
        committed.status = JobStatus::Scheduled;
        committed.equipment_id = Some(intent.equipment_id.clone());
        committed.scheduled_start = Some(intent.start);
        committed.scheduled_end = Some(outcome.committed_end);
        self.put(committed.clone());

        let mut effects = vec![
            Effect::PersistMove {
                job_id: committed.job_id.clone(),
                stage: stage_key.clone(),
                start: intent.start,
                end: outcome.committed_end,
                equipment_id: intent.equipment_id.clone(),
            },
            Effect::Audit(
                AuditRecord::new(&committed.job_id, ScheduleAction::Schedule)
                    .with_actor(actor)
                    .with_payload(&serde_json::json!({
                        "equipment_id": intent.equipment_id,
                        "stage": stage_key,
                        "start": intent.start,
                        "end": outcome.committed_end,
                    })),
            ),
        ];
        if from_status != JobStatus::Scheduled {
            effects.push(Effect::PersistStatus {
                job_id: committed.job_id.clone(),
                status: JobStatus::Scheduled,
            });
            effects.push(Effect::StatusAutomation(StatusChange::job(
                &committed.job_id,
                from_status,
                JobStatus::Scheduled,
            )));
        }

        info!(
            job_id = %committed.job_id,
            equipment_id = %intent.equipment_id,
            stage = %stage_key,
            advisories = outcome.advisories.len(),
            "排产提交"
        );

        Ok(ScheduleOutcome::Committed {
            job: committed,
            advisories: outcome.advisories,
            effects,
        })
    }

    /// 取消排产: 清空落位并回到未排产池 (不走阻断规则管线)
    pub fn unschedule(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let Some(_guard) = self.try_acquire(job_id) else {
            return Ok(ScheduleOutcome::Skipped {
                job_id: job_id.to_string(),
            });
        };

        let job = self.job(job_id).ok_or_else(|| SchedulingError::NotFound {
            job_id: job_id.to_string(),
        })?;
        if job.status == JobStatus::Done {
            return Err(SchedulingError::ValidationRejected {
                reason: "已完成任务不可取消排产".to_string(),
            });
        }

        let from_status = job.status;
        let mut updated = job;
        updated.clear_schedule();
        updated.status = JobStatus::Unscheduled;
        self.put(updated.clone());

        let mut effects = vec![
            Effect::PersistUnschedule {
                job_id: updated.job_id.clone(),
                stage: updated.current_stage.clone(),
            },
            Effect::Audit(
                AuditRecord::new(&updated.job_id, ScheduleAction::Unschedule).with_actor(actor),
            ),
        ];
        if from_status != JobStatus::Unscheduled {
            effects.push(Effect::PersistStatus {
                job_id: updated.job_id.clone(),
                status: JobStatus::Unscheduled,
            });
            effects.push(Effect::StatusAutomation(StatusChange::job(
                &updated.job_id,
                from_status,
                JobStatus::Unscheduled,
            )));
        }

        info!(job_id = %updated.job_id, "取消排产");
        Ok(ScheduleOutcome::Committed {
            job: updated,
            advisories: Vec::new(),
            effects,
        })
    }

    /// 推进工序: 进入工艺序列的下一工序并清空落位
    ///
    /// 末工序无后继时为无操作 (返回原任务, 无效果)
    pub fn advance_stage(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let Some(_guard) = self.try_acquire(job_id) else {
            return Ok(ScheduleOutcome::Skipped {
                job_id: job_id.to_string(),
            });
        };

        let job = self.job(job_id).ok_or_else(|| SchedulingError::NotFound {
            job_id: job_id.to_string(),
        })?;
        if job.status == JobStatus::Done {
            return Err(SchedulingError::ValidationRejected {
                reason: "已完成任务不可推进工序".to_string(),
            });
        }

        let next = {
            let catalog = self.catalog.read().unwrap_or_else(|e| e.into_inner());
            catalog.next_stage(&job.method, &job.current_stage)
        };
        let Some(next_stage) = next else {
            info!(job_id = %job.job_id, stage = %job.current_stage, "已是末工序, 推进为无操作");
            return Ok(ScheduleOutcome::Committed {
                job,
                advisories: Vec::new(),
                effects: Vec::new(),
            });
        };

        let from_status = job.status;
        let prev_stage = job.current_stage.clone();
        let mut updated = job;
        updated.current_stage = next_stage.clone();
        updated.clear_schedule();
        updated.status = JobStatus::Unscheduled;
        self.put(updated.clone());

        let mut effects = vec![
            Effect::PersistUnschedule {
                job_id: updated.job_id.clone(),
                stage: next_stage.clone(),
            },
            Effect::Audit(
                AuditRecord::new(&updated.job_id, ScheduleAction::AdvanceStage)
                    .with_actor(actor)
                    .with_detail(&format!("{} -> {}", prev_stage, next_stage)),
            ),
        ];
        if from_status != JobStatus::Unscheduled {
            effects.push(Effect::PersistStatus {
                job_id: updated.job_id.clone(),
                status: JobStatus::Unscheduled,
            });
            effects.push(Effect::StatusAutomation(StatusChange::job(
                &updated.job_id,
                from_status,
                JobStatus::Unscheduled,
            )));
        }

        info!(job_id = %updated.job_id, stage = %next_stage, "工序推进");
        Ok(ScheduleOutcome::Committed {
            job: updated,
            advisories: Vec::new(),
            effects,
        })
    }

    /// 开始生产: 仅允许 scheduled → in_progress
    pub fn start(&self, job_id: &str, actor: &str) -> Result<ScheduleOutcome, SchedulingError> {
        self.transition(job_id, actor, ScheduleAction::Start, |job| {
            if job.status == JobStatus::Scheduled {
                Ok(JobStatus::InProgress)
            } else {
                Err(format!("开始生产要求 scheduled, 当前 {}", job.status.as_str()))
            }
        })
    }

    /// 完成: scheduled/in_progress → done (终态)
    pub fn mark_done(&self, job_id: &str, actor: &str) -> Result<ScheduleOutcome, SchedulingError> {
        self.transition(job_id, actor, ScheduleAction::MarkDone, |job| {
            match job.status {
                JobStatus::Scheduled | JobStatus::InProgress => Ok(JobStatus::Done),
                other => Err(format!("完成要求 scheduled/in_progress, 当前 {}", other.as_str())),
            }
        })
    }

    /// 阻塞开关: 非阻塞态置为 blocked, 阻塞态恢复
    ///
    /// 恢复语义: 仍持有排产窗口则回到 scheduled, 否则回到 unscheduled
    pub fn block_toggle(
        &self,
        job_id: &str,
        actor: &str,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        self.transition(job_id, actor, ScheduleAction::Block, |job| match job.status {
            JobStatus::Done => Err("已完成任务不可阻塞".to_string()),
            JobStatus::Blocked => Ok(unblocked_status(job)),
            _ => Ok(JobStatus::Blocked),
        })
    }

    /// 解除阻塞: 仅允许 blocked 态
    pub fn reopen(&self, job_id: &str, actor: &str) -> Result<ScheduleOutcome, SchedulingError> {
        self.transition(job_id, actor, ScheduleAction::Reopen, |job| {
            if job.status == JobStatus::Blocked {
                Ok(unblocked_status(job))
            } else {
                Err(format!("解除阻塞要求 blocked, 当前 {}", job.status.as_str()))
            }
        })
    }

    /// 通用状态流转: 守卫 + 校验 + 提交 + 效果
    fn transition(
        &self,
        job_id: &str,
        actor: &str,
        action: ScheduleAction,
        validate: impl Fn(&Job) -> Result<JobStatus, String>,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let Some(_guard) = self.try_acquire(job_id) else {
            return Ok(ScheduleOutcome::Skipped {
                job_id: job_id.to_string(),
            });
        };

        let job = self.job(job_id).ok_or_else(|| SchedulingError::NotFound {
            job_id: job_id.to_string(),
        })?;
        let to_status =
            validate(&job).map_err(|reason| SchedulingError::ValidationRejected { reason })?;

        let from_status = job.status;
        let mut updated = job;
        updated.status = to_status;
        self.put(updated.clone());

        let effects = vec![
            Effect::PersistStatus {
                job_id: updated.job_id.clone(),
                status: to_status,
            },
            Effect::Audit(AuditRecord::new(&updated.job_id, action).with_actor(actor)),
            Effect::StatusAutomation(StatusChange::job(&updated.job_id, from_status, to_status)),
        ];

        info!(
            job_id = %updated.job_id,
            action = action.as_str(),
            from = from_status.as_str(),
            to = to_status.as_str(),
            "状态流转"
        );
        Ok(ScheduleOutcome::Committed {
            job: updated,
            advisories: Vec::new(),
            effects,
        })
    }

    fn put(&self, job: Job) {
        self.jobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(job.job_id.clone(), job);
    }

    fn try_acquire(&self, job_id: &str) -> Option<InFlightGuard<'_>> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(job_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            set: &self.in_flight,
            job_id: job_id.to_string(),
        })
    }
}

/// 阻塞解除后的落点: 保留窗口回到 scheduled, 否则 unscheduled
fn unblocked_status(job: &Job) -> JobStatus {
    if job.is_scheduled() {
        JobStatus::Scheduled
    } else {
        JobStatus::Unscheduled
    }
}
