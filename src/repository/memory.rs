// ==========================================
// 装饰印花车间排产系统 - 内存端口实现
// ==========================================
// 用途: 集成测试与本地演示; 不含任何查询逻辑
// 说明: 可注入失败开关, 验证 best-effort 失败语义
// ==========================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::config::org::OrgConfig;
use crate::domain::audit::{AuditRecord, StatusChange};
use crate::domain::job::Job;
use crate::domain::types::JobStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{AuditSink, SchedulePersistence, StatusAutomationHook};

/// 持久化调用的记录 (断言用)
#[derive(Debug, Clone, PartialEq)]
pub enum PersistCall {
    MoveJob {
        job_id: String,
        stage: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        equipment_id: String,
    },
    UnscheduleStage {
        job_id: String,
        stage: String,
    },
    UpdateStatus {
        job_id: String,
        status: JobStatus,
    },
}

// ==========================================
// MemoryPersistence - 内存持久化
// ==========================================
#[derive(Default)]
pub struct MemoryPersistence {
    pub jobs: Mutex<Vec<Job>>,
    pub org_config: Mutex<OrgConfig>,
    pub calls: Mutex<Vec<PersistCall>>,
    fail_writes: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置任务快照 (fetch_jobs 返回值)
    pub fn with_jobs(self, jobs: Vec<Job>) -> Self {
        *self.jobs.lock().unwrap_or_else(|e| e.into_inner()) = jobs;
        self
    }

    /// 预置组织配置
    pub fn with_org_config(self, config: OrgConfig) -> Self {
        *self.org_config.lock().unwrap_or_else(|e| e.into_inner()) = config;
        self
    }

    /// 打开写失败开关 (验证 best-effort 语义)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 已记录的写调用快照
    pub fn recorded_calls(&self) -> Vec<PersistCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, call: PersistCall) -> RepositoryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::PersistenceFailed(
                "injected write failure".to_string(),
            ));
        }
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        Ok(())
    }
}

#[async_trait]
impl SchedulePersistence for MemoryPersistence {
    async fn move_job(
        &self,
        job_id: &str,
        stage: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        equipment_id: &str,
    ) -> RepositoryResult<()> {
        self.record(PersistCall::MoveJob {
            job_id: job_id.to_string(),
            stage: stage.to_string(),
            start,
            end,
            equipment_id: equipment_id.to_string(),
        })
    }

    async fn unschedule_stage(&self, job_id: &str, stage: &str) -> RepositoryResult<()> {
        self.record(PersistCall::UnscheduleStage {
            job_id: job_id.to_string(),
            stage: stage.to_string(),
        })
    }

    async fn update_status(&self, job_id: &str, status: JobStatus) -> RepositoryResult<()> {
        self.record(PersistCall::UpdateStatus {
            job_id: job_id.to_string(),
            status,
        })
    }

    async fn fetch_jobs(
        &self,
        method: Option<&str>,
        stage: Option<&str>,
    ) -> RepositoryResult<Vec<Job>> {
        let jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(jobs
            .iter()
            .filter(|job| method.map_or(true, |m| job.method == m))
            .filter(|job| stage.map_or(true, |s| job.current_stage == s))
            .cloned()
            .collect())
    }

    async fn fetch_org_config(&self) -> RepositoryResult<OrgConfig> {
        Ok(self
            .org_config
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}

// ==========================================
// MemoryAuditSink - 内存审计
// ==========================================
#[derive(Default)]
pub struct MemoryAuditSink {
    pub records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record_event(&self, record: AuditRecord) -> RepositoryResult<()> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
        Ok(())
    }
}

// ==========================================
// MemoryAutomationHook - 内存状态自动化钩子
// ==========================================
#[derive(Default)]
pub struct MemoryAutomationHook {
    pub changes: Mutex<Vec<StatusChange>>,
}

impl MemoryAutomationHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<StatusChange> {
        self.changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl StatusAutomationHook for MemoryAutomationHook {
    async fn on_status_change(&self, change: StatusChange) -> RepositoryResult<()> {
        self.changes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(change);
        Ok(())
    }
}
