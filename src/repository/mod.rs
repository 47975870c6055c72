// ==========================================
// 装饰印花车间排产系统 - 仓储层 (协作方端口)
// ==========================================
// 红线: 引擎不直接访问存储, 全部经由端口注入
// 语义: 引擎不重试; 失败由效果分发器记录日志, 不回滚本地状态
// ==========================================

pub mod error;
pub mod memory;

pub use error::{RepositoryError, RepositoryResult};
pub use memory::{MemoryAuditSink, MemoryAutomationHook, MemoryPersistence};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::org::OrgConfig;
use crate::domain::audit::{AuditRecord, StatusChange};
use crate::domain::job::Job;
use crate::domain::types::JobStatus;

// ==========================================
// SchedulePersistence - 排产持久化端口
// ==========================================
#[async_trait]
pub trait SchedulePersistence: Send + Sync {
    /// 落位任务: 写入工序/窗口/设备
    async fn move_job(
        &self,
        job_id: &str,
        stage: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        equipment_id: &str,
    ) -> RepositoryResult<()>;

    /// 取消指定工序的落位
    ///
    /// 语义: 将 `stage` 置为当前工序并清空其排产字段;
    /// advance_stage 复用此语义使任务以新工序回到未排产池
    async fn unschedule_stage(&self, job_id: &str, stage: &str) -> RepositoryResult<()>;

    /// 更新任务状态
    async fn update_status(&self, job_id: &str, status: JobStatus) -> RepositoryResult<()>;

    /// 拉取任务集 (可按工艺/工序过滤)
    async fn fetch_jobs(
        &self,
        method: Option<&str>,
        stage: Option<&str>,
    ) -> RepositoryResult<Vec<Job>>;

    /// 拉取组织配置 {equipment, rules, methods}
    async fn fetch_org_config(&self) -> RepositoryResult<OrgConfig>;
}

// ==========================================
// AuditSink - 审计端口 (best-effort)
// ==========================================
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// 追加审计记录, 对调用方非阻塞
    async fn record_event(&self, record: AuditRecord) -> RepositoryResult<()>;
}

// ==========================================
// StatusAutomationHook - 状态变更自动化钩子 (fire-and-forget)
// ==========================================
#[async_trait]
pub trait StatusAutomationHook: Send + Sync {
    async fn on_status_change(&self, change: StatusChange) -> RepositoryResult<()>;
}
