// ==========================================
// 装饰印花车间排产系统 - 工序依赖门控契约
// ==========================================
// 说明: 工序依赖解析是外部能力, 本层只定义契约
// 策略: schedule() 权威路径 fail-closed, 自动排产预筛 fail-open
// ==========================================

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::job::Job;

/// 门控协作方错误
#[derive(Error, Debug)]
pub enum GateError {
    #[error("工序依赖解析不可用: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// StageDependencyGate - 工序依赖门控 Trait
// ==========================================
// Engine 层定义, 外部系统实现, 依赖倒置
pub trait StageDependencyGate: Send + Sync {
    /// 任务当前可进入的工序集合 (权威校验路径)
    ///
    /// # 参数
    /// - `job`: 携带目标工序的任务副本
    /// - `all_jobs`: 全量任务快照 (前置任务/工序判定依据)
    fn available_stages(&self, job: &Job, all_jobs: &[Job]) -> Result<HashSet<String>, GateError>;

    /// 任务按既有完成历史当前未被阻塞的工序集合 (自动排产预筛)
    fn ready_stages(&self, job: &Job, all_jobs: &[Job]) -> Result<HashSet<String>, GateError>;
}

// ==========================================
// PermissiveGate - 放行门控
// ==========================================
// 用途: 无依赖约束的组织与单元测试
#[derive(Debug, Clone, Default)]
pub struct PermissiveGate;

impl StageDependencyGate for PermissiveGate {
    fn available_stages(&self, job: &Job, _all_jobs: &[Job]) -> Result<HashSet<String>, GateError> {
        let mut stages = HashSet::new();
        stages.insert(job.current_stage.clone());
        Ok(stages)
    }

    fn ready_stages(&self, job: &Job, _all_jobs: &[Job]) -> Result<HashSet<String>, GateError> {
        let mut stages = HashSet::new();
        stages.insert(job.current_stage.clone());
        Ok(stages)
    }
}
