// ==========================================
// 装饰印花车间排产系统 - 规则管线
// ==========================================
// 职责: 排产意图的多规则校验与提示
// 红线: 阻断规则必须输出 reason; 提示规则永不阻断
// 执行序: 批量 → 缓冲 → 物料 → 外协产能 → 外协交期 (阻断, 首败即止)
//         通知 / 加急 / 成本 / 质检 (提示) + 换型缓冲 (延长结束时间)
// ==========================================

pub mod batch_size;
pub mod buffer_time;
pub mod cost;
pub mod material;
pub mod notifications;
pub mod outsourcing;
pub mod pipeline;
pub mod qc;
pub mod rush_priority;

pub use pipeline::{PipelineOutcome, RulePipeline};

use chrono::{DateTime, Utc};

use crate::config::rules::RuleConfiguration;
use crate::domain::equipment::EquipmentLane;
use crate::domain::job::Job;

// ==========================================
// RuleViolation - 阻断规则失败
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub code: &'static str, // 机器可读原因码
    pub message: String,    // 人类可读原因
}

impl RuleViolation {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

// ==========================================
// RuleContext - 单次校验上下文
// ==========================================
// 说明: 引擎在一次操作内的只读快照, 各规则不得修改
pub struct RuleContext<'a> {
    pub job: &'a Job,                      // 候选任务
    pub equipment_id: &'a str,             // 目标设备
    pub stage: &'a str,                    // 目标工序
    pub candidate_start: DateTime<Utc>,    // 候选开始
    pub candidate_end: DateTime<Utc>,      // 候选结束 (开始 + 解析时长)
    pub all_jobs: &'a [Job],               // 全量任务快照
    pub lane: Option<&'a EquipmentLane>,   // 目标设备通道信息 (可缺失)
    pub config: &'a RuleConfiguration,     // 组织规则配置
    pub now: DateTime<Utc>,                // 校验时刻
}

impl<'a> RuleContext<'a> {
    /// 候选时长(小时)
    pub fn candidate_hours(&self) -> f64 {
        (self.candidate_end - self.candidate_start).num_seconds() as f64 / 3600.0
    }

    /// 距交期小时数, 无交期返回 None
    pub fn hours_until_due(&self) -> Option<f64> {
        self.job
            .due_date
            .map(|due| (due - self.now).num_seconds() as f64 / 3600.0)
    }

    /// 目标设备上的其他任务 (排除候选自身)
    pub fn other_jobs_on_equipment(&self) -> impl Iterator<Item = &'a Job> + '_ {
        let equipment_id = self.equipment_id;
        let job_id = &self.job.job_id;
        self.all_jobs.iter().filter(move |other| {
            other.job_id != *job_id && other.equipment_id.as_deref() == Some(equipment_id)
        })
    }

    /// 目标设备当日已排小时数 (既有任务, 按候选开始所在日期)
    pub fn same_day_scheduled_hours(&self) -> f64 {
        let day = self.candidate_start.date_naive();
        self.other_jobs_on_equipment()
            .filter_map(|other| other.schedule_window())
            .filter(|(start, _)| start.date_naive() == day)
            .map(|(start, end)| (end - start).num_seconds() as f64 / 3600.0)
            .sum()
    }

    /// 目标设备日产能(小时)
    ///
    /// 单位约定: capacity 为分钟/天, 除以 60; 未知设备回退 8 小时
    pub fn daily_capacity_hours(&self) -> f64 {
        self.lane
            .map(EquipmentLane::daily_capacity_hours)
            .unwrap_or(crate::domain::equipment::DEFAULT_DAILY_CAPACITY_HOURS)
    }

    /// 当日利用率(%): (既有已排小时 + 候选时长) / 日产能
    pub fn same_day_utilization_pct(&self) -> f64 {
        let total = self.same_day_scheduled_hours() + self.candidate_hours();
        total / self.daily_capacity_hours() * 100.0
    }
}
