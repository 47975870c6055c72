// ==========================================
// 装饰印花车间排产系统 - 任务领域模型
// ==========================================
// 红线: 任务数据归持久化层所有,引擎仅持有单次操作的工作副本
// 不变量: scheduled_end >= scheduled_start (两者同时存在时)
// 不变量: 排产时长永不为零 (工序时长 → 预估时长 → 1 小时兜底)
// ==========================================

use crate::domain::types::{JobStatus, MaterialStatus, Priority};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Job - 装饰任务
// ==========================================
// 用途: 一件装饰加工工作单元(丝印/刺绣/DTF/DTG)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    // ===== 主键 =====
    pub job_id: String, // 任务唯一标识

    // ===== 工艺维度 =====
    pub method: String,        // 装饰工艺 (screen_printing/embroidery/dtf/dtg/...)
    pub current_stage: String, // 当前工序
    pub status: JobStatus,     // 任务状态

    // ===== 数量与时长 =====
    pub quantity: u32,                        // 总数量(件)
    pub stage_durations: HashMap<String, f64>, // 各工序预估时长(小时)
    pub estimated_hours: f64,                 // 整体预估时长(小时)

    // ===== 交期与优先级 =====
    pub due_date: Option<DateTime<Utc>>, // 交货期
    pub priority: Priority,              // 优先级

    // ===== 排产落位(当前工序) =====
    pub equipment_id: Option<String>,           // 已分配设备
    pub scheduled_start: Option<DateTime<Utc>>, // 排产开始(存在即视为当前工序已排)
    pub scheduled_end: Option<DateTime<Utc>>,   // 排产结束

    // ===== 物料与人员 =====
    pub material_status: MaterialStatus, // 物料就绪状态
    pub assignee: Option<String>,        // 指派人员
}

impl Job {
    /// 解析指定工序的排产时长(小时)
    ///
    /// 取值顺序: 工序时长(>0) → 整体预估时长(>0) → 1.0 小时兜底
    pub fn resolved_duration_hours(&self, stage: &str) -> f64 {
        let stage_hours = self.stage_durations.get(stage).copied().unwrap_or(0.0);
        if stage_hours > 0.0 {
            stage_hours
        } else if self.estimated_hours > 0.0 {
            self.estimated_hours
        } else {
            1.0
        }
    }

    /// 解析当前工序的排产时长
    pub fn current_duration_hours(&self) -> f64 {
        self.resolved_duration_hours(&self.current_stage)
    }

    /// 派生排产区间 [start, end)
    ///
    /// scheduled_end 缺失时按解析时长补齐; 未排产返回 None
    pub fn schedule_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.scheduled_start?;
        let end = self
            .scheduled_end
            .unwrap_or_else(|| start + hours_to_duration(self.current_duration_hours()));
        Some((start, end))
    }

    /// 当前工序是否已排产
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start.is_some()
    }

    /// 清除当前工序的排产落位
    pub fn clear_schedule(&mut self) {
        self.equipment_id = None;
        self.scheduled_start = None;
        self.scheduled_end = None;
    }
}

/// 小时(f64) 转 chrono::Duration
///
/// 按秒取整,避免浮点小时直接参与区间比较
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::seconds((hours * 3600.0).round() as i64)
}

// ==========================================
// ScheduleIntent - 排产意图
// ==========================================
// 用途: 拖拽/自动排产产生的一次性值对象,由事务引擎消费
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleIntent {
    pub job_id: String,            // 目标任务
    pub equipment_id: String,      // 目标设备
    pub stage: String,             // 目标工序(与当前工序不同即触发依赖门控)
    pub start: DateTime<Utc>,      // 期望开始
    pub end: DateTime<Utc>,        // 期望结束(提交时按解析时长重算)
}
