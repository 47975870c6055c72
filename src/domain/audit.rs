// ==========================================
// 装饰印花车间排产系统 - 审计记录领域模型
// ==========================================
// 红线: 所有排产写入必须产生审计记录
// 说明: 审计持久化为外部协作方,本层仅定义记录结构
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::types::JobStatus;

// ==========================================
// ScheduleAction - 排产操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleAction {
    Schedule,     // 排产
    Unschedule,   // 取消排产
    AdvanceStage, // 推进工序
    Start,        // 开始生产
    MarkDone,     // 完成
    Block,        // 阻塞
    Reopen,       // 解除阻塞
    AutoSchedule, // 自动排产落位
}

impl ScheduleAction {
    /// 转换为字符串 (用于审计存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleAction::Schedule => "Schedule",
            ScheduleAction::Unschedule => "Unschedule",
            ScheduleAction::AdvanceStage => "AdvanceStage",
            ScheduleAction::Start => "Start",
            ScheduleAction::MarkDone => "MarkDone",
            ScheduleAction::Block => "Block",
            ScheduleAction::Reopen => "Reopen",
            ScheduleAction::AutoSchedule => "AutoSchedule",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Schedule" => Some(ScheduleAction::Schedule),
            "Unschedule" => Some(ScheduleAction::Unschedule),
            "AdvanceStage" => Some(ScheduleAction::AdvanceStage),
            "Start" => Some(ScheduleAction::Start),
            "MarkDone" => Some(ScheduleAction::MarkDone),
            "Block" => Some(ScheduleAction::Block),
            "Reopen" => Some(ScheduleAction::Reopen),
            "AutoSchedule" => Some(ScheduleAction::AutoSchedule),
            _ => None,
        }
    }
}

// ==========================================
// AuditRecord - 审计记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub audit_id: String,              // 记录ID (UUID)
    pub job_id: String,                // 关联任务
    pub action: ScheduleAction,        // 操作类型
    pub action_ts: DateTime<Utc>,      // 操作时间
    pub actor: String,                 // 操作人/系统标识
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,        // 详细描述
}

impl AuditRecord {
    /// 创建新的审计记录
    ///
    /// # 参数
    /// - `job_id`: 关联任务ID
    /// - `action`: 操作类型
    pub fn new(job_id: &str, action: ScheduleAction) -> Self {
        Self {
            audit_id: Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            action,
            action_ts: Utc::now(),
            actor: "system".to_string(),
            payload_json: None,
            detail: None,
        }
    }

    /// 设置操作人
    pub fn with_actor(mut self, actor: &str) -> Self {
        self.actor = actor.to_string();
        self
    }

    /// 设置操作负载 (转换为JSON)
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Self {
        self.payload_json = serde_json::to_value(payload).ok();
        self
    }

    /// 设置详细描述
    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

// ==========================================
// StatusChange - 状态变更事件
// ==========================================
// 用途: 状态变更自动化钩子的入参 (fire-and-forget)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub entity_type: String,        // 实体类型(固定 "job")
    pub entity_id: String,          // 任务ID
    pub from_status: JobStatus,     // 变更前状态
    pub to_status: JobStatus,       // 变更后状态
    pub payload: Option<JsonValue>, // 附加负载
}

impl StatusChange {
    pub fn job(job_id: &str, from: JobStatus, to: JobStatus) -> Self {
        Self {
            entity_type: "job".to_string(),
            entity_id: job_id.to_string(),
            from_status: from,
            to_status: to,
            payload: None,
        }
    }
}
