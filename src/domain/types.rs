// ==========================================
// 装饰印花车间排产系统 - 领域类型定义
// ==========================================
// 红线: 状态机制,不是自由字符串
// 序列化格式: snake_case (与持久化层一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 任务状态 (Job Status)
// ==========================================
// 状态机: unscheduled → scheduled → in_progress → done
//         blocked 可从 scheduled/in_progress 进入, reopen 回到 scheduled
// 红线: blocked/done 不可再接收排产意图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Unscheduled, // 未排产
    Scheduled,   // 已排产
    InProgress,  // 生产中
    Blocked,     // 阻塞
    Done,        // 完成(终态)
}

impl JobStatus {
    /// 转换为字符串 (用于持久化)
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Unscheduled => "unscheduled",
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in_progress",
            JobStatus::Blocked => "blocked",
            JobStatus::Done => "done",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unscheduled" => Some(JobStatus::Unscheduled),
            "scheduled" => Some(JobStatus::Scheduled),
            "in_progress" => Some(JobStatus::InProgress),
            "blocked" => Some(JobStatus::Blocked),
            "done" => Some(JobStatus::Done),
            _ => None,
        }
    }

    /// 是否允许接收新的排产意图
    pub fn is_schedulable(&self) -> bool {
        !matches!(self, JobStatus::Blocked | JobStatus::Done)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 优先级 (Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,    // 低
    Normal, // 正常
    High,   // 加急
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 物料状态 (Material Status)
// ==========================================
// 用途: 物料就绪校验(阻断) + 低库存提醒(非阻断)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialStatus {
    Ready,      // 就绪
    InStock,    // 在库
    Received,   // 已收货
    Ordered,    // 已下单待收
    LowStock,   // 低库存
    OutOfStock, // 缺料
}

impl MaterialStatus {
    /// 是否满足"开排前物料就绪"校验
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            MaterialStatus::Ready | MaterialStatus::InStock | MaterialStatus::Received
        )
    }

    /// 转换为字符串 (用于持久化)
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialStatus::Ready => "ready",
            MaterialStatus::InStock => "in_stock",
            MaterialStatus::Received => "received",
            MaterialStatus::Ordered => "ordered",
            MaterialStatus::LowStock => "low_stock",
            MaterialStatus::OutOfStock => "out_of_stock",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ready" => Some(MaterialStatus::Ready),
            "in_stock" => Some(MaterialStatus::InStock),
            "received" => Some(MaterialStatus::Received),
            "ordered" => Some(MaterialStatus::Ordered),
            "low_stock" => Some(MaterialStatus::LowStock),
            "out_of_stock" => Some(MaterialStatus::OutOfStock),
            _ => None,
        }
    }
}

impl fmt::Display for MaterialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
