// ==========================================
// 装饰印花车间排产系统 - 提示信息领域模型
// ==========================================
// 红线: 提示只附带信息,永不阻断提交
// 用途: 规则管线 6-10 号规则的非阻断输出
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// AdvisoryKind - 提示类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    DueDateWarning,      // 临近交期
    CapacityOverload,    // 设备日负荷超阈值
    MaintenanceDue,      // 设备保养临近
    OutsourcingSuggested, // 建议外协(附带首选供应商)
    LowStock,            // 低库存提醒
    RushConflict,        // 加急任务冲突提示
    RushSurcharge,       // 加急附加费建议
    SmallBatchPenalty,   // 小批量附加费建议
    UtilizationHint,     // 利用率与目标偏差提示
    QcChecklist,         // 质检清单提示
}

impl AdvisoryKind {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryKind::DueDateWarning => "due_date_warning",
            AdvisoryKind::CapacityOverload => "capacity_overload",
            AdvisoryKind::MaintenanceDue => "maintenance_due",
            AdvisoryKind::OutsourcingSuggested => "outsourcing_suggested",
            AdvisoryKind::LowStock => "low_stock",
            AdvisoryKind::RushConflict => "rush_conflict",
            AdvisoryKind::RushSurcharge => "rush_surcharge",
            AdvisoryKind::SmallBatchPenalty => "small_batch_penalty",
            AdvisoryKind::UtilizationHint => "utilization_hint",
            AdvisoryKind::QcChecklist => "qc_checklist",
        }
    }
}

// ==========================================
// Advisory - 非阻断提示
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub kind: AdvisoryKind, // 类别
    pub message: String,    // 人类可读信息
}

impl Advisory {
    pub fn new(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
