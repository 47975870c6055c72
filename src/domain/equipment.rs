// ==========================================
// 装饰印花车间排产系统 - 设备与时段领域模型
// ==========================================
// 红线: 设备通道在一次排产会话内是不可变配置
// 单位约定: capacity 统一为 分钟/天, 换算小时一律除以 60
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 设备产能缺省值(分钟/天), 组织配置未提供 capacity 时使用
pub const DEFAULT_LANE_CAPACITY_MINUTES: f64 = 100.0;

/// 设备日产能兜底(小时/天), capacity 缺失或非法时的利用率分母
pub const DEFAULT_DAILY_CAPACITY_HOURS: f64 = 8.0;

// ==========================================
// EquipmentLane - 设备通道
// ==========================================
// 用途: 可执行某工序的单件并行资源,由通道解析器产出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentLane {
    pub id: String,        // 设备标识
    pub name: String,      // 显示名称
    pub lane_type: String, // 设备类型 (press/dryer/embroidery/...)
    pub capacity: f64,     // 产能(分钟/天)
}

impl EquipmentLane {
    /// 日产能(小时), capacity 非法时回退 8 小时
    pub fn daily_capacity_hours(&self) -> f64 {
        if self.capacity.is_finite() && self.capacity > 0.0 {
            self.capacity / 60.0
        } else {
            DEFAULT_DAILY_CAPACITY_HOURS
        }
    }
}

// ==========================================
// TimeSlot - 小时时段
// ==========================================
// 用途: 固定日内作业窗口(默认 08:00-18:00)内的整点窗口
// 说明: 仅用于展示划分,不持久化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>, // 时段开始(含)
    pub end: DateTime<Utc>,   // 时段结束(不含)
}

// ==========================================
// SlotBoard - 单通道单日时段看板
// ==========================================
// 用途: 时段过滤器输出,hour → 占用任务ID列表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotBoard {
    pub lane_id: String,                         // 通道ID
    pub occupants: HashMap<u32, Vec<String>>,    // 小时 → 任务ID
    pub utilization_pct: u32,                    // 利用率(%),仅供展示
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_capacity_hours() {
        let mut lane = EquipmentLane {
            id: "press_1".to_string(),
            name: "Press 1".to_string(),
            lane_type: "press".to_string(),
            capacity: 480.0,
        };
        assert_eq!(lane.daily_capacity_hours(), 8.0);

        // 非法产能回退 8 小时
        lane.capacity = 0.0;
        assert_eq!(lane.daily_capacity_hours(), DEFAULT_DAILY_CAPACITY_HOURS);
        lane.capacity = f64::NAN;
        assert_eq!(lane.daily_capacity_hours(), DEFAULT_DAILY_CAPACITY_HOURS);
    }
}
