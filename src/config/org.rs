// ==========================================
// 装饰印花车间排产系统 - 组织设备配置
// ==========================================
// 红线: 组织配置在一次排产会话内不可变
// 来源: fetch_org_config() 外部协作方
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::normalize::canonical_key;
use crate::config::rules::RuleConfiguration;
use crate::domain::equipment::{EquipmentLane, DEFAULT_LANE_CAPACITY_MINUTES};

// ==========================================
// StageAssignment - 设备工序指派
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAssignment {
    pub method: String, // 工艺
    pub stage: String,  // 工序
}

// ==========================================
// EquipmentConfig - 组织设备条目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentConfig {
    pub id: String,                            // 设备ID
    pub name: String,                          // 显示名称
    #[serde(default)]
    pub equipment_type: String,                // 设备类型
    #[serde(default)]
    pub capacity: Option<f64>,                 // 产能(分钟/天), 缺省 100
    #[serde(default)]
    pub stage_assignments: Vec<StageAssignment>, // 可承接的 (工艺,工序) 对
}

impl EquipmentConfig {
    /// 是否承接指定 (工艺, 工序) — 两侧键均经规范化比较
    pub fn services(&self, method_key: &str, stage_key: &str) -> bool {
        self.stage_assignments.iter().any(|assignment| {
            canonical_key(&assignment.method) == method_key
                && canonical_key(&assignment.stage) == stage_key
        })
    }

    /// 映射为设备通道
    pub fn to_lane(&self) -> EquipmentLane {
        EquipmentLane {
            id: self.id.clone(),
            name: self.name.clone(),
            lane_type: self.equipment_type.clone(),
            capacity: self.capacity.unwrap_or(DEFAULT_LANE_CAPACITY_MINUTES),
        }
    }
}

// ==========================================
// OrgConfig - 组织配置总包
// ==========================================
// 对应外部契约 fetchOrgConfig() → {equipment, rules, methods}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrgConfig {
    #[serde(default)]
    pub equipment: Vec<EquipmentConfig>,
    #[serde(default)]
    pub rules: RuleConfiguration,
    #[serde(default)]
    pub methods: HashMap<String, Vec<String>>, // 工艺 → 工序序列覆写
}

impl OrgConfig {
    /// 按设备ID查找通道信息
    pub fn lane_by_id(&self, equipment_id: &str) -> Option<EquipmentLane> {
        self.equipment
            .iter()
            .find(|eq| eq.id == equipment_id)
            .map(EquipmentConfig::to_lane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_normalized_match() {
        let config = EquipmentConfig {
            id: "press_1".to_string(),
            name: "Manual Press 1".to_string(),
            equipment_type: "press".to_string(),
            capacity: Some(480.0),
            stage_assignments: vec![StageAssignment {
                method: "screenPrinting".to_string(),
                stage: "Print".to_string(),
            }],
        };

        assert!(config.services("screen_printing", "print"));
        assert!(!config.services("screen_printing", "cure"));
    }

    #[test]
    fn test_to_lane_capacity_default() {
        let config = EquipmentConfig {
            id: "dryer_1".to_string(),
            name: "Conveyor Dryer 1".to_string(),
            equipment_type: "dryer".to_string(),
            capacity: None,
            stage_assignments: vec![],
        };

        let lane = config.to_lane();
        assert_eq!(lane.capacity, DEFAULT_LANE_CAPACITY_MINUTES);
    }
}
