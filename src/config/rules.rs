// ==========================================
// 装饰印花车间排产系统 - 规则配置
// ==========================================
// 红线: 规则配置对管线只读,生命周期归设置管理(外部)所有
// 说明: 各规则组独立启用,缺失即该规则为 no-op
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::normalize::{camel_alias, canonical_key};

// ==========================================
// BatchingRule - 批量规则(按工艺)
// ==========================================
// 说明: 0 表示该侧不设限
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchingRule {
    #[serde(default)]
    pub min_batch_size: u32, // 最小批量(件)
    #[serde(default)]
    pub max_batch_size: u32, // 最大批量(件)
    #[serde(default)]
    pub buffer_minutes: i64, // 同设备任务间最小空档(分钟)
}

// ==========================================
// MaterialRules - 物料规则
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialRules {
    #[serde(default)]
    pub check_stock_before_scheduling: bool, // 开排前物料就绪校验(阻断)
    #[serde(default)]
    pub reorder_point_warnings: bool, // 低库存提醒(非阻断)
    #[serde(default)]
    pub low_stock_threshold: u32, // 低库存数量阈值
}

// ==========================================
// OutsourcingRules - 外协规则
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutsourcingRules {
    #[serde(default)]
    pub auto_outsource_enabled: bool, // 自动外协触发开关
    #[serde(default)]
    pub capacity_threshold_pct: f64, // 当日设备利用率阈值(%)
    #[serde(default)]
    pub lead_time_buffer_days: i64, // 交期缓冲(天)
    #[serde(default)]
    pub preferred_vendors: HashMap<String, Vec<String>>, // 工艺 → 首选供应商
}

impl OutsourcingRules {
    /// 查询工艺的首选供应商 (键经规范化比较)
    pub fn vendors_for(&self, method: &str) -> Vec<String> {
        let key = canonical_key(method);
        self.preferred_vendors
            .iter()
            .find(|(k, _)| canonical_key(k) == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }
}

// ==========================================
// NotificationRules - 通知规则(永不阻断)
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationRules {
    #[serde(default)]
    pub due_date_warning_hours: Vec<i64>, // 距交期提醒阈值(小时),可配多档
    #[serde(default)]
    pub capacity_overload_threshold_pct: Option<f64>, // 设备日负荷提醒阈值(%)
    #[serde(default)]
    pub maintenance_interval_hours: Option<f64>, // 设备保养间隔(累计排产小时)
}

// ==========================================
// CostRules - 成本优化提示规则(永不阻断)
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostRules {
    #[serde(default)]
    pub rush_threshold_hours: Option<i64>, // 加急判定: 距交期小时数
    #[serde(default)]
    pub rush_surcharge_pct: f64, // 加急附加费(%)
    #[serde(default)]
    pub min_order_quantity: Option<u32>, // 最小订单量
    #[serde(default)]
    pub small_batch_penalty_pct: f64, // 小批量附加费(%)
    #[serde(default)]
    pub target_utilization_pct: Option<f64>, // 目标利用率(%), ±5 点死区
}

// ==========================================
// QcChecklist - 质检检查点
// ==========================================
// 键格式: "{method}.{stage}", 兼容 camelCase 工艺别名与裸工序遗留键
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QcChecklist {
    #[serde(default)]
    pub enabled: bool, // 是否启用
    #[serde(default)]
    pub items: Vec<String>, // 检查项
}

// ==========================================
// RuleConfiguration - 组织规则配置总包
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfiguration {
    #[serde(default)]
    pub batching: HashMap<String, BatchingRule>, // 工艺 → 批量规则
    #[serde(default)]
    pub materials: Option<MaterialRules>,
    #[serde(default)]
    pub outsourcing: Option<OutsourcingRules>,
    #[serde(default)]
    pub notifications: Option<NotificationRules>,
    #[serde(default)]
    pub cost: Option<CostRules>,
    #[serde(default)]
    pub setup_time_minutes: Option<i64>, // 全局换型缓冲(分钟)
    #[serde(default)]
    pub qc_checklists: HashMap<String, QcChecklist>, // "method.stage" → 清单
    #[serde(default)]
    pub auto_schedule_enabled: bool, // 自动排产开关
}

impl RuleConfiguration {
    /// 查询工艺的批量规则 (键经规范化比较)
    pub fn batching_for(&self, method: &str) -> Option<&BatchingRule> {
        let key = canonical_key(method);
        self.batching
            .iter()
            .find(|(k, _)| canonical_key(k) == key)
            .map(|(_, rule)| rule)
    }

    /// 查询工艺的缓冲时间(分钟), 未配置返回 0
    pub fn buffer_minutes_for(&self, method: &str) -> i64 {
        self.batching_for(method)
            .map(|rule| rule.buffer_minutes)
            .unwrap_or(0)
    }

    /// 解析质检清单
    ///
    /// 键回退顺序: "{method}.{stage}" → "{camelMethod}.{stage}" → "{stage}"(遗留)
    pub fn qc_checklist_for(&self, method: &str, stage: &str) -> Option<&QcChecklist> {
        let method_key = canonical_key(method);
        let stage_key = canonical_key(stage);
        let candidates = [
            format!("{}.{}", method_key, stage_key),
            format!("{}.{}", camel_alias(&method_key), stage_key),
            stage_key.clone(),
        ];
        for candidate in &candidates {
            if let Some(checklist) = self.qc_checklists.get(candidate) {
                return Some(checklist);
            }
        }
        None
    }
}
