// ==========================================
// 装饰印花车间排产系统 - 配置层
// ==========================================
// 职责: 规则配置 / 组织设备 / 工艺目录 / 标识符规范化
// 红线: 配置对引擎只读, 通过参数注入而非环境读取
// ==========================================

pub mod methods;
pub mod normalize;
pub mod org;
pub mod rules;

pub use methods::MethodCatalog;
pub use normalize::{camel_alias, canonical_key, title_case};
pub use org::{EquipmentConfig, OrgConfig, StageAssignment};
pub use rules::{
    BatchingRule, CostRules, MaterialRules, NotificationRules, OutsourcingRules, QcChecklist,
    RuleConfiguration,
};
