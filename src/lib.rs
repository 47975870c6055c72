// ==========================================
// 装饰印花车间排产系统 - 核心库
// ==========================================
// 系统定位: 排产决策引擎 (单进程、按请求同步决策)
// 覆盖范围: 设备通道解析 / 时段划分 / 工序依赖门控 /
//           多规则校验管线 / 排产事务引擎 / 自动排产
// 外部协作: 持久化、审计、工序依赖解析均通过端口注入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 规则配置与组织设置
pub mod config;

// 引擎层 - 业务规则
pub mod engine;

// 仓储层 - 外部协作端口
pub mod repository;

// API 层 - 业务接口
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{JobStatus, MaterialStatus, Priority};

// 领域实体
pub use domain::{
    Advisory, AdvisoryKind, AuditRecord, EquipmentLane, Job, ScheduleAction, ScheduleIntent,
    SlotBoard, StatusChange, TimeSlot,
};

// 配置
pub use config::{
    canonical_key, EquipmentConfig, MethodCatalog, OrgConfig, RuleConfiguration,
};

// 引擎
pub use engine::{
    AutoScheduleKey, AutoScheduler, EffectDispatcher, LaneResolver, PermissiveGate, RulePipeline,
    ScheduleOutcome, SchedulingEngine, SchedulingError, SlotFilter, StageDependencyGate,
};

// API
pub use api::SchedulingApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "装饰印花车间排产系统";
