// ==========================================
// 装饰印花车间排产系统 - 引擎层
// ==========================================
// 组成: 通道解析 / 时段划分 / 工序门控契约 /
//       规则管线 / 排产事务 / 效果分发 / 自动排产
// 红线: 引擎层不直接访问持久化, 全部经效果列表交付
// ==========================================

pub mod auto_scheduler;
pub mod effects;
pub mod lane_resolver;
pub mod rules;
pub mod slot_filter;
pub mod stage_gate;
pub mod transaction;

#[cfg(test)]
pub mod test_support;

pub use auto_scheduler::{AutoScheduleKey, AutoScheduler};
pub use effects::{Effect, EffectDispatcher};
pub use lane_resolver::LaneResolver;
pub use rules::pipeline::{BlockedOutcome, PipelineOutcome, RulePipeline};
pub use rules::{RuleContext, RuleViolation};
pub use slot_filter::{OperatingWindow, SlotFilter, UNSCHEDULED_LANE_ID};
pub use stage_gate::{GateError, PermissiveGate, StageDependencyGate};
pub use transaction::{ScheduleOutcome, SchedulingEngine, SchedulingError};
