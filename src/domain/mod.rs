// ==========================================
// 装饰印花车间排产系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含业务规则
// ==========================================

pub mod advisory;
pub mod audit;
pub mod equipment;
pub mod job;
pub mod types;

pub use advisory::{Advisory, AdvisoryKind};
pub use audit::{AuditRecord, ScheduleAction, StatusChange};
pub use equipment::{
    EquipmentLane, SlotBoard, TimeSlot, DEFAULT_DAILY_CAPACITY_HOURS,
    DEFAULT_LANE_CAPACITY_MINUTES,
};
pub use job::{hours_to_duration, Job, ScheduleIntent};
pub use types::{JobStatus, MaterialStatus, Priority};
