// ==========================================
// 装饰印花车间排产系统 - API 层
// ==========================================

pub mod scheduling_api;

pub use scheduling_api::SchedulingApi;
