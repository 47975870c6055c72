// ==========================================
// 装饰印花车间排产系统 - 引擎层测试辅助
// ==========================================
// 用途: 各引擎单元测试共用的任务/上下文构造器
// 基准日期: 2026-03-02, 基准时刻 now = 08:00
// ==========================================

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;

use crate::config::rules::RuleConfiguration;
use crate::domain::equipment::EquipmentLane;
use crate::domain::job::{hours_to_duration, Job};
use crate::domain::types::{JobStatus, MaterialStatus, Priority};
use crate::engine::rules::RuleContext;

/// 测试基准日期
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// 测试基准时刻 (08:00)
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

/// 创建测试任务 (丝印/print, 数量 24, 预估 1 小时, 物料就绪)
pub fn test_job(job_id: &str) -> Job {
    Job {
        job_id: job_id.to_string(),
        method: "screen_printing".to_string(),
        current_stage: "print".to_string(),
        status: JobStatus::Unscheduled,
        quantity: 24,
        stage_durations: HashMap::new(),
        estimated_hours: 1.0,
        due_date: None,
        priority: Priority::Normal,
        equipment_id: None,
        scheduled_start: None,
        scheduled_end: None,
        material_status: MaterialStatus::Ready,
        assignee: None,
    }
}

/// 创建已排产的测试任务 (基准日期内指定时分窗口)
pub fn scheduled_test_job(
    job_id: &str,
    equipment_id: &str,
    start_hour: u32,
    start_min: u32,
    end_hour: u32,
    end_min: u32,
) -> Job {
    let date = test_date();
    let mut job = test_job(job_id);
    job.status = JobStatus::Scheduled;
    job.equipment_id = Some(equipment_id.to_string());
    job.scheduled_start = Some(
        date.and_hms_opt(start_hour, start_min, 0)
            .unwrap()
            .and_utc(),
    );
    job.scheduled_end = Some(date.and_hms_opt(end_hour, end_min, 0).unwrap().and_utc());
    job
}

/// 创建测试设备通道
pub fn test_lane(id: &str, capacity_minutes: f64) -> EquipmentLane {
    EquipmentLane {
        id: id.to_string(),
        name: id.to_string(),
        lane_type: "press".to_string(),
        capacity: capacity_minutes,
    }
}

/// 默认上下文: 候选 [10:00, 10:00+解析时长), 设备 manual_press_1
pub fn context<'a>(
    job: &'a Job,
    all_jobs: &'a [Job],
    config: &'a RuleConfiguration,
) -> RuleContext<'a> {
    let start = test_date().and_hms_opt(10, 0, 0).unwrap().and_utc();
    let end = start + hours_to_duration(job.current_duration_hours());
    context_at(job, all_jobs, config, start, end)
}

/// 指定候选窗口的上下文
pub fn context_at<'a>(
    job: &'a Job,
    all_jobs: &'a [Job],
    config: &'a RuleConfiguration,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> RuleContext<'a> {
    RuleContext {
        job,
        equipment_id: "manual_press_1",
        stage: &job.current_stage,
        candidate_start: start,
        candidate_end: end,
        all_jobs,
        lane: None,
        config,
        now: test_now(),
    }
}

/// 携带通道信息的上下文
pub fn context_with_lane<'a>(
    job: &'a Job,
    all_jobs: &'a [Job],
    config: &'a RuleConfiguration,
    lane: &'a EquipmentLane,
) -> RuleContext<'a> {
    let mut ctx = context(job, all_jobs, config);
    ctx.lane = Some(lane);
    ctx
}
