// ==========================================
// 集成测试共用辅助
// ==========================================
// 提供: 内存端口组装的 SchedulingApi / 标准任务与组织配置
// 基准日期: 2026-03-02
// ==========================================

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use deco_shop_aps::config::org::{EquipmentConfig, OrgConfig, StageAssignment};
use deco_shop_aps::config::rules::RuleConfiguration;
use deco_shop_aps::domain::job::{Job, ScheduleIntent};
use deco_shop_aps::domain::types::{JobStatus, MaterialStatus, Priority};
use deco_shop_aps::engine::PermissiveGate;
use deco_shop_aps::repository::{
    AuditSink, MemoryAuditSink, MemoryAutomationHook, MemoryPersistence, SchedulePersistence,
    StatusAutomationHook,
};
use deco_shop_aps::SchedulingApi;

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// 标准任务: 丝印/print, 数量 24, 预估 1 小时, 物料就绪
pub fn make_job(job_id: &str) -> Job {
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

/// 排产意图: manual_press_1 / print / 10:00 起
pub fn make_intent(job_id: &str) -> ScheduleIntent {
    let start = test_date().and_hms_opt(10, 0, 0).unwrap().and_utc();
    ScheduleIntent {
        job_id: job_id.to_string(),
        equipment_id: "manual_press_1".to_string(),
        stage: "print".to_string(),
        start,
        end: start + chrono::Duration::hours(1),
    }
}

/// 组织配置: 一台丝印 print 压机, 自动排产开启
pub fn make_org_config() -> OrgConfig {
    OrgConfig {
        equipment: vec![EquipmentConfig {
            id: "manual_press_1".to_string(),
            name: "Manual Press 1".to_string(),
            equipment_type: "press".to_string(),
            capacity: Some(600.0),
            stage_assignments: vec![StageAssignment {
                method: "screen_printing".to_string(),
                stage: "print".to_string(),
            }],
        }],
        rules: RuleConfiguration {
            auto_schedule_enabled: true,
            ..RuleConfiguration::default()
        },
        methods: HashMap::new(),
    }
}

/// 测试环境: 内存端口 + 放行门控的完整门面
pub struct TestEnv {
    pub api: SchedulingApi,
    pub persistence: Arc<MemoryPersistence>,
    pub audit: Arc<MemoryAuditSink>,
    pub automation: Arc<MemoryAutomationHook>,
}

pub async fn setup_env(jobs: Vec<Job>, org: OrgConfig) -> TestEnv {
    let persistence = Arc::new(
        MemoryPersistence::new()
            .with_jobs(jobs)
            .with_org_config(org),
    );
    let audit = Arc::new(MemoryAuditSink::new());
    let automation = Arc::new(MemoryAutomationHook::new());
    let api = SchedulingApi::new(
        Arc::new(PermissiveGate),
        Arc::clone(&persistence) as Arc<dyn SchedulePersistence>,
        Arc::clone(&audit) as Arc<dyn AuditSink>,
        Some(Arc::clone(&automation) as Arc<dyn StatusAutomationHook>),
    );
    api.refresh().await.unwrap();
    TestEnv {
        api,
        persistence,
        audit,
        automation,
    }
}

/// 让 fire-and-forget 的效果任务在当前线程运行时中跑完
pub async fn drain_effects() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
