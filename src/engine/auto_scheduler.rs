// ==========================================
// 装饰印花车间排产系统 - 自动排产
// ==========================================
// 职责: 按 (工艺, 工序, 日期, 组织) 键机会式触发,
//       将就绪的未排产任务贪心落位到显式配置通道
// 红线: 同一键元组至多触发一次; 单次至多落位 3 个任务
// 红线: 只使用显式配置通道, 兜底通道不参与 (可预测性)
// 门控策略: ready_stages 预筛 fail-open, 最终由 schedule() 权威复核
// ==========================================

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::config::normalize::canonical_key;
use crate::domain::job::{hours_to_duration, Job, ScheduleIntent};
use crate::domain::types::JobStatus;
use crate::engine::effects::Effect;
use crate::engine::lane_resolver::LaneResolver;
use crate::engine::stage_gate::StageDependencyGate;
use crate::engine::transaction::{ScheduleOutcome, SchedulingEngine};

/// 单次运行最多落位任务数
const MAX_PLACEMENTS: usize = 3;

/// 起始游标时刻 (目标日期当天)
const CURSOR_START_HOUR: u32 = 9;

// ==========================================
// AutoScheduleKey - 去重键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AutoScheduleKey {
    pub method: String,
    pub stage: String,
    pub date: NaiveDate,
    pub org: String,
}

impl AutoScheduleKey {
    pub fn new(method: &str, stage: &str, date: NaiveDate, org: &str) -> Self {
        Self {
            method: canonical_key(method),
            stage: canonical_key(stage),
            date,
            org: org.to_string(),
        }
    }

    fn fingerprint(&self) -> String {
        format!("{}|{}|{}|{}", self.method, self.stage, self.date, self.org)
    }
}

// ==========================================
// AutoScheduler - 自动排产器
// ==========================================
pub struct AutoScheduler {
    fired: Mutex<HashSet<String>>,
    gate: Arc<dyn StageDependencyGate>,
    resolver: LaneResolver,
}

impl AutoScheduler {
    pub fn new(gate: Arc<dyn StageDependencyGate>) -> Self {
        Self {
            fired: Mutex::new(HashSet::new()),
            gate,
            resolver: LaneResolver::new(),
        }
    }

    /// 按键触发一次自动排产 (以当前时刻为基准)
    pub fn run(&self, key: &AutoScheduleKey, engine: &SchedulingEngine) -> Vec<Effect> {
        self.run_at(key, engine, Utc::now())
    }

    /// 按键触发一次自动排产
    ///
    /// # 参数
    /// - `key`: 去重键 (工艺, 工序, 日期, 组织)
    /// - `engine`: 排产事务引擎 (落位经其权威复核)
    /// - `now`: 基准时刻 (目标日期为今天时游标不早于此)
    ///
    /// # 返回
    /// 全部成功落位产生的待执行效果 (未落位则为空)
    pub fn run_at(
        &self,
        key: &AutoScheduleKey,
        engine: &SchedulingEngine,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        let org = engine.org_config();
        if !org.rules.auto_schedule_enabled {
            debug!(key = %key.fingerprint(), "自动排产未启用, 跳过");
            return Vec::new();
        }

        // ===== 键去重: 同一键至多触发一次 =====
        {
            let mut fired = self.fired.lock().unwrap_or_else(|e| e.into_inner());
            if !fired.insert(key.fingerprint()) {
                debug!(key = %key.fingerprint(), "键已触发过, 跳过");
                return Vec::new();
            }
        }

        // ===== 显式配置通道, 取第一条 =====
        let lanes = self
            .resolver
            .configured_lanes(&key.method, &key.stage, &org.equipment);
        let Some(lane) = lanes.first() else {
            debug!(key = %key.fingerprint(), "无显式配置通道, 跳过");
            return Vec::new();
        };

        // ===== 候选任务: 未排产 + 门控就绪 (fail-open) =====
        let all_jobs = engine.jobs_snapshot();
        let mut eligible: Vec<Job> = all_jobs
            .iter()
            .filter(|job| {
                canonical_key(&job.method) == key.method
                    && canonical_key(&job.current_stage) == key.stage
                    && job.status == JobStatus::Unscheduled
                    && !job.is_scheduled()
            })
            .filter(|job| self.gate_ready(job, &all_jobs, &key.stage))
            .cloned()
            .collect();
        if eligible.is_empty() {
            debug!(key = %key.fingerprint(), "无就绪候选任务");
            return Vec::new();
        }

        // 稳定落位序: 优先级降序 → 交期升序(无交期靠后) → 任务ID
        eligible.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| match (a.due_date, b.due_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.job_id.cmp(&b.job_id))
        });

        // ===== 起始游标: 09:00 或 now 取较晚者, 再越过通道当日末任务 =====
        let buffer = chrono::Duration::minutes(org.rules.buffer_minutes_for(&key.method));
        let mut cursor = self.start_cursor(key.date, now);
        if let Some(last_end) = lane_last_end_on_date(&all_jobs, &lane.id, key.date) {
            if last_end + buffer > cursor {
                cursor = last_end + buffer;
            }
        }

        // ===== 贪心落位: 至多 3 个, 逐个交 schedule() 权威复核 =====
        let mut effects = Vec::new();
        let mut placed = 0usize;
        for job in &eligible {
            if placed >= MAX_PLACEMENTS {
                break;
            }
            let duration = hours_to_duration(job.resolved_duration_hours(&key.stage));
            let intent = ScheduleIntent {
                job_id: job.job_id.clone(),
                equipment_id: lane.id.clone(),
                stage: key.stage.clone(),
                start: cursor,
                end: cursor + duration,
            };
            match engine.schedule_at(&intent, "auto_scheduler", now) {
                Ok(ScheduleOutcome::Committed {
                    job: committed,
                    effects: mut job_effects,
                    ..
                }) => {
                    // 游标推进到提交结束 (含换型缓冲) + 工艺缓冲
                    let next = committed
                        .scheduled_end
                        .unwrap_or(cursor + duration);
                    cursor = next + buffer;
                    effects.append(&mut job_effects);
                    placed += 1;
                    info!(
                        job_id = %committed.job_id,
                        lane = %lane.id,
                        start = %committed.scheduled_start.unwrap_or(now),
                        "自动排产落位"
                    );
                }
                Ok(ScheduleOutcome::Skipped { job_id }) => {
                    debug!(job_id = %job_id, "任务有在途操作, 自动排产跳过");
                }
                Err(err) => {
                    debug!(job_id = %job.job_id, error = %err, "自动排产候选被拒, 尝试下一个");
                }
            }
        }

        info!(
            key = %key.fingerprint(),
            lane = %lane.id,
            placed,
            "自动排产完成"
        );
        effects
    }

    /// 门控就绪预筛: 协作方失败按就绪处理 (fail-open)
    fn gate_ready(&self, job: &Job, all_jobs: &[Job], stage_key: &str) -> bool {
        match self.gate.ready_stages(job, all_jobs) {
            Ok(ready) => ready.contains(stage_key),
            Err(err) => {
                warn!(job_id = %job.job_id, error = %err, "门控预筛失败, 按就绪处理");
                true
            }
        }
    }

    /// 目标日期 09:00; 目标日期为今天且 now 更晚时取 now
    fn start_cursor(&self, date: NaiveDate, now: DateTime<Utc>) -> DateTime<Utc> {
        let nine = date
            .and_hms_opt(CURSOR_START_HOUR, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt))
            .unwrap_or(now);
        if now.date_naive() == date && now > nine {
            now
        } else {
            nine
        }
    }
}

/// 指定通道在目标日期内最后一个已排产任务的结束时刻
fn lane_last_end_on_date(
    jobs: &[Job],
    lane_id: &str,
    date: NaiveDate,
) -> Option<DateTime<Utc>> {
    jobs.iter()
        .filter(|job| job.equipment_id.as_deref() == Some(lane_id))
        .filter_map(|job| job.schedule_window())
        .filter(|(start, _)| start.date_naive() == date)
        .map(|(_, end)| end)
        .max()
}
