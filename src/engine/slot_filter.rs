// ==========================================
// 装饰印花车间排产系统 - 时段过滤引擎
// ==========================================
// 职责: 单通道单日的整点时段划分 (仅供展示)
// 红线: 区间比较统一为严格半开 [start, end)
// 说明: 虚拟"未排产"通道不做区间计算, 全部放入首时段
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::domain::equipment::{SlotBoard, TimeSlot};
use crate::domain::job::Job;
use crate::domain::types::JobStatus;

/// 虚拟"未排产"通道ID
pub const UNSCHEDULED_LANE_ID: &str = "unscheduled";

/// 半开区间重叠判定: [a_start, a_end) 与 [b_start, b_end)
///
/// 边界相接不算重叠: 10:00 结束与 10:00 开始不冲突
pub fn half_open_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

// ==========================================
// OperatingWindow - 日内作业窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    pub start_hour: u32, // 开班整点(含)
    pub end_hour: u32,   // 收班整点(不含)
}

impl Default for OperatingWindow {
    fn default() -> Self {
        // 默认 08:00 - 18:00
        Self {
            start_hour: 8,
            end_hour: 18,
        }
    }
}

impl OperatingWindow {
    /// 生成指定日期的整点时段网格
    pub fn hour_grid(&self, date: NaiveDate) -> Vec<TimeSlot> {
        (self.start_hour..self.end_hour)
            .filter_map(|hour| {
                let start = date.and_hms_opt(hour, 0, 0)?.and_utc();
                let end = date.and_hms_opt(hour + 1, 0, 0)?.and_utc();
                Some(TimeSlot { start, end })
            })
            .collect()
    }

    /// 网格跨度(小时)
    pub fn span_hours(&self) -> f64 {
        (self.end_hour.saturating_sub(self.start_hour)) as f64
    }
}

// ==========================================
// SlotFilter - 时段过滤引擎
// ==========================================
pub struct SlotFilter {
    // 无状态引擎
}

impl SlotFilter {
    pub fn new() -> Self {
        Self {}
    }

    /// 划分单通道单日的时段占用
    ///
    /// # 参数
    /// - `lane_id`: 通道ID; 传入 UNSCHEDULED_LANE_ID 进入虚拟通道模式
    /// - `jobs`: 全量任务快照
    /// - `date`: 目标日期
    /// - `window`: 日内作业窗口
    ///
    /// # 返回
    /// hour → 占用任务ID 的看板, 含展示用利用率
    pub fn slots_for_lane(
        &self,
        lane_id: &str,
        jobs: &[Job],
        date: NaiveDate,
        window: &OperatingWindow,
    ) -> SlotBoard {
        let grid = window.hour_grid(date);
        let mut board = SlotBoard {
            lane_id: lane_id.to_string(),
            ..SlotBoard::default()
        };

        if grid.is_empty() {
            return board;
        }

        // 虚拟通道: 未排产任务全部进首时段, 不做区间计算
        if lane_id == UNSCHEDULED_LANE_ID {
            let first_hour = window.start_hour;
            let ids: Vec<String> = jobs
                .iter()
                .filter(|job| job.scheduled_start.is_none() && job.status == JobStatus::Unscheduled)
                .map(|job| job.job_id.clone())
                .collect();
            if !ids.is_empty() {
                board.occupants.insert(first_hour, ids);
            }
            return board;
        }

        let mut total_occupant_hours = 0.0;
        for job in jobs {
            if job.equipment_id.as_deref() != Some(lane_id) {
                continue;
            }
            // 无排产开始时间的任务不进入任何真实时段
            let Some((start, end)) = job.schedule_window() else {
                continue;
            };

            let mut occupies_grid = false;
            for (idx, slot) in grid.iter().enumerate() {
                if half_open_overlap(start, end, slot.start, slot.end) {
                    let hour = window.start_hour + idx as u32;
                    board
                        .occupants
                        .entry(hour)
                        .or_default()
                        .push(job.job_id.clone());
                    occupies_grid = true;
                }
            }
            if occupies_grid {
                total_occupant_hours += job.current_duration_hours();
            }
        }

        // 展示用利用率: 占用任务时长之和 / 网格跨度, 取整
        let span = window.span_hours();
        if span > 0.0 {
            board.utilization_pct = ((total_occupant_hours / span) * 100.0).round() as u32;
        }

        debug!(
            lane_id = %lane_id,
            date = %date,
            occupied_slots = board.occupants.len(),
            utilization_pct = board.utilization_pct,
            "时段划分完成"
        );
        board
    }
}

impl Default for SlotFilter {
    fn default() -> Self {
        Self::new()
    }
}
