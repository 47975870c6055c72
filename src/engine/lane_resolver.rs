// ==========================================
// 装饰印花车间排产系统 - 设备通道解析引擎
// ==========================================
// 职责: (工艺, 工序) → 可承接设备通道的有序列表
// 优先级: 组织配置 → 内建通道表 → 关键词启发 → 通用兜底
// 红线: 已知工艺永不返回空列表, 未知组合降级为通用双通道
// ==========================================

use tracing::debug;

use crate::config::normalize::{canonical_key, title_case};
use crate::config::org::EquipmentConfig;
use crate::domain::equipment::{EquipmentLane, DEFAULT_LANE_CAPACITY_MINUTES};

// ==========================================
// 内建通道模板
// ==========================================

#[derive(Debug, Clone, Copy)]
struct LaneTemplate {
    id: &'static str,
    name: &'static str,
    lane_type: &'static str,
}

impl LaneTemplate {
    fn to_lane(self) -> EquipmentLane {
        EquipmentLane {
            id: self.id.to_string(),
            name: self.name.to_string(),
            lane_type: self.lane_type.to_string(),
            capacity: DEFAULT_LANE_CAPACITY_MINUTES,
        }
    }
}

// ===== 命名通道组 (内建表与关键词启发共用) =====

const ART_LANES: &[LaneTemplate] = &[LaneTemplate {
    id: "art_station_1",
    name: "Art Station 1",
    lane_type: "art",
}];

const SCREEN_PREP_LANES: &[LaneTemplate] = &[
    LaneTemplate {
        id: "exposure_unit_1",
        name: "Exposure Unit 1",
        lane_type: "screen_prep",
    },
    LaneTemplate {
        id: "washout_booth_1",
        name: "Washout Booth 1",
        lane_type: "screen_prep",
    },
];

const PRESS_LANES: &[LaneTemplate] = &[
    LaneTemplate {
        id: "manual_press_1",
        name: "Manual Press 1",
        lane_type: "press",
    },
    LaneTemplate {
        id: "manual_press_2",
        name: "Manual Press 2",
        lane_type: "press",
    },
    LaneTemplate {
        id: "auto_press_1",
        name: "Auto Press 1",
        lane_type: "press",
    },
];

const CURE_LANES: &[LaneTemplate] = &[
    LaneTemplate {
        id: "conveyor_dryer_1",
        name: "Conveyor Dryer 1",
        lane_type: "dryer",
    },
    LaneTemplate {
        id: "conveyor_dryer_2",
        name: "Conveyor Dryer 2",
        lane_type: "dryer",
    },
];

const EMBROIDERY_LANES: &[LaneTemplate] = &[
    LaneTemplate {
        id: "emb_machine_1",
        name: "Embroidery Machine 1",
        lane_type: "embroidery",
    },
    LaneTemplate {
        id: "emb_machine_2",
        name: "Embroidery Machine 2",
        lane_type: "embroidery",
    },
];

const FILM_PRINTER_LANES: &[LaneTemplate] = &[LaneTemplate {
    id: "dtf_printer_1",
    name: "DTF Printer 1",
    lane_type: "film_printer",
}];

const HEAT_PRESS_LANES: &[LaneTemplate] = &[
    LaneTemplate {
        id: "heat_press_1",
        name: "Heat Press 1",
        lane_type: "heat_press",
    },
    LaneTemplate {
        id: "heat_press_2",
        name: "Heat Press 2",
        lane_type: "heat_press",
    },
];

const DTG_PRINTER_LANES: &[LaneTemplate] = &[
    LaneTemplate {
        id: "dtg_printer_1",
        name: "DTG Printer 1",
        lane_type: "dtg_printer",
    },
    LaneTemplate {
        id: "dtg_printer_2",
        name: "DTG Printer 2",
        lane_type: "dtg_printer",
    },
];

const PRETREAT_LANES: &[LaneTemplate] = &[LaneTemplate {
    id: "pretreat_station_1",
    name: "Pretreat Station 1",
    lane_type: "pretreat",
}];

const FINISHING_LANES: &[LaneTemplate] = &[
    LaneTemplate {
        id: "finishing_table_1",
        name: "Finishing Table 1",
        lane_type: "finishing",
    },
    LaneTemplate {
        id: "finishing_table_2",
        name: "Finishing Table 2",
        lane_type: "finishing",
    },
];

// ==========================================
// 关键词启发表
// ==========================================
// 说明: 有序 (关键词集, 通道组) 表, 独立可测, 扩展无需改解析流程
const STAGE_KEYWORD_ROUTES: &[(&[&str], &[LaneTemplate])] = &[
    (&["burn", "screen", "expose"], SCREEN_PREP_LANES),
    (&["cure", "oven", "bake", "dry"], CURE_LANES),
    (&["pretreat"], PRETREAT_LANES),
    (&["emb", "stitch", "hoop"], EMBROIDERY_LANES),
    (&["powder", "film"], FILM_PRINTER_LANES),
    (&["press", "heat", "transfer"], HEAT_PRESS_LANES),
    (&["print"], PRESS_LANES),
    (&["fold", "pack", "finish", "trim"], FINISHING_LANES),
    (&["art", "digitize"], ART_LANES),
];

/// 内建通道表: (工艺, 工序) → 通道组
fn builtin_lanes(method_key: &str, stage_key: &str) -> Option<&'static [LaneTemplate]> {
    match (method_key, stage_key) {
        // 丝网印刷
        ("screen_printing", "art_prep") => Some(ART_LANES),
        ("screen_printing", "burn_screens") => Some(SCREEN_PREP_LANES),
        ("screen_printing", "print") => Some(PRESS_LANES),
        ("screen_printing", "cure") => Some(CURE_LANES),
        ("screen_printing", "fold_pack") => Some(FINISHING_LANES),
        // 刺绣
        ("embroidery", "digitize") => Some(ART_LANES),
        ("embroidery", "hoop") => Some(EMBROIDERY_LANES),
        ("embroidery", "embroider") => Some(EMBROIDERY_LANES),
        ("embroidery", "trim") => Some(FINISHING_LANES),
        ("embroidery", "fold_pack") => Some(FINISHING_LANES),
        // DTF
        ("dtf", "art_prep") => Some(ART_LANES),
        ("dtf", "print_film") => Some(FILM_PRINTER_LANES),
        ("dtf", "powder") => Some(FILM_PRINTER_LANES),
        ("dtf", "cure") => Some(CURE_LANES),
        ("dtf", "press") => Some(HEAT_PRESS_LANES),
        ("dtf", "fold_pack") => Some(FINISHING_LANES),
        // DTG
        ("dtg", "art_prep") => Some(ART_LANES),
        ("dtg", "pretreat") => Some(PRETREAT_LANES),
        ("dtg", "print") => Some(DTG_PRINTER_LANES),
        ("dtg", "cure") => Some(CURE_LANES),
        ("dtg", "fold_pack") => Some(FINISHING_LANES),
        _ => None,
    }
}

// ==========================================
// LaneResolver - 通道解析引擎
// ==========================================
pub struct LaneResolver {
    // 无状态引擎
}

impl LaneResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析可承接 (工艺, 工序) 的设备通道有序列表
    ///
    /// # 参数
    /// - `method`: 装饰工艺 (任意书写形式)
    /// - `stage`: 工序 (任意书写形式)
    /// - `org_equipment`: 组织配置的设备条目
    ///
    /// # 返回
    /// 按优先级排列的通道列表, 永不为空
    pub fn resolve_lanes(
        &self,
        method: &str,
        stage: &str,
        org_equipment: &[EquipmentConfig],
    ) -> Vec<EquipmentLane> {
        let method_key = canonical_key(method);
        let stage_key = canonical_key(stage);

        // 1. 组织配置优先
        let configured = self.configured_lanes(method, stage, org_equipment);
        if !configured.is_empty() {
            debug!(
                method = %method_key,
                stage = %stage_key,
                lanes = configured.len(),
                "通道解析: 命中组织配置"
            );
            return configured;
        }

        // 2. 内建通道表
        if let Some(templates) = builtin_lanes(&method_key, &stage_key) {
            return templates.iter().map(|t| t.to_lane()).collect();
        }

        // 3. 工序名关键词启发 (仅对已知工艺生效)
        if !self.is_unknown_method(&method_key) {
            for (keywords, templates) in STAGE_KEYWORD_ROUTES {
                if keywords.iter().any(|kw| stage_key.contains(kw)) {
                    debug!(
                        method = %method_key,
                        stage = %stage_key,
                        "通道解析: 关键词启发命中"
                    );
                    return templates.iter().map(|t| t.to_lane()).collect();
                }
            }
        }

        // 4. 通用双通道兜底
        debug!(
            method = %method_key,
            stage = %stage_key,
            "通道解析: 降级为通用双通道"
        );
        self.generic_lanes(&method_key, &stage_key)
    }

    /// 仅返回组织显式配置承接 (工艺, 工序) 的通道
    ///
    /// 自动排产只使用此集合: 可预测性要求显式通道
    pub fn configured_lanes(
        &self,
        method: &str,
        stage: &str,
        org_equipment: &[EquipmentConfig],
    ) -> Vec<EquipmentLane> {
        let method_key = canonical_key(method);
        let stage_key = canonical_key(stage);
        org_equipment
            .iter()
            .filter(|eq| eq.services(&method_key, &stage_key))
            .map(EquipmentConfig::to_lane)
            .collect()
    }

    /// 未知工艺判定 (内建工艺表以外)
    fn is_unknown_method(&self, method_key: &str) -> bool {
        !matches!(method_key, "screen_printing" | "embroidery" | "dtf" | "dtg")
    }

    /// 合成通用双通道 "{Method} {Stage} 1/2"
    fn generic_lanes(&self, method_key: &str, stage_key: &str) -> Vec<EquipmentLane> {
        let method_title = title_case(method_key);
        let stage_title = title_case(stage_key);
        (1..=2)
            .map(|n| EquipmentLane {
                id: format!("{}_{}_{}", method_key, stage_key, n),
                name: format!("{} {} {}", method_title, stage_title, n),
                lane_type: "generic".to_string(),
                capacity: DEFAULT_LANE_CAPACITY_MINUTES,
            })
            .collect()
    }
}

impl Default for LaneResolver {
    fn default() -> Self {
        Self::new()
    }
}
