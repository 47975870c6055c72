// ==========================================
// 通道解析与时段看板集成测试
// ==========================================
// 目标: 经由 SchedulingApi 只读接口验证 通道优先级 /
//       时段半开重叠 / 虚拟未排产通道
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod lane_slot_test {
    use crate::test_helpers::{make_intent, make_job, make_org_config, setup_env, test_date};
    use deco_shop_aps::engine::{OperatingWindow, UNSCHEDULED_LANE_ID};

    #[tokio::test]
    async fn test_configured_lane_wins_over_builtin() {
        let env = setup_env(vec![], make_org_config()).await;

        let lanes = env.api.resolve_lanes("screen_printing", "print");
        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes[0].id, "manual_press_1");
        assert_eq!(lanes[0].capacity, 600.0);
    }

    #[tokio::test]
    async fn test_builtin_then_generic_fallback() {
        let env = setup_env(vec![], make_org_config()).await;

        // 无组织配置的 (工艺, 工序): 内建通道表
        let cure = env.api.resolve_lanes("screen_printing", "cure");
        assert!(cure.iter().any(|l| l.id.starts_with("conveyor_dryer")));

        // 未知工艺: 通用双通道, 永不为空
        let unknown = env.api.resolve_lanes("laser_etch", "engrave");
        assert_eq!(unknown.len(), 2);
        assert!(unknown[0].id.starts_with("laser_etch_engrave"));
    }

    #[tokio::test]
    async fn test_scheduled_job_occupies_overlapping_hours_only() {
        let env = setup_env(vec![make_job("J001")], make_org_config()).await;
        env.api.schedule(&make_intent("J001"), "ops").await.unwrap();

        let board = env.api.slots_for_lane(
            "manual_press_1",
            test_date(),
            &OperatingWindow::default(),
        );
        // [10:00, 11:00): 占 10 点时段, 边界相接不占 11 点
        assert!(board.occupants.get(&10).is_some_and(|ids| ids.contains(&"J001".to_string())));
        assert!(board.occupants.get(&11).is_none());
        assert!(board.occupants.get(&9).is_none());
    }

    #[tokio::test]
    async fn test_virtual_lane_collects_unscheduled() {
        let env = setup_env(
            vec![make_job("J001"), make_job("J002")],
            make_org_config(),
        )
        .await;
        env.api.schedule(&make_intent("J001"), "ops").await.unwrap();

        let board = env.api.slots_for_lane(
            UNSCHEDULED_LANE_ID,
            test_date(),
            &OperatingWindow::default(),
        );
        // 仅未排产任务进入首时段
        let first = board.occupants.get(&8).cloned().unwrap_or_default();
        assert_eq!(first, vec!["J002".to_string()]);
    }
}
