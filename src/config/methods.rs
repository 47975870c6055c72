// ==========================================
// 装饰印花车间排产系统 - 工艺目录
// ==========================================
// 职责: 各装饰工艺的内建工序序列 + 组织覆写合并
// 说明: 工序序列驱动 advance_stage 的"下一工序"语义
// ==========================================

use std::collections::HashMap;

use crate::config::normalize::canonical_key;

// ==========================================
// MethodCatalog - 工艺目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MethodCatalog {
    overrides: HashMap<String, Vec<String>>, // 组织覆写 (键已规范化)
}

impl MethodCatalog {
    /// 从组织配置构建目录
    ///
    /// # 参数
    /// - `org_methods`: 组织配置的 工艺 → 工序序列 (键可为任意书写形式)
    pub fn from_org(org_methods: &HashMap<String, Vec<String>>) -> Self {
        let overrides = org_methods
            .iter()
            .map(|(method, stages)| {
                (
                    canonical_key(method),
                    stages.iter().map(|s| canonical_key(s)).collect(),
                )
            })
            .collect();
        Self { overrides }
    }

    /// 查询工艺的有序工序列表
    ///
    /// 优先级: 组织覆写 → 内建序列 → 空(未知工艺)
    pub fn stages_for(&self, method: &str) -> Vec<String> {
        let key = canonical_key(method);
        if let Some(stages) = self.overrides.get(&key) {
            return stages.clone();
        }
        builtin_stages(&key)
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// 查询当前工序之后的下一工序, 末工序返回 None
    pub fn next_stage(&self, method: &str, current_stage: &str) -> Option<String> {
        let stages = self.stages_for(method);
        let current = canonical_key(current_stage);
        let idx = stages.iter().position(|s| *s == current)?;
        stages.get(idx + 1).cloned()
    }
}

/// 内建工艺工序序列
///
/// 与通道解析器的内建通道表使用同一组工序名
fn builtin_stages(method_key: &str) -> &'static [&'static str] {
    match method_key {
        "screen_printing" => &["art_prep", "burn_screens", "print", "cure", "fold_pack"],
        "embroidery" => &["digitize", "hoop", "embroider", "trim", "fold_pack"],
        "dtf" => &["art_prep", "print_film", "powder", "cure", "press", "fold_pack"],
        "dtg" => &["art_prep", "pretreat", "print", "cure", "fold_pack"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_stage_order() {
        let catalog = MethodCatalog::default();
        let stages = catalog.stages_for("screenPrinting");
        assert_eq!(
            stages,
            vec!["art_prep", "burn_screens", "print", "cure", "fold_pack"]
        );
    }

    #[test]
    fn test_next_stage_and_terminal() {
        let catalog = MethodCatalog::default();
        assert_eq!(
            catalog.next_stage("dtg", "pretreat"),
            Some("print".to_string())
        );
        // 末工序无下一步
        assert_eq!(catalog.next_stage("dtg", "fold_pack"), None);
        // 未知工序
        assert_eq!(catalog.next_stage("dtg", "emboss"), None);
    }

    #[test]
    fn test_org_override_wins() {
        let mut org_methods = HashMap::new();
        org_methods.insert(
            "Screen Printing".to_string(),
            vec!["burn screens".to_string(), "print".to_string()],
        );
        let catalog = MethodCatalog::from_org(&org_methods);

        assert_eq!(
            catalog.stages_for("screen_printing"),
            vec!["burn_screens", "print"]
        );
        assert_eq!(catalog.next_stage("screen_printing", "print"), None);
    }

    #[test]
    fn test_unknown_method_empty() {
        let catalog = MethodCatalog::default();
        assert!(catalog.stages_for("laser_etch").is_empty());
    }
}
