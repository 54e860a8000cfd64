// ==========================================
// 卖家补货决策系统 - 规划配置快照
// ==========================================
// 职责: 单次运行的全部卖家配置,一次装配、只读传递
// 红线: 引擎只接受本结构,不在计算途中回读配置表
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::{AllocationMode, BudgetMode, SortKey};

// ==========================================
// PlannerSettings - 规划配置快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSettings {
    // ===== 分析窗口 =====
    pub lookback_days: i64,      // 追溯天数 (默认 30)
    pub supply_period_days: i64, // 备货覆盖天数 (默认 10)

    // ===== 补货分配 =====
    pub allocation_mode: AllocationMode, // 分配模式 (默认 EVEN)
    pub share_threshold: f64,            // 加权模式份额阈值 (默认 0.1)
    pub include_all: bool,               // 保留非正建议行 (默认 false)

    // ===== 商品筛选 =====
    pub price_min: Option<f64>,        // 价格带下限
    pub price_max: Option<f64>,        // 价格带上限
    pub min_turnover: Option<f64>,     // 周转下限 (配置时生效)
    pub max_turnover: Option<f64>,     // 周转上限 (配置时生效)
    pub min_required_stock: i64,       // 展示口径的库存下限 (默认 0)
    pub excluded_offer_ids: Vec<String>, // 排除货号清单

    // ===== ABC 分级 =====
    pub abc_a_share: f64, // A 档营收份额 (默认 0.8)
    pub abc_b_share: f64, // B 档营收份额 (默认 0.15)
    pub abc_c_share: f64, // C 档营收份额 (默认 0.05)

    // ===== 输出 =====
    pub sort_key: SortKey, // 结果排序口径 (默认按销量)

    // ===== 广告预算 =====
    pub week_budget: i64,            // 周预算目标 (默认 0 = 不分配)
    pub min_budget: i64,             // 单品最低周投放 (默认 500)
    pub max_items: Option<usize>,    // 硬性上限候选数
    pub budget_mode: BudgetMode,     // 预算分配模式 (默认 EVEN)
    pub budget_filter_price: bool,   // 预算候选应用价格带 (默认 true)
    pub budget_filter_stock: bool,   // 预算候选应用库存下限 (默认 true)
    pub budget_filter_campaigned: bool, // 排除已有广告活动的商品 (默认 true)
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            supply_period_days: 10,
            allocation_mode: AllocationMode::Even,
            share_threshold: 0.1,
            include_all: false,
            price_min: None,
            price_max: None,
            min_turnover: None,
            max_turnover: None,
            min_required_stock: 0,
            excluded_offer_ids: Vec::new(),
            abc_a_share: 0.8,
            abc_b_share: 0.15,
            abc_c_share: 0.05,
            sort_key: SortKey::Quantity,
            week_budget: 0,
            min_budget: 500,
            max_items: None,
            budget_mode: BudgetMode::Even,
            budget_filter_price: true,
            budget_filter_stock: true,
            budget_filter_campaigned: true,
        }
    }
}

impl PlannerSettings {
    /// 价格带判定（未配置的一侧不设限）
    pub fn price_in_band(&self, price: f64) -> bool {
        if let Some(min) = self.price_min {
            if price < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if price > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_band_unbounded_by_default() {
        let settings = PlannerSettings::default();
        assert!(settings.price_in_band(0.0));
        assert!(settings.price_in_band(1e9));
    }

    #[test]
    fn test_price_band_bounds() {
        let settings = PlannerSettings {
            price_min: Some(100.0),
            price_max: Some(500.0),
            ..Default::default()
        };
        assert!(!settings.price_in_band(99.9));
        assert!(settings.price_in_band(100.0));
        assert!(settings.price_in_band(500.0));
        assert!(!settings.price_in_band(500.1));
    }
}
