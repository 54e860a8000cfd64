// ==========================================
// 卖家补货决策系统 - ABC 分级与预算领域模型
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::AbcLabel;

// ==========================================
// AbcRow - ABC 分级表行
// ==========================================
// 卖家级口径: 按全集群追溯营收分级,不按集群重算
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcRow {
    pub offer_id: String, // 卖家货号
    pub sku: i64,         // 平台 SKU
    pub revenue: f64,     // 追溯期营收
    pub units: i64,       // 追溯期销量
    pub avg_price: f64,   // 平均成交价 (revenue / units, 零保护)
    pub label: AbcLabel,  // 分级标签
}

// ==========================================
// BudgetAllocation - 周预算分配行
// ==========================================
// 不变量: day_budget = round(week_budget / 7)
// 不变量: sum(week_budget) 与周目标差值在对账阈值内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub sku: i64,          // 平台 SKU
    pub offer_id: String,  // 卖家货号
    pub week_budget: i64,  // 周预算 (货币单位)
    pub day_budget: i64,   // 日预算 = round(周预算 / 7)
}

impl BudgetAllocation {
    /// 由周预算构造,日预算按不变量推导
    pub fn from_week_budget(sku: i64, offer_id: impl Into<String>, week_budget: i64) -> Self {
        Self {
            sku,
            offer_id: offer_id.into(),
            week_budget,
            day_budget: ((week_budget as f64) / 7.0).round() as i64,
        }
    }
}

// ==========================================
// BudgetOutcome - 预算分配结果
// ==========================================
// "预算不足以覆盖任何一个候选"是终态业务结果,不是错误
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BudgetOutcome {
    /// 正常分配
    Allocated(Vec<BudgetAllocation>),
    /// 周预算低于单品最低投放,无法分配
    TooSmall { week_budget: i64, min_budget: i64 },
}

impl BudgetOutcome {
    /// 分配行视图（TooSmall 等价于空选集）
    pub fn rows(&self) -> &[BudgetAllocation] {
        match self {
            BudgetOutcome::Allocated(rows) => rows,
            BudgetOutcome::TooSmall { .. } => &[],
        }
    }
}
