use tracing::debug;

use crate::domain::budget::{BudgetAllocation, BudgetOutcome};
use crate::domain::types::BudgetMode;

/// 对账阈值（货币单位）: 分配合计与周目标的允许偏差
pub const RECONCILIATION_THRESHOLD: i64 = 5;

// ==========================================
// BudgetCandidate - 预算候选商品
// ==========================================
// 调用方负责排名与筛选（价格带/库存下限/已有广告排除）
#[derive(Debug, Clone)]
pub struct BudgetCandidate {
    pub sku: i64,
    pub offer_id: String,
    pub revenue: f64, // 追溯期营收 (加权模式的权重来源)
}

// ==========================================
// BudgetAllocator - 广告预算分配引擎
// ==========================================
pub struct BudgetAllocator {
    // 无状态引擎,不需要注入依赖
}

impl BudgetAllocator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分配周预算
    ///
    /// 算法 (贪心 + 对账,不是最优背包):
    /// 1. W < min_budget → TooSmall 终态
    /// 2. n_max = max_items 或 floor(W / min_budget)
    /// 3. 按排名取前 n_max 个候选,EVEN 均分 / WEIGHTED 按营收份额
    /// 4. 单品金额托底到 min_budget
    /// 5. 按选取顺序累加,一旦将超出 W 超过对账阈值即停止吸纳
    ///    (当前候选整体排除,不做部分投放)
    /// 6. 偏差超阈值时按 W/sum 重缩放; 整数化用最大余数法,
    ///    合计精确落在目标上。重缩放后不再重新托底。
    /// 7. day_budget = round(week_budget / 7)
    ///
    /// # 参数
    /// - `candidates`: 已排名、已筛选的候选列表
    /// - `week_budget`: 周预算目标 W
    /// - `min_budget`: 单品最低周投放
    /// - `max_items`: 硬性候选数上限
    /// - `mode`: EVEN / WEIGHTED
    pub fn allocate(
        &self,
        candidates: &[BudgetCandidate],
        week_budget: i64,
        min_budget: i64,
        max_items: Option<usize>,
        mode: BudgetMode,
    ) -> BudgetOutcome {
        // 预算吸纳不了任何一个候选: 终态业务结果,不是错误
        if week_budget < min_budget {
            return BudgetOutcome::TooSmall {
                week_budget,
                min_budget,
            };
        }
        if candidates.is_empty() {
            return BudgetOutcome::Allocated(Vec::new());
        }

        // 候选数上限
        let n_max = match max_items {
            Some(n) => n,
            None => {
                if min_budget > 0 {
                    (week_budget / min_budget) as usize
                } else {
                    candidates.len()
                }
            }
        };
        let selected = &candidates[..n_max.min(candidates.len())];
        if selected.is_empty() {
            return BudgetOutcome::Allocated(Vec::new());
        }

        // 初始金额
        let revenue_total: f64 = selected.iter().map(|c| c.revenue).sum();
        let even_amount = week_budget as f64 / selected.len() as f64;
        let mut amounts: Vec<f64> = selected
            .iter()
            .map(|candidate| match mode {
                BudgetMode::Weighted if revenue_total > 0.0 => {
                    week_budget as f64 * candidate.revenue / revenue_total
                }
                _ => even_amount,
            })
            .collect();

        // 单品托底
        for amount in &mut amounts {
            if *amount < min_budget as f64 {
                *amount = min_budget as f64;
            }
        }

        // 按选取顺序吸纳,超出即停
        let limit = (week_budget + RECONCILIATION_THRESHOLD) as f64;
        let mut admitted = 0usize;
        let mut running_sum = 0.0;
        for amount in &amounts {
            if running_sum + amount > limit {
                break;
            }
            running_sum += amount;
            admitted += 1;
        }
        amounts.truncate(admitted);
        let selected = &selected[..admitted];
        if selected.is_empty() {
            return BudgetOutcome::Allocated(Vec::new());
        }

        // 对账: 偏差超阈值时重缩放到 W
        let deviation = running_sum - week_budget as f64;
        let (amounts, target) = if deviation.abs() > RECONCILIATION_THRESHOLD as f64 {
            debug!(
                running_sum,
                week_budget, "分配合计偏离周目标,执行重缩放对账"
            );
            let scale = week_budget as f64 / running_sum;
            let rescaled: Vec<f64> = amounts.iter().map(|a| a * scale).collect();
            // 注意: 重缩放可能把个别商品压回 min_budget 之下,这里有意不再托底
            (rescaled, week_budget)
        } else {
            (amounts, running_sum.round() as i64)
        };

        // 整数化: 最大余数法保证合计精确等于 target
        let week_amounts = round_preserving_sum(&amounts, target);

        let rows = selected
            .iter()
            .zip(week_amounts)
            .map(|(candidate, week)| {
                BudgetAllocation::from_week_budget(candidate.sku, &candidate.offer_id, week)
            })
            .collect();

        BudgetOutcome::Allocated(rows)
    }
}

impl Default for BudgetAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// 最大余数法整数化: 合计精确等于 target
///
/// 向下取整后,把剩余单位按小数部分从大到小逐个分配。
fn round_preserving_sum(amounts: &[f64], target: i64) -> Vec<i64> {
    let mut result: Vec<i64> = amounts.iter().map(|a| a.floor() as i64).collect();
    let floored: i64 = result.iter().sum();
    let mut remainder = target - floored;

    if remainder <= 0 {
        return result;
    }

    // 小数部分降序,同值保持下标顺序
    let mut order: Vec<usize> = (0..amounts.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = amounts[a] - amounts[a].floor();
        let fb = amounts[b] - amounts[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });

    // 剩余单位逐轮分配（浮点误差导致的多余单位落到排序靠前的项）
    let mut i = 0usize;
    while remainder > 0 {
        result[order[i % order.len()]] += 1;
        remainder -= 1;
        i += 1;
    }

    result
}
