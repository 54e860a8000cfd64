// ==========================================
// 卖家补货决策系统 - 报表行契约
// ==========================================
// 定位: 与外部"发布到表格"协作方的契约是有序定宽行,
//       本系统不感知任何表格坐标
// ==========================================

use crate::domain::allocation::{AllocationRow, AllocationSummary};
use crate::domain::budget::{AbcRow, BudgetAllocation};

// ==========================================
// 补货建议表
// ==========================================

/// 补货建议表表头
pub const ALLOCATION_HEADER: [&str; 7] = [
    "cluster",
    "sku",
    "offer_id",
    "for_delivery",
    "need_goods",
    "turnover",
    "avg_daily_share",
];

/// 补货建议行 → 定宽行
pub fn allocation_to_row(row: &AllocationRow) -> Vec<String> {
    vec![
        row.cluster.clone(),
        row.sku.to_string(),
        row.offer_id.clone(),
        row.for_delivery.to_string(),
        format!("{:.2}", row.need_goods),
        format!("{:.1}", row.turnover),
        format!("{:.4}", row.avg_daily_share),
    ]
}

/// 汇总表表头 (货号 → 跨集群合计)
pub const SUMMARY_HEADER: [&str; 2] = ["offer_id", "total_for_delivery"];

/// 汇总 → 定宽行集（按合计降序）
pub fn summary_to_rows(summary: &AllocationSummary) -> Vec<Vec<String>> {
    let mut entries: Vec<(&String, &i64)> = summary.totals.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .into_iter()
        .map(|(offer_id, total)| vec![offer_id.clone(), total.to_string()])
        .collect()
}

// ==========================================
// ABC 分级表
// ==========================================

/// ABC 分级表表头
pub const ABC_HEADER: [&str; 6] = ["article", "sku", "revenue", "units", "avg_price", "abc"];

/// ABC 行 → 定宽行
pub fn abc_to_row(row: &AbcRow) -> Vec<String> {
    vec![
        row.offer_id.clone(),
        row.sku.to_string(),
        format!("{:.2}", row.revenue),
        row.units.to_string(),
        format!("{:.2}", row.avg_price),
        row.label.to_string(),
    ]
}

// ==========================================
// 预算分配表
// ==========================================

/// 预算分配表表头
/// id 列为占位符,由外部活动管理方回填
pub const BUDGET_HEADER: [&str; 7] = [
    "id",
    "activate",
    "status",
    "campaign",
    "sku",
    "week_budget",
    "day_budget",
];

/// 预算行 → 定宽行
pub fn budget_to_row(row: &BudgetAllocation) -> Vec<String> {
    vec![
        String::new(),          // id 占位符
        "TRUE".to_string(),     // 激活标志
        "NEW".to_string(),      // 状态
        format!("auto/{}", row.offer_id), // 活动标签
        row.sku.to_string(),
        row.week_budget.to_string(),
        row.day_budget.to_string(),
    ]
}
