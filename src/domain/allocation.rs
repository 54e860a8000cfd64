// ==========================================
// 卖家补货决策系统 - 分配结果领域模型
// ==========================================
// 红线: (cluster, sku) 使用显式复合键,禁止字典套字典
// 红线: for_delivery 只在产出行时取整,过程量保持小数
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// ClusterSku - (集群, SKU) 复合键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterSku {
    pub cluster: String,
    pub sku: i64,
}

impl ClusterSku {
    pub fn new(cluster: impl Into<String>, sku: i64) -> Self {
        Self {
            cluster: cluster.into(),
            sku,
        }
    }
}

// ==========================================
// ClusterMetric - 派生集群指标 (短生命周期)
// ==========================================
// 每次运行从销售/库存快照全量重算,不做增量持久化
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClusterMetric {
    pub quantity_sold: i64,            // 集群销量
    pub revenue: f64,                  // 集群营收
    pub cluster_stock: i64,            // 集群库存
    pub total_stock_all_clusters: i64, // 全集群库存
}

// ==========================================
// AllocationRow - 补货建议行
// ==========================================
// 不变量: for_delivery = round(need_goods - cluster_stock)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRow {
    pub cluster: String,       // 集群名
    pub sku: i64,              // 平台 SKU
    pub offer_id: String,      // 卖家货号
    pub for_delivery: i64,     // 建议发货量 (带符号,产出时取整)
    pub need_goods: f64,       // 目标需求量 (小数)
    pub turnover: f64,         // 周转天数 (库存 / 日均销量)
    pub avg_daily_share: f64,  // 该集群占 SKU 总销量的份额
}

// ==========================================
// AllocationSummary - 卖家级汇总
// ==========================================
// offer_id → 跨集群建议发货合计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub totals: HashMap<String, i64>,
}

impl AllocationSummary {
    /// 从补货建议行集合汇总
    pub fn from_rows(rows: &[AllocationRow]) -> Self {
        let mut totals: HashMap<String, i64> = HashMap::new();
        for row in rows {
            *totals.entry(row.offer_id.clone()).or_insert(0) += row.for_delivery;
        }
        Self { totals }
    }

    /// 单货号的跨集群合计
    pub fn total_for(&self, offer_id: &str) -> i64 {
        self.totals.get(offer_id).copied().unwrap_or(0)
    }
}
