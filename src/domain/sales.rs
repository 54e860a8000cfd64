// ==========================================
// 卖家补货决策系统 - 销售记录领域模型
// ==========================================
// 不可变历史事实,由外部采集协作方产出
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// SalesRecord - 销售记录
// ==========================================
// 用途: 指标聚合的唯一销量/营收来源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    // ===== 归属 =====
    pub seller_id: String,          // 卖家账号
    pub sku: i64,                   // 平台 SKU
    pub offer_id: String,           // 卖家货号

    // ===== 事实 =====
    pub cluster_to: Option<String>, // 目的集群 (缺失归入 no-cluster)
    pub quantity: i64,              // 销量 (件)
    pub revenue_amount: f64,        // 营收 (货币单位)
    pub observation_date: NaiveDate, // 观察日期
}

impl SalesRecord {
    /// 归桶用的集群键（缺失目的集群时回落到哨兵值）
    pub fn cluster_key(&self) -> String {
        self.cluster_to
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(crate::domain::types::NO_CLUSTER)
            .to_string()
    }
}
