// ==========================================
// 卖家补货决策系统 - 库存快照领域模型
// ==========================================
// 多个命名库存计数器合并为集群总库存
// requested_supply 为平台侧的集群供货建议,单独保留
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::StockScheme;

// ==========================================
// StockRecord - 集群库存快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    // ===== 归属 =====
    pub seller_id: String,         // 卖家账号
    pub sku: i64,                  // 平台 SKU
    pub cluster: String,           // 集群名
    pub scheme: StockScheme,       // 履约方案 (FBO/FBS)

    // ===== 库存计数器 =====
    pub free_to_sell: i64,         // 可售
    pub reserved: i64,             // 占用 (已下单未出库)
    pub in_transit: i64,           // 在途

    // ===== 平台建议 =====
    pub requested_supply: i64,     // 集群供货建议量

    pub observed_at: DateTime<Utc>, // 快照时间
}

impl StockRecord {
    /// 集群总库存（命名计数器求和,不含供货建议）
    pub fn total(&self) -> i64 {
        self.free_to_sell + self.reserved + self.in_transit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sums_named_counters_only() {
        let record = StockRecord {
            seller_id: "seller-1".to_string(),
            sku: 100,
            cluster: "Москва".to_string(),
            scheme: StockScheme::Fbo,
            free_to_sell: 5,
            reserved: 2,
            in_transit: 3,
            requested_supply: 40,
            observed_at: Utc::now(),
        };

        // requested_supply 不参与总库存
        assert_eq!(record.total(), 10);
    }
}
