// ==========================================
// 卖家补货决策系统 - 必备商品再分配引擎
// ==========================================
// 职责: 保障必备商品跨集群合计最低备货量
// 输入: 补货计算引擎的完整输出 + 必备规则 + 聚合指标
// 红线: 只覆写已出现该 SKU 的集群行,不新增集群行
// 红线: 始终从全集群库存重算,保证幂等
// ==========================================

use std::collections::HashMap;

use tracing::debug;

use crate::domain::allocation::AllocationRow;
use crate::domain::product::{MandatoryRule, ProductInfo};
use crate::engine::metrics::SellerMetrics;

// ==========================================
// MandatoryRedistributor - 必备商品再分配引擎
// ==========================================
pub struct MandatoryRedistributor {
    // 无状态引擎,不需要注入依赖
}

impl MandatoryRedistributor {
    pub fn new() -> Self {
        Self {}
    }

    /// 对补货建议行应用必备商品规则
    ///
    /// 每条规则:
    /// 1. total_stock ≥ required → 全部行保持不变
    /// 2. 否则 needed = required - total_stock,按集群营收份额
    ///    （仅在已出现该 SKU 的集群内归一化）分摊,全零权重时均分
    /// 3. 命中行的 for_delivery 被覆写（不是累加）
    ///
    /// 幂等: 重复执行产出相同结果,因为每次都从库存重算。
    pub fn redistribute(
        &self,
        rows: &mut [AllocationRow],
        rules: &[MandatoryRule],
        products: &HashMap<i64, ProductInfo>,
        metrics: &SellerMetrics,
    ) {
        // 货号 → SKU 反查
        let sku_by_offer: HashMap<&str, i64> = products
            .values()
            .map(|p| (p.offer_id.as_str(), p.sku))
            .collect();

        for rule in rules {
            let sku = match sku_by_offer.get(rule.offer_id.as_str()) {
                Some(&sku) => sku,
                None => continue, // 缺失参照数据,无法定位 SKU
            };

            let total_stock = metrics.total_stock_for(sku);
            if total_stock >= rule.required_total_quantity {
                continue;
            }
            let needed = rule.required_total_quantity - total_stock;

            // 该 SKU 已出现的集群行下标
            let touched: Vec<usize> = rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.sku == sku)
                .map(|(i, _)| i)
                .collect();
            if touched.is_empty() {
                continue;
            }

            // 按集群营收份额分摊（仅在命中集群内归一化）
            let weights: Vec<f64> = touched
                .iter()
                .map(|&i| {
                    metrics
                        .cluster_revenue
                        .get(&rows[i].cluster)
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect();
            let weight_sum: f64 = weights.iter().sum();

            for (slot, &i) in touched.iter().enumerate() {
                let share = if weight_sum > 0.0 {
                    weights[slot] / weight_sum
                } else {
                    1.0 / touched.len() as f64
                };
                rows[i].for_delivery = (needed as f64 * share).round() as i64;
            }

            debug!(
                offer_id = %rule.offer_id,
                sku,
                needed,
                clusters = touched.len(),
                "必备商品缺口已跨集群分摊"
            );
        }
    }
}

impl Default for MandatoryRedistributor {
    fn default() -> Self {
        Self::new()
    }
}
